// Deployment configuration validation for djgoprod
//
// This module turns the environment snapshot taken at startup into the resolved
// configuration and a transcript of everything that looked wrong on the way.
//
// Validation never fails. Missing or malformed inputs degrade to a safe default
// (or are passed through untouched) and leave a finding in the transcript, so a
// misconfigured deployment still starts and the operator sees why it is unsafe.

use log::{debug, info};

use crate::config::{
    defaults, DatabaseConfig, DeploymentMode, EnvironmentSnapshot, HttpProtocol, OAuthCredentials,
    ResolvedConfiguration,
};
use crate::transcript::{CheckId, Finding, Transcript};

const LOCALHOST: &str = "localhost";
const LOOPBACK_ADDRESSES: [&str; 2] = ["127.0.0.1", "0.0.0.0"];
const WILDCARD_HOST: &str = "*";

/// How a production host containing `localhost` may be exempted from the
/// loopback check (e.g. `localhostproduct.com`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LocalhostExemption {
    /// Exempt the host unless one of its own labels is exactly `localhost`
    #[default]
    CandidateHost,
    /// Test the fixed identifier `localhost` instead of the host under
    /// examination. It never contains a `.`, so no host is ever exempted.
    /// Kept selectable to reproduce transcripts of older deployments.
    LegacyIdentifier,
}

/// Helper functions for common validation patterns
pub mod validators {
    use super::*;

    /// Check a credential that must be present and at least a few characters long
    pub fn validate_credential(
        name: &str,
        value: Option<&str>,
        check: CheckId,
    ) -> Option<Finding> {
        match value {
            None => Some(Finding::critical(
                check,
                format!("{} environment variable not set.", name),
            )),
            Some(v) if v.chars().count() < defaults::CREDENTIAL_MIN_LEN => {
                Some(Finding::critical(
                    check,
                    format!(
                        "{} environment variable is likely invalid (<{} chars).",
                        name,
                        defaults::CREDENTIAL_MIN_LEN
                    ),
                ))
            }
            Some(_) => None,
        }
    }

    /// Split a comma separated host list, dropping blank entries
    pub fn split_hosts(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(String::from)
            .collect()
    }

    /// Whether any dot-separated label of the host is exactly `localhost`
    ///
    /// A trailing `:port` and a trailing root `.` are ignored, so `localhost.`,
    /// `localhost:8000` and `app.localhost` match while `localhostproduct.com`
    /// does not.
    pub fn has_localhost_label(host: &str) -> bool {
        // Drop the port, but only when it is numeric
        let name = match host.rsplit_once(':') {
            Some((name, port)) if !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) => {
                name
            }
            _ => host,
        };

        name.trim_end_matches('.')
            .split('.')
            .any(|label| label.eq_ignore_ascii_case(LOCALHOST))
    }
}

/// Validate the Google OAuth client id and secret
///
/// The raw values are returned whether or not they are valid; OAuth calls made
/// with bad credentials fail later at request time.
pub fn validate_oauth_credentials(
    inputs: &EnvironmentSnapshot,
    findings: &mut Vec<Finding>,
) -> OAuthCredentials {
    let client_id = inputs.google_client_id.clone();
    let secret = inputs.google_secret_key.clone();

    // Check each credential on its own so both problems are reported
    findings.extend(validators::validate_credential(
        "GOOGLE_CLIENT_ID",
        client_id.as_deref(),
        CheckId::GoogleClientId,
    ));
    findings.extend(validators::validate_credential(
        "GOOGLE_SECRET_KEY",
        secret.as_deref(),
        CheckId::GoogleSecretKey,
    ));

    OAuthCredentials { client_id, secret }
}

/// Normalize the deployment mode, defaulting to `local`
pub fn resolve_deployment_mode(value: Option<&str>, findings: &mut Vec<Finding>) -> DeploymentMode {
    // Parse case-insensitively; anything else falls back to local
    let mode = match value.and_then(DeploymentMode::parse) {
        Some(mode) => mode,
        None => {
            let fallback = DeploymentMode::default();
            let message = match value {
                None => format!(
                    "DEPLOYMENT environment variable not set. Defaulting to {}.",
                    fallback
                ),
                Some(v) => format!(
                    "DEPLOYMENT environment variable \"{}\" is not one of local, development, production. Defaulting to {}.",
                    v, fallback
                ),
            };
            findings.push(Finding::critical(CheckId::DeploymentMode, message));
            fallback
        }
    };

    // Record the mode we ended up running in
    findings.push(Finding::info(
        CheckId::DeploymentMode,
        format!("Running in {}.", mode),
    ));
    mode
}

/// Check the secret key, passing it through unchanged
pub fn resolve_secret_key(value: Option<&str>, findings: &mut Vec<Finding>) -> Option<String> {
    match value {
        Some(key) if key.chars().count() >= defaults::SECRET_KEY_MIN_LEN => {
            // Long enough, but may still be the generated placeholder
            if key.contains(defaults::INSECURE_SECRET_MARKER) {
                findings.push(Finding::warning(
                    CheckId::SecretKey,
                    format!(
                        "SECRET_KEY is set to a default \"{}\" value. This is not recommended for production.",
                        defaults::INSECURE_SECRET_MARKER
                    ),
                ));
            }
        }
        // Missing or too short
        _ => findings.push(Finding::critical(
            CheckId::SecretKey,
            "SECRET_KEY environment variable not set or is not sufficient in length.",
        )),
    }
    value.map(String::from)
}

/// Build the CSRF trusted origins from the allowed hosts
///
/// Production only trusts `https` origins; other modes trust both schemes.
pub fn resolve_csrf_trusted_origins(mode: DeploymentMode, allowed_hosts: &[String]) -> Vec<String> {
    let mut origins = Vec::with_capacity(allowed_hosts.len() * 2);
    for host in allowed_hosts {
        if mode != DeploymentMode::Production {
            origins.push(format!("http://{}", host));
        }
        origins.push(format!("https://{}", host));
    }
    origins
}

/// Pick the database: remote URL first, then a local SQLite file
pub fn resolve_database(
    psql_database_url: Option<&str>,
    local_sqlite: Option<&str>,
    findings: &mut Vec<Finding>,
) -> DatabaseConfig {
    // A remote URL always wins, even when too short to be usable
    if let Some(url) = psql_database_url {
        if url.chars().count() < defaults::CREDENTIAL_MIN_LEN {
            findings.push(Finding::critical(
                CheckId::PsqlDatabaseUrl,
                format!(
                    "PSQL_DATABASE_URL environment variable is likely invalid (<{} chars).",
                    defaults::CREDENTIAL_MIN_LEN
                ),
            ));
        }
        return DatabaseConfig::Remote {
            url: url.to_string(),
        };
    }

    // Empty LOCAL_SQLITE counts as unset
    match local_sqlite.filter(|name| !name.is_empty()) {
        Some(name) => {
            let file_name = format!("{}{}", name, defaults::SQLITE_EXTENSION);
            findings.push(Finding::warning(
                CheckId::LocalSqlite,
                format!(
                    "Using local database filename \"{}\". This is ok if expected.",
                    file_name
                ),
            ));

            // Check the name length before anything else
            if name.chars().count() < defaults::CREDENTIAL_MIN_LEN {
                findings.push(Finding::critical(
                    CheckId::LocalSqlite,
                    format!(
                        "LOCAL_SQLITE environment variable is likely invalid (<{} chars). Defaulting to \"{}\".",
                        defaults::CREDENTIAL_MIN_LEN,
                        defaults::SQLITE_FILE
                    ),
                ));
                return DatabaseConfig::LocalSqlite {
                    file_name: defaults::SQLITE_FILE.to_string(),
                };
            }

            // The extension is appended, so a name carrying it ends up doubled
            if name.contains(defaults::SQLITE_EXTENSION) {
                findings.push(Finding::critical(
                    CheckId::LocalSqlite,
                    format!(
                        "LOCAL_SQLITE environment variable may be invalid as it contains the \"{ext}\" extension. The {ext} extension is added to the name automatically.",
                        ext = defaults::SQLITE_EXTENSION
                    ),
                ));
            }

            DatabaseConfig::LocalSqlite { file_name }
        }
        // Nothing configured: use the default local file
        None => {
            findings.push(Finding::critical(
                CheckId::DatabaseUnset,
                format!(
                    "Both LOCAL_SQLITE and PSQL_DATABASE_URL environment variables are not set. At least one must be set to configure the database. Defaulting to \"{}\".",
                    defaults::SQLITE_FILE
                ),
            ));
            DatabaseConfig::LocalSqlite {
                file_name: defaults::SQLITE_FILE.to_string(),
            }
        }
    }
}

/// Deployment configuration validator
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigValidator {
    localhost_exemption: LocalhostExemption,
}

impl ConfigValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select how `localhost` lookalike production domains are treated
    pub fn with_localhost_exemption(mut self, policy: LocalhostExemption) -> Self {
        self.localhost_exemption = policy;
        self
    }

    /// Run every check in order and return the resolved configuration and transcript
    pub fn validate(&self, inputs: &EnvironmentSnapshot) -> (ResolvedConfiguration, Transcript) {
        let mut findings = Vec::new();

        info!("Validating deployment configuration...");

        let oauth = validate_oauth_credentials(inputs, &mut findings);
        let mode = resolve_deployment_mode(inputs.deployment.as_deref(), &mut findings);
        let secret_key = resolve_secret_key(inputs.secret_key.as_deref(), &mut findings);
        let (debug, allowed_hosts) =
            self.resolve_debug_and_hosts(mode, inputs.allowed_hosts.as_deref(), &mut findings);
        let csrf_trusted_origins = resolve_csrf_trusted_origins(mode, &allowed_hosts);
        let database = resolve_database(
            inputs.psql_database_url.as_deref(),
            inputs.local_sqlite.as_deref(),
            &mut findings,
        );

        debug!(
            "Resolved {} allowed host(s), {} CSRF trusted origin(s), {} database",
            allowed_hosts.len(),
            csrf_trusted_origins.len(),
            database.engine()
        );

        let config = ResolvedConfiguration {
            mode,
            debug,
            secret_key,
            allowed_hosts,
            csrf_trusted_origins,
            database,
            oauth,
            account_default_http_protocol: HttpProtocol::for_mode(mode),
        };

        (config, Transcript::compose(findings, mode))
    }

    /// Decide the debug flag and allowed hosts for the deployment mode
    pub fn resolve_debug_and_hosts(
        &self,
        mode: DeploymentMode,
        raw_hosts: Option<&str>,
        findings: &mut Vec<Finding>,
    ) -> (bool, Vec<String>) {
        // Local always debugs and accepts every host
        if mode == DeploymentMode::Local {
            findings.push(Finding::warning(
                CheckId::Debug,
                "DEBUG is set to True. This is not recommended for production.",
            ));
            findings.push(Finding::warning(
                CheckId::AllowedHosts,
                "ALLOWED_HOSTS is set to [\"*\"]. This is not recommended for production.",
            ));
            return (true, vec![WILDCARD_HOST.to_string()]);
        }

        // Parse ALLOWED_HOSTS; missing counts as empty
        let hosts = raw_hosts.map(validators::split_hosts).unwrap_or_default();
        if hosts.is_empty() {
            findings.push(Finding::critical(
                CheckId::AllowedHosts,
                "ALLOWED_HOSTS environment variable not working.",
            ));
        }

        // Production must not accept wildcard or loopback hosts
        if mode == DeploymentMode::Production {
            if hosts.iter().any(|h| h == WILDCARD_HOST) {
                findings.push(Finding::critical(
                    CheckId::AllowedHostsWildcard,
                    "ALLOWED_HOSTS is set to [\"*\"]. This is highly not recommended for production.",
                ));
            }

            // One finding no matter how many hosts match
            if hosts.iter().any(|h| self.is_loopback_host(h)) {
                findings.push(Finding::critical(
                    CheckId::AllowedHostsLoopback,
                    "ALLOWED_HOSTS has localhost, 127.0.0.1, or 0.0.0.0. This is highly not recommended for production.",
                ));
            }
        }

        (false, hosts)
    }

    fn is_loopback_host(&self, host: &str) -> bool {
        let host = host.to_lowercase();

        // A `localhost` substring counts unless the exemption policy clears it
        if host.contains(LOCALHOST) && !self.localhost_exempt(&host) {
            return true;
        }
        LOOPBACK_ADDRESSES.iter().any(|addr| host.contains(addr))
    }

    fn localhost_exempt(&self, host: &str) -> bool {
        match self.localhost_exemption {
            LocalhostExemption::CandidateHost => !validators::has_localhost_label(host),
            LocalhostExemption::LegacyIdentifier => LOCALHOST.contains('.'),
        }
    }
}

/// Validate the snapshot with the default policies
pub fn validate(inputs: &EnvironmentSnapshot) -> (ResolvedConfiguration, Transcript) {
    ConfigValidator::default().validate(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::{Severity, Verdict};

    const GOOD_SECRET: &str = "k3x9q0v7m2b8n4c6z1l5j8h2g7f3d9s0a4p6o1";

    fn production_inputs(hosts: &str) -> EnvironmentSnapshot {
        EnvironmentSnapshot {
            deployment: Some("production".to_string()),
            secret_key: Some(GOOD_SECRET.to_string()),
            google_client_id: Some("client-id.apps.googleusercontent.com".to_string()),
            google_secret_key: Some("google-secret".to_string()),
            allowed_hosts: Some(hosts.to_string()),
            psql_database_url: Some("postgres://app:pw@db.internal:5432/app".to_string()),
            local_sqlite: None,
        }
    }

    fn critical_count(transcript: &Transcript) -> usize {
        transcript.with_severity(Severity::Critical).count()
    }

    #[test]
    fn test_clean_production_has_no_critical() {
        let (config, transcript) = validate(&production_inputs("example.com,api.example.com"));
        assert_eq!(transcript.verdict(), Verdict::Ok);
        assert_eq!(config.mode, DeploymentMode::Production);
        assert!(!config.debug);
        assert_eq!(config.allowed_hosts, vec!["example.com", "api.example.com"]);
        assert_eq!(config.account_default_http_protocol, HttpProtocol::Https);
        assert_eq!(
            config.database,
            DatabaseConfig::Remote {
                url: "postgres://app:pw@db.internal:5432/app".to_string()
            }
        );
        // Only the "Running in production" line
        assert_eq!(transcript.findings().len(), 1);
        assert_eq!(transcript.findings()[0].severity, Severity::Info);
    }

    #[test]
    fn test_empty_environment_degrades_to_defaults() {
        let (config, transcript) = validate(&EnvironmentSnapshot::default());

        assert_eq!(transcript.verdict(), Verdict::HasCritical);
        assert_eq!(config.mode, DeploymentMode::Local);
        assert!(config.debug);
        assert_eq!(config.allowed_hosts, vec!["*"]);
        assert_eq!(
            config.database,
            DatabaseConfig::LocalSqlite {
                file_name: "db.sqlite3".to_string()
            }
        );
        // Pass-through values stay unset
        assert_eq!(config.oauth.client_id, None);
        assert_eq!(config.oauth.secret, None);
        assert_eq!(config.secret_key, None);

        for check in [
            CheckId::GoogleClientId,
            CheckId::GoogleSecretKey,
            CheckId::DeploymentMode,
            CheckId::SecretKey,
            CheckId::DatabaseUnset,
        ] {
            let severities: Vec<Severity> =
                transcript.for_check(check).map(|f| f.severity).collect();
            assert!(
                severities.contains(&Severity::Critical),
                "expected a critical finding for {}",
                check
            );
        }
    }

    #[test]
    fn test_findings_follow_check_order() {
        let (_, transcript) = validate(&EnvironmentSnapshot::default());
        let checks: Vec<CheckId> = transcript.findings().iter().map(|f| f.check).collect();
        assert_eq!(
            checks,
            vec![
                CheckId::GoogleClientId,
                CheckId::GoogleSecretKey,
                CheckId::DeploymentMode,
                CheckId::DeploymentMode,
                CheckId::SecretKey,
                CheckId::Debug,
                CheckId::AllowedHosts,
                CheckId::DatabaseUnset,
            ]
        );
    }

    #[test]
    fn test_short_oauth_credentials() {
        let inputs = EnvironmentSnapshot {
            google_client_id: Some("ab".to_string()),
            google_secret_key: Some("abc".to_string()),
            ..Default::default()
        };
        let mut findings = Vec::new();
        let creds = validate_oauth_credentials(&inputs, &mut findings);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].check, CheckId::GoogleClientId);
        assert_eq!(findings[0].severity, Severity::Critical);
        assert!(findings[0].message.contains("likely invalid"));
        // No substitution
        assert_eq!(creds.client_id.as_deref(), Some("ab"));
        assert_eq!(creds.secret.as_deref(), Some("abc"));
    }

    #[test]
    fn test_deployment_mode_is_total() {
        for (input, expected, critical) in [
            (Some("local"), DeploymentMode::Local, false),
            (Some("Development"), DeploymentMode::Development, false),
            (Some("PRODUCTION"), DeploymentMode::Production, false),
            (Some("staging"), DeploymentMode::Local, true),
            (Some(""), DeploymentMode::Local, true),
            (Some(" production"), DeploymentMode::Local, true),
            (None, DeploymentMode::Local, true),
        ] {
            let mut findings = Vec::new();
            let mode = resolve_deployment_mode(input, &mut findings);
            assert_eq!(mode, expected, "input {:?}", input);
            let criticals = findings
                .iter()
                .filter(|f| f.severity == Severity::Critical)
                .count();
            assert_eq!(criticals, usize::from(critical), "input {:?}", input);
        }
    }

    #[test]
    fn test_deployment_mode_is_idempotent() {
        let mut findings = Vec::new();
        let first = resolve_deployment_mode(Some("Production"), &mut findings);
        let second = resolve_deployment_mode(Some(first.as_str()), &mut findings);
        assert_eq!(first, second);
    }

    #[test]
    fn test_unrecognized_mode_is_named() {
        let mut findings = Vec::new();
        resolve_deployment_mode(Some("staging"), &mut findings);
        assert!(findings[0].message.contains("\"staging\""));
    }

    #[test]
    fn test_insecure_secret_key_warns_only() {
        let key = format!("django-insecure-{}", "x".repeat(24));
        assert_eq!(key.len(), 40);

        let mut findings = Vec::new();
        let resolved = resolve_secret_key(Some(&key), &mut findings);

        assert_eq!(resolved.as_deref(), Some(key.as_str()));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert_eq!(findings[0].check, CheckId::SecretKey);
    }

    #[test]
    fn test_short_secret_key_is_critical() {
        let mut findings = Vec::new();
        let resolved = resolve_secret_key(Some("django-insecure-short"), &mut findings);
        assert_eq!(resolved.as_deref(), Some("django-insecure-short"));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Critical);
    }

    #[test]
    fn test_local_mode_uses_wildcard_hosts() {
        let inputs = EnvironmentSnapshot {
            deployment: Some("local".to_string()),
            allowed_hosts: Some("example.com".to_string()),
            ..Default::default()
        };
        let (config, transcript) = validate(&inputs);

        assert!(config.debug);
        assert_eq!(config.allowed_hosts, vec!["*"]);
        assert_eq!(config.csrf_trusted_origins, vec!["http://*", "https://*"]);
        assert!(transcript
            .for_check(CheckId::AllowedHosts)
            .any(|f| f.severity == Severity::Warning));
        assert!(transcript
            .for_check(CheckId::Debug)
            .any(|f| f.severity == Severity::Warning));
    }

    #[test]
    fn test_missing_hosts_outside_local_is_critical() {
        let validator = ConfigValidator::new();
        for raw in [None, Some(""), Some(" , ,")] {
            let mut findings = Vec::new();
            let (debug, hosts) =
                validator.resolve_debug_and_hosts(DeploymentMode::Development, raw, &mut findings);
            assert!(!debug);
            assert!(hosts.is_empty());
            assert_eq!(findings.len(), 1, "input {:?}", raw);
            assert_eq!(findings[0].check, CheckId::AllowedHosts);
            assert_eq!(findings[0].severity, Severity::Critical);
        }
    }

    #[test]
    fn test_production_wildcard_is_critical() {
        let (_, transcript) = validate(&production_inputs("*"));
        assert_eq!(transcript.for_check(CheckId::AllowedHostsWildcard).count(), 1);
        assert_eq!(critical_count(&transcript), 1);
    }

    #[test]
    fn test_development_allows_loopback() {
        let mut inputs = production_inputs("localhost,127.0.0.1");
        inputs.deployment = Some("development".to_string());
        let (config, transcript) = validate(&inputs);
        assert_eq!(transcript.verdict(), Verdict::Ok);
        assert_eq!(config.account_default_http_protocol, HttpProtocol::Http);
    }

    #[test]
    fn test_production_loopback_hosts_are_critical() {
        for hosts in ["localhost", "127.0.0.1:8000", "example.com,0.0.0.0"] {
            let (_, transcript) = validate(&production_inputs(hosts));
            assert_eq!(
                transcript.for_check(CheckId::AllowedHostsLoopback).count(),
                1,
                "hosts {}",
                hosts
            );
        }
    }

    #[test]
    fn test_loopback_reported_once_for_many_hosts() {
        let (_, transcript) = validate(&production_inputs("localhost,127.0.0.1,0.0.0.0"));
        assert_eq!(transcript.for_check(CheckId::AllowedHostsLoopback).count(), 1);
    }

    #[test]
    fn test_localhost_lookalike_domain_is_exempt() {
        let (_, transcript) = validate(&production_inputs("localhostproduct.com"));
        assert_eq!(transcript.verdict(), Verdict::Ok);
    }

    #[test]
    fn test_localhost_subdomain_is_critical() {
        let (_, transcript) = validate(&production_inputs("app.localhost"));
        assert_eq!(transcript.for_check(CheckId::AllowedHostsLoopback).count(), 1);
        assert_eq!(transcript.verdict(), Verdict::HasCritical);
    }

    #[test]
    fn test_localhost_localdomain_is_critical() {
        let (_, transcript) = validate(&production_inputs("localhost.localdomain"));
        assert_eq!(transcript.for_check(CheckId::AllowedHostsLoopback).count(), 1);
    }

    #[test]
    fn test_localhost_with_root_dot_or_port_is_critical() {
        for hosts in ["localhost.", "localhost:8000", "LOCALHOST", "example.com,app.localhost:8000"] {
            let (_, transcript) = validate(&production_inputs(hosts));
            assert_eq!(
                transcript.for_check(CheckId::AllowedHostsLoopback).count(),
                1,
                "hosts {}",
                hosts
            );
        }
    }

    #[test]
    fn test_has_localhost_label() {
        assert!(validators::has_localhost_label("localhost"));
        assert!(validators::has_localhost_label("localhost."));
        assert!(validators::has_localhost_label("localhost:8000"));
        assert!(validators::has_localhost_label("app.localhost"));
        assert!(validators::has_localhost_label("localhost.localdomain"));
        assert!(!validators::has_localhost_label("localhostproduct.com"));
        assert!(!validators::has_localhost_label("mylocalhost.io"));
    }

    #[test]
    fn test_legacy_exemption_never_exempts() {
        let validator =
            ConfigValidator::new().with_localhost_exemption(LocalhostExemption::LegacyIdentifier);
        let (_, transcript) = validator.validate(&production_inputs("localhostproduct.com"));
        assert_eq!(transcript.for_check(CheckId::AllowedHostsLoopback).count(), 1);
    }

    #[test]
    fn test_production_origins_are_https_only() {
        let origins =
            resolve_csrf_trusted_origins(DeploymentMode::Production, &["example.com".to_string()]);
        assert_eq!(origins, vec!["https://example.com"]);
    }

    #[test]
    fn test_development_origins_keep_order_and_duplicates() {
        let hosts = vec!["a.com".to_string(), "a.com".to_string()];
        let origins = resolve_csrf_trusted_origins(DeploymentMode::Development, &hosts);
        assert_eq!(
            origins,
            vec!["http://a.com", "https://a.com", "http://a.com", "https://a.com"]
        );
    }

    #[test]
    fn test_short_local_sqlite_falls_back() {
        let mut findings = Vec::new();
        let db = resolve_database(None, Some("ab"), &mut findings);

        assert_eq!(
            db,
            DatabaseConfig::LocalSqlite {
                file_name: "db.sqlite3".to_string()
            }
        );
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert_eq!(findings[1].severity, Severity::Critical);
        assert!(findings.iter().all(|f| f.check == CheckId::LocalSqlite));
    }

    #[test]
    fn test_local_sqlite_gets_extension() {
        let mut findings = Vec::new();
        let db = resolve_database(None, Some("local"), &mut findings);
        assert_eq!(
            db,
            DatabaseConfig::LocalSqlite {
                file_name: "local.sqlite3".to_string()
            }
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
    }

    #[test]
    fn test_double_extension_is_critical() {
        let mut findings = Vec::new();
        let db = resolve_database(None, Some("app.sqlite3"), &mut findings);
        assert_eq!(
            db,
            DatabaseConfig::LocalSqlite {
                file_name: "app.sqlite3.sqlite3".to_string()
            }
        );
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[1].severity, Severity::Critical);
    }

    #[test]
    fn test_remote_url_wins_over_local() {
        let mut findings = Vec::new();
        let db = resolve_database(Some("pg"), Some("local"), &mut findings);
        assert_eq!(
            db,
            DatabaseConfig::Remote {
                url: "pg".to_string()
            }
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].check, CheckId::PsqlDatabaseUrl);
        assert_eq!(findings[0].severity, Severity::Critical);
    }

    #[test]
    fn test_empty_local_sqlite_counts_as_unset() {
        let mut findings = Vec::new();
        let db = resolve_database(None, Some(""), &mut findings);
        assert_eq!(
            db,
            DatabaseConfig::LocalSqlite {
                file_name: "db.sqlite3".to_string()
            }
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].check, CheckId::DatabaseUnset);
    }

    #[test]
    fn test_split_hosts_trims_entries() {
        assert_eq!(
            validators::split_hosts(" example.com, api.example.com ,,"),
            vec!["example.com", "api.example.com"]
        );
    }
}
