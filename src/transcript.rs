// Deployment transcript
//
// This module holds the findings produced while validating the deployment
// configuration and renders them for the startup console.

use std::fmt;

use log::{error, info, warn};

use crate::colors::{green_success, red_critical, yellow_warning};
use crate::config::DeploymentMode;

/// Divider printed above the transcript
pub const DIVIDER: &str = "--------------------------";

/// Severity of a single finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,     // Purely descriptive
    Warning,  // Suboptimal or insecure, still functional
    Critical, // Unsafe or likely to break at runtime
}

impl Severity {
    /// Label used as the message prefix in the console transcript
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "Logging",
            Severity::Warning => "Warning",
            Severity::Critical => "Critical",
        }
    }
}

/// Static tag identifying the check that produced a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckId {
    GoogleClientId,
    GoogleSecretKey,
    DeploymentMode,
    SecretKey,
    Debug,
    AllowedHosts,
    AllowedHostsWildcard,
    AllowedHostsLoopback,
    PsqlDatabaseUrl,
    LocalSqlite,
    DatabaseUnset,
}

impl CheckId {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckId::GoogleClientId => "google-client-id",
            CheckId::GoogleSecretKey => "google-secret-key",
            CheckId::DeploymentMode => "deployment-mode",
            CheckId::SecretKey => "secret-key",
            CheckId::Debug => "debug",
            CheckId::AllowedHosts => "allowed-hosts",
            CheckId::AllowedHostsWildcard => "allowed-hosts-wildcard",
            CheckId::AllowedHostsLoopback => "allowed-hosts-loopback",
            CheckId::PsqlDatabaseUrl => "psql-database-url",
            CheckId::LocalSqlite => "local-sqlite",
            CheckId::DatabaseUnset => "database-unset",
        }
    }
}

impl fmt::Display for CheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
    pub check: CheckId,
}

impl Finding {
    pub fn info<S: Into<String>>(check: CheckId, message: S) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
            check,
        }
    }

    pub fn warning<S: Into<String>>(check: CheckId, message: S) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            check,
        }
    }

    pub fn critical<S: Into<String>>(check: CheckId, message: S) -> Self {
        Self {
            severity: Severity::Critical,
            message: message.into(),
            check,
        }
    }

    /// Coloured console line for this finding, newline terminated
    pub fn render(&self) -> String {
        let text = self.to_string();
        match self.severity {
            Severity::Info => format!("\n {}\n", text),
            Severity::Warning => format!("{}\n", yellow_warning(&text)),
            Severity::Critical => format!("{}\n", red_critical(&text)),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} (check: {})",
            self.severity.label(),
            self.message,
            self.check
        )
    }
}

/// Overall outcome of a validation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Ok,
    HasCritical,
}

/// Ordered findings of a validation pass and the resulting verdict
#[derive(Debug, Clone)]
pub struct Transcript {
    findings: Vec<Finding>,
    verdict: Verdict,
    mode: DeploymentMode,
}

impl Transcript {
    /// Compose a transcript from findings in the order the checks ran
    pub fn compose(findings: Vec<Finding>, mode: DeploymentMode) -> Self {
        let verdict = if findings.iter().any(|f| f.severity == Severity::Critical) {
            Verdict::HasCritical
        } else {
            Verdict::Ok
        };
        Self {
            findings,
            verdict,
            mode,
        }
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn mode(&self) -> DeploymentMode {
        self.mode
    }

    pub fn has_critical(&self) -> bool {
        self.verdict == Verdict::HasCritical
    }

    /// Findings of the given severity
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.severity == severity)
    }

    /// Findings raised by the given check
    pub fn for_check(&self, check: CheckId) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.check == check)
    }

    /// Console block printed at startup: divider, findings, summary line
    pub fn render(&self) -> String {
        let mut output = String::new();
        output.push_str(DIVIDER);
        output.push('\n');
        for finding in &self.findings {
            output.push_str(&finding.render());
        }
        output.push('\n');
        let summary = match self.verdict {
            Verdict::HasCritical => red_critical(&format!(
                "Critical warnings exist. Please fix before deploying. ({} deployment)",
                self.mode
            )),
            Verdict::Ok => green_success(&format!(
                "No errors found in settings.py {} deployment.",
                self.mode
            )),
        };
        output.push_str(&summary);
        output.push_str("\n\n");
        output
    }

    /// Emit every finding through the logging facade
    pub fn log_summary(&self) {
        for finding in &self.findings {
            match finding.severity {
                Severity::Critical => error!("{}", finding),
                Severity::Warning => warn!("{}", finding),
                Severity::Info => info!("{}", finding),
            }
        }

        let critical = self.with_severity(Severity::Critical).count();
        let warnings = self.with_severity(Severity::Warning).count();
        match self.verdict {
            Verdict::HasCritical => error!(
                "Deployment validation found {} critical finding(s) and {} warning(s) ({} deployment)",
                critical, warnings, self.mode
            ),
            Verdict::Ok if warnings > 0 => info!(
                "Deployment validation passed with {} warning(s) ({} deployment)",
                warnings, self.mode
            ),
            Verdict::Ok => info!("Deployment validation passed ({} deployment)", self.mode),
        }
    }
}
