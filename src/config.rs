// djgoprod configuration
//
// This module contains the configuration structures and constants for djgoprod.
// It defines the environment snapshot read at startup and the resolved
// configuration the validator derives from it.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

/// Default values for configuration
pub mod defaults {
    // Host the accounts server binds to
    pub const HOST: &str = "127.0.0.1";

    // Port the accounts server binds to
    pub const PORT: u16 = 8000;

    // Configuration file read before the environment
    pub const CONFIG_FILE: &str = "djgoprod.conf";

    // Extension appended to LOCAL_SQLITE
    pub const SQLITE_EXTENSION: &str = ".sqlite3";

    // Database file used when no usable database is configured
    pub const SQLITE_FILE: &str = "db.sqlite3";

    // Placeholder marker left in generated development secret keys
    pub const INSECURE_SECRET_MARKER: &str = "django-insecure";

    // Minimum SECRET_KEY length
    pub const SECRET_KEY_MIN_LEN: usize = 30;

    // Minimum length for credentials and database names before they look bogus
    pub const CREDENTIAL_MIN_LEN: usize = 3;

    // Session lifetime in seconds (two weeks)
    pub const SESSION_MAX_AGE_SECS: i64 = 1_209_600;
}

/// Names of the environment inputs read by the validator
pub mod keys {
    pub const DEPLOYMENT: &str = "DEPLOYMENT";
    pub const SECRET_KEY: &str = "SECRET_KEY";
    pub const GOOGLE_CLIENT_ID: &str = "GOOGLE_CLIENT_ID";
    pub const GOOGLE_SECRET_KEY: &str = "GOOGLE_SECRET_KEY";
    pub const ALLOWED_HOSTS: &str = "ALLOWED_HOSTS";
    pub const PSQL_DATABASE_URL: &str = "PSQL_DATABASE_URL";
    pub const LOCAL_SQLITE: &str = "LOCAL_SQLITE";

    pub const ALL: [&str; 7] = [
        DEPLOYMENT,
        SECRET_KEY,
        GOOGLE_CLIENT_ID,
        GOOGLE_SECRET_KEY,
        ALLOWED_HOSTS,
        PSQL_DATABASE_URL,
        LOCAL_SQLITE,
    ];
}

/// Raw environment inputs captured once at startup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentSnapshot {
    pub deployment: Option<String>,
    pub secret_key: Option<String>,
    pub google_client_id: Option<String>,
    pub google_secret_key: Option<String>,
    pub allowed_hosts: Option<String>,
    pub psql_database_url: Option<String>,
    pub local_sqlite: Option<String>,
}

impl EnvironmentSnapshot {
    /// Read the inputs from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a snapshot from an explicit key/value map
    pub fn from_map(values: &HashMap<String, String>) -> Self {
        Self::from_lookup(|key| values.get(key).cloned())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            deployment: lookup(keys::DEPLOYMENT),
            secret_key: lookup(keys::SECRET_KEY),
            google_client_id: lookup(keys::GOOGLE_CLIENT_ID),
            google_secret_key: lookup(keys::GOOGLE_SECRET_KEY),
            allowed_hosts: lookup(keys::ALLOWED_HOSTS),
            psql_database_url: lookup(keys::PSQL_DATABASE_URL),
            local_sqlite: lookup(keys::LOCAL_SQLITE),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeploymentMode {
    /// Local development with debugging
    #[default]
    Local,
    /// Production-like conditions, hosted locally
    Development,
    /// Beta testing and release
    Production,
}

impl DeploymentMode {
    /// Parse a mode case-insensitively, `None` when unrecognized
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "local" => Some(DeploymentMode::Local),
            "development" => Some(DeploymentMode::Development),
            "production" => Some(DeploymentMode::Production),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentMode::Local => "local",
            DeploymentMode::Development => "development",
            DeploymentMode::Production => "production",
        }
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheme used when building absolute account URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpProtocol {
    Http,
    Https,
}

impl HttpProtocol {
    pub fn for_mode(mode: DeploymentMode) -> Self {
        match mode {
            DeploymentMode::Production => HttpProtocol::Https,
            DeploymentMode::Local | DeploymentMode::Development => HttpProtocol::Http,
        }
    }

    pub fn is_secure(&self) -> bool {
        *self == HttpProtocol::Https
    }
}

/// Database connection descriptor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseConfig {
    /// File-backed SQLite database, relative to the project base directory
    LocalSqlite { file_name: String },
    /// Remote PostgreSQL connection URL
    Remote { url: String },
}

impl DatabaseConfig {
    pub fn engine(&self) -> &'static str {
        match self {
            DatabaseConfig::LocalSqlite { .. } => "sqlite3",
            DatabaseConfig::Remote { .. } => "postgresql",
        }
    }

    /// Location of a local database file under `base_dir`
    pub fn local_path(&self, base_dir: &Path) -> Option<PathBuf> {
        match self {
            DatabaseConfig::LocalSqlite { file_name } => Some(base_dir.join(file_name)),
            DatabaseConfig::Remote { .. } => None,
        }
    }
}

/// Google OAuth client credentials, passed through as configured
#[derive(Clone, Default, PartialEq, Eq)]
pub struct OAuthCredentials {
    pub client_id: Option<String>,
    pub secret: Option<String>,
}

impl fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("client_id", &self.client_id)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Settings derived from the environment, immutable after validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfiguration {
    pub mode: DeploymentMode,
    pub debug: bool,
    pub secret_key: Option<String>,
    pub allowed_hosts: Vec<String>,
    pub csrf_trusted_origins: Vec<String>,
    pub database: DatabaseConfig,
    pub oauth: OAuthCredentials,
    pub account_default_http_protocol: HttpProtocol,
}

/// Configuration for the accounts HTTP server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Path of the optional TOML configuration file
    pub config_file: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: env::var("DJGOPROD_HOST").unwrap_or_else(|_| String::from(defaults::HOST)),
            port: env::var("DJGOPROD_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::PORT),
            config_file: env::var("DJGOPROD_CONFIG")
                .unwrap_or_else(|_| String::from(defaults::CONFIG_FILE)),
        }
    }
}
