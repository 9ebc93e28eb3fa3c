// djgoprod Library
//
// This crate validates the deployment configuration of a Google OAuth accounts
// service and serves the accounts routes with the resolved settings.

pub mod accounts;
pub mod colors;
pub mod config;
pub mod config_loader;
pub mod config_validator;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod transcript;

// Re-export common types for easier access
pub use accounts::{AccountStore, CustomUser};
pub use config::{
    DatabaseConfig, DeploymentMode, EnvironmentSnapshot, ResolvedConfiguration, ServerConfig,
};
pub use config_validator::{validate, ConfigValidator, LocalhostExemption};
pub use error::{AccountsError, ConfigLoadError, RequestRejected};
pub use identity::{GoogleIdentityProvider, IdentityProvider};
pub use transcript::{CheckId, Finding, Severity, Transcript, Verdict};
