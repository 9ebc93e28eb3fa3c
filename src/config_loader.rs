// Configuration loader for djgoprod
//
// This module builds the environment snapshot from an optional flat TOML file
// and the process environment. Environment variables take precedence over
// file values.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::io;
use std::path::Path;

use log::{debug, info, warn};
use toml::Value;

use crate::config::{keys, EnvironmentSnapshot};
use crate::error::ConfigLoadError;

/// Read flat key/value pairs from a TOML configuration file
///
/// Returns `Ok(None)` when the file does not exist. Arrays and tables are
/// skipped with a warning.
pub fn read_config_file(path: &Path) -> Result<Option<HashMap<String, String>>, ConfigLoadError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("Configuration file not found at: {}", path.display());
            return Ok(None);
        }
        Err(source) => {
            return Err(ConfigLoadError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let values: toml::Table = content.parse().map_err(|source| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let mut config_map = HashMap::new();
    for (key, value) in values {
        match value {
            Value::String(s) => {
                config_map.insert(key, s);
            }
            Value::Integer(i) => {
                config_map.insert(key, i.to_string());
            }
            Value::Float(f) => {
                config_map.insert(key, f.to_string());
            }
            Value::Boolean(b) => {
                config_map.insert(key, b.to_string());
            }
            _ => {
                warn!("Skipping unsupported TOML value type for key: {}", key);
            }
        }
    }

    info!("Configuration loaded from {}", path.display());
    Ok(Some(config_map))
}

/// Overlay environment lookups on top of file values
pub fn merge_with_env<F>(mut file_values: HashMap<String, String>, lookup: F) -> HashMap<String, String>
where
    F: Fn(&str) -> Option<String>,
{
    for key in keys::ALL {
        match lookup(key) {
            Some(value) => {
                if file_values.contains_key(key) {
                    debug!("Env var overrides config file value: {}", key);
                }
                file_values.insert(key.to_string(), value);
            }
            None => {
                if file_values.contains_key(key) {
                    debug!("Using config file value for: {}", key);
                }
            }
        }
    }
    file_values
}

/// Build the snapshot from `path` and the process environment
pub fn load_snapshot(path: &Path) -> Result<EnvironmentSnapshot, ConfigLoadError> {
    let file_values = read_config_file(path)?.unwrap_or_default();
    let merged = merge_with_env(file_values, |key| env::var(key).ok());
    Ok(EnvironmentSnapshot::from_map(&merged))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use uuid::Uuid;

    fn write_temp_config(content: &str) -> PathBuf {
        let path = env::temp_dir().join(format!("djgoprod_{}.conf", Uuid::new_v4()));
        fs::write(&path, content).expect("Failed to write temp config");
        path
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let path = env::temp_dir().join(format!("djgoprod_missing_{}.conf", Uuid::new_v4()));
        let result = read_config_file(&path).expect("Missing file should not fail");
        assert!(result.is_none());
    }

    #[test]
    fn test_read_flat_values() {
        let path = write_temp_config(
            r#"
DEPLOYMENT = "production"
ALLOWED_HOSTS = "example.com"
RETRIES = 3
ENABLED = true
nested = { ignored = 1 }
"#,
        );
        let values = read_config_file(&path)
            .expect("Config should parse")
            .expect("Config should exist");
        fs::remove_file(&path).ok();

        assert_eq!(values.get("DEPLOYMENT").map(String::as_str), Some("production"));
        assert_eq!(values.get("RETRIES").map(String::as_str), Some("3"));
        assert_eq!(values.get("ENABLED").map(String::as_str), Some("true"));
        assert!(!values.contains_key("nested"));
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let path = write_temp_config("DEPLOYMENT = ");
        let result = read_config_file(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ConfigLoadError::Parse { .. })));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file_values = HashMap::new();
        file_values.insert("DEPLOYMENT".to_string(), "development".to_string());
        file_values.insert("LOCAL_SQLITE".to_string(), "local".to_string());

        let merged = merge_with_env(file_values, |key| match key {
            "DEPLOYMENT" => Some("production".to_string()),
            "SECRET_KEY" => Some("from-env".to_string()),
            _ => None,
        });
        let snapshot = EnvironmentSnapshot::from_map(&merged);

        assert_eq!(snapshot.deployment.as_deref(), Some("production"));
        assert_eq!(snapshot.local_sqlite.as_deref(), Some("local"));
        assert_eq!(snapshot.secret_key.as_deref(), Some("from-env"));
        assert_eq!(snapshot.psql_database_url, None);
    }
}
