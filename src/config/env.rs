//! Environment variable handling and .env file loading

use crate::error::{AppError, ErrorContext, Result};
use std::path::{Path, PathBuf};

pub const ENV_LOGFILE: &str = "LT_LOGFILE";
pub const ENV_MACHINE: &str = "LT_MACHINE";
pub const ENV_PING_BIN: &str = "LT_PING_BIN";
pub const ENV_ENABLE_COLOR: &str = "LT_ENABLE_COLOR";

/// Every variable read by [`EnvSettings::from_env`]
pub const SUPPORTED_ENV_VARS: [&str; 4] = [ENV_LOGFILE, ENV_MACHINE, ENV_PING_BIN, ENV_ENABLE_COLOR];

/// Defaults taken from the environment; every field is optional
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvSettings {
    pub log_file: Option<PathBuf>,
    pub machine: Option<String>,
    pub ping_bin: Option<String>,
    pub enable_color: Option<bool>,
}

impl EnvSettings {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup function
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        for key in SUPPORTED_ENV_VARS {
            let Some(value) = lookup(key) else { continue };
            EnvManager::validate_env_var(key, &value)?;
            let value = value.trim().to_string();

            match key {
                ENV_LOGFILE => settings.log_file = Some(PathBuf::from(value)),
                ENV_MACHINE => settings.machine = Some(value),
                ENV_PING_BIN => settings.ping_bin = Some(value),
                ENV_ENABLE_COLOR => settings.enable_color = Some(value.parse()?),
                _ => {}
            }
        }

        Ok(settings)
    }
}

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        Self::load_env_file_from(Path::new(".env"), debug)
    }

    /// Load a specific env file if it exists; values already present in
    /// the environment win
    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<()> {
        if path.exists() {
            dotenv::from_path(path).with_context(|| format!("Failed to load {}", path.display()))?;

            if debug {
                println!("Loaded configuration from {}", path.display());
            }
        } else if debug {
            println!("No {} file found, using defaults and CLI arguments", path.display());
        }

        Ok(())
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            ENV_LOGFILE => {
                if value.is_empty() {
                    return Err(AppError::config(format!("{} cannot be empty", ENV_LOGFILE)));
                }
            }
            ENV_MACHINE => {
                if value.contains(['\n', '\r']) {
                    return Err(AppError::config(format!("{} cannot contain line breaks", ENV_MACHINE)));
                }
            }
            ENV_PING_BIN => {
                if value.is_empty() {
                    return Err(AppError::config(format!("{} cannot be empty", ENV_PING_BIN)));
                }
            }
            ENV_ENABLE_COLOR => {
                value.parse::<bool>().map_err(|e| {
                    AppError::config(format!("Invalid {} value '{}': {}", ENV_ENABLE_COLOR, value, e))
                })?;
            }
            _ => {
                // Unknown environment variable, ignore
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_settings_from_lookup() {
        let settings = EnvSettings::from_lookup(lookup_from(&[
            (ENV_LOGFILE, "runs/a.log"),
            (ENV_MACHINE, " rpi4 "),
            (ENV_PING_BIN, "/bin/ping"),
            (ENV_ENABLE_COLOR, "false"),
        ]))
        .unwrap();

        assert_eq!(settings.log_file, Some(PathBuf::from("runs/a.log")));
        assert_eq!(settings.machine.as_deref(), Some("rpi4"));
        assert_eq!(settings.ping_bin.as_deref(), Some("/bin/ping"));
        assert_eq!(settings.enable_color, Some(false));
    }

    #[test]
    fn test_settings_empty_environment() {
        let settings = EnvSettings::from_lookup(|_| None).unwrap();
        assert_eq!(settings, EnvSettings::default());
    }

    #[test]
    fn test_invalid_env_values() {
        assert!(EnvSettings::from_lookup(lookup_from(&[(ENV_ENABLE_COLOR, "maybe")])).is_err());
        assert!(EnvSettings::from_lookup(lookup_from(&[(ENV_LOGFILE, "  ")])).is_err());
        assert!(EnvManager::validate_env_var(ENV_PING_BIN, "").is_err());
        assert!(EnvManager::validate_env_var(ENV_MACHINE, "a\nb").is_err());
        assert!(EnvManager::validate_env_var("SOMETHING_ELSE", "x").is_ok());
    }

    #[test]
    fn test_load_missing_env_file_is_ok() {
        let dir = TempDir::new().unwrap();
        assert!(EnvManager::load_env_file_from(&dir.path().join(".env"), false).is_ok());
    }

    #[test]
    fn test_load_env_file_sets_variables() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "LT_TEST_ONLY_MARKER=from-dotenv\n").unwrap();

        EnvManager::load_env_file_from(&path, false).unwrap();
        assert_eq!(std::env::var("LT_TEST_ONLY_MARKER").unwrap(), "from-dotenv");
        std::env::remove_var("LT_TEST_ONLY_MARKER");
    }

    #[test]
    fn test_malformed_env_file_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "NOT A VALID LINE\n").unwrap();

        let error = EnvManager::load_env_file_from(&path, false).unwrap_err();
        assert_eq!(error.category(), "CONFIG");
        assert!(error.to_string().contains("Failed to load"));
    }
}
