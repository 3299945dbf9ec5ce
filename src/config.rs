//! Configuration management module.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (first run).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub firebase: FirebaseConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// Firebase project settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirebaseConfig {
    /// Web API key of the project.
    pub api_key: String,
    /// Realtime database root, e.g. `https://<project>-default-rtdb.firebaseio.com`.
    pub database_url: String,
    /// Identity Toolkit endpoint base.
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    /// Secure Token endpoint base.
    #[serde(default = "default_token_url")]
    pub token_url: String,
    /// Timeout for point reads and writes (default: 30).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_auth_url() -> String {
    "https://identitytoolkit.googleapis.com/v1".to_string()
}

fn default_token_url() -> String {
    "https://securetoken.googleapis.com/v1".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// UI preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Rows per page in the access log viewer.
    #[serde(default = "default_logs_page_size")]
    pub logs_page_size: usize,
    #[serde(default = "default_remember_email")]
    pub remember_email: bool,
    #[serde(default)]
    pub last_email: String,
}

fn default_logs_page_size() -> usize {
    10
}

fn default_remember_email() -> bool {
    true
}

/// Platform directories for config and logs.
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "Xirtam", "xirtam-admin")
}

/// Directory for rolling log files.
pub fn log_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_local_dir().join("logs"))
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

impl AppConfig {
    /// Get config file path (platform config dir, else next to the executable).
    pub fn default_path() -> PathBuf {
        if let Some(dirs) = project_dirs() {
            return dirs.config_dir().join("config.toml");
        }

        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<AppConfig>(&content) {
                Ok(config) => match config.validate() {
                    Ok(()) => ConfigLoadResult::Loaded(config),
                    Err(e) => ConfigLoadResult::Invalid(e),
                },
                Err(e) => ConfigLoadResult::Invalid(ConfigError::Parse(e)),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fb = &self.firebase;
        if fb.api_key.trim().is_empty() {
            return Err(ConfigError::Validation("API key cannot be empty".to_string()));
        }
        if !is_http_url(&fb.database_url) {
            return Err(ConfigError::Validation(
                "Database URL must start with http:// or https://".to_string(),
            ));
        }
        if !is_http_url(&fb.auth_url) || !is_http_url(&fb.token_url) {
            return Err(ConfigError::Validation(
                "Auth endpoints must start with http:// or https://".to_string(),
            ));
        }
        if fb.request_timeout_secs < 5 {
            return Err(ConfigError::Validation(
                "Request timeout must be at least 5 seconds".to_string(),
            ));
        }
        if !(1..=100).contains(&self.ui.logs_page_size) {
            return Err(ConfigError::Validation(
                "Log page size must be between 1 and 100".to_string(),
            ));
        }
        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            database_url: "https://xirtam-default-rtdb.firebaseio.com".to_string(),
            auth_url: default_auth_url(),
            token_url: default_token_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            logs_page_size: default_logs_page_size(),
            remember_email: default_remember_email(),
            last_email: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.firebase.api_key = "AIzaTestKey".to_string();
        config
    }

    #[test]
    fn test_default_config_needs_api_key() {
        assert!(AppConfig::default().validate().is_err());
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_database_url() {
        let mut config = valid_config();
        config.firebase.database_url = "ftp://invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_timeout_floor() {
        let mut config = valid_config();
        config.firebase.request_timeout_secs = 4;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_page_size_bounds() {
        let mut config = valid_config();

        config.ui.logs_page_size = 0;
        assert!(config.validate().is_err());

        config.ui.logs_page_size = 101;
        assert!(config.validate().is_err());

        config.ui.logs_page_size = 10;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_minimal_toml_fills_defaults() {
        let content = r#"
            [firebase]
            api_key = "key"
            database_url = "https://demo.firebaseio.com"
        "#;
        let config: AppConfig = toml::from_str(content).unwrap();

        assert_eq!(config.firebase.auth_url, "https://identitytoolkit.googleapis.com/v1");
        assert_eq!(config.firebase.request_timeout_secs, 30);
        assert_eq!(config.ui.logs_page_size, 10);
        assert!(config.ui.remember_email);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = valid_config();
        config.ui.last_email = "admin@example.com".to_string();
        config.save(&path).unwrap();

        match AppConfig::try_load(&path) {
            ConfigLoadResult::Loaded(loaded) => {
                assert_eq!(loaded.firebase.api_key, "AIzaTestKey");
                assert_eq!(loaded.ui.last_email, "admin@example.com");
            }
            other => panic!("unexpected load result: {other:?}"),
        }
    }

    #[test]
    fn test_missing_and_invalid_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(matches!(AppConfig::try_load(&path), ConfigLoadResult::Missing));

        std::fs::write(&path, "not = [valid").unwrap();
        assert!(matches!(
            AppConfig::try_load(&path),
            ConfigLoadResult::Invalid(ConfigError::Parse(_))
        ));
    }
}
