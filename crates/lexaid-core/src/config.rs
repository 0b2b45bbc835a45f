use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{LexaidError, Result};

/// Base URL used when neither the config file nor the environment sets one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Number of supporting sources requested per question by default.
pub const DEFAULT_TOP_K: u32 = 3;

/// Largest `top_k` the Q&A service accepts.
pub const MAX_TOP_K: u32 = 5;

/// Environment variable that overrides `service.base_url`.
pub const API_URL_ENV: &str = "LEXAID_API_URL";

/// Top-level configuration for Lexaid.
///
/// Loaded from `~/.lexaid/config.toml` by default. Every section is optional
/// and falls back to its defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexaidConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub service: ServiceConfig,
}

impl LexaidConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: LexaidConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Apply `LEXAID_API_URL` on top of the file values.
    pub fn apply_env_overrides(&mut self) {
        self.override_base_url(std::env::var(API_URL_ENV).ok());
    }

    /// Replace the service base URL when `value` is present and non-blank.
    pub fn override_base_url(&mut self, value: Option<String>) {
        if let Some(url) = value {
            let url = url.trim();
            if !url.is_empty() {
                self.service.base_url = url.to_string();
            }
        }
    }

    /// Check that the values can drive a session.
    pub fn validate(&self) -> Result<()> {
        self.service.validate()
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Remote Q&A service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Origin of the Q&A service; `/api/ask` is appended to it.
    pub base_url: String,
    /// How many supporting sources to request per question.
    pub top_k: u32,
    /// Whole-request timeout enforced by the HTTP client.
    pub request_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            top_k: DEFAULT_TOP_K,
            request_timeout_secs: 300,
        }
    }
}

impl ServiceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if !(1..=MAX_TOP_K).contains(&self.top_k) {
            return Err(LexaidError::Config(format!(
                "service.top_k must be between 1 and {}, got {}",
                MAX_TOP_K, self.top_k
            )));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(LexaidError::Config(format!(
                "service.base_url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(LexaidError::Config(
                "service.request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = LexaidConfig::default();
        assert_eq!(config.general.log_level, "info");
        assert_eq!(config.service.base_url, "http://localhost:8000");
        assert_eq!(config.service.top_k, 3);
        assert_eq!(config.service.request_timeout_secs, 300);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_valid_config() {
        let content = r#"
[general]
log_level = "debug"

[service]
base_url = "https://legal.example.org"
top_k = 5
request_timeout_secs = 30
"#;
        let file = create_temp_config(content);
        let config = LexaidConfig::load(file.path()).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.service.base_url, "https://legal.example.org");
        assert_eq!(config.service.top_k, 5);
        assert_eq!(config.service.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_load_partial_config_uses_defaults() {
        let content = r#"
[service]
top_k = 2
"#;
        let file = create_temp_config(content);
        let config = LexaidConfig::load(file.path()).unwrap();
        assert_eq!(config.service.top_k, 2);
        assert_eq!(config.service.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_config_empty_toml_uses_all_defaults() {
        let file = create_temp_config("");
        let config = LexaidConfig::load(file.path()).unwrap();
        assert_eq!(config.service.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.service.top_k, DEFAULT_TOP_K);
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let file = create_temp_config("this is {{ not valid TOML");
        let result = LexaidConfig::load(file.path());
        assert!(matches!(result, Err(LexaidError::Config(_))));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = LexaidConfig::load(Path::new("/nonexistent/lexaid.toml"));
        assert!(matches!(result, Err(LexaidError::Io(_))));
    }

    // ---- Overrides ----

    #[test]
    fn test_override_base_url() {
        let mut config = LexaidConfig::default();
        config.override_base_url(Some("http://10.0.0.5:9000".to_string()));
        assert_eq!(config.service.base_url, "http://10.0.0.5:9000");
    }

    #[test]
    fn test_override_base_url_ignores_blank_and_missing() {
        let mut config = LexaidConfig::default();
        config.override_base_url(None);
        assert_eq!(config.service.base_url, DEFAULT_BASE_URL);
        config.override_base_url(Some("   ".to_string()));
        assert_eq!(config.service.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_env_override_replaces_file_value() {
        // Only this test touches LEXAID_API_URL.
        let file = create_temp_config("[service]\nbase_url = \"http://file.example:8000\"\n");
        let mut config = LexaidConfig::load(file.path()).unwrap();

        std::env::set_var(API_URL_ENV, "http://env.example:9000");
        config.apply_env_overrides();
        assert_eq!(config.service.base_url, "http://env.example:9000");

        std::env::set_var(API_URL_ENV, "  ");
        config.apply_env_overrides();
        assert_eq!(config.service.base_url, "http://env.example:9000");

        std::env::remove_var(API_URL_ENV);
        let mut config = LexaidConfig::load(file.path()).unwrap();
        config.apply_env_overrides();
        assert_eq!(config.service.base_url, "http://file.example:8000");
    }

    // ---- Validation ----

    #[test]
    fn test_validate_top_k_bounds() {
        let mut config = LexaidConfig::default();
        config.service.top_k = 0;
        assert!(config.validate().is_err());
        config.service.top_k = MAX_TOP_K + 1;
        assert!(config.validate().is_err());
        config.service.top_k = 1;
        assert!(config.validate().is_ok());
        config.service.top_k = MAX_TOP_K;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_base_url_scheme() {
        let mut config = LexaidConfig::default();
        config.service.base_url = "localhost:8000".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = LexaidConfig::default();
        config.service.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
