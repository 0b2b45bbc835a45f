//! CLI argument definitions for the `lexaid` binary.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use lexaid_core::LexaidConfig;
use std::path::PathBuf;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "LEXAID_CONFIG";

/// Lexaid: ask legal-rights questions and read cited answers in the terminal.
#[derive(Parser, Debug)]
#[command(name = "lexaid", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Base URL of the legal Q&A service.
    #[arg(short = 'u', long = "api-url")]
    pub api_url: Option<String>,

    /// Number of supporting sources to request per question.
    #[arg(short = 'k', long = "top-k")]
    pub top_k: Option<u32>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > LEXAID_CONFIG env var > ~/.lexaid/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var(CONFIG_PATH_ENV) {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Overlay flags that were given on top of `config`.
    pub fn apply_to(&self, config: &mut LexaidConfig) {
        config.override_base_url(self.api_url.clone());
        if let Some(k) = self.top_k {
            config.service.top_k = k;
        }
        if let Some(ref level) = self.log_level {
            config.general.log_level = level.clone();
        }
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".lexaid").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".lexaid").join("config.toml");
    }
    PathBuf::from("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_no_args() {
        let args = CliArgs::try_parse_from(["lexaid"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.api_url.is_none());
        assert!(args.top_k.is_none());
    }

    #[test]
    fn test_config_flag_wins() {
        let args = CliArgs::try_parse_from(["lexaid", "-c", "/etc/lexaid.toml"]).unwrap();
        assert_eq!(args.resolve_config_path(), PathBuf::from("/etc/lexaid.toml"));
    }

    #[test]
    fn test_config_path_priority_flag_env_default() {
        // Only this test touches LEXAID_CONFIG.
        std::env::set_var(CONFIG_PATH_ENV, "/srv/lexaid/env.toml");

        let flagged = CliArgs::try_parse_from(["lexaid", "--config", "/etc/lexaid.toml"]).unwrap();
        assert_eq!(flagged.resolve_config_path(), PathBuf::from("/etc/lexaid.toml"));

        let bare = CliArgs::try_parse_from(["lexaid"]).unwrap();
        assert_eq!(bare.resolve_config_path(), PathBuf::from("/srv/lexaid/env.toml"));

        std::env::remove_var(CONFIG_PATH_ENV);
        assert_eq!(bare.resolve_config_path(), default_config_path());
    }

    #[test]
    fn test_apply_flags_over_config() {
        let args = CliArgs::try_parse_from([
            "lexaid",
            "--api-url",
            "http://qa.internal:9000",
            "-k",
            "5",
            "-l",
            "debug",
        ])
        .unwrap();
        let mut config = LexaidConfig::default();
        args.apply_to(&mut config);
        assert_eq!(config.service.base_url, "http://qa.internal:9000");
        assert_eq!(config.service.top_k, 5);
        assert_eq!(config.general.log_level, "debug");
    }

    #[test]
    fn test_absent_flags_leave_config_untouched() {
        let args = CliArgs::try_parse_from(["lexaid"]).unwrap();
        let mut config = LexaidConfig::default();
        config.service.top_k = 2;
        args.apply_to(&mut config);
        assert_eq!(config.service.top_k, 2);
        assert_eq!(config.service.base_url, "http://localhost:8000");
    }

    #[test]
    fn test_top_k_must_be_numeric() {
        assert!(CliArgs::try_parse_from(["lexaid", "--top-k", "three"]).is_err());
    }
}
