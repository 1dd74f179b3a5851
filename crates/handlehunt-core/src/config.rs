//! Configuration management for handlehunt.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main application configuration.
///
/// This is loaded from `~/.config/handlehunt/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Probe and scheduling settings
    pub scanning: ScanningConfig,
    /// Platform catalog location
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            let config: Self = toml::from_str(&contents)?;
            config.scanning.validate()?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `HANDLEHUNT_CONCURRENCY`: Override the number of in-flight probes
    /// - `HANDLEHUNT_PACING_MS`: Override the delay between processed completions
    /// - `HANDLEHUNT_TIMEOUT_SECS`: Override the per-request timeout
    /// - `HANDLEHUNT_DEFINITIONS_DIR`: Override the platform definitions directory
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env(|key| std::env::var(key).ok());
        config.scanning.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup.
    ///
    /// Values that fail to parse are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("HANDLEHUNT_CONCURRENCY") {
            if let Ok(concurrency) = val.parse() {
                self.scanning.concurrency = concurrency;
                tracing::debug!("Override scanning.concurrency from env: {}", concurrency);
            }
        }

        if let Some(val) = lookup("HANDLEHUNT_PACING_MS") {
            if let Ok(pacing) = val.parse() {
                self.scanning.pacing_ms = pacing;
                tracing::debug!("Override scanning.pacing_ms from env: {}", pacing);
            }
        }

        if let Some(val) = lookup("HANDLEHUNT_TIMEOUT_SECS") {
            if let Ok(timeout) = val.parse() {
                self.scanning.timeout_secs = timeout;
                tracing::debug!("Override scanning.timeout_secs from env: {}", timeout);
            }
        }

        if let Some(val) = lookup("HANDLEHUNT_DEFINITIONS_DIR") {
            if !val.is_empty() {
                tracing::debug!("Override catalog.definitions_dir from env: {}", val);
                self.catalog.definitions_dir = Some(PathBuf::from(val));
            }
        }
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/handlehunt/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("io", "handlehunt", "handlehunt")
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Probe and scheduling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanningConfig {
    /// Maximum number of probes in flight at once
    pub concurrency: usize,
    /// Delay after each processed completion, in milliseconds
    pub pacing_ms: u64,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum redirects followed per probe
    pub max_redirects: usize,
    /// User agent string
    pub user_agent: String,
    /// Accept header value
    pub accept: String,
    /// Accept-Language header value
    pub accept_language: String,
}

impl ScanningConfig {
    /// Check that the settings can drive a scan.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scanning.concurrency".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scanning.timeout_secs".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "scanning.user_agent".to_string(),
                reason: "cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

impl Default for ScanningConfig {
    fn default() -> Self {
        Self {
            concurrency: 8,
            pacing_ms: 200,
            timeout_secs: 15,
            max_redirects: 10,
            user_agent: concat!(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 ",
                "(KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
            )
            .to_string(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                .to_string(),
            accept_language: "en-US,en;q=0.5".to_string(),
        }
    }
}

/// Platform catalog settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Directory holding platform definition TOML files.
    ///
    /// When unset, `platform-definitions/` at the workspace root is used.
    pub definitions_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.scanning.concurrency, 8);
        assert_eq!(config.scanning.pacing_ms, 200);
        assert_eq!(config.scanning.timeout_secs, 15);
        assert!(config.scanning.user_agent.starts_with("Mozilla/5.0"));
        assert!(config.catalog.definitions_dir.is_none());
        assert!(config.scanning.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("[scanning]"));

        let parsed: AppConfig = toml::from_str(&toml_str).expect("parse serialized config");
        assert_eq!(parsed.scanning.concurrency, config.scanning.concurrency);
        assert_eq!(parsed.scanning.user_agent, config.scanning.user_agent);
    }

    #[test]
    fn test_config_save_load() {
        let tmp = TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");

        let mut config = AppConfig::default();
        config.scanning.concurrency = 4;
        config.catalog.definitions_dir = Some(PathBuf::from("/opt/handlehunt/platforms"));

        let contents = toml::to_string_pretty(&config).expect("serialize config");
        fs::write(&config_path, contents).expect("write config file");

        let loaded_contents = fs::read_to_string(&config_path).expect("read config file");
        let loaded: AppConfig = toml::from_str(&loaded_contents).expect("parse loaded config");

        assert_eq!(loaded.scanning.concurrency, 4);
        assert_eq!(
            loaded.catalog.definitions_dir,
            Some(PathBuf::from("/opt/handlehunt/platforms"))
        );
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("HANDLEHUNT_CONCURRENCY", "2"),
            ("HANDLEHUNT_PACING_MS", "0"),
            ("HANDLEHUNT_TIMEOUT_SECS", "not-a-number"),
            ("HANDLEHUNT_DEFINITIONS_DIR", "/tmp/platforms"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_env(|key| env.get(key).map(ToString::to_string));

        assert_eq!(config.scanning.concurrency, 2);
        assert_eq!(config.scanning.pacing_ms, 0);
        // Unparseable values are ignored
        assert_eq!(config.scanning.timeout_secs, 15);
        assert_eq!(
            config.catalog.definitions_dir,
            Some(PathBuf::from("/tmp/platforms"))
        );
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r"
[scanning]
concurrency = 3
";

        let config: AppConfig = toml::from_str(toml_str).expect("parse partial config");
        assert_eq!(config.scanning.concurrency, 3);
        // These should be defaults
        assert_eq!(config.scanning.pacing_ms, 200);
        assert_eq!(config.scanning.timeout_secs, 15);
    }

    #[test]
    fn test_validate_rejects_zero_concurrency() {
        let mut config = ScanningConfig::default();
        config.concurrency = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("scanning.concurrency"));

        let mut config = ScanningConfig::default();
        config.timeout_secs = 0;
        assert!(config.validate().is_err());
    }
}
