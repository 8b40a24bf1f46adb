//! Configuration types for Word Vault.
//!
//! Configuration is resolved with the following precedence (highest to
//! lowest):
//! 1. CLI flags (e.g., `--config`, `--db`)
//! 2. Environment variable (`WV_CONFIG`)
//! 3. Config file (`~/.wv/config.yaml`)
//! 4. Built-in defaults
//!
//! The store file path is a configuration input, never hardcoded: it lives in
//! the config file and can be overridden per invocation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{CoreError, CoreResult};

/// Environment variable pointing at an alternative config file.
pub const CONFIG_ENV_VAR: &str = "WV_CONFIG";

/// Directory under the home directory holding config and the default store.
const WV_HOME_DIR: &str = ".wv";

/// Config filename inside the Word Vault home directory.
const CONFIG_FILENAME: &str = "config.yaml";

/// Default store filename inside the Word Vault home directory.
const DEFAULT_DB_FILENAME: &str = "words.db";

// ============================================================================
// Config
// ============================================================================

/// Resolved Word Vault configuration.
///
/// # Example YAML
///
/// ```yaml
/// databasePath: /home/user/.wv/words.db
/// api:
///   baseUrl: https://fly.wordfinderapi.com/api/search
///   pageSize: 50
///   pageDelayMs: 100
///   lengthDelayMs: 1000
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Path of the store file (WAL sidecar files live next to it).
    pub database_path: PathBuf,

    /// Remote word API settings.
    pub api: ApiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: wv_home().join(DEFAULT_DB_FILENAME),
            api: ApiConfig::default(),
        }
    }
}

/// Remote word API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiConfig {
    /// Search endpoint URL.
    pub base_url: String,

    /// Words requested per page.
    pub page_size: u32,

    /// Pause between page requests, in milliseconds.
    pub page_delay_ms: u64,

    /// Pause between consecutive length refreshes, in milliseconds.
    pub length_delay_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: wv_fetch::DEFAULT_BASE_URL.to_string(),
            page_size: wv_fetch::DEFAULT_PAGE_SIZE,
            page_delay_ms: 100,
            length_delay_ms: 1_000,
        }
    }
}

impl Config {
    /// Load configuration with the documented precedence.
    ///
    /// An explicitly requested file (flag or `WV_CONFIG`) must exist; the
    /// default location is allowed to be absent and falls back to defaults.
    pub fn load(explicit_path: Option<&Path>) -> CoreResult<Self> {
        let env_path = std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from);
        let (path, required) = match (explicit_path, env_path) {
            (Some(path), _) => (path.to_path_buf(), true),
            (None, Some(path)) => (path, true),
            (None, None) => (Self::default_config_path(), false),
        };

        if !path.exists() {
            if required {
                return Err(CoreError::MissingConfig(path.display().to_string()));
            }
            debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| CoreError::InvalidConfig(format!("{}: {e}", path.display())))?;
        config.validate()?;
        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Default config file location (`~/.wv/config.yaml`).
    pub fn default_config_path() -> PathBuf {
        wv_home().join(CONFIG_FILENAME)
    }

    /// Override the store path (CLI `--db` flag).
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    fn validate(&self) -> CoreResult<()> {
        if self.api.page_size == 0 {
            return Err(CoreError::InvalidConfiguration {
                message: "api.pageSize must be at least 1".to_string(),
                hint: "Remove the setting to use the default of 50".to_string(),
            });
        }
        if self.api.base_url.is_empty() {
            return Err(CoreError::InvalidConfiguration {
                message: "api.baseUrl must not be empty".to_string(),
                hint: "Remove the setting to use the default endpoint".to_string(),
            });
        }
        Ok(())
    }
}

fn wv_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(WV_HOME_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.database_path.ends_with(".wv/words.db"));
        assert_eq!(config.api.base_url, wv_fetch::DEFAULT_BASE_URL);
        assert_eq!(config.api.page_size, 50);
    }

    #[test]
    fn test_load_explicit_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(
            &path,
            "databasePath: /tmp/test-words.db\napi:\n  pageSize: 25\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.database_path, PathBuf::from("/tmp/test-words.db"));
        assert_eq!(config.api.page_size, 25);
        // Unset fields keep their defaults.
        assert_eq!(config.api.base_url, wv_fetch::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let err = Config::load(Some(Path::new("/nonexistent/wv-config.yaml"))).unwrap_err();
        assert!(matches!(err, CoreError::MissingConfig(_)));
    }

    #[test]
    fn test_invalid_page_size_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        fs::write(&path, "api:\n  pageSize: 0\n").unwrap();

        let err = Config::load(Some(&path)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfiguration { .. }));
    }

    #[test]
    fn test_with_database_path_override() {
        let config = Config::default().with_database_path("/tmp/other.db");
        assert_eq!(config.database_path, PathBuf::from("/tmp/other.db"));
    }
}
