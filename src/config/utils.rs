//! Configuration loading, reloading and access
//!
//! `ConfigStore` owns the active `Config` behind a lock so it can be swapped
//! at runtime by `reload()`; readers always see a consistent snapshot.

use super::schemas::Config;
use crate::logger::{self, LogTag};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config store has no backing file to reload from")]
    NoBackingFile,
}

/// Load a config file, falling back to defaults when it does not exist
///
/// `api_key_override` (normally the `FINNHUB_API_KEY` environment variable)
/// replaces `upstream.api_key` when it is non-blank.
pub fn load_config_from_path(
    path: &Path,
    api_key_override: Option<String>,
) -> Result<Config, ConfigError> {
    let mut config = if path.exists() {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str::<Config>(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?
    } else {
        logger::warning(
            LogTag::Config,
            &format!(
                "Config file '{}' not found, using default values",
                path.display()
            ),
        );
        Config::default()
    };

    if let Some(key) = api_key_override.filter(|k| !k.trim().is_empty()) {
        config.upstream.api_key = key;
    }

    Ok(config)
}

fn env_api_key() -> Option<String> {
    std::env::var(crate::constants::API_KEY_ENV).ok()
}

/// Owned, reloadable configuration
pub struct ConfigStore {
    path: Option<PathBuf>,
    config: RwLock<Config>,
}

impl ConfigStore {
    /// Load from `path`, applying the environment API key override
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let config = load_config_from_path(&path, env_api_key())?;
        logger::debug(
            LogTag::Config,
            &format!("Loaded configuration from {}", path.display()),
        );
        Ok(Self {
            path: Some(path),
            config: RwLock::new(config),
        })
    }

    /// In-memory store with no backing file
    pub fn from_config(config: Config) -> Self {
        Self {
            path: None,
            config: RwLock::new(config),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Re-read the backing file and atomically replace the active config
    pub fn reload(&self) -> Result<(), ConfigError> {
        let path = self.path.as_ref().ok_or(ConfigError::NoBackingFile)?;
        let fresh = load_config_from_path(path, env_api_key())?;
        *self.config.write() = fresh;
        logger::info(LogTag::Config, "Configuration reloaded");
        Ok(())
    }

    /// Run `f` with read access to the active config
    pub fn with_config<R>(&self, f: impl FnOnce(&Config) -> R) -> R {
        f(&self.config.read())
    }

    pub fn snapshot(&self) -> Config {
        self.config.read().clone()
    }

    /// Apply an in-place modification (used by tests and the CLI)
    pub fn update(&self, f: impl FnOnce(&mut Config)) {
        f(&mut self.config.write());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.cache.ttl_secs, 15);
        assert_eq!(config.upstream.base_url, "https://finnhub.io/api/v1");
        assert!(config.upstream.api_key.is_empty());
        assert_eq!(config.webserver.port, 8080);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[upstream]"));
        assert!(toml_str.contains("[cache]"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[upstream]\napi_key = \"abc123\"\n\n[cache]\nttl_secs = 30").unwrap();

        let config = load_config_from_path(&path, None).unwrap();
        assert_eq!(config.upstream.api_key, "abc123");
        assert_eq!(config.upstream.timeout_secs, 10);
        assert_eq!(config.cache.ttl_secs, 30);
        assert_eq!(config.webserver.host, "127.0.0.1");
    }

    #[test]
    fn test_missing_file_uses_defaults_and_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let config = load_config_from_path(&path, Some("from-env".to_string())).unwrap();
        assert_eq!(config.upstream.api_key, "from-env");

        let config = load_config_from_path(&path, Some("   ".to_string())).unwrap();
        assert!(config.upstream.api_key.is_empty());
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[cache\nttl_secs = ").unwrap();

        let err = load_config_from_path(&path, None).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_reload_without_file_fails() {
        let store = ConfigStore::from_config(Config::default());
        assert!(matches!(store.reload(), Err(ConfigError::NoBackingFile)));
    }

    #[test]
    fn test_update_is_visible_to_readers() {
        let store = ConfigStore::from_config(Config::default());
        store.update(|cfg| cfg.upstream.api_key = "k".to_string());
        assert_eq!(store.with_config(|cfg| cfg.upstream.api_key.clone()), "k");
    }
}
