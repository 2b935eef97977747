/// Host capabilities available to the plugin
///
/// The plugin never reads settings or writes logs directly; it asks the host
/// through [`HostContext`]. `ConfigHost` backs this with the TOML config and
/// the process logger for the standalone binary, `StaticHost` with a fixed
/// map for embedding and tests.
use crate::config::ConfigStore;
use crate::constants::API_KEY_SETTING;
use crate::logger::{self, LogLevel, LogTag};
use std::collections::HashMap;
use std::sync::Arc;

pub trait HostContext: Send + Sync {
    /// Current value of a named setting; `None` when missing or blank
    fn get_setting(&self, key: &str) -> Option<String>;

    fn log(&self, level: LogLevel, message: &str);
}

/// Host backed by a [`ConfigStore`]; settings are read on every call so a
/// reload takes effect without restarting the plugin
pub struct ConfigHost {
    store: Arc<ConfigStore>,
}

impl ConfigHost {
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }
}

impl HostContext for ConfigHost {
    fn get_setting(&self, key: &str) -> Option<String> {
        let value = self.store.with_config(|cfg| match key {
            API_KEY_SETTING => Some(cfg.upstream.api_key.clone()),
            "base_url" => Some(cfg.upstream.base_url.clone()),
            _ => None,
        })?;
        non_blank(value)
    }

    fn log(&self, level: LogLevel, message: &str) {
        logger::log(LogTag::Tools, level, message);
    }
}

/// Fixed settings map; log lines go to the process logger
#[derive(Debug, Clone, Default)]
pub struct StaticHost {
    settings: HashMap<String, String>,
}

impl StaticHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_setting(mut self, key: &str, value: &str) -> Self {
        self.settings.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_api_key(self, api_key: &str) -> Self {
        self.with_setting(API_KEY_SETTING, api_key)
    }
}

impl HostContext for StaticHost {
    fn get_setting(&self, key: &str) -> Option<String> {
        self.settings.get(key).cloned().and_then(non_blank)
    }

    fn log(&self, level: LogLevel, message: &str) {
        logger::log(LogTag::Tools, level, message);
    }
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
