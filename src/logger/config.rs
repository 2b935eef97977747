/// Logger configuration and per-tag debug switches
///
/// Held in a single process-wide slot so that every call site can log without
/// threading a handle through. Populated from command-line flags at startup
/// and optionally merged with the `[logging]` section of the config file.
use super::levels::LogLevel;
use super::tags::LogTag;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Messages above this level are dropped
    pub min_level: LogLevel,
    /// Tags with debug output enabled (`--debug-<tag>`)
    pub debug_tags: HashSet<String>,
    /// Tags with verbose output enabled (`--verbose-<tag>`)
    pub verbose_tags: HashSet<String>,
    /// Level was set by `--verbose`/`--quiet`; the config file must not override it
    pub level_from_args: bool,
    /// Optional plain-text log file
    pub file_path: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            min_level: LogLevel::Info,
            debug_tags: HashSet::new(),
            verbose_tags: HashSet::new(),
            level_from_args: false,
            file_path: None,
        }
    }
}

static LOGGER_CONFIG: Lazy<RwLock<LoggerConfig>> =
    Lazy::new(|| RwLock::new(LoggerConfig::default()));

pub fn get_logger_config() -> LoggerConfig {
    LOGGER_CONFIG.read().clone()
}

pub fn set_logger_config(config: LoggerConfig) {
    *LOGGER_CONFIG.write() = config;
}

pub fn update_logger_config<F: FnOnce(&mut LoggerConfig)>(f: F) {
    f(&mut LOGGER_CONFIG.write());
}

/// Build logger settings from command-line style flags
///
/// Recognized: `--verbose`, `--quiet`, `--debug-<tag>`, `--verbose-<tag>`.
pub fn init_from_args(args: &[String]) {
    update_logger_config(|config| {
        for arg in args {
            if arg == "--verbose" {
                config.min_level = LogLevel::Verbose;
                config.level_from_args = true;
            } else if arg == "--quiet" {
                config.min_level = LogLevel::Warning;
                config.level_from_args = true;
            } else if let Some(tag) = arg.strip_prefix("--debug-") {
                config.debug_tags.insert(tag.to_lowercase());
                if config.min_level < LogLevel::Debug {
                    config.min_level = LogLevel::Debug;
                }
            } else if let Some(tag) = arg.strip_prefix("--verbose-") {
                config.verbose_tags.insert(tag.to_lowercase());
                config.debug_tags.insert(tag.to_lowercase());
                if config.min_level < LogLevel::Debug {
                    config.min_level = LogLevel::Debug;
                }
            }
        }
    });
}

pub fn is_debug_enabled_for_tag(tag: &LogTag) -> bool {
    let config = LOGGER_CONFIG.read();
    config.min_level == LogLevel::Verbose || config.debug_tags.contains(&tag.to_debug_key())
}

pub fn is_verbose_enabled_for_tag(tag: &LogTag) -> bool {
    LOGGER_CONFIG.read().verbose_tags.contains(&tag.to_debug_key())
}
