//! Structured logging for tickerdesk
//!
//! Small level-based API with per-subsystem debug switches:
//!
//! ```rust
//! use tickerdesk::logger::{self, LogTag};
//!
//! logger::error(LogTag::Api, "Upstream returned HTTP 500");
//! logger::warning(LogTag::Config, "Config file not found, using defaults");
//! logger::info(LogTag::Webserver, "Listening on 127.0.0.1:8080");
//! logger::debug(LogTag::Cache, "hit /quote?symbol=AAPL"); // only with --debug-cache
//! logger::verbose(LogTag::Api, "raw body: ..."); // only with --verbose
//! ```
//!
//! Call [`init`] once at startup with the process arguments, then
//! [`apply_settings`] after the config file has been read.

mod config;
mod core;
mod file;
mod format;
mod levels;
mod tags;

pub use config::{get_logger_config, set_logger_config, update_logger_config, LoggerConfig};
pub use levels::LogLevel;
pub use tags::LogTag;

/// Initialize from command-line flags (`--verbose`, `--quiet`, `--debug-<tag>`)
pub fn init(args: &[String]) {
    config::init_from_args(args);
    file::init_file_logging();
}

/// Merge the `[logging]` config section into the active logger settings
///
/// A level given on the command line (`--verbose`, `--quiet`) wins over
/// `min_level`. Debug tags from either source raise the level to debug.
pub fn apply_settings(min_level: &str, debug_tags: &[String], file_path: Option<&str>) {
    let parsed = match min_level.parse::<LogLevel>() {
        Ok(level) => Some(level),
        Err(e) => {
            warning(LogTag::Config, &format!("{} - keeping current level", e));
            None
        }
    };

    update_logger_config(|cfg| {
        if let Some(level) = parsed {
            if !cfg.level_from_args {
                cfg.min_level = level;
            }
        }
        for tag in debug_tags {
            cfg.debug_tags.insert(tag.to_lowercase());
        }
        if !cfg.debug_tags.is_empty() {
            cfg.min_level = cfg.min_level.max(LogLevel::Debug);
        }
        if let Some(path) = file_path {
            cfg.file_path = Some(path.to_string());
        }
    });

    file::init_file_logging();
}

pub fn error(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Error, message);
}

pub fn warning(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Warning, message);
}

pub fn info(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Info, message);
}

/// Shown only when debug output is enabled for `tag`
pub fn debug(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Debug, message);
}

/// Shown only with `--verbose` or `--verbose-<tag>`
pub fn verbose(tag: LogTag, message: &str) {
    core::log_internal(tag, LogLevel::Verbose, message);
}

/// Log at an explicit level
pub fn log(tag: LogTag, level: LogLevel, message: &str) {
    core::log_internal(tag, level, message);
}

/// Flush pending file writes (call during shutdown)
pub fn flush() {
    file::flush_file_logging();
}
