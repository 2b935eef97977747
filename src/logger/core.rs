/// Filtering rules applied before a message reaches the formatter
use super::config::{get_logger_config, is_debug_enabled_for_tag, is_verbose_enabled_for_tag};
use super::levels::LogLevel;
use super::tags::LogTag;

/// Decide whether a message is emitted
///
/// 1. Errors always pass.
/// 2. Anything above `min_level` is dropped.
/// 3. Debug needs the tag enabled (or global verbose).
/// 4. Verbose needs global verbose or `--verbose-<tag>`.
pub fn should_log(tag: &LogTag, level: LogLevel) -> bool {
    if level == LogLevel::Error {
        return true;
    }

    let config = get_logger_config();

    if level > config.min_level && !(level == LogLevel::Verbose && is_verbose_enabled_for_tag(tag))
    {
        return false;
    }

    match level {
        LogLevel::Debug => is_debug_enabled_for_tag(tag),
        LogLevel::Verbose => config.min_level == LogLevel::Verbose || is_verbose_enabled_for_tag(tag),
        _ => true,
    }
}

pub fn log_internal(tag: LogTag, level: LogLevel, message: &str) {
    if !should_log(&tag, level) {
        return;
    }
    super::format::format_and_log(tag, level.as_str(), message);
}
