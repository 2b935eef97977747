/// Log tags identifying the subsystem a message originates from
///
/// Each tag maps to a `--debug-<key>` flag (see `to_debug_key`) so debug
/// output can be enabled per subsystem.

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogTag {
    System,
    Api,
    Cache,
    Tools,
    Webserver,
    Config,
    Test,
    Other(String),
}

impl LogTag {
    /// Key used by `--debug-<key>` flags and `logging.debug_tags`
    pub fn to_debug_key(&self) -> String {
        match self {
            LogTag::System => "system".to_string(),
            LogTag::Api => "api".to_string(),
            LogTag::Cache => "cache".to_string(),
            LogTag::Tools => "tools".to_string(),
            LogTag::Webserver => "webserver".to_string(),
            LogTag::Config => "config".to_string(),
            LogTag::Test => "test".to_string(),
            LogTag::Other(s) => s.to_lowercase(),
        }
    }

    /// Uncolored label used for file output
    pub fn to_plain_string(&self) -> String {
        match self {
            LogTag::Other(s) => s.to_uppercase(),
            other => other.to_debug_key().to_uppercase(),
        }
    }

    /// Parse a debug key back into a tag (unknown keys become `Other`)
    pub fn from_debug_key(key: &str) -> Self {
        match key.trim().to_lowercase().as_str() {
            "system" => LogTag::System,
            "api" => LogTag::Api,
            "cache" => LogTag::Cache,
            "tools" => LogTag::Tools,
            "webserver" => LogTag::Webserver,
            "config" => LogTag::Config,
            "test" => LogTag::Test,
            other => LogTag::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}
