/// Error taxonomy for tickerdesk
///
/// Every failure a tool or route can hit maps onto one `PluginError` variant.
/// Handlers never let these escape: they are rendered into an error
/// `ToolResult` or an `{"error": ...}` JSON body at the boundary.
use crate::constants::API_KEY_SETTING;

// =============================================================================
// MAIN ERROR TYPE
// =============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PluginError {
    /// Required setting missing; raised before any network call
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Request could not be completed (DNS, connect, timeout, unreadable body)
    #[error("Network error: {0}")]
    Transport(String),

    /// Upstream answered with a non-success HTTP status
    #[error("Upstream returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Call succeeded but carried no usable data; the message is user-facing
    #[error("{0}")]
    EmptyResult(String),

    /// Tool arguments did not match the declared schema
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl PluginError {
    pub fn missing_api_key() -> Self {
        PluginError::Configuration(format!(
            "API key is not configured. Set the '{}' setting (or FINNHUB_API_KEY) before using market data tools.",
            API_KEY_SETTING
        ))
    }

    pub fn no_data_for_symbol(symbol: &str) -> Self {
        PluginError::EmptyResult(format!("No data found for symbol \"{}\".", symbol))
    }

    /// Short cause used in per-item placeholder lines and log messages
    pub fn short_cause(&self) -> String {
        match self {
            PluginError::Configuration(_) => "not configured".to_string(),
            PluginError::Transport(_) => "network error".to_string(),
            PluginError::Upstream { status, .. } => format!("HTTP {}", status),
            PluginError::EmptyResult(_) => "no data".to_string(),
            PluginError::InvalidInput(_) => "invalid input".to_string(),
        }
    }

    pub fn is_empty_result(&self) -> bool {
        matches!(self, PluginError::EmptyResult(_))
    }

    /// User-facing text naming what was being fetched
    ///
    /// Empty results, configuration and input errors already read as complete
    /// sentences; transport and upstream failures get the subject prefixed.
    pub fn describe(&self, subject: &str) -> String {
        match self {
            PluginError::Transport(_) | PluginError::Upstream { .. } => {
                format!("Failed to fetch {}: {}", subject, self)
            }
            _ => self.to_string(),
        }
    }
}

impl From<reqwest::Error> for PluginError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PluginError::Transport(format!("request timed out: {}", err))
        } else {
            PluginError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for PluginError {
    fn from(err: serde_json::Error) -> Self {
        PluginError::Transport(format!("malformed response body: {}", err))
    }
}

pub type PluginResult<T> = std::result::Result<T, PluginError>;
