/// Configuration schemas with embedded defaults
///
/// Every section is declared through `config_struct!`, so a config file only
/// needs the keys it wants to change.
use crate::config_struct;
use crate::constants::{DEFAULT_BASE_URL, DEFAULT_CACHE_TTL_SECS, DEFAULT_TIMEOUT_SECS};

// ============================================================================
// UPSTREAM PROVIDER
// ============================================================================

config_struct! {
    /// Upstream market-data provider
    pub struct UpstreamConfig {
        /// API key sent as the `token` query parameter (required)
        api_key: String = String::new(),
        /// Base URL every endpoint path is appended to
        base_url: String = DEFAULT_BASE_URL.to_string(),
        /// Per-request transport timeout
        timeout_secs: u64 = DEFAULT_TIMEOUT_SECS,
    }
}

// ============================================================================
// RESPONSE CACHE
// ============================================================================

config_struct! {
    /// Response cache; the TTL is fixed when the plugin activates
    pub struct CacheConfig {
        ttl_secs: u64 = DEFAULT_CACHE_TTL_SECS,
    }
}

// ============================================================================
// WEBSERVER
// ============================================================================

config_struct! {
    /// REST facade served by the standalone host
    pub struct WebserverConfig {
        enabled: bool = true,
        host: String = "127.0.0.1".to_string(),
        port: u16 = 8080,
    }
}

// ============================================================================
// LOGGING
// ============================================================================

config_struct! {
    pub struct LoggingConfig {
        /// error | warning | info | debug | verbose
        min_level: String = "info".to_string(),
        /// Tags with debug output enabled, e.g. ["api", "cache"]
        debug_tags: Vec<String> = Vec::new(),
        /// Plain-text log file (disabled when unset)
        file_path: Option<String> = None,
    }
}

// ============================================================================
// ROOT CONFIGURATION
// ============================================================================

config_struct! {
    pub struct Config {
        upstream: UpstreamConfig = UpstreamConfig::default(),
        cache: CacheConfig = CacheConfig::default(),
        webserver: WebserverConfig = WebserverConfig::default(),
        logging: LoggingConfig = LoggingConfig::default(),
    }
}
