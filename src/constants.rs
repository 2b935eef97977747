/// Global constants used across tickerdesk
///
/// Values here are fixed by the upstream provider or by the tool contracts;
/// anything an operator may want to change lives in `config::schemas` instead.

// ============================================================================
// PLUGIN IDENTITY
// ============================================================================

pub const PLUGIN_NAME: &str = "tickerdesk";

/// Prefix the REST facade is mounted under
pub const ROUTE_PREFIX: &str = "/plugins/tickerdesk";

/// Default location of the TOML config file
pub const DEFAULT_CONFIG_PATH: &str = "data/config.toml";

// ============================================================================
// UPSTREAM PROVIDER
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";

/// Query parameter carrying the API key
pub const AUTH_QUERY_PARAM: &str = "token";

/// Host setting holding the API key
pub const API_KEY_SETTING: &str = "api_key";

/// Environment variable overriding `upstream.api_key`
pub const API_KEY_ENV: &str = "FINNHUB_API_KEY";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Response cache lifetime; keeps the plugin under the free-tier rate limit
pub const DEFAULT_CACHE_TTL_SECS: u64 = 15;

// Endpoint paths
pub const ENDPOINT_QUOTE: &str = "/quote";
pub const ENDPOINT_SEARCH: &str = "/search";
pub const ENDPOINT_PROFILE: &str = "/stock/profile2";
pub const ENDPOINT_CANDLES: &str = "/stock/candle";
pub const ENDPOINT_COMPANY_NEWS: &str = "/company-news";
pub const ENDPOINT_MARKET_NEWS: &str = "/news";
pub const ENDPOINT_PEERS: &str = "/stock/peers";
pub const ENDPOINT_METRICS: &str = "/stock/metric";

// ============================================================================
// TOOL LIMITS
// ============================================================================

pub const CANDLE_DAYS_MIN: i64 = 1;
pub const CANDLE_DAYS_MAX: i64 = 365;
pub const CANDLE_DAYS_DEFAULT: i64 = 30;

/// Number of trailing candles listed in the `candles` output
pub const CANDLE_TAIL_POINTS: usize = 5;

pub const NEWS_LIMIT_MIN: i64 = 1;
pub const NEWS_LIMIT_MAX: i64 = 20;
pub const NEWS_LIMIT_DEFAULT: i64 = 5;

/// Company news window looks back this many days
pub const NEWS_LOOKBACK_DAYS: i64 = 7;

pub const MAX_SEARCH_RESULTS: usize = 10;
pub const MAX_PEERS: usize = 10;
pub const MAX_BATCH_SYMBOLS: usize = 25;

pub const SECONDS_PER_DAY: i64 = 86_400;
