//! Configuration system
//!
//! - `macros`: the `config_struct!` macro (struct + defaults in one place)
//! - `schemas`: every config section with its defaults
//! - `utils`: TOML loading, env override, reloadable `ConfigStore`

pub mod macros;
pub mod schemas;
pub mod utils;

pub use schemas::{CacheConfig, Config, LoggingConfig, UpstreamConfig, WebserverConfig};
pub use utils::{load_config_from_path, ConfigError, ConfigStore};
