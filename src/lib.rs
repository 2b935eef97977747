pub mod apis;
pub mod arguments;
pub mod cache;
pub mod config;
pub mod constants;
pub mod errors; // Structured error handling
pub mod host;
pub mod logger;
pub mod plugin;
pub mod tools;

#[cfg(feature = "web")]
pub mod webserver;

#[cfg(test)]
pub(crate) mod testing;

pub use errors::{PluginError, PluginResult};
pub use plugin::TickerPlugin;
