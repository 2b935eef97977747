/// Shared application state for the webserver
use crate::plugin::TickerPlugin;
use std::sync::Arc;

/// Shared application state passed to all route handlers
#[derive(Clone)]
pub struct AppState {
    pub plugin: Arc<TickerPlugin>,

    /// Server startup time
    pub startup_time: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(plugin: Arc<TickerPlugin>) -> Self {
        Self {
            plugin,
            startup_time: chrono::Utc::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        (chrono::Utc::now() - self.startup_time).num_seconds().max(0) as u64
    }
}
