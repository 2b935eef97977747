use axum::{extract::State, response::Response, routing::get, Router};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::{
    cache::CacheMetrics,
    logger::{self, LogTag},
    webserver::{state::AppState, utils::success_response},
};

/// Simple health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: String,
    pub active: bool,
    pub uptime_seconds: u64,
    pub cache: Option<CacheStats>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    #[serde(flatten)]
    pub metrics: CacheMetrics,
    pub hit_rate: f64,
}

/// Create status routes
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health_check))
}

/// GET /health
async fn health_check(State(state): State<Arc<AppState>>) -> Response {
    logger::debug(LogTag::Webserver, "Health check endpoint called");

    let active = state.plugin.is_active();
    let response = HealthResponse {
        status: if active { "ok" } else { "inactive" }.to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        active,
        uptime_seconds: state.uptime_seconds(),
        cache: state.plugin.cache_metrics().map(|metrics| CacheStats {
            hit_rate: metrics.hit_rate(),
            metrics,
        }),
    };

    success_response(response)
}
