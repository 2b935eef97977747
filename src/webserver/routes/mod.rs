use crate::constants::ROUTE_PREFIX;
use crate::webserver::state::AppState;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub mod market;
pub mod status;
pub mod tools;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest(ROUTE_PREFIX, plugin_routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn plugin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(market::routes())
        .merge(status::routes())
        .merge(tools::routes())
}
