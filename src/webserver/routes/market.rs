use axum::{
    extract::{Path, State},
    response::Response,
    routing::get,
    Router,
};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::{
    errors::PluginResult,
    logger::{self, LogTag},
    tools::normalize_symbol,
    webserver::{
        state::AppState,
        utils::{success_response, upstream_error},
    },
};

/// Create market data routes
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/quote/:symbol", get(quote))
        .route("/search/:query", get(search))
}

/// GET /quote/:symbol
///
/// `{"symbol": "AAPL", "c": ..., ...}` or `{"error": "..."}`
async fn quote(State(state): State<Arc<AppState>>, Path(symbol): Path<String>) -> Response {
    match fetch_quote(&state, &symbol).await {
        Ok(body) => success_response(body),
        Err(e) => {
            logger::warning(LogTag::Webserver, &format!("GET /quote/{} failed: {}", symbol, e));
            upstream_error(&e.to_string())
        }
    }
}

async fn fetch_quote(state: &AppState, symbol: &str) -> PluginResult<Value> {
    let ctx = state.plugin.context()?;
    let api_key = ctx.api_key()?;
    let symbol = normalize_symbol(symbol)?;
    let raw = ctx.api().quote_raw(&api_key, &symbol).await?;

    let mut merged = Map::new();
    merged.insert("symbol".to_string(), Value::String(symbol));
    if let Value::Object(fields) = raw {
        merged.extend(fields);
    }
    Ok(Value::Object(merged))
}

/// GET /search/:query
///
/// Raw search body or `{"error": "..."}`
async fn search(State(state): State<Arc<AppState>>, Path(query): Path<String>) -> Response {
    match fetch_search(&state, &query).await {
        Ok(body) => success_response(body),
        Err(e) => {
            logger::warning(LogTag::Webserver, &format!("GET /search/{} failed: {}", query, e));
            upstream_error(&e.to_string())
        }
    }
}

async fn fetch_search(state: &AppState, query: &str) -> PluginResult<Value> {
    let ctx = state.plugin.context()?;
    let api_key = ctx.api_key()?;
    ctx.api().search_raw(&api_key, query).await
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{app, get};
    use crate::errors::PluginError;
    use crate::testing::StubUpstream;
    use axum::http::StatusCode;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_quote_merges_symbol_with_raw_fields() {
        let stub = Arc::new(StubUpstream::fixed(json!({"c": 150.0, "pc": 147.5})));
        let (status, body) = get(app(stub.clone()), "/quote/aapl").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"symbol": "AAPL", "c": 150.0, "pc": 147.5}));
        assert_eq!(stub.recorded()[0].1.get("symbol"), Some("AAPL"));
    }

    #[tokio::test]
    async fn test_quote_failure_is_error_body_with_200() {
        let stub = Arc::new(StubUpstream::new(|_, _| {
            Err(PluginError::Upstream {
                status: 403,
                body: "Invalid API key".to_string(),
            })
        }));
        let (status, body) = get(app(stub), "/quote/AAPL").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"error": "Upstream returned HTTP 403: Invalid API key"})
        );
    }

    #[tokio::test]
    async fn test_search_returns_raw_body() {
        let raw = json!({"count": 1, "result": [{"symbol": "AAPL", "description": "APPLE INC"}]});
        let stub = Arc::new(StubUpstream::fixed(raw.clone()));
        let (status, body) = get(app(stub.clone()), "/search/apple%20inc").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, raw);
        assert_eq!(stub.recorded()[0].1.get("q"), Some("apple inc"));
    }
}
