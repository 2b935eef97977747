//! Tool listing and invocation over HTTP

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use std::sync::Arc;

use crate::logger::{self, LogTag};
use crate::webserver::state::AppState;
use crate::webserver::utils::{error_response, success_response};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tools", get(list_tools))
        .route("/tools/:name", post(invoke_tool))
}

/// GET /tools
async fn list_tools(State(state): State<Arc<AppState>>) -> Response {
    success_response(state.plugin.tool_definitions())
}

/// POST /tools/:name
///
/// Body is the tool's argument object (empty body means no arguments). The
/// `ToolResult` is returned as-is; tool failures are still HTTP 200 with
/// `isError: true`.
async fn invoke_tool(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    body: Option<Json<Value>>,
) -> Response {
    if !state
        .plugin
        .tool_definitions()
        .iter()
        .any(|def| def.name == name)
    {
        return error_response(
            StatusCode::NOT_FOUND,
            "UNKNOWN_TOOL",
            &format!("Unknown tool: {}", name),
            None,
        );
    }

    let params = body.map(|Json(value)| value).unwrap_or(Value::Null);
    logger::debug(LogTag::Webserver, &format!("POST /tools/{} {}", name, params));

    success_response(state.plugin.invoke_tool(&name, params).await)
}
