use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{Tool, ToolCategory, ToolContext, ToolDefinition, ToolResult};
use crate::apis::finnhub::{SearchMatch, SearchResponse};
use crate::constants::MAX_SEARCH_RESULTS;
use crate::errors::{PluginError, PluginResult};

// ============================================================================
// SearchTool - Symbol lookup by name or ticker fragment
// ============================================================================

pub struct SearchTool;

#[derive(Deserialize)]
struct SearchParams {
    query: String,
}

#[async_trait]
impl Tool for SearchTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "search".to_string(),
            description: "Search for stock symbols by company name or ticker fragment.".to_string(),
            category: ToolCategory::Market,
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Company name or partial ticker, e.g. \"apple\""
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> ToolResult {
        let (api_key, args) = match ctx.prepare::<SearchParams>(params) {
            Ok(prepared) => prepared,
            Err(e) => return ToolResult::error(e.to_string()),
        };
        let query = args.query.trim().to_string();
        if query.is_empty() {
            return ToolResult::error(
                PluginError::InvalidInput("query must not be empty".to_string()).to_string(),
            );
        }

        let outcome = search(ctx, &api_key, &query).await;
        ToolResult::from_outcome(outcome, &format!("search results for \"{}\"", query))
    }
}

async fn search(ctx: &ToolContext, api_key: &str, query: &str) -> PluginResult<String> {
    let response = ctx.api().search(api_key, query).await?;
    let matches = filter_matches(&response, query);
    if matches.is_empty() {
        return Err(PluginError::EmptyResult(format!(
            "No results found for \"{}\".",
            query
        )));
    }

    let shown = matches.len().min(MAX_SEARCH_RESULTS);
    let mut lines = vec![format!(
        "Found {} matches for \"{}\" (showing {}):",
        matches.len(),
        query,
        shown
    )];
    for m in matches.iter().take(MAX_SEARCH_RESULTS) {
        lines.push(match m.kind.as_str() {
            "" => format!("- {}: {}", m.symbol, m.description),
            kind => format!("- {}: {} ({})", m.symbol, m.description, kind),
        });
    }
    Ok(lines.join("\n"))
}

/// Drop blank symbols and, unless the query asks for one, foreign listings
/// (`VOD.L`, `7203.T`)
fn filter_matches<'a>(response: &'a SearchResponse, query: &str) -> Vec<&'a SearchMatch> {
    let allow_suffixed = query.contains('.');
    response
        .result
        .iter()
        .filter(|m| !m.symbol.trim().is_empty())
        .filter(|m| allow_suffixed || !m.symbol.contains('.'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{tool_context, StubUpstream};
    use std::sync::Arc;

    fn apple_results() -> Value {
        json!({
            "count": 4,
            "result": [
                {"description": "APPLE INC", "displaySymbol": "AAPL", "symbol": "AAPL", "type": "Common Stock"},
                {"description": "APPLE INC", "displaySymbol": "AAPL.MX", "symbol": "AAPL.MX", "type": "Common Stock"},
                {"description": "", "displaySymbol": "", "symbol": "", "type": ""},
                {"description": "APPLE HOSPITALITY REIT INC", "displaySymbol": "APLE", "symbol": "APLE", "type": "REIT"}
            ]
        })
    }

    #[tokio::test]
    async fn test_search_filters_foreign_and_blank_symbols() {
        let stub = Arc::new(StubUpstream::fixed(apple_results()));
        let result = SearchTool
            .execute(json!({"query": "apple"}), &tool_context(stub.clone()))
            .await;

        assert!(!result.is_error);
        let text = result.text();
        assert!(text.starts_with("Found 2 matches for \"apple\" (showing 2):"));
        assert!(text.contains("- AAPL: APPLE INC (Common Stock)"));
        assert!(text.contains("- APLE: APPLE HOSPITALITY REIT INC (REIT)"));
        assert!(!text.contains("AAPL.MX"));
        assert_eq!(stub.recorded()[0].1.get("q"), Some("apple"));
    }

    #[test]
    fn test_dotted_query_keeps_suffixed_symbols() {
        let response: SearchResponse = serde_json::from_value(apple_results()).unwrap();
        let kept = filter_matches(&response, "aapl.mx");
        assert_eq!(kept.len(), 3);
    }

    #[tokio::test]
    async fn test_results_capped() {
        let many: Vec<Value> = (0..15)
            .map(|i| json!({"description": format!("CO {}", i), "symbol": format!("C{}", i), "type": ""}))
            .collect();
        let stub = Arc::new(StubUpstream::fixed(json!({"count": 15, "result": many})));
        let result = SearchTool
            .execute(json!({"query": "co"}), &tool_context(stub))
            .await;

        let text = result.text();
        assert!(text.starts_with("Found 15 matches for \"co\" (showing 10):"));
        assert_eq!(text.lines().count(), 11);
        assert!(text.contains("- C0: CO 0"));
    }

    #[tokio::test]
    async fn test_no_matches_is_error() {
        let stub = Arc::new(StubUpstream::fixed(json!({"count": 0, "result": []})));
        let result = SearchTool
            .execute(json!({"query": "xyzzy"}), &tool_context(stub))
            .await;

        assert!(result.is_error);
        assert_eq!(result.text(), "No results found for \"xyzzy\".");
    }
}
