use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use serde_json::{json, Value};

use super::quote::{fetch_quote, quote_line};
use super::{normalize_symbol, Tool, ToolCategory, ToolContext, ToolDefinition, ToolResult};
use crate::constants::MAX_BATCH_SYMBOLS;
use crate::errors::{PluginError, PluginResult};

// ============================================================================
// QuotesTool - Current prices for several symbols
// ============================================================================

pub struct QuotesTool;

#[derive(Deserialize)]
struct QuotesParams {
    symbols: Vec<String>,
}

#[async_trait]
impl Tool for QuotesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "quotes".to_string(),
            description: format!(
                "Get current prices for up to {} stock symbols at once, one line per symbol.",
                MAX_BATCH_SYMBOLS
            ),
            category: ToolCategory::Market,
            parameters: json!({
                "type": "object",
                "properties": {
                    "symbols": {
                        "type": "array",
                        "items": { "type": "string" },
                        "minItems": 1,
                        "maxItems": MAX_BATCH_SYMBOLS,
                        "description": "Ticker symbols, e.g. [\"AAPL\", \"MSFT\"]"
                    }
                },
                "required": ["symbols"]
            }),
        }
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> ToolResult {
        let (api_key, args) = match ctx.prepare::<QuotesParams>(params) {
            Ok(prepared) => prepared,
            Err(e) => return ToolResult::error(e.to_string()),
        };
        let symbols = match normalize_symbols(&args.symbols) {
            Ok(symbols) => symbols,
            Err(e) => return ToolResult::error(e.to_string()),
        };

        let lines = quote_lines(ctx, &api_key, &symbols).await;
        ToolResult::success(format!("Quotes ({}):\n{}", symbols.len(), lines.join("\n")))
    }
}

fn normalize_symbols(raw: &[String]) -> PluginResult<Vec<String>> {
    if raw.is_empty() {
        return Err(PluginError::InvalidInput(
            "symbols must contain at least one symbol".to_string(),
        ));
    }
    if raw.len() > MAX_BATCH_SYMBOLS {
        return Err(PluginError::InvalidInput(format!(
            "at most {} symbols per call, got {}",
            MAX_BATCH_SYMBOLS,
            raw.len()
        )));
    }
    raw.iter().map(|s| normalize_symbol(s)).collect()
}

/// One quote line per symbol, fetched concurrently, in input order
///
/// A failed symbol becomes `SYMBOL: Error fetching (cause)` without affecting
/// the others.
pub(crate) async fn quote_lines(ctx: &ToolContext, api_key: &str, symbols: &[String]) -> Vec<String> {
    let fetches = symbols.iter().map(|symbol| async move {
        match fetch_quote(ctx, api_key, symbol).await {
            Ok(quote) => quote_line(symbol, &quote),
            Err(e) => format!("{}: Error fetching ({})", symbol, e.short_cause()),
        }
    });
    join_all(fetches).await
}
