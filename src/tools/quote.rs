use async_trait::async_trait;
use serde_json::Value;

use super::format::{money, signed_money, signed_percent};
use super::{symbol_schema, SymbolArgs, Tool, ToolCategory, ToolContext, ToolDefinition, ToolResult};
use crate::apis::finnhub::Quote;
use crate::errors::{PluginError, PluginResult};

// ============================================================================
// QuoteTool - Current price for one symbol
// ============================================================================

pub struct QuoteTool;

#[async_trait]
impl Tool for QuoteTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "quote".to_string(),
            description: "Get the current price, daily change, high, low, open and previous close for a stock symbol.".to_string(),
            category: ToolCategory::Market,
            parameters: symbol_schema("Ticker symbol, e.g. AAPL"),
        }
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> ToolResult {
        let (api_key, args) = match ctx.prepare::<SymbolArgs>(params) {
            Ok(prepared) => prepared,
            Err(e) => return ToolResult::error(e.to_string()),
        };
        let symbol = match args.normalized() {
            Ok(symbol) => symbol,
            Err(e) => return ToolResult::error(e.to_string()),
        };

        let outcome = fetch_quote(ctx, &api_key, &symbol)
            .await
            .map(|quote| render_quote(&symbol, &quote));
        ToolResult::from_outcome(outcome, &format!("quote for {}", symbol))
    }
}

/// Quote for `symbol`; an all-zero quote is reported as no data
pub(crate) async fn fetch_quote(
    ctx: &ToolContext,
    api_key: &str,
    symbol: &str,
) -> PluginResult<Quote> {
    let quote = ctx.api().quote(api_key, symbol).await?;
    if quote.is_empty() {
        return Err(PluginError::no_data_for_symbol(symbol));
    }
    Ok(quote)
}

/// `AAPL: $150.00 +$2.50 (+1.69%)`
pub(crate) fn quote_line(symbol: &str, quote: &Quote) -> String {
    format!(
        "{}: {} {} ({})",
        symbol,
        money(quote.c),
        signed_money(quote.change()),
        signed_percent(quote.percent_change())
    )
}

fn render_quote(symbol: &str, quote: &Quote) -> String {
    let mut lines = vec![
        format!("{}: {}", symbol, money(quote.c)),
        format!(
            "Change: {} ({})",
            signed_money(quote.change()),
            signed_percent(quote.percent_change())
        ),
        format!("Open: {}", money(quote.o)),
        format!("High: {}", money(quote.h)),
        format!("Low: {}", money(quote.l)),
        format!("Previous Close: {}", money(quote.pc)),
    ];
    if quote.t > 0 {
        lines.push(format!("As of: {} UTC", super::format::unix_datetime(quote.t)));
    }
    lines.join("\n")
}
