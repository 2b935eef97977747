use async_trait::async_trait;
use serde_json::Value;

use super::format::{compact, large_money};
use super::{symbol_schema, SymbolArgs, Tool, ToolCategory, ToolContext, ToolDefinition, ToolResult};
use crate::apis::finnhub::CompanyProfile;
use crate::errors::{PluginError, PluginResult};

// ============================================================================
// CompanyProfileTool - Company fundamentals
// ============================================================================

pub struct CompanyProfileTool;

#[async_trait]
impl Tool for CompanyProfileTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "company_profile".to_string(),
            description: "Get company details: name, exchange, industry, country, market cap, shares outstanding, IPO date and website.".to_string(),
            category: ToolCategory::Company,
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

        let outcome = profile(ctx, &api_key, &symbol).await;
        ToolResult::from_outcome(outcome, &format!("company profile for {}", symbol))
    }
}

async fn profile(ctx: &ToolContext, api_key: &str, symbol: &str) -> PluginResult<String> {
    let profile = ctx.api().profile(api_key, symbol).await?;
    if profile.is_empty() {
        return Err(PluginError::no_data_for_symbol(symbol));
    }
    Ok(render_profile(symbol, &profile))
}

fn render_profile(symbol: &str, profile: &CompanyProfile) -> String {
    let ticker = if profile.ticker.is_empty() {
        symbol
    } else {
        profile.ticker.as_str()
    };
    let mut lines = vec![format!("{} ({})", profile.name, ticker)];

    let text_fields = [
        ("Exchange", &profile.exchange),
        ("Industry", &profile.industry),
        ("Country", &profile.country),
        ("Currency", &profile.currency),
    ];
    for (label, value) in text_fields {
        if !value.is_empty() {
            lines.push(format!("{}: {}", label, value));
        }
    }

    // Both figures are reported in millions
    if profile.market_capitalization > 0.0 {
        lines.push(format!(
            "Market Cap: {}",
            large_money(profile.market_capitalization * 1e6)
        ));
    }
    if profile.share_outstanding > 0.0 {
        lines.push(format!(
            "Shares Outstanding: {}",
            compact(profile.share_outstanding * 1e6)
        ));
    }

    if !profile.ipo.is_empty() {
        lines.push(format!("IPO Date: {}", profile.ipo));
    }
    if !profile.weburl.is_empty() {
        lines.push(format!("Website: {}", profile.weburl));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{tool_context, StubUpstream};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_profile_renders_scaled_figures() {
        let stub = Arc::new(StubUpstream::fixed(json!({
            "country": "US",
            "currency": "USD",
            "exchange": "NASDAQ NMS - GLOBAL MARKET",
            "finnhubIndustry": "Technology",
            "ipo": "1980-12-12",
            "marketCapitalization": 2950000.0,
            "name": "Apple Inc",
            "shareOutstanding": 15550.0,
            "ticker": "AAPL",
            "weburl": "https://www.apple.com/"
        })));
        let result = CompanyProfileTool
            .execute(json!({"symbol": "aapl"}), &tool_context(stub.clone()))
            .await;

        assert!(!result.is_error);
        let text = result.text();
        assert!(text.starts_with("Apple Inc (AAPL)"));
        assert!(text.contains("Industry: Technology"));
        assert!(text.contains("Market Cap: $2.95T"));
        assert!(text.contains("Shares Outstanding: 15.55B"));
        assert!(text.contains("IPO Date: 1980-12-12"));
        assert_eq!(stub.calls_to("/stock/profile2"), 1);
    }

    #[tokio::test]
    async fn test_empty_profile_is_no_data() {
        let stub = Arc::new(StubUpstream::fixed(json!({})));
        let result = CompanyProfileTool
            .execute(json!({"symbol": "ZZZZ"}), &tool_context(stub))
            .await;

        assert!(result.is_error);
        assert_eq!(result.text(), "No data found for symbol \"ZZZZ\".");
    }
}
