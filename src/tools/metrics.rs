use async_trait::async_trait;
use serde_json::Value;

use super::format::{count, large_money, money, percent};
use super::{symbol_schema, SymbolArgs, Tool, ToolCategory, ToolContext, ToolDefinition, ToolResult};
use crate::apis::finnhub::MetricsResponse;
use crate::errors::{PluginError, PluginResult};

// ============================================================================
// MetricsTool - Key financial ratios
// ============================================================================

pub struct MetricsTool;

#[derive(Clone, Copy)]
enum Unit {
    Money,
    /// Reported in millions of dollars
    MillionsMoney,
    /// Reported in millions of shares
    MillionsCount,
    Percent,
    Ratio,
}

/// (metric key, label, unit) in display order
const METRICS: &[(&str, &str, Unit)] = &[
    ("marketCapitalization", "Market Cap", Unit::MillionsMoney),
    ("peTTM", "P/E (TTM)", Unit::Ratio),
    ("pbAnnual", "P/B", Unit::Ratio),
    ("psTTM", "P/S (TTM)", Unit::Ratio),
    ("epsTTM", "EPS (TTM)", Unit::Money),
    ("dividendYieldIndicatedAnnual", "Dividend Yield", Unit::Percent),
    ("beta", "Beta", Unit::Ratio),
    ("52WeekHigh", "52-Week High", Unit::Money),
    ("52WeekLow", "52-Week Low", Unit::Money),
    ("roeTTM", "ROE (TTM)", Unit::Percent),
    ("netProfitMarginTTM", "Net Margin (TTM)", Unit::Percent),
    ("currentRatioAnnual", "Current Ratio", Unit::Ratio),
    ("totalDebt/totalEquityAnnual", "Debt/Equity", Unit::Ratio),
    ("10DayAverageTradingVolume", "10-Day Avg Volume", Unit::MillionsCount),
];

fn render_value(value: f64, unit: Unit) -> String {
    match unit {
        Unit::Money => money(value),
        Unit::MillionsMoney => large_money(value * 1e6),
        Unit::MillionsCount => count(value * 1e6),
        Unit::Percent => percent(value),
        Unit::Ratio => format!("{:.2}", value),
    }
}

#[async_trait]
impl Tool for MetricsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "metrics".to_string(),
            description: "Get key financial metrics for a symbol: valuation ratios, EPS, dividend yield, beta, 52-week range, profitability and leverage.".to_string(),
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

        let outcome = metrics(ctx, &api_key, &symbol).await;
        ToolResult::from_outcome(outcome, &format!("metrics for {}", symbol))
    }
}

async fn metrics(ctx: &ToolContext, api_key: &str, symbol: &str) -> PluginResult<String> {
    let response = ctx.api().metrics(api_key, symbol).await?;
    let lines = render_metrics(&response);
    if lines.is_empty() {
        return Err(PluginError::no_data_for_symbol(symbol));
    }
    Ok(format!("Key metrics for {}:\n{}", symbol, lines.join("\n")))
}

fn render_metrics(response: &MetricsResponse) -> Vec<String> {
    METRICS
        .iter()
        .filter_map(|&(key, label, unit)| {
            response
                .metric_f64(key)
                .map(|value| format!("{}: {}", label, render_value(value, unit)))
        })
        .collect()
}
