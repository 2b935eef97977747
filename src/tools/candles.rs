use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use super::format::{count, money, signed_percent, unix_date, unix_datetime};
use super::{normalize_symbol, Tool, ToolCategory, ToolContext, ToolDefinition, ToolResult};
use crate::apis::finnhub::{Candle, Resolution};
use crate::constants::*;
use crate::errors::{PluginError, PluginResult};

// ============================================================================
// CandlesTool - Price history summary
// ============================================================================

pub struct CandlesTool;

#[derive(Deserialize)]
struct CandlesParams {
    symbol: String,
    #[serde(default)]
    resolution: Resolution,
    #[serde(default = "default_days")]
    days: i64,
}

fn default_days() -> i64 {
    CANDLE_DAYS_DEFAULT
}

/// Aggregates over a candle series
#[derive(Debug, Clone, PartialEq)]
pub struct CandleSummary {
    pub period_return: f64,
    pub high: f64,
    pub low: f64,
    pub average_volume: f64,
    pub points: usize,
}

impl CandleSummary {
    /// `None` for an empty series
    pub fn from_candles(candles: &[Candle]) -> Option<Self> {
        let first = candles.first()?;
        let last = candles.last()?;

        let period_return = if first.close != 0.0 {
            (last.close - first.close) / first.close * 100.0
        } else {
            0.0
        };
        let high = candles.iter().map(|c| c.high).fold(f64::MIN, f64::max);
        let low = candles.iter().map(|c| c.low).fold(f64::MAX, f64::min);
        let average_volume = candles.iter().map(|c| c.volume).sum::<f64>() / candles.len() as f64;

        Some(Self {
            period_return,
            high,
            low,
            average_volume,
            points: candles.len(),
        })
    }
}

#[async_trait]
impl Tool for CandlesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "candles".to_string(),
            description: "Summarize recent price history for a symbol: period return, high, low, average volume and the last few data points.".to_string(),
            category: ToolCategory::Market,
            parameters: json!({
                "type": "object",
                "properties": {
                    "symbol": {
                        "type": "string",
                        "description": "Ticker symbol, e.g. AAPL"
                    },
                    "resolution": {
                        "type": "string",
                        "enum": Resolution::ALL.iter().map(|r| r.as_str()).collect::<Vec<_>>(),
                        "default": Resolution::default().as_str(),
                        "description": "Candle width: minutes (1, 5, 15, 30, 60), D (day), W (week) or M (month)"
                    },
                    "days": {
                        "type": "integer",
                        "minimum": CANDLE_DAYS_MIN,
                        "maximum": CANDLE_DAYS_MAX,
                        "default": CANDLE_DAYS_DEFAULT,
                        "description": "How many days of history to cover"
                    }
                },
                "required": ["symbol"]
            }),
        }
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> ToolResult {
        let (api_key, args) = match ctx.prepare::<CandlesParams>(params) {
            Ok(prepared) => prepared,
            Err(e) => return ToolResult::error(e.to_string()),
        };
        let symbol = match normalize_symbol(&args.symbol) {
            Ok(symbol) => symbol,
            Err(e) => return ToolResult::error(e.to_string()),
        };
        let days = args.days.clamp(CANDLE_DAYS_MIN, CANDLE_DAYS_MAX);
        let to = chrono::Utc::now().timestamp();
        let from = to - days * SECONDS_PER_DAY;

        let outcome = candles(ctx, &api_key, &symbol, args.resolution, days, from, to).await;
        ToolResult::from_outcome(outcome, &format!("candles for {}", symbol))
    }
}

async fn candles(
    ctx: &ToolContext,
    api_key: &str,
    symbol: &str,
    resolution: Resolution,
    days: i64,
    from: i64,
    to: i64,
) -> PluginResult<String> {
    let series = ctx
        .api()
        .candles(api_key, symbol, resolution, from, to)
        .await?;
    let rows = series.candles();
    let summary = match CandleSummary::from_candles(&rows) {
        Some(summary) if series.is_ok() => summary,
        _ => {
            return Err(PluginError::EmptyResult(format!(
                "No candle data found for symbol \"{}\" over the last {} days.",
                symbol, days
            )))
        }
    };

    let mut lines = vec![
        format!(
            "{} candles ({}, last {} days, {} points)",
            symbol, resolution, days, summary.points
        ),
        format!("Period Return: {}", signed_percent(summary.period_return)),
        format!("Period High: {}", money(summary.high)),
        format!("Period Low: {}", money(summary.low)),
        format!("Average Volume: {}", count(summary.average_volume)),
        format!("Last {} points:", rows.len().min(CANDLE_TAIL_POINTS)),
    ];

    let tail_start = rows.len().saturating_sub(CANDLE_TAIL_POINTS);
    for candle in &rows[tail_start..] {
        let when = if resolution.is_intraday() {
            unix_datetime(candle.timestamp)
        } else {
            unix_date(candle.timestamp)
        };
        lines.push(format!(
            "  {}  O: {}  H: {}  L: {}  C: {}  V: {}",
            when,
            money(candle.open),
            money(candle.high),
            money(candle.low),
            money(candle.close),
            count(candle.volume)
        ));
    }

    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{tool_context, StubUpstream};
    use std::sync::Arc;

    /// 30 daily points: close 100..=129, high close+2, low close-1,
    /// volume 1000*(i+1)
    fn thirty_day_series() -> Value {
        let start = 1_704_067_200i64;
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        json!({
            "c": closes,
            "h": closes.iter().map(|c| c + 2.0).collect::<Vec<_>>(),
            "l": closes.iter().map(|c| c - 1.0).collect::<Vec<_>>(),
            "o": closes.iter().map(|c| c - 0.5).collect::<Vec<_>>(),
            "v": (0..30).map(|i| 1000.0 * (i + 1) as f64).collect::<Vec<_>>(),
            "t": (0..30).map(|i| start + i * SECONDS_PER_DAY).collect::<Vec<_>>(),
            "s": "ok"
        })
    }

    #[tokio::test]
    async fn test_candles_summary_and_tail() {
        let stub = Arc::new(StubUpstream::fixed(thirty_day_series()));
        let result = CandlesTool
            .execute(json!({"symbol": "aapl", "days": 30}), &tool_context(stub.clone()))
            .await;

        assert!(!result.is_error, "{}", result.text());
        let text = result.text();
        // (129 - 100) / 100 * 100
        assert!(text.contains("Period Return: +29.00%"), "{}", text);
        assert!(text.contains("Period High: $131.00"));
        assert!(text.contains("Period Low: $99.00"));
        // mean of 1000..=30000
        assert!(text.contains("Average Volume: 15,500"));
        assert!(text.contains("Last 5 points:"));

        let points: Vec<&str> = text.lines().filter(|l| l.starts_with("  ")).collect();
        assert_eq!(points.len(), 5);
        assert!(points[0].contains("2024-01-26"));
        assert!(points[0].contains("C: $125.00"));
        assert!(points[4].contains("2024-01-30"));
        assert!(points[4].contains("C: $129.00"));

        let params = &stub.recorded()[0].1;
        assert_eq!(params.get("resolution"), Some("D"));
        assert_eq!(params.get("symbol"), Some("AAPL"));
    }

    #[tokio::test]
    async fn test_days_are_clamped() {
        let stub = Arc::new(StubUpstream::fixed(thirty_day_series()));
        let ctx = tool_context(stub.clone());

        CandlesTool
            .execute(json!({"symbol": "AAPL", "days": 1000}), &ctx)
            .await;
        CandlesTool
            .execute(json!({"symbol": "AAPL", "days": -5, "resolution": "W"}), &ctx)
            .await;

        let window = |i: usize| {
            let params = stub.recorded()[i].1.clone();
            let from: i64 = params.get("from").unwrap().parse().unwrap();
            let to: i64 = params.get("to").unwrap().parse().unwrap();
            to - from
        };
        assert_eq!(window(0), CANDLE_DAYS_MAX * SECONDS_PER_DAY);
        assert_eq!(window(1), CANDLE_DAYS_MIN * SECONDS_PER_DAY);
        assert_eq!(stub.recorded()[1].1.get("resolution"), Some("W"));
    }

    #[tokio::test]
    async fn test_no_data_status_is_empty_result() {
        let stub = Arc::new(StubUpstream::fixed(json!({"s": "no_data"})));
        let result = CandlesTool
            .execute(json!({"symbol": "ZZZZ"}), &tool_context(stub))
            .await;

        assert!(result.is_error);
        assert!(result.text().starts_with("No candle data found for symbol \"ZZZZ\""));
    }

    #[tokio::test]
    async fn test_lowercase_resolution_accepted() {
        let stub = Arc::new(StubUpstream::fixed(thirty_day_series()));
        let result = CandlesTool
            .execute(json!({"symbol": "AAPL", "resolution": "w"}), &tool_context(stub.clone()))
            .await;

        assert!(!result.is_error, "{}", result.text());
        assert_eq!(stub.recorded()[0].1.get("resolution"), Some("W"));
    }

    #[tokio::test]
    async fn test_invalid_resolution_rejected() {
        let stub = Arc::new(StubUpstream::fixed(thirty_day_series()));
        let result = CandlesTool
            .execute(json!({"symbol": "AAPL", "resolution": "2"}), &tool_context(stub.clone()))
            .await;

        assert!(result.is_error);
        assert_eq!(stub.call_count(), 0);
    }

    #[test]
    fn test_summary_of_empty_series() {
        assert!(CandleSummary::from_candles(&[]).is_none());
    }
}
