use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use super::format::{truncate, unix_date};
use super::{normalize_symbol, Tool, ToolCategory, ToolContext, ToolDefinition, ToolResult};
use crate::apis::finnhub::NewsArticle;
use crate::constants::*;
use crate::errors::{PluginError, PluginResult};

const SUMMARY_MAX_CHARS: usize = 200;
const MARKET_NEWS_CATEGORY: &str = "general";

// ============================================================================
// NewsTool - Company or market headlines
// ============================================================================

pub struct NewsTool;

#[derive(Deserialize)]
struct NewsParams {
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default = "default_limit")]
    limit: i64,
}

fn default_limit() -> i64 {
    NEWS_LIMIT_DEFAULT
}

#[async_trait]
impl Tool for NewsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "news".to_string(),
            description: format!(
                "Get recent headlines. With a symbol, returns company news from the last {} days; without one, general market news.",
                NEWS_LOOKBACK_DAYS
            ),
            category: ToolCategory::News,
            parameters: json!({
                "type": "object",
                "properties": {
                    "symbol": {
                        "type": "string",
                        "description": "Ticker symbol for company news; omit for market news"
                    },
                    "limit": {
                        "type": "integer",
                        "minimum": NEWS_LIMIT_MIN,
                        "maximum": NEWS_LIMIT_MAX,
                        "default": NEWS_LIMIT_DEFAULT,
                        "description": "Maximum number of articles"
                    }
                },
                "required": []
            }),
        }
    }

    async fn execute(&self, params: Value, ctx: &ToolContext) -> ToolResult {
        let (api_key, args) = match ctx.prepare::<NewsParams>(params) {
            Ok(prepared) => prepared,
            Err(e) => return ToolResult::error(e.to_string()),
        };
        let limit = args.limit.clamp(NEWS_LIMIT_MIN, NEWS_LIMIT_MAX) as usize;

        // A blank symbol means market news, same as omitting it
        let symbol = match args.symbol.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => match normalize_symbol(raw) {
                Ok(symbol) => Some(symbol),
                Err(e) => return ToolResult::error(e.to_string()),
            },
            _ => None,
        };

        let subject = match &symbol {
            Some(symbol) => format!("news for {}", symbol),
            None => "market news".to_string(),
        };
        let outcome = news(ctx, &api_key, symbol.as_deref(), limit).await;
        ToolResult::from_outcome(outcome, &subject)
    }
}

async fn news(
    ctx: &ToolContext,
    api_key: &str,
    symbol: Option<&str>,
    limit: usize,
) -> PluginResult<String> {
    let articles = match symbol {
        Some(symbol) => {
            let today = Utc::now().date_naive();
            let from = today - Duration::days(NEWS_LOOKBACK_DAYS);
            ctx.api().company_news(api_key, symbol, from, today).await?
        }
        None => ctx.api().market_news(api_key, MARKET_NEWS_CATEGORY).await?,
    };

    let articles: Vec<&NewsArticle> = articles
        .iter()
        .filter(|a| !a.headline.trim().is_empty())
        .take(limit)
        .collect();
    if articles.is_empty() {
        return Err(PluginError::EmptyResult(match symbol {
            Some(symbol) => format!("No recent news found for symbol \"{}\".", symbol),
            None => "No market news available.".to_string(),
        }));
    }

    let header = match symbol {
        Some(symbol) => format!("Latest news for {} ({} articles):", symbol, articles.len()),
        None => format!("Latest market news ({} articles):", articles.len()),
    };
    let mut sections = vec![header];
    for (i, article) in articles.iter().enumerate() {
        sections.push(render_article(i + 1, article));
    }
    Ok(sections.join("\n\n"))
}

fn render_article(position: usize, article: &NewsArticle) -> String {
    let mut lines = vec![format!("{}. {}", position, article.headline.trim())];

    let mut meta = Vec::new();
    if !article.source.is_empty() {
        meta.push(article.source.clone());
    }
    if article.datetime > 0 {
        meta.push(unix_date(article.datetime));
    }
    if !meta.is_empty() {
        lines.push(format!("   {}", meta.join(" | ")));
    }

    let summary = article.summary.trim();
    if !summary.is_empty() {
        lines.push(format!("   {}", truncate(summary, SUMMARY_MAX_CHARS)));
    }
    if !article.url.is_empty() {
        lines.push(format!("   {}", article.url));
    }
    lines.join("\n")
}
