use async_trait::async_trait;
use serde_json::Value;

use super::quotes::quote_lines;
use super::{symbol_schema, SymbolArgs, Tool, ToolCategory, ToolContext, ToolDefinition, ToolResult};
use crate::constants::MAX_PEERS;
use crate::errors::{PluginError, PluginResult};

// ============================================================================
// PeersTool - Peer companies with live quotes
// ============================================================================

pub struct PeersTool;

#[async_trait]
impl Tool for PeersTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "peers".to_string(),
            description: format!(
                "List up to {} peer companies of a symbol (same country and industry) with their current prices.",
                MAX_PEERS
            ),
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

        let outcome = peers(ctx, &api_key, &symbol).await;
        ToolResult::from_outcome(outcome, &format!("peers for {}", symbol))
    }
}

async fn peers(ctx: &ToolContext, api_key: &str, symbol: &str) -> PluginResult<String> {
    let listed = ctx.api().peers(api_key, symbol).await?;
    let peers = select_peers(&listed, symbol);
    if peers.is_empty() {
        return Err(PluginError::EmptyResult(format!(
            "No peers found for symbol \"{}\".",
            symbol
        )));
    }

    let lines = quote_lines(ctx, api_key, &peers).await;
    Ok(format!(
        "Peers of {} ({}):\n{}",
        symbol,
        peers.len(),
        lines.join("\n")
    ))
}

/// First `MAX_PEERS` distinct tickers other than `symbol` itself
fn select_peers(listed: &[String], symbol: &str) -> Vec<String> {
    let mut selected: Vec<String> = Vec::new();
    for peer in listed {
        let peer = peer.trim().to_uppercase();
        if peer.is_empty() || peer == symbol || selected.contains(&peer) {
            continue;
        }
        selected.push(peer);
        if selected.len() == MAX_PEERS {
            break;
        }
    }
    selected
}
