//! Market data tools
//!
//! Each tool declares a JSON-schema'd definition and turns validated
//! arguments into one or more upstream calls plus a text rendering. Tools
//! never fail by returning `Err` or panicking: every failure becomes an error
//! [`ToolResult`].
//!
//! Tools:
//! - `quote` / `quotes` - current prices
//! - `search` - symbol lookup
//! - `company_profile`, `peers`, `metrics` - company fundamentals
//! - `candles` - price history summary
//! - `news` - company or market headlines

pub mod candles;
pub mod format;
pub mod metrics;
pub mod news;
pub mod peers;
pub mod profile;
pub mod quote;
pub mod quotes;
pub mod search;
pub mod types;

pub use types::{ContentBlock, ToolCategory, ToolDefinition, ToolResult};

use crate::apis::FinnhubApi;
use crate::constants::API_KEY_SETTING;
use crate::errors::{PluginError, PluginResult};
use crate::host::HostContext;
use crate::logger::LogLevel;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

#[async_trait]
pub trait Tool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    async fn execute(&self, params: Value, ctx: &ToolContext) -> ToolResult;
}

// ============================================================================
// TOOL CONTEXT
// ============================================================================

/// Everything a tool needs from the outside world
#[derive(Clone)]
pub struct ToolContext {
    host: Arc<dyn HostContext>,
    api: FinnhubApi,
}

impl ToolContext {
    pub fn new(host: Arc<dyn HostContext>, api: FinnhubApi) -> Self {
        Self { host, api }
    }

    pub fn host(&self) -> &Arc<dyn HostContext> {
        &self.host
    }

    pub fn api(&self) -> &FinnhubApi {
        &self.api
    }

    /// API key from the host, read fresh on every call
    pub fn api_key(&self) -> PluginResult<String> {
        self.host
            .get_setting(API_KEY_SETTING)
            .ok_or_else(PluginError::missing_api_key)
    }

    /// Resolve the API key, then decode `params` into the tool's argument type
    ///
    /// The key is checked first so a misconfigured plugin reports that before
    /// anything else and never reaches the network.
    pub fn prepare<T: DeserializeOwned>(&self, params: Value) -> PluginResult<(String, T)> {
        let api_key = self.api_key()?;
        let params = if params.is_null() {
            Value::Object(Default::default())
        } else {
            params
        };
        let args = serde_json::from_value(params)
            .map_err(|e| PluginError::InvalidInput(e.to_string()))?;
        Ok((api_key, args))
    }
}

// ============================================================================
// SHARED ARGUMENTS
// ============================================================================

/// Arguments of every single-symbol tool
#[derive(Debug, Deserialize)]
pub(crate) struct SymbolArgs {
    pub symbol: String,
}

impl SymbolArgs {
    pub fn normalized(&self) -> PluginResult<String> {
        normalize_symbol(&self.symbol)
    }
}

/// Trim and upper-case a ticker; blank input is rejected
pub fn normalize_symbol(raw: &str) -> PluginResult<String> {
    let symbol = raw.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(PluginError::InvalidInput("symbol must not be empty".to_string()));
    }
    Ok(symbol)
}

/// JSON schema for a tool taking only a ticker symbol
pub(crate) fn symbol_schema(description: &str) -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "symbol": {
                "type": "string",
                "description": description
            }
        },
        "required": ["symbol"]
    })
}

// ============================================================================
// REGISTRY
// ============================================================================

/// Ordered set of tools addressable by name
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    by_name: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Registry holding all eight market data tools
    pub fn with_default_tools() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(quote::QuoteTool));
        registry.register(Arc::new(quotes::QuotesTool));
        registry.register(Arc::new(search::SearchTool));
        registry.register(Arc::new(profile::CompanyProfileTool));
        registry.register(Arc::new(candles::CandlesTool));
        registry.register(Arc::new(news::NewsTool));
        registry.register(Arc::new(peers::PeersTool));
        registry.register(Arc::new(metrics::MetricsTool));
        registry
    }

    /// Add a tool; a tool with the same name is replaced in place
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.definition().name;
        match self.by_name.get(&name) {
            Some(&index) => self.tools[index] = tool,
            None => {
                self.by_name.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.by_name.get(name).map(|&index| &self.tools[index])
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|tool| tool.definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub async fn invoke(&self, name: &str, params: Value, ctx: &ToolContext) -> ToolResult {
        let Some(tool) = self.get(name) else {
            return ToolResult::error(format!("Unknown tool: {}", name));
        };

        let start = Instant::now();
        let result = tool.execute(params, ctx).await;
        let level = if result.is_error {
            LogLevel::Warning
        } else {
            LogLevel::Debug
        };
        ctx.host().log(
            level,
            &format!(
                "tool {} finished in {}ms (error: {})",
                name,
                start.elapsed().as_millis(),
                result.is_error
            ),
        );
        result
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::with_default_tools()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::StaticHost;
    use crate::testing::{tool_context as context_with, StubUpstream};
    use serde_json::json;

    #[test]
    fn test_default_registry_lists_all_tools_in_order() {
        let registry = ToolRegistry::with_default_tools();
        let names: Vec<String> = registry.definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            vec![
                "quote",
                "quotes",
                "search",
                "company_profile",
                "candles",
                "news",
                "peers",
                "metrics"
            ]
        );
        for def in registry.definitions() {
            assert_eq!(def.parameters["type"], "object");
            assert!(!def.description.is_empty());
        }
    }

    #[tokio::test]
    async fn test_unknown_tool_is_error_result() {
        let stub = Arc::new(StubUpstream::fixed(json!({})));
        let registry = ToolRegistry::with_default_tools();
        let result = registry.invoke("nope", json!({}), &context_with(stub)).await;
        assert!(result.is_error);
        assert_eq!(result.text(), "Unknown tool: nope");
    }

    #[tokio::test]
    async fn test_missing_api_key_blocks_every_tool() {
        let stub = Arc::new(StubUpstream::fixed(json!({"c": 1.0})));
        let ctx = ToolContext::new(Arc::new(StaticHost::new()), FinnhubApi::new(stub.clone()));
        let registry = ToolRegistry::with_default_tools();

        let calls = [
            ("quote", json!({"symbol": "AAPL"})),
            ("quotes", json!({"symbols": ["AAPL", "MSFT"]})),
            ("search", json!({"query": "apple"})),
            ("company_profile", json!({"symbol": "AAPL"})),
            ("candles", json!({"symbol": "AAPL"})),
            ("news", json!({})),
            ("peers", json!({"symbol": "AAPL"})),
            ("metrics", json!({"symbol": "AAPL"})),
        ];
        for (name, params) in calls {
            let result = registry.invoke(name, params, &ctx).await;
            assert!(result.is_error, "{} should fail without a key", name);
            assert!(
                result.text().contains("Configuration error"),
                "{}: {}",
                name,
                result.text()
            );
        }
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_arguments_are_error_results() {
        let stub = Arc::new(StubUpstream::fixed(json!({})));
        let ctx = context_with(stub.clone());
        let registry = ToolRegistry::with_default_tools();

        let result = registry.invoke("quote", json!({}), &ctx).await;
        assert!(result.is_error);
        assert!(result.text().starts_with("Invalid input"));

        let result = registry.invoke("quote", json!({"symbol": "  "}), &ctx).await;
        assert!(result.is_error);
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_api_key_is_forwarded_upstream() {
        let stub = Arc::new(StubUpstream::fixed(json!({"c": 1.0, "pc": 1.0})));
        let registry = ToolRegistry::with_default_tools();

        registry
            .invoke("quote", json!({"symbol": "aapl"}), &context_with(stub.clone()))
            .await;

        let (path, params, key) = stub.recorded().remove(0);
        assert_eq!(path, "/quote");
        assert_eq!(params.get("symbol"), Some("AAPL"));
        assert_eq!(key, "test-key");
    }
}
