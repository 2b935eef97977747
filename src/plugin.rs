/// Plugin lifecycle
///
/// `TickerPlugin` owns everything with a lifetime: the response cache is
/// built on `activate` and emptied on `deactivate`, and handlers only ever see
/// it through the `ToolContext` handed out while active.
use crate::apis::{FinnhubApi, Upstream};
use crate::cache::{CacheMetrics, CachingUpstream, ResponseCache};
use crate::constants::PLUGIN_NAME;
use crate::errors::{PluginError, PluginResult};
use crate::host::HostContext;
use crate::logger::LogLevel;
use crate::tools::{ToolContext, ToolDefinition, ToolRegistry, ToolResult};
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

struct ActiveState {
    cache: Arc<ResponseCache>,
    ctx: ToolContext,
}

pub struct TickerPlugin {
    host: Arc<dyn HostContext>,
    upstream: Arc<dyn Upstream>,
    ttl: Duration,
    registry: ToolRegistry,
    state: RwLock<Option<Arc<ActiveState>>>,
}

impl TickerPlugin {
    /// Inactive plugin over `upstream`; call [`activate`](Self::activate)
    /// before invoking tools
    pub fn new(host: Arc<dyn HostContext>, upstream: Arc<dyn Upstream>, ttl: Duration) -> Self {
        Self {
            host,
            upstream,
            ttl,
            registry: ToolRegistry::with_default_tools(),
            state: RwLock::new(None),
        }
    }

    /// Build a fresh, empty cache and start serving; no-op when already active
    pub fn activate(&self) {
        let mut state = self.state.write();
        if state.is_some() {
            return;
        }

        let cache = Arc::new(ResponseCache::new(self.ttl));
        let caching = CachingUpstream::new(self.upstream.clone(), cache.clone());
        let ctx = ToolContext::new(self.host.clone(), FinnhubApi::new(Arc::new(caching)));
        *state = Some(Arc::new(ActiveState { cache, ctx }));

        self.host.log(
            LogLevel::Info,
            &format!(
                "{} activated ({} tools, cache TTL {}s)",
                PLUGIN_NAME,
                self.registry.len(),
                self.ttl.as_secs()
            ),
        );
    }

    /// Stop serving and drop every cached response
    pub fn deactivate(&self) {
        let Some(active) = self.state.write().take() else {
            return;
        };
        let dropped = active.cache.len();
        active.cache.clear();
        self.host.log(
            LogLevel::Info,
            &format!("{} deactivated ({} cached responses dropped)", PLUGIN_NAME, dropped),
        );
    }

    pub fn is_active(&self) -> bool {
        self.state.read().is_some()
    }

    fn active(&self) -> PluginResult<Arc<ActiveState>> {
        self.state
            .read()
            .clone()
            .ok_or_else(|| PluginError::Configuration(format!("{} is not active", PLUGIN_NAME)))
    }

    /// Context bound to the live cache, for handlers outside the tool registry
    pub fn context(&self) -> PluginResult<ToolContext> {
        Ok(self.active()?.ctx.clone())
    }

    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.registry.definitions()
    }

    pub async fn invoke_tool(&self, name: &str, params: Value) -> ToolResult {
        let active = match self.active() {
            Ok(active) => active,
            Err(e) => return ToolResult::error(e.to_string()),
        };
        self.registry.invoke(name, params, &active.ctx).await
    }

    /// `None` while inactive
    pub fn cache_metrics(&self) -> Option<CacheMetrics> {
        self.state.read().as_ref().map(|active| active.cache.metrics())
    }

    /// Evict expired cache entries; returns how many were dropped
    pub fn purge_expired(&self) -> usize {
        self.state
            .read()
            .as_ref()
            .map(|active| active.cache.purge_expired())
            .unwrap_or(0)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl Drop for TickerPlugin {
    fn drop(&mut self) {
        self.deactivate();
    }
}
