//! Test doubles shared across module tests

use crate::apis::{FinnhubApi, QueryParams, Upstream};
use crate::errors::PluginResult;
use crate::host::StaticHost;
use crate::tools::ToolContext;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

type Responder = dyn Fn(&str, &QueryParams) -> PluginResult<Value> + Send + Sync;

/// Scripted upstream that records every call it receives
pub struct StubUpstream {
    responder: Box<Responder>,
    calls: AtomicUsize,
    log: Mutex<Vec<(String, QueryParams, String)>>,
    delays: HashMap<String, Duration>,
}

impl StubUpstream {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&str, &QueryParams) -> PluginResult<Value> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            calls: AtomicUsize::new(0),
            log: Mutex::new(Vec::new()),
            delays: HashMap::new(),
        }
    }

    /// Always answers with `value`
    pub fn fixed(value: Value) -> Self {
        Self::new(move |_, _| Ok(value.clone()))
    }

    /// Sleep before answering any call whose `symbol` parameter matches
    pub fn with_delay(mut self, symbol: &str, delay: Duration) -> Self {
        self.delays.insert(symbol.to_string(), delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn calls_to(&self, path: &str) -> usize {
        self.log.lock().iter().filter(|(p, _, _)| p == path).count()
    }

    /// Recorded (path, params, api key) triples in arrival order
    pub fn recorded(&self) -> Vec<(String, QueryParams, String)> {
        self.log.lock().clone()
    }
}

#[async_trait]
impl Upstream for StubUpstream {
    async fn get_json(
        &self,
        path: &str,
        api_key: &str,
        params: &QueryParams,
    ) -> PluginResult<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log
            .lock()
            .push((path.to_string(), params.clone(), api_key.to_string()));

        if let Some(delay) = params.get("symbol").and_then(|s| self.delays.get(s)) {
            tokio::time::sleep(*delay).await;
        }

        (self.responder)(path, params)
    }
}

/// Tool context with API key `test-key` over `stub`
pub fn tool_context(stub: Arc<StubUpstream>) -> ToolContext {
    ToolContext::new(
        Arc::new(StaticHost::new().with_api_key("test-key")),
        FinnhubApi::new(stub),
    )
}
