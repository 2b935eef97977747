pub mod key;
pub mod manager;

pub use key::derive_key;
pub use manager::{CacheMetrics, ResponseCache};

use crate::apis::{QueryParams, Upstream};
use crate::errors::PluginResult;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Upstream wrapper that answers repeated requests from a [`ResponseCache`]
///
/// Same contract as the wrapped client; callers cannot tell whether a value
/// came from the network or from memory.
pub struct CachingUpstream {
    inner: Arc<dyn Upstream>,
    cache: Arc<ResponseCache>,
}

impl CachingUpstream {
    pub fn new(inner: Arc<dyn Upstream>, cache: Arc<ResponseCache>) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }
}

#[async_trait]
impl Upstream for CachingUpstream {
    async fn get_json(
        &self,
        path: &str,
        api_key: &str,
        params: &QueryParams,
    ) -> PluginResult<Value> {
        let key = derive_key(path, params);
        self.cache
            .get_or_fetch(key, || self.inner.get_json(path, api_key, params))
            .await
    }
}
