/// In-memory response cache with a single fixed TTL
///
/// Thread-safe (sharded `DashMap`), stores opaque JSON payloads, and tracks
/// hit/miss metrics. Expired entries are dropped lazily by the lookup that
/// observes them, or in bulk by `purge_expired`.
///
/// Time is read from `tokio::time::Instant` so tests can drive expiry with a
/// paused clock.
use crate::errors::PluginResult;
use crate::logger::{self, LogTag};
use dashmap::DashMap;
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;

struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now > self.expires_at
    }
}

/// Point-in-time cache counters
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheMetrics {
    pub hits: u64,
    pub misses: u64,
    pub inserts: u64,
    pub expirations: u64,
    pub entries: usize,
    pub ttl_secs: f64,
}

impl CacheMetrics {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    expirations: AtomicU64,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            inserts: AtomicU64::new(0),
            expirations: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Live value for `key`, if any; an expired entry is removed and reported
    /// as a miss
    pub fn get(&self, key: &str) -> Option<Value> {
        let now = Instant::now();

        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(now) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.value.clone());
            }
            drop(entry); // release the shard read lock before removing
            if self
                .entries
                .remove_if(key, |_, e| e.is_expired(now))
                .is_some()
            {
                self.expirations.fetch_add(1, Ordering::Relaxed);
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store `value` under `key` until now + TTL, replacing any prior entry
    pub fn insert(&self, key: String, value: Value) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
        self.inserts.fetch_add(1, Ordering::Relaxed);
    }

    /// Serve `key` from cache, or run `fetch` and store its successful result
    ///
    /// Failures pass through untouched and leave the cache as it was. Two
    /// concurrent misses on one key both fetch; the later insert wins.
    pub async fn get_or_fetch<F, Fut>(&self, key: String, fetch: F) -> PluginResult<Value>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = PluginResult<Value>>,
    {
        if let Some(value) = self.get(&key) {
            logger::debug(LogTag::Cache, &format!("hit {}", key));
            return Ok(value);
        }

        logger::debug(LogTag::Cache, &format!("miss {}", key));
        let value = fetch().await?;
        self.insert(key, value.clone());
        Ok(value)
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before.saturating_sub(self.entries.len());
        self.expirations.fetch_add(removed as u64, Ordering::Relaxed);
        removed
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn metrics(&self) -> CacheMetrics {
        CacheMetrics {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            inserts: self.inserts.load(Ordering::Relaxed),
            expirations: self.expirations.load(Ordering::Relaxed),
            entries: self.entries.len(),
            ttl_secs: self.ttl.as_secs_f64(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::PluginError;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    const TTL: Duration = Duration::from_secs(15);

    #[tokio::test]
    async fn test_basic_operations() {
        let cache = ResponseCache::new(TTL);

        cache.insert("k1".to_string(), json!({"c": 1}));
        assert_eq!(cache.get("k1"), Some(json!({"c": 1})));
        assert_eq!(cache.get("missing"), None);

        let metrics = cache.metrics();
        assert_eq!(metrics.hits, 1);
        assert_eq!(metrics.misses, 1);
        assert_eq!(metrics.inserts, 1);
        assert_eq!(metrics.entries, 1);
        assert_eq!(metrics.hit_rate(), 0.5);
    }

    #[tokio::test]
    async fn test_insert_replaces_existing_entry() {
        let cache = ResponseCache::new(TTL);
        cache.insert("k".to_string(), json!(1));
        cache.insert("k".to_string(), json!(2));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("k"), Some(json!(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = ResponseCache::new(TTL);
        cache.insert("k".to_string(), json!("v"));

        tokio::time::advance(TTL - Duration::from_millis(1)).await;
        assert_eq!(cache.get("k"), Some(json!("v")));

        tokio::time::advance(Duration::from_millis(2)).await;
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty(), "expired entry should be evicted on lookup");
        assert_eq!(cache.metrics().expirations, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired_only_drops_stale_entries() {
        let cache = ResponseCache::new(TTL);
        cache.insert("old".to_string(), json!(1));
        tokio::time::advance(Duration::from_secs(10)).await;
        cache.insert("new".to_string(), json!(2));
        tokio::time::advance(Duration::from_secs(6)).await;

        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.get("new"), Some(json!(2)));
        assert_eq!(cache.get("old"), None);
    }

    #[tokio::test]
    async fn test_get_or_fetch_calls_once_within_ttl() {
        let cache = ResponseCache::new(TTL);
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_fetch("k".to_string(), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(json!({"c": 150.0}))
                })
                .await
                .unwrap();
            assert_eq!(value, json!({"c": 150.0}));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_get_or_fetch_never_caches_failures() {
        let cache = ResponseCache::new(TTL);
        let calls = AtomicUsize::new(0);

        for _ in 0..2 {
            let result = cache
                .get_or_fetch("k".to_string(), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(PluginError::Transport("connection refused".to_string()))
                })
                .await;
            assert!(result.is_err());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_access_does_not_corrupt() {
        let cache = Arc::new(ResponseCache::new(TTL));
        let mut handles = Vec::new();

        for i in 0..16 {
            let cache = Arc::clone(&cache);
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_fetch(format!("k{}", i % 4), || async move { Ok(json!(i % 4)) })
                    .await
                    .unwrap()
            }));
        }

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.await.unwrap(), json!(i % 4));
        }
        assert_eq!(cache.len(), 4);
    }

    #[tokio::test]
    async fn test_clear_empties_cache() {
        let cache = ResponseCache::new(TTL);
        cache.insert("a".to_string(), json!(1));
        cache.insert("b".to_string(), json!(2));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
    }
}
