//! In-memory response cache with per-entry expiry.
//!
//! Read-mostly GET endpoints (routes, stops, fares) are cached so repeated
//! page loads do not hit the backend. Entries are never served past their
//! expiry; expired entries are evicted lazily when read.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use crate::client::query::QueryParams;

/// A cached value with its expiry.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now > self.expires_at
    }
}

/// A thread-safe TTL cache. Clones share the same store.
#[derive(Debug, Clone)]
pub struct ResponseCache<V> {
    inner: Arc<DashMap<String, CacheEntry<V>>>,
}

impl<V> Default for ResponseCache<V> {
    fn default() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
        }
    }
}

impl<V: Clone> ResponseCache<V> {
    /// Create a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a live entry. An expired entry is removed and `None` returned.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        match self.inner.get(key) {
            None => return None,
            Some(entry) if !entry.is_expired(now) => return Some(entry.value.clone()),
            Some(_) => {}
        }
        // Re-check under the write lock; a concurrent `set` may have refreshed it.
        if self.inner.remove_if(key, |_, entry| entry.is_expired(now)).is_some() {
            tracing::trace!(key, "Evicted expired cache entry");
        }
        None
    }

    /// Store `value` under `key` for `ttl`, replacing any existing entry.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        self.inner.insert(key.into(), CacheEntry { value, expires_at });
    }

    /// Remove a single entry.
    pub fn invalidate(&self, key: &str) -> bool {
        self.inner.remove(key).is_some()
    }

    /// Remove every entry whose key starts with `prefix`. Returns the count.
    pub fn invalidate_prefix(&self, prefix: &str) -> usize {
        let before = self.inner.len();
        self.inner.retain(|key, _| !key.starts_with(prefix));
        let removed = before.saturating_sub(self.inner.len());
        if removed > 0 {
            tracing::debug!(prefix, removed, "Invalidated cache entries");
        }
        removed
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.inner.clear();
    }

    /// Drop expired entries eagerly. Returns the count removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.inner.len();
        self.inner.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.inner.len())
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Canonical cache key for a path and its query parameters.
///
/// Any query string already embedded in `path` is merged with `query`, and
/// pairs are emitted in key order, so reordered but identical parameters
/// produce the same key.
pub fn cache_key(path: &str, query: &QueryParams) -> String {
    let (base, embedded) = match path.split_once('?') {
        Some((base, qs)) => (base, Some(qs)),
        None => (path, None),
    };

    let mut merged = QueryParams::new();
    if let Some(qs) = embedded {
        merged.extend_from_query_string(qs);
    }
    merged.extend(query);

    if merged.is_empty() {
        base.to_string()
    } else {
        format!("{}?{}", base, merged.to_query_string())
    }
}
