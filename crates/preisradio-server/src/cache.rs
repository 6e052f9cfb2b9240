//! In-memory cache of rendered responses, keyed by request path and query.
//!
//! Entries expire after their TTL; revalidation evicts them early. The cache
//! never holds more than `max_entries` bodies.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedBody {
    pub content_type: &'static str,
    pub body: String,
}

#[derive(Debug)]
struct Entry {
    value: CachedBody,
    expires_at: Instant,
}

#[derive(Debug, Clone)]
pub struct RenderCache {
    default_ttl: Duration,
    max_entries: usize,
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl RenderCache {
    #[must_use]
    pub fn new(default_ttl: Duration, max_entries: usize) -> Self {
        Self {
            default_ttl,
            max_entries,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn get(&self, key: &str) -> Option<CachedBody> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|e| e.expires_at > Instant::now())
            .map(|e| e.value.clone())
    }

    /// Store under the default TTL. A zero TTL disables caching.
    pub async fn insert(&self, key: String, value: CachedBody) {
        self.insert_with_ttl(key, value, self.default_ttl).await;
    }

    /// When full, expired entries go first, then the entry closest to expiry.
    pub async fn insert_with_ttl(&self, key: String, value: CachedBody, ttl: Duration) {
        if ttl.is_zero() || self.max_entries == 0 {
            return;
        }
        let mut entries = self.entries.write().await;
        let now = Instant::now();
        entries.retain(|_, e| e.expires_at > now);
        while entries.len() >= self.max_entries && !entries.contains_key(&key) {
            let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, e)| e.expires_at)
                .map(|(k, _)| k.clone())
            else {
                break;
            };
            entries.remove(&oldest);
        }
        entries.insert(
            key,
            Entry {
                value,
                expires_at: now + ttl,
            },
        );
    }

    /// Drop `path` and every cached variant of it with a query string.
    /// `/` clears everything. Returns the number of entries removed.
    pub async fn evict_path(&self, path: &str) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        if path == "/" {
            entries.clear();
        } else {
            let with_query = format!("{path}?");
            entries.retain(|key, _| key != path && !key.starts_with(&with_query));
        }
        before - entries.len()
    }
}
