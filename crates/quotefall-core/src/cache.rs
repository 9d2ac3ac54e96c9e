//! In-memory TTL cache that fronts the provider chain.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;

/// Failures of the cache itself. A broken cache is surfaced to the
/// caller, never silently treated as a miss.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to serialize cache entry '{key}': {cause}")]
    Serialize { key: String, cause: String },
    #[error("failed to deserialize cache entry '{key}': {cause}")]
    Deserialize { key: String, cause: String },
}

#[derive(Debug, Clone)]
struct CacheEntry {
    body: String,
    stored_at: Instant,
}

/// Thread-safe in-memory cache with a uniform TTL and lazy eviction.
///
/// Entries are stored as JSON bodies; an entry is valid iff
/// `now - stored_at < ttl`. Expired entries are removed on the read that
/// finds them; there is no background sweeper.
#[derive(Debug, Clone)]
pub struct TtlCache {
    inner: Arc<RwLock<HashMap<String, CacheEntry>>>,
    ttl: Duration,
}

impl TtlCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Default TTL of 5 minutes.
    pub fn with_default_ttl() -> Self {
        Self::new(Duration::from_secs(300))
    }

    /// Look up a key. An expired entry is deleted and reported absent;
    /// no entry is ever returned past its TTL.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        let mut store = self.inner.write().await;

        let Some(entry) = store.get(key) else {
            return Ok(None);
        };

        if entry.stored_at.elapsed() >= self.ttl {
            store.remove(key);
            return Ok(None);
        }

        let value =
            serde_json::from_str(&entry.body).map_err(|error| CacheError::Deserialize {
                key: key.to_owned(),
                cause: error.to_string(),
            })?;
        Ok(Some(value))
    }

    /// Store a value under `key`, overwriting any previous entry.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let body = serde_json::to_string(value).map_err(|error| CacheError::Serialize {
            key: key.to_owned(),
            cause: error.to_string(),
        })?;

        let mut store = self.inner.write().await;
        store.insert(
            key.to_owned(),
            CacheEntry {
                body,
                stored_at: Instant::now(),
            },
        );
        Ok(())
    }

    /// Remove one entry; reports whether it existed.
    pub async fn delete(&self, key: &str) -> bool {
        let mut store = self.inner.write().await;
        store.remove(key).is_some()
    }

    /// Drop every entry unconditionally. Succeeds on an empty cache.
    pub async fn clear(&self) {
        let mut store = self.inner.write().await;
        store.clear();
    }

    /// Number of entries currently stored, expired ones included.
    pub async fn len(&self) -> usize {
        let store = self.inner.read().await;
        store.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
