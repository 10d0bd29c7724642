//! Cache-aside layer over an external key/value store.
//!
//! Entries hold the exact response bytes so a hit is returned without
//! re-serializing. The layer is best-effort: backend failures and malformed
//! entries degrade to a miss (reads) or a skipped write.

pub mod janitor;
pub mod memory;
pub mod sqlite;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::IgnoredAny;
use tracing::{debug, warn};

use crate::error::{AppError, CacheError};
use crate::models::SemesterId;

pub use janitor::CacheJanitor;
pub use memory::MemoryCache;
pub use sqlite::SqliteCache;

pub const LATEST_SEMESTER_KEY: &str = "latest-semester";
pub const LATEST_SEMESTER_TTL: Duration = Duration::from_secs(24 * 60 * 60);
pub const SEARCH_RESULT_TTL: Duration = Duration::from_secs(5 * 60);

/// The raw query text is part of the key, so whitespace variants are cached separately.
pub fn search_key(semester: SemesterId, offset: usize, query: &str) -> String {
    format!("{}:{}:{}", semester, offset, query)
}

#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    async fn setex(&self, key: &str, ttl: Duration, value: &[u8]) -> Result<(), CacheError>;

    /// Drops expired entries, returning how many were removed.
    async fn purge_expired(&self) -> Result<usize, CacheError>;
}

#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn CacheStore>,
}

impl ResultCache {
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Returns the cached payload for `key`, or runs `compute`, stores its
    /// JSON encoding under `key` for `ttl` and returns that.
    ///
    /// Errors from `compute` are returned as-is and nothing is stored.
    pub async fn get_or_compute<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        compute: F,
    ) -> Result<Vec<u8>, AppError>
    where
        T: Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, AppError>>,
    {
        if let Some(bytes) = self.lookup(key).await {
            debug!("cache hit: {}", key);
            return Ok(bytes);
        }
        debug!("cache miss: {}", key);

        let value = compute().await?;
        let bytes = serde_json::to_vec(&value)?;
        self.put(key, ttl, &bytes).await;
        Ok(bytes)
    }

    async fn lookup(&self, key: &str) -> Option<Vec<u8>> {
        match self.store.get(key).await {
            Ok(Some(bytes)) => match validate(&bytes) {
                Ok(()) => Some(bytes),
                Err(e) => {
                    warn!("discarding cache entry {}: {}", key, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("cache read failed for {}: {}", key, e);
                None
            }
        }
    }

    async fn put(&self, key: &str, ttl: Duration, bytes: &[u8]) {
        if let Err(e) = self.store.setex(key, ttl, bytes).await {
            warn!("cache write failed for {}: {}", key, e);
        }
    }
}

fn validate(bytes: &[u8]) -> Result<(), CacheError> {
    serde_json::from_slice::<IgnoredAny>(bytes)?;
    Ok(())
}
