use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::CacheStore;
use crate::error::CacheError;

/// Periodically drops expired cache entries.
pub struct CacheJanitor {
    store: Arc<dyn CacheStore>,
    interval: Duration,
}

impl CacheJanitor {
    pub fn new(store: Arc<dyn CacheStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Runs until the task is aborted.
    pub async fn start(self) {
        info!("Starting cache janitor (interval: {:?})", self.interval);

        loop {
            tokio::time::sleep(self.interval).await;

            match self.run_once().await {
                Ok(0) => debug!("Cache janitor: nothing to purge"),
                Ok(removed) => info!("Cache janitor purged {} expired entries", removed),
                // Keep looping; the next pass retries.
                Err(e) => warn!("Cache purge failed: {}", e),
            }
        }
    }

    pub async fn run_once(&self) -> Result<usize, CacheError> {
        self.store.purge_expired().await
    }
}
