//! Short-lived in-memory cache for aggregated news responses.
//!
//! Keys are the full, order-sensitive request query string so two requests
//! only share an entry when their parameters match exactly.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use newsroom_types::NewsResponse;

use crate::error::ApiError;

/// Upper bound on distinct query strings held at once.
const MAX_ENTRIES: u64 = 1024;

pub struct ResponseCache {
    entries: Cache<String, Arc<NewsResponse>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(MAX_ENTRIES)
                .build(),
        }
    }

    /// Build the cache key for a raw query string.
    pub fn key_for(raw_query: &str) -> String {
        format!("news:{}", raw_query)
    }

    /// Live entry for `key`, if any. Expired entries read as absent.
    pub async fn get(&self, key: &str) -> Option<Arc<NewsResponse>> {
        self.entries.get(key).await
    }

    pub async fn set(&self, key: String, value: Arc<NewsResponse>) {
        self.entries.insert(key, value).await;
    }

    /// Return the live entry for `key`, or run `loader` and store its result.
    ///
    /// Concurrent misses on the same key share a single `loader` run. Errors
    /// are handed back to every waiter and are not cached.
    pub async fn get_or_try_insert<F>(&self, key: String, loader: F) -> Result<Arc<NewsResponse>, ApiError>
    where
        F: Future<Output = Result<Arc<NewsResponse>, ApiError>>,
    {
        self.entries
            .try_get_with(key, loader)
            .await
            .map_err(|shared| (*shared).clone())
    }
}
