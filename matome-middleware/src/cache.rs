use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, warn};

use matome_core::{
    CacheStore, MatomeError, RequestDescriptor, ServiceFetcher, ServiceName, discriminator,
};

use crate::freshness::FreshnessPolicy;

/// Serve-cache-or-fetch-and-store wrapper around any [`ServiceFetcher`].
///
/// Cache reads that fail at the store or decode level degrade to misses and
/// never surface to the caller. A fetch failure after a miss propagates
/// unchanged and leaves the cache untouched (no negative caching).
pub struct CachingFetcher {
    inner: Arc<dyn ServiceFetcher>,
    store: Arc<dyn CacheStore>,
    policy: FreshnessPolicy,
}

impl CachingFetcher {
    /// Wrap a fetcher with the given store and freshness policy.
    #[must_use]
    pub fn new(
        inner: Arc<dyn ServiceFetcher>,
        store: Arc<dyn CacheStore>,
        policy: FreshnessPolicy,
    ) -> Self {
        Self {
            inner,
            store,
            policy,
        }
    }

    /// Deterministic cache key for a resolved request, or `None` when the
    /// service is not cacheable.
    #[must_use]
    pub fn cache_key(service: ServiceName, descriptor: &RequestDescriptor) -> Option<String> {
        discriminator(service, descriptor).map(|d| format!("{service}:{d}"))
    }

    /// Cache lookup; any failure along the way degrades to a miss.
    async fn lookup(&self, service: ServiceName, key: &str) -> Option<Value> {
        let bytes = match self.store.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(key, "cache miss");
                return None;
            }
            Err(e) => {
                warn!(key, error = %e, "cache read failed; treating as miss");
                return None;
            }
        };

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(payload) => {
                if self.policy.is_fresh(service, &payload, Utc::now()) {
                    debug!(key, "cache hit");
                    Some(payload)
                } else {
                    debug!(key, "cache entry stale");
                    None
                }
            }
            Err(e) => {
                warn!(key, error = %e, "cache entry undecodable; treating as miss");
                None
            }
        }
    }

    async fn store_back(&self, key: &str, payload: &Value) {
        let bytes = match serde_json::to_vec(payload) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(key, error = %e, "failed to encode payload for cache");
                return;
            }
        };
        // The fetched value is already in hand; a failed write only costs a
        // future refetch.
        if let Err(e) = self.store.set(key, &bytes).await {
            warn!(key, error = %e, "cache write failed");
        }
    }
}

#[async_trait]
impl ServiceFetcher for CachingFetcher {
    fn name(&self) -> &'static str {
        "caching"
    }

    async fn fetch(
        &self,
        service: ServiceName,
        descriptor: &RequestDescriptor,
    ) -> Result<Value, MatomeError> {
        let Some(key) = Self::cache_key(service, descriptor) else {
            return self.inner.fetch(service, descriptor).await;
        };

        if let Some(payload) = self.lookup(service, &key).await {
            return Ok(payload);
        }

        let payload = self.inner.fetch(service, descriptor).await?;
        self.store_back(&key, &payload).await;
        Ok(payload)
    }
}
