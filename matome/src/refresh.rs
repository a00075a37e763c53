//! Out-of-band tenki cache refresher.
//!
//! Tenki entries are primarily written by this loop, not by the request
//! path: every currently cached zipcode is re-fetched and overwritten so
//! that readers almost always find a payload inside the freshness window.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use matome_core::{MatomeError, ServiceName, Subscription, resolve};

use crate::Matome;

impl Matome {
    /// Re-fetch every cached tenki zipcode once and overwrite its entry.
    ///
    /// Goes through the raw connector on purpose: reading the cache here
    /// would defeat the refresh. Per-key failures are logged and skipped so
    /// one bad zipcode cannot stall the rest of the pass.
    ///
    /// Returns the number of entries refreshed.
    ///
    /// # Errors
    /// Only a failed key scan aborts the pass.
    pub async fn refresh_tenki(&self) -> Result<usize, MatomeError> {
        let keys = self.store.scan("tenki:").await?;
        let pool_size = self.cfg.pool_size.max(1);
        let timeout = self.cfg.leg_timeout;

        let refreshed = stream::iter(keys)
            .map(|key| {
                let fetcher = Arc::clone(&self.raw_fetcher);
                let store = Arc::clone(&self.store);
                async move {
                    let Some((_, zipcode)) = key.split_once(':') else {
                        warn!(key, "malformed tenki cache key");
                        return false;
                    };
                    let sub = Subscription::new(ServiceName::Tenki).with_token(zipcode);
                    let descriptor = resolve(&sub);
                    let payload = match Self::leg_with_timeout(
                        timeout,
                        ServiceName::Tenki,
                        fetcher.fetch(ServiceName::Tenki, &descriptor),
                    )
                    .await
                    {
                        Ok(payload) => payload,
                        Err(e) => {
                            warn!(key, error = %e, "tenki refresh fetch failed");
                            return false;
                        }
                    };
                    let bytes = match serde_json::to_vec(&payload) {
                        Ok(bytes) => bytes,
                        Err(e) => {
                            warn!(key, error = %e, "tenki payload unencodable");
                            return false;
                        }
                    };
                    if let Err(e) = store.set(&key, &bytes).await {
                        warn!(key, error = %e, "tenki refresh write failed");
                        return false;
                    }
                    debug!(key, "tenki entry refreshed");
                    true
                }
            })
            .buffer_unordered(pool_size)
            .fold(0usize, |acc, ok| async move { acc + usize::from(ok) })
            .await;

        Ok(refreshed)
    }

    /// Run refresh passes forever on a fixed period.
    ///
    /// Pass-level failures are logged and the loop keeps going; callers run
    /// this on its own task alongside request traffic.
    pub async fn run_refresher(&self, period: Duration) {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            match self.refresh_tenki().await {
                Ok(count) => debug!(refreshed = count, "tenki refresh pass complete"),
                Err(e) => warn!(error = %e, "tenki refresh pass failed"),
            }
        }
    }
}
