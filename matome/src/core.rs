use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use matome_core::{CacheStore, MatomeConfig, MatomeError, ServiceFetcher, ServiceName};
use matome_middleware::{CachingFetcher, FreshnessPolicy};

/// Aggregation engine: orchestrates cache-aware fetches for a user's
/// subscriptions under the configured concurrency policy.
pub struct Matome {
    /// Cache-wrapped fetch path used by aggregation legs.
    pub(crate) fetcher: Arc<dyn ServiceFetcher>,
    /// Unwrapped connector; the refresher bypasses the cache read on purpose.
    pub(crate) raw_fetcher: Arc<dyn ServiceFetcher>,
    pub(crate) store: Arc<dyn CacheStore>,
    pub(crate) cfg: MatomeConfig,
}

// The collaborator handles are trait objects without Debug impls.
impl fmt::Debug for Matome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matome")
            .field("fetcher", &self.raw_fetcher.name())
            .field("cfg", &self.cfg)
            .finish()
    }
}

/// Builder for constructing a [`Matome`] engine with injected collaborators.
pub struct MatomeBuilder {
    fetcher: Option<Arc<dyn ServiceFetcher>>,
    store: Option<Arc<dyn CacheStore>>,
    cfg: MatomeConfig,
}

impl Default for MatomeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MatomeBuilder {
    /// Create a new builder with default configuration.
    ///
    /// Defaults: pool of 5 workers for plain legs, 5 s per-leg timeout,
    /// 2 s tenki staleness threshold. A fetcher and a store must be
    /// registered before `build()`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fetcher: None,
            store: None,
            cfg: MatomeConfig::default(),
        }
    }

    /// Register the outbound connector.
    ///
    /// The builder wraps it in a [`CachingFetcher`] during `build()`; pass
    /// the raw connector, not a pre-wrapped one.
    #[must_use]
    pub fn with_fetcher(mut self, fetcher: Arc<dyn ServiceFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Register the shared key/value backend.
    ///
    /// The same keyspace holds subscription sets and response-cache entries.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn CacheStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Maximum concurrent plain-transport fetches.
    ///
    /// Bounds load on the upstreams and on the process itself; TLS legs are
    /// unaffected (always serial). Values below 1 are clamped to 1.
    #[must_use]
    pub const fn pool_size(mut self, size: usize) -> Self {
        self.cfg.pool_size = size;
        self
    }

    /// Per-leg timeout covering the cache round trip and the network fetch.
    #[must_use]
    pub const fn leg_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.leg_timeout = timeout;
        self
    }

    /// Staleness threshold for cached tenki payloads.
    #[must_use]
    pub const fn tenki_staleness(mut self, threshold: Duration) -> Self {
        self.cfg.tenki_staleness = threshold;
        self
    }

    /// Replace the whole configuration at once.
    #[must_use]
    pub fn config(mut self, cfg: MatomeConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Build the engine.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no fetcher or no store has been registered.
    pub fn build(self) -> Result<Matome, MatomeError> {
        let raw_fetcher = self.fetcher.ok_or_else(|| {
            MatomeError::InvalidArg(
                "no fetcher registered; add one via with_fetcher(...)".to_string(),
            )
        })?;
        let store = self.store.ok_or_else(|| {
            MatomeError::InvalidArg("no store registered; add one via with_store(...)".to_string())
        })?;

        let policy = FreshnessPolicy::new(self.cfg.tenki_staleness);
        let fetcher: Arc<dyn ServiceFetcher> = Arc::new(CachingFetcher::new(
            Arc::clone(&raw_fetcher),
            Arc::clone(&store),
            policy,
        ));

        Ok(Matome {
            fetcher,
            raw_fetcher,
            store,
            cfg: self.cfg,
        })
    }
}

impl Matome {
    /// Start building a new engine.
    #[must_use]
    pub fn builder() -> MatomeBuilder {
        MatomeBuilder::new()
    }

    /// Current configuration.
    #[must_use]
    pub const fn config(&self) -> &MatomeConfig {
        &self.cfg
    }

    /// Wrap a leg future with the per-leg timeout and standardized error
    /// mapping.
    pub(crate) async fn leg_with_timeout<T, Fut>(
        timeout: Duration,
        service: ServiceName,
        fut: Fut,
    ) -> Result<T, MatomeError>
    where
        Fut: core::future::Future<Output = Result<T, MatomeError>>,
    {
        (tokio::time::timeout(timeout, fut).await)
            .unwrap_or_else(|_| Err(MatomeError::timeout(service)))
    }
}
