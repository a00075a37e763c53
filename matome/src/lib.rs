//! Matome aggregates per-user service subscriptions into one combined result.
//!
//! Overview
//! - Resolves each stored subscription into a concrete outbound request via
//!   the static endpoint table in `matome_core`.
//! - Serves from the shared response cache when the entry is still fresh;
//!   otherwise fetches through the injected connector and writes back.
//! - Executes TLS legs serially (the remote security API enforces a strict
//!   per-second rate limit) while plain legs fan out through a bounded pool.
//! - Returns all results or the first error; there is no partial-result
//!   fallback.
//!
//! Key behaviors and trade-offs
//! - Result order is not guaranteed: serial legs keep subscription order
//!   among themselves, pooled legs complete in whatever order the upstreams
//!   answer. Consumers must key off each item's `service` field.
//! - Two concurrent misses for the same key may both fetch and both write;
//!   last write wins and the payload is idempotent per key, so this is
//!   benign duplicate work rather than a consistency problem.
//! - The tenki refresher owns `tenki:*` entries: it rewrites them out of
//!   band, which is why tenki freshness is judged from the payload's `date`
//!   field instead of stored TTL metadata.
//!
//! Example
//! ```rust,ignore
//! use std::sync::Arc;
//! use matome::Matome;
//! use matome_http::HttpFetcher;
//! use matome_redis::RedisStore;
//!
//! let fetcher = Arc::new(HttpFetcher::new_default()?);
//! let store = Arc::new(RedisStore::connect("redis://localhost:6379").await?);
//! let matome = Matome::builder()
//!     .with_fetcher(fetcher)
//!     .with_store(store)
//!     .pool_size(5)
//!     .build()?;
//!
//! let items = matome.aggregate_for_user(1).await?;
//! ```
//!
//! See `matome/examples/` for runnable end-to-end demonstrations.
#![warn(missing_docs)]

mod aggregate;
pub(crate) mod core;
mod refresh;
mod subscriptions;

pub use core::{Matome, MatomeBuilder};
pub use subscriptions::subscriptions_key;

pub use matome_middleware::{CachingFetcher, FreshnessPolicy};

// Re-export core types for convenience
pub use matome_core::{
    AuthPlacement, CacheStore, Endpoint, MatomeConfig, MatomeError, RequestDescriptor,
    ServiceFetcher, ServiceItem, ServiceName, Subscription, SubscriptionSet, SubscriptionUpdate,
    Transport, User, UserStore, discriminator, resolve,
};
