//! matome-middleware
//!
//! Wrappers that compose with any [`matome_core::ServiceFetcher`]:
//!
//! - [`CachingFetcher`] serves from the shared response cache when the
//!   stored payload is still fresh and falls back to the inner fetcher
//!   otherwise, writing the result back under the same key.
//! - [`FreshnessPolicy`] decides, per service, whether a cached payload is
//!   still usable given its content and the current time.
#![warn(missing_docs)]

mod cache;
mod freshness;

pub use cache::CachingFetcher;
pub use freshness::FreshnessPolicy;
