//! matome-core
//!
//! Core types, traits, and utilities shared across the matome ecosystem.
//!
//! - `service`: the closed set of upstream services and their static endpoints.
//! - `types`: subscriptions, request descriptors, and aggregation items.
//! - `resolver`: the pure subscription -> request descriptor mapping.
//! - `fetcher`: the `ServiceFetcher` trait implemented by outbound connectors.
//! - `store`: the `CacheStore` and `UserStore` collaborator traits.
//!
//! The collaborator traits are `async_trait` object-safe interfaces; production
//! implementations live in `matome-http` and `matome-redis`, deterministic fakes
//! in `matome-mock`. Code that drives them is expected to run under a Tokio 1.x
//! runtime.
#![warn(missing_docs)]

/// Unified error type for the matome workspace.
pub mod error;
/// The `ServiceFetcher` trait implemented by outbound HTTP connectors.
pub mod fetcher;
/// Pure resolution of subscriptions into request descriptors.
pub mod resolver;
/// The closed service set and its static endpoint table.
pub mod service;
/// Collaborator traits over the key/value cache backend and the user store.
pub mod store;
pub mod types;

pub use error::MatomeError;
pub use fetcher::ServiceFetcher;
pub use resolver::{discriminator, resolve};
pub use service::{AuthPlacement, Endpoint, ServiceName, Transport};
pub use store::{CacheStore, User, UserStore};
pub use types::*;
