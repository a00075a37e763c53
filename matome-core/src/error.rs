use thiserror::Error;

use crate::service::ServiceName;

/// Unified error type for the matome workspace.
///
/// This wraps corrupted subscription state, upstream fetch failures, per-leg
/// timeouts, cache decode problems, and backend store failures.
#[derive(Debug, Error)]
pub enum MatomeError {
    /// A stored subscription names a service outside the supported set.
    ///
    /// This indicates corrupted subscription state and aborts the whole
    /// aggregation; it is never silently dropped.
    #[error("unknown service: {name}")]
    UnknownService {
        /// The unrecognized service string as found in storage.
        name: String,
    },

    /// An outbound call to a third-party service failed (connection error,
    /// non-2xx status, or unparseable body).
    #[error("upstream {service} failed: {msg}")]
    Upstream {
        /// Service whose endpoint failed.
        service: ServiceName,
        /// Human-readable failure description.
        msg: String,
    },

    /// A single aggregation leg exceeded the configured timeout.
    #[error("leg timed out: {service}")]
    Timeout {
        /// Service whose leg timed out.
        service: ServiceName,
    },

    /// Stored bytes under a key could not be decoded.
    ///
    /// For response-cache entries this is recovered locally as a cache miss;
    /// it surfaces only for authoritative state such as subscription sets.
    #[error("cache decode failed for {key}: {msg}")]
    CacheDecode {
        /// Key whose payload failed to decode.
        key: String,
        /// Decoder error message.
        msg: String,
    },

    /// The key/value backend returned an I/O-level error.
    #[error("store error: {msg}")]
    Store {
        /// Backend error message.
        msg: String,
    },

    /// A requested resource does not exist (e.g. no subscription set for a user).
    #[error("not found: {what}")]
    NotFound {
        /// Description of the missing resource.
        what: String,
    },

    /// Invalid input argument (builder misuse, malformed update).
    #[error("invalid argument: {0}")]
    InvalidArg(String),
}

impl MatomeError {
    /// Helper: build an `UnknownService` error from the offending name.
    pub fn unknown_service(name: impl Into<String>) -> Self {
        Self::UnknownService { name: name.into() }
    }

    /// Helper: build an `Upstream` error for a service and message.
    pub fn upstream(service: ServiceName, msg: impl Into<String>) -> Self {
        Self::Upstream {
            service,
            msg: msg.into(),
        }
    }

    /// Helper: build a `Timeout` error for a service.
    #[must_use]
    pub const fn timeout(service: ServiceName) -> Self {
        Self::Timeout { service }
    }

    /// Helper: build a `CacheDecode` error for a key and message.
    pub fn cache_decode(key: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::CacheDecode {
            key: key.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `Store` error from a backend message.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store { msg: msg.into() }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }
}
