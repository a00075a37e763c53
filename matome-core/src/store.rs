use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::MatomeError;

/// Thin interface over the external flat key/value backend.
///
/// One keyspace holds both subscription sets (`subscriptions:<user_id>`) and
/// service-response cache entries (`<service>:<discriminator>`). Entries
/// carry no TTL; freshness is re-derived from entry content at read time.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read the raw bytes stored under a key.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, MatomeError>;

    /// Write bytes under a key, overwriting any previous value.
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), MatomeError>;

    /// List keys starting with a prefix.
    async fn scan(&self, prefix: &str) -> Result<Vec<String>, MatomeError>;

    /// Drop every key in the keyspace.
    async fn flush(&self) -> Result<(), MatomeError>;
}

/// An authenticated account, as exposed by the external user store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable numeric identity.
    pub id: i64,
    /// Login email.
    pub email: String,
    /// Plan tier; drives the caller's refresh cadence, not the engine.
    pub grade: String,
}

/// Capability interface over external account storage.
///
/// Session handling stays with the caller; the engine only needs lookups.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Check credentials and return the matching user, if any.
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, MatomeError>;

    /// Look up a user by id.
    async fn get(&self, user_id: i64) -> Result<Option<User>, MatomeError>;
}
