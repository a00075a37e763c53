//! Subscription-set persistence over the shared key/value backend.
//!
//! Unlike response-cache entries, subscription sets are authoritative state:
//! store and decode failures surface to the caller instead of degrading to
//! a miss.

use matome_core::{
    MatomeError, ServiceName, Subscription, SubscriptionSet, SubscriptionUpdate,
};
use serde_json::Value;

use crate::Matome;

/// Storage key for a user's subscription set.
#[must_use]
pub fn subscriptions_key(user_id: i64) -> String {
    format!("subscriptions:{user_id}")
}

/// Decode a stored subscription set, distinguishing a corrupt service name
/// (`UnknownService`, the hard "subscription state is broken" signal) from
/// structurally invalid bytes (`CacheDecode`).
fn decode_set(key: &str, bytes: &[u8]) -> Result<SubscriptionSet, MatomeError> {
    let raw: Vec<Value> =
        serde_json::from_slice(bytes).map_err(|e| MatomeError::cache_decode(key, e.to_string()))?;

    let mut entries = Vec::with_capacity(raw.len());
    for item in raw {
        let name = item
            .get("service")
            .and_then(Value::as_str)
            .ok_or_else(|| MatomeError::cache_decode(key, "entry missing service"))?;
        let _service: ServiceName = name.parse()?;
        let sub: Subscription = serde_json::from_value(item)
            .map_err(|e| MatomeError::cache_decode(key, e.to_string()))?;
        entries.push(sub);
    }
    Ok(entries.into())
}

impl Matome {
    /// Load a user's subscription set.
    ///
    /// # Errors
    /// `NotFound` when no set is stored for the user; `UnknownService` when
    /// an entry names a service outside the supported set; `CacheDecode`
    /// when the stored bytes are otherwise invalid (corrupt state is not
    /// papered over).
    pub async fn fetch_subscriptions(
        &self,
        user_id: i64,
    ) -> Result<SubscriptionSet, MatomeError> {
        let key = subscriptions_key(user_id);
        let bytes = self
            .store
            .get(&key)
            .await?
            .ok_or_else(|| MatomeError::not_found(format!("subscription set for user {user_id}")))?;
        decode_set(&key, &bytes)
    }

    /// Store a user's subscription set, replacing any previous value.
    ///
    /// # Errors
    /// Propagates backend write failures.
    pub async fn put_subscriptions(
        &self,
        user_id: i64,
        set: &SubscriptionSet,
    ) -> Result<(), MatomeError> {
        let bytes = serde_json::to_vec(set)
            .map_err(|e| MatomeError::InvalidArg(format!("unencodable subscription set: {e}")))?;
        self.store.set(&subscriptions_key(user_id), &bytes).await
    }

    /// Apply a field-level update to one service's subscription and persist
    /// the result (read-modify-write, last-write-wins per field).
    ///
    /// A user with no stored set starts from an empty one, so the first
    /// modification creates it.
    ///
    /// # Errors
    /// Propagates decode failures of existing state and backend I/O errors.
    pub async fn modify_subscription(
        &self,
        user_id: i64,
        service: ServiceName,
        update: SubscriptionUpdate,
    ) -> Result<SubscriptionSet, MatomeError> {
        let mut set = match self.fetch_subscriptions(user_id).await {
            Ok(set) => set,
            Err(MatomeError::NotFound { .. }) => SubscriptionSet::new(),
            Err(e) => return Err(e),
        };
        set.apply(service, update);
        self.put_subscriptions(user_id, &set).await?;
        Ok(set)
    }
}
