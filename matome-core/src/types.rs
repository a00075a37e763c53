//! Subscription state, request descriptors, and aggregation results.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::service::ServiceName;

/// Per-user configuration for one service.
///
/// Stored state is only ever mutated through [`SubscriptionUpdate`]s, never
/// replaced wholesale, so individual fields are last-write-wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Stable identity of the subscription.
    pub service: ServiceName,
    /// Optional credential; its placement is dictated by the service's
    /// endpoint template.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Ordered free-form keys (ken2 reads its zipcode from `keys[0]`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<String>,
    /// Named query parameters.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,
}

impl Subscription {
    /// Empty subscription for a service.
    #[must_use]
    pub fn new(service: ServiceName) -> Self {
        Self {
            service,
            token: None,
            keys: Vec::new(),
            params: BTreeMap::new(),
        }
    }

    /// Builder-style token setter, used mostly by tests and examples.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Builder-style keys setter.
    #[must_use]
    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style single-param setter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }
}

/// A field-level partial update to one service's subscription.
///
/// Mirrors the modify form: each request may set the token, replace the key
/// list, and/or upsert a single named parameter. Absent fields are left
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubscriptionUpdate {
    /// New token, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Replacement key list, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<String>>,
    /// Single parameter upsert, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<(String, String)>,
}

/// Ordered set of a user's subscriptions, one per service.
///
/// Insertion order is preserved; it determines the serial execution order of
/// TLS legs during aggregation. Serializes as a JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionSet {
    entries: Vec<Subscription>,
}

impl SubscriptionSet {
    /// Empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of subscribed services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no services are subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Subscriptions in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[Subscription] {
        &self.entries
    }

    /// Look up one service's subscription.
    #[must_use]
    pub fn get(&self, service: ServiceName) -> Option<&Subscription> {
        self.entries.iter().find(|s| s.service == service)
    }

    /// Get-or-insert the entry for a service, preserving insertion order.
    pub fn entry(&mut self, service: ServiceName) -> &mut Subscription {
        if let Some(i) = self.entries.iter().position(|s| s.service == service) {
            return &mut self.entries[i];
        }
        self.entries.push(Subscription::new(service));
        let last = self.entries.len() - 1;
        &mut self.entries[last]
    }

    /// Apply a field-level update to one service, last-write-wins per field.
    pub fn apply(&mut self, service: ServiceName, update: SubscriptionUpdate) {
        let sub = self.entry(service);
        if let Some(token) = update.token {
            sub.token = Some(token);
        }
        if let Some(keys) = update.keys {
            sub.keys = keys;
        }
        if let Some((name, value)) = update.param {
            sub.params.insert(name, value);
        }
    }
}

impl From<Vec<Subscription>> for SubscriptionSet {
    fn from(entries: Vec<Subscription>) -> Self {
        Self { entries }
    }
}

impl<'a> IntoIterator for &'a SubscriptionSet {
    type Item = &'a Subscription;
    type IntoIter = std::slice::Iter<'a, Subscription>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Fully resolved, side-effect-free description of one outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// Fully-qualified request URI (without query string).
    pub uri: String,
    /// Query parameters, including any token placed by the auth rule.
    pub query: BTreeMap<String, String>,
    /// Request headers, including any token placed by the auth rule.
    pub headers: BTreeMap<String, String>,
}

/// One aggregated result: the service it came from plus its JSON payload.
///
/// Consumers must key off `service`, not array position; aggregation output
/// order is not guaranteed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceItem {
    /// Originating service.
    pub service: ServiceName,
    /// Decoded upstream payload.
    pub data: Value,
}

/// Global configuration for the aggregation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatomeConfig {
    /// Maximum concurrent plain-transport fetches.
    pub pool_size: usize,
    /// Per-leg timeout covering the cache round trip and the network fetch.
    pub leg_timeout: Duration,
    /// Staleness threshold for cached tenki payloads.
    pub tenki_staleness: Duration,
}

impl Default for MatomeConfig {
    fn default() -> Self {
        Self {
            pool_size: 5,
            leg_timeout: Duration::from_secs(5),
            tenki_staleness: Duration::from_secs(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updates_accumulate_per_field() {
        let mut set = SubscriptionSet::new();
        set.apply(
            ServiceName::Tenki,
            SubscriptionUpdate {
                token: Some("1000001".into()),
                ..Default::default()
            },
        );
        set.apply(
            ServiceName::Tenki,
            SubscriptionUpdate {
                param: Some(("lang".into(), "ja".into())),
                ..Default::default()
            },
        );

        let sub = set.get(ServiceName::Tenki).unwrap();
        assert_eq!(sub.token.as_deref(), Some("1000001"));
        assert_eq!(sub.params.get("lang").map(String::as_str), Some("ja"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn last_write_wins_per_field() {
        let mut set = SubscriptionSet::new();
        set.apply(
            ServiceName::Surname,
            SubscriptionUpdate {
                param: Some(("q".into(), "sato".into())),
                ..Default::default()
            },
        );
        set.apply(
            ServiceName::Surname,
            SubscriptionUpdate {
                param: Some(("q".into(), "suzuki".into())),
                ..Default::default()
            },
        );
        let sub = set.get(ServiceName::Surname).unwrap();
        assert_eq!(sub.params.get("q").map(String::as_str), Some("suzuki"));
    }

    #[test]
    fn insertion_order_survives_serde() {
        let mut set = SubscriptionSet::new();
        set.apply(ServiceName::Perfectsec, SubscriptionUpdate::default());
        set.apply(ServiceName::Ken2, SubscriptionUpdate::default());

        let json = serde_json::to_string(&set).unwrap();
        let back: SubscriptionSet = serde_json::from_str(&json).unwrap();
        let order: Vec<ServiceName> = back.as_slice().iter().map(|s| s.service).collect();
        assert_eq!(order, vec![ServiceName::Perfectsec, ServiceName::Ken2]);
    }
}
