use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use matome_core::ServiceName;

/// Per-service predicate deciding whether a cached payload is still usable.
///
/// Most services never expire: their entries are invalidated only by an
/// explicit overwrite. Tenki is the exception; its entries are rewritten by
/// an out-of-band refresher, so freshness is judged from the `date` field
/// embedded in the payload rather than from storage metadata.
#[derive(Debug, Clone)]
pub struct FreshnessPolicy {
    tenki_staleness: Duration,
}

impl FreshnessPolicy {
    /// Policy with the given tenki staleness threshold.
    #[must_use]
    pub const fn new(tenki_staleness: Duration) -> Self {
        Self { tenki_staleness }
    }

    /// True when the cached payload may be served without a network refresh.
    ///
    /// A tenki payload with a missing or malformed `date` is treated as
    /// stale (forcing a refetch), never as an error.
    #[must_use]
    pub fn is_fresh(&self, service: ServiceName, payload: &Value, now: DateTime<Utc>) -> bool {
        match service {
            ServiceName::Tenki => {
                let Some(date) = payload.get("date").and_then(Value::as_str) else {
                    return false;
                };
                let Some(stamp) = parse_stamp(date) else {
                    return false;
                };
                let age = now.signed_duration_since(stamp);
                age < chrono::Duration::from_std(self.tenki_staleness)
                    .unwrap_or_else(|_| chrono::Duration::MAX)
            }
            _ => true,
        }
    }
}

impl Default for FreshnessPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

/// The upstream emits either RFC 3339 or a zone-less `%F %H:%M:%S` stamp;
/// the latter is read as UTC.
fn parse_stamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}
