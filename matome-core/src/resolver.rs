//! Pure resolution of subscriptions into outbound request descriptors.
//!
//! Resolution is a function of the static endpoint table plus the stored
//! subscription only; it performs no I/O and always yields the same
//! descriptor for the same inputs.

use crate::service::{AuthPlacement, ServiceName};
use crate::types::{RequestDescriptor, Subscription};

/// Resolve one subscription into a concrete request descriptor.
///
/// - `params` seed the query map.
/// - ken2's zipcode comes from `keys[0]` when present, overwriting any
///   `zipcode` param.
/// - The token is then placed per the endpoint's auth rule; for tenki this
///   means the token lands in the `zipcode` query parameter, overwriting a
///   same-named param (the param acts as a fallback when no token is set).
#[must_use]
pub fn resolve(sub: &Subscription) -> RequestDescriptor {
    let endpoint = sub.service.endpoint();

    let mut query = sub.params.clone();
    if sub.service == ServiceName::Ken2
        && let Some(zipcode) = sub.keys.first()
    {
        query.insert("zipcode".to_string(), zipcode.clone());
    }

    let mut headers = std::collections::BTreeMap::new();
    if let Some(token) = &sub.token {
        match endpoint.auth {
            AuthPlacement::Header(name) => {
                headers.insert(name.to_string(), token.clone());
            }
            AuthPlacement::QueryParam(name) => {
                query.insert(name.to_string(), token.clone());
            }
            AuthPlacement::None => {}
        }
    }

    RequestDescriptor {
        uri: endpoint.uri.to_string(),
        query,
        headers,
    }
}

/// The query value that distinguishes cache entries within a service's
/// namespace, if the service is cacheable at all.
///
/// The perfectsec pair has no discriminator; its responses are per-token and
/// never cached.
#[must_use]
pub fn discriminator(service: ServiceName, descriptor: &RequestDescriptor) -> Option<&str> {
    let field = match service {
        ServiceName::Ken2 | ServiceName::Tenki => "zipcode",
        ServiceName::Surname | ServiceName::Givenname => "q",
        ServiceName::Perfectsec | ServiceName::PerfectsecAttacked => return None,
    };
    descriptor.query.get(field).map(String::as_str)
}
