use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::error::MatomeError;

/// The closed set of upstream services the engine can aggregate.
///
/// Wire names are the lowercase strings used in stored subscription state
/// (`"ken2"`, `"surname"`, ... `"perfectsec_attacked"`). The legacy name
/// `"ken"` still parses as [`ServiceName::Ken2`] so pre-migration
/// subscription sets keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ServiceName {
    /// Zipcode -> address lookup.
    Ken2,
    /// Surname search.
    Surname,
    /// Given-name search.
    Givenname,
    /// Weather by zipcode; the one service with active cache expiry.
    Tenki,
    /// Token listing behind the TLS security API.
    Perfectsec,
    /// Attacked-token listing behind the TLS security API.
    PerfectsecAttacked,
}

/// Where a subscription's token is placed on the outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPlacement {
    /// The service takes no authentication; any stored token is ignored.
    None,
    /// Token goes into the named request header.
    Header(&'static str),
    /// Token goes into the named query parameter.
    QueryParam(&'static str),
}

/// Transport class of a service's base URI.
///
/// Used purely as the concurrency-classification key: TLS endpoints are
/// rate-limited by the remote party and must be called serially.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// Unencrypted HTTP; eligible for the bounded worker pool.
    Plain,
    /// HTTPS; legs execute serially, never concurrently with each other.
    Tls,
}

/// Static outbound template for one service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Fully-qualified base URI.
    pub uri: &'static str,
    /// Transport classification.
    pub transport: Transport,
    /// Token placement rule.
    pub auth: AuthPlacement,
}

impl ServiceName {
    /// All supported services, in canonical order.
    pub const ALL: [Self; 6] = [
        Self::Ken2,
        Self::Surname,
        Self::Givenname,
        Self::Tenki,
        Self::Perfectsec,
        Self::PerfectsecAttacked,
    ];

    /// Canonical wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ken2 => "ken2",
            Self::Surname => "surname",
            Self::Givenname => "givenname",
            Self::Tenki => "tenki",
            Self::Perfectsec => "perfectsec",
            Self::PerfectsecAttacked => "perfectsec_attacked",
        }
    }

    /// Static endpoint template for this service.
    #[must_use]
    pub const fn endpoint(self) -> Endpoint {
        match self {
            Self::Ken2 => Endpoint {
                uri: "http://api.five-final.isucon.net:8080/",
                transport: Transport::Plain,
                auth: AuthPlacement::None,
            },
            Self::Surname => Endpoint {
                uri: "http://api.five-final.isucon.net:8081/surname",
                transport: Transport::Plain,
                auth: AuthPlacement::None,
            },
            Self::Givenname => Endpoint {
                uri: "http://api.five-final.isucon.net:8081/givenname",
                transport: Transport::Plain,
                auth: AuthPlacement::None,
            },
            Self::Tenki => Endpoint {
                uri: "http://api.five-final.isucon.net:8988/",
                transport: Transport::Plain,
                auth: AuthPlacement::QueryParam("zipcode"),
            },
            Self::Perfectsec => Endpoint {
                uri: "https://api.five-final.isucon.net:8443/tokens",
                transport: Transport::Tls,
                auth: AuthPlacement::Header("X-PERFECT-SECURITY-TOKEN"),
            },
            Self::PerfectsecAttacked => Endpoint {
                uri: "https://api.five-final.isucon.net:8443/attacked_list",
                transport: Transport::Tls,
                auth: AuthPlacement::Header("X-PERFECT-SECURITY-TOKEN"),
            },
        }
    }

    /// Transport classification shortcut.
    #[must_use]
    pub const fn transport(self) -> Transport {
        self.endpoint().transport
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceName {
    type Err = MatomeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            // "ken" predates the ken2 migration; old sets still carry it.
            "ken" | "ken2" => Ok(Self::Ken2),
            "surname" => Ok(Self::Surname),
            "givenname" => Ok(Self::Givenname),
            "tenki" => Ok(Self::Tenki),
            "perfectsec" => Ok(Self::Perfectsec),
            "perfectsec_attacked" => Ok(Self::PerfectsecAttacked),
            other => Err(MatomeError::unknown_service(other)),
        }
    }
}

impl Serialize for ServiceName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ServiceName {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        for svc in ServiceName::ALL {
            assert_eq!(svc.as_str().parse::<ServiceName>().unwrap(), svc);
        }
    }

    #[test]
    fn legacy_ken_parses_as_ken2() {
        assert_eq!("ken".parse::<ServiceName>().unwrap(), ServiceName::Ken2);
    }

    #[test]
    fn unknown_name_is_a_hard_error() {
        let err = "kenban".parse::<ServiceName>().unwrap_err();
        assert!(matches!(err, MatomeError::UnknownService { name } if name == "kenban"));
    }

    #[test]
    fn tls_classification_matches_scheme() {
        for svc in ServiceName::ALL {
            let ep = svc.endpoint();
            let expect = if ep.uri.starts_with("https://") {
                Transport::Tls
            } else {
                Transport::Plain
            };
            assert_eq!(ep.transport, expect, "{svc}");
        }
    }
}
