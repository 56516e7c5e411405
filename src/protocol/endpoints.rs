//! Catalogue of the portal's API surface.
//!
//! Lists the endpoints the walk calls plus the ones behind the crypto
//! boundary, which are recorded for the summary but never requested.

use std::fmt;

use url::Url;

use crate::config::{ConfigError, PortalConfig};
use crate::protocol::steps::StepKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointMethod {
    Get,
    Post,
}

impl fmt::Display for EndpointMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointMethod::Get => f.write_str("GET"),
            EndpointMethod::Post => f.write_str("POST"),
        }
    }
}

/// Whether the client can reach an endpoint at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reachability {
    /// Called by the given step.
    CalledBy(StepKind),
    /// Needs the output of the encrypted security verification.
    Blocked(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    pub method: EndpointMethod,
    pub path: &'static str,
    pub reachability: Reachability,
}

impl Endpoint {
    pub const TRACE: Endpoint = Endpoint::called(EndpointMethod::Post, "/api/v1/trace", StepKind::Trace);
    pub const INIT: Endpoint = Endpoint::called(EndpointMethod::Get, "/api/v1/init", StepKind::Init);
    pub const DEVICE_CHECK: Endpoint =
        Endpoint::called(EndpointMethod::Post, "/api/v1/device_check", StepKind::DeviceCheck);
    pub const HEARTBEAT: Endpoint = Endpoint::called(
        EndpointMethod::Get,
        "/api/v1/monitoring/heartbeat",
        StepKind::Heartbeat,
    );
    pub const SECURITY_VERIFY: Endpoint = Endpoint {
        method: EndpointMethod::Post,
        path: "/api/v1/security_verify",
        reachability: Reachability::Blocked("requires CryptoJS AES-CBC payload"),
    };
    pub const GEO_VALIDATE: Endpoint = Endpoint {
        method: EndpointMethod::Post,
        path: "/api/v1/geo_validate",
        reachability: Reachability::Blocked("depends on security_verify"),
    };
    pub const COMPLETE_REGISTRATION: Endpoint = Endpoint {
        method: EndpointMethod::Post,
        path: "/api/v1/complete_registration",
        reachability: Reachability::Blocked("depends on security_verify"),
    };

    /// Every endpoint in protocol order.
    pub const ALL: [Endpoint; 7] = [
        Endpoint::TRACE,
        Endpoint::INIT,
        Endpoint::DEVICE_CHECK,
        Endpoint::HEARTBEAT,
        Endpoint::SECURITY_VERIFY,
        Endpoint::GEO_VALIDATE,
        Endpoint::COMPLETE_REGISTRATION,
    ];

    const fn called(method: EndpointMethod, path: &'static str, step: StepKind) -> Endpoint {
        Endpoint {
            method,
            path,
            reachability: Reachability::CalledBy(step),
        }
    }

    pub fn url(&self, config: &PortalConfig) -> Result<Url, ConfigError> {
        config.endpoint_url(self.path)
    }

    pub fn step(&self) -> Option<StepKind> {
        match self.reachability {
            Reachability::CalledBy(step) => Some(step),
            Reachability::Blocked(_) => None,
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self.reachability, Reachability::Blocked(_))
    }

    pub fn reachable() -> impl Iterator<Item = Endpoint> {
        Endpoint::ALL.into_iter().filter(|endpoint| !endpoint.is_blocked())
    }

    pub fn blocked() -> impl Iterator<Item = Endpoint> {
        Endpoint::ALL.into_iter().filter(Endpoint::is_blocked)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<4} {}", self.method.to_string(), self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_reachable_three_blocked() {
        assert_eq!(Endpoint::reachable().count(), 4);
        let blocked: Vec<_> = Endpoint::blocked().map(|e| e.path).collect();
        assert_eq!(
            blocked,
            vec![
                "/api/v1/security_verify",
                "/api/v1/geo_validate",
                "/api/v1/complete_registration"
            ]
        );
    }

    #[test]
    fn display_aligns_methods() {
        assert_eq!(Endpoint::INIT.to_string(), "GET  /api/v1/init");
        assert_eq!(Endpoint::TRACE.to_string(), "POST /api/v1/trace");
    }

    #[test]
    fn resolves_against_configured_host() {
        let config = PortalConfig::builder()
            .with_base_url("http://127.0.0.1:8080")
            .build()
            .unwrap();
        assert_eq!(
            Endpoint::HEARTBEAT.url(&config).unwrap().as_str(),
            "http://127.0.0.1:8080/api/v1/monitoring/heartbeat"
        );
        assert_eq!(Endpoint::DEVICE_CHECK.step(), Some(StepKind::DeviceCheck));
        assert_eq!(Endpoint::GEO_VALIDATE.step(), None);
    }
}
