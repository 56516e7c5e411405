//! Run configuration.
//!
//! Provides a single [`PortalConfig`] assembled through a fluent builder:
//! - target host and derived origin/referer values
//! - browser identity headers and device profile
//! - demo account shown in the run banner
//! - per-request timeouts

use std::time::Duration;

use http::HeaderMap;
use thiserror::Error;
use url::Url;

use crate::protocol::identity::{ClientIdentity, DeviceProfile};

/// Host the portal is served from unless overridden.
pub const DEFAULT_BASE_URL: &str = "http://51.195.24.179:8000";

/// Timeout applied to requests whose payload the walk depends on.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout applied to telemetry/heartbeat probes.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid base url '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("base url '{0}' must use http or https")]
    UnsupportedScheme(String),
    #[error("invalid endpoint path '{path}': {source}")]
    InvalidEndpoint {
        path: String,
        source: url::ParseError,
    },
    #[error("invalid value for header '{0}'")]
    InvalidHeader(String),
    #[error("timeout for {0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Account the registration would eventually be completed for.
///
/// None of the reachable steps submit these values; they identify the run in
/// the console banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Default for DemoAccount {
    fn default() -> Self {
        Self {
            username: "testuser".into(),
            email: "test@test.com".into(),
            password: "test123".into(),
        }
    }
}

/// Immutable configuration for one walk.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    base_url: Url,
    pub identity: ClientIdentity,
    pub device: DeviceProfile,
    pub account: DemoAccount,
    pub request_timeout: Duration,
    pub probe_timeout: Duration,
}

impl PortalConfig {
    pub fn builder() -> PortalConfigBuilder {
        PortalConfigBuilder::new()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Scheme, host and port of the target, without a trailing slash.
    pub fn origin(&self) -> String {
        self.base_url.origin().ascii_serialization()
    }

    pub fn referer(&self) -> String {
        format!("{}/", self.origin())
    }

    /// Identity headers bound to this target's origin.
    pub fn session_headers(&self) -> Result<HeaderMap, ConfigError> {
        self.identity
            .session_headers(&self.origin(), &self.referer())
    }

    /// Resolve an absolute API path against the target host.
    pub fn endpoint_url(&self, path: &str) -> Result<Url, ConfigError> {
        self.base_url
            .join(path)
            .map_err(|source| ConfigError::InvalidEndpoint {
                path: path.to_string(),
                source,
            })
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            identity: ClientIdentity::default(),
            device: DeviceProfile::default(),
            account: DemoAccount::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

/// Fluent builder for [`PortalConfig`].
#[derive(Debug, Clone)]
pub struct PortalConfigBuilder {
    base_url: String,
    identity: ClientIdentity,
    device: DeviceProfile,
    account: DemoAccount,
    request_timeout: Duration,
    probe_timeout: Duration,
}

impl PortalConfigBuilder {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            identity: ClientIdentity::default(),
            device: DeviceProfile::default(),
            account: DemoAccount::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_identity(mut self, identity: ClientIdentity) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.identity.user_agent = user_agent.into();
        self
    }

    pub fn with_device_profile(mut self, device: DeviceProfile) -> Self {
        self.device = device;
        self
    }

    pub fn with_account(mut self, account: DemoAccount) -> Self {
        self.account = account;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn build(self) -> Result<PortalConfig, ConfigError> {
        let trimmed = self.base_url.trim();
        let base_url = Url::parse(trimmed).map_err(|source| ConfigError::InvalidBaseUrl {
            url: trimmed.to_string(),
            source,
        })?;

        if !matches!(base_url.scheme(), "http" | "https") || !base_url.has_host() {
            return Err(ConfigError::UnsupportedScheme(trimmed.to_string()));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("requests"));
        }
        if self.probe_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("probes"));
        }

        Ok(PortalConfig {
            base_url,
            identity: self.identity,
            device: self.device,
            account: self.account,
            request_timeout: self.request_timeout,
            probe_timeout: self.probe_timeout,
        })
    }
}

impl Default for PortalConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_targets_portal_host() {
        let config = PortalConfig::default();
        assert_eq!(config.origin(), "http://51.195.24.179:8000");
        assert_eq!(config.referer(), "http://51.195.24.179:8000/");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.probe_timeout, Duration::from_secs(5));
    }

    #[test]
    fn endpoint_urls_replace_base_path() {
        let config = PortalConfig::builder()
            .with_base_url("http://localhost:9000/portal/")
            .build()
            .unwrap();
        let url = config.endpoint_url("/api/v1/init").unwrap();
        assert_eq!(url.as_str(), "http://localhost:9000/api/v1/init");
        assert_eq!(config.origin(), "http://localhost:9000");
    }

    #[test]
    fn rejects_non_http_targets() {
        let err = PortalConfig::builder()
            .with_base_url("ftp://example.com")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedScheme(_)));

        let err = PortalConfig::builder()
            .with_base_url("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn rejects_zero_timeouts() {
        let err = PortalConfig::builder()
            .with_probe_timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::ZeroTimeout("probes")));
    }

    #[test]
    fn session_headers_follow_the_target() {
        let config = PortalConfig::builder()
            .with_base_url("https://portal.test:8443/app/")
            .build()
            .unwrap();
        let headers = config.session_headers().unwrap();
        assert_eq!(headers[http::header::ORIGIN], "https://portal.test:8443");
        assert_eq!(headers[http::header::REFERER], "https://portal.test:8443/");
    }
}
