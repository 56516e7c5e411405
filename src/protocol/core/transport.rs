//! Contract that abstracts the HTTP session used by the pipeline.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use super::types::PortalHttpResponse;

/// HTTP session carrier.
///
/// Implementations attach the session's identity headers to every request
/// and keep cookies between calls so the portal sees one continuous client.
/// Non-2xx statuses are returned as responses, not errors.
#[async_trait]
pub trait PortalHttpClient: Send + Sync {
    async fn get(
        &self,
        url: &Url,
        timeout: Duration,
    ) -> Result<PortalHttpResponse, PortalHttpClientError>;

    async fn post_json(
        &self,
        url: &Url,
        body: &Value,
        timeout: Duration,
    ) -> Result<PortalHttpResponse, PortalHttpClientError>;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PortalHttpClientError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("http transport error: {0}")]
    Transport(String),
}
