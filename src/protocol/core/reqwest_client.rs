//! Reqwest-based implementation of the `PortalHttpClient` trait.
//!
//! One `reqwest::Client` is built per walk with the identity headers as
//! defaults and a cookie store, so it behaves like a single browser session.
//! Gzip and deflate bodies are decoded before they reach the steps.

use std::time::Duration;

use async_trait::async_trait;
use http::HeaderMap;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use url::Url;

use super::{PortalHttpClient, PortalHttpClientError, PortalHttpResponse};

/// Reqwest-backed HTTP session.
pub struct ReqwestPortalClient {
    client: Client,
}

impl ReqwestPortalClient {
    /// Build a session sending `headers` with every request.
    pub fn new(headers: HeaderMap) -> Result<Self, PortalHttpClientError> {
        let client = Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .build()
            .map_err(|err| PortalHttpClientError::Transport(err.to_string()))?;

        Ok(Self { client })
    }

    async fn execute(
        &self,
        builder: RequestBuilder,
        timeout: Duration,
    ) -> Result<PortalHttpResponse, PortalHttpClientError> {
        let response = builder
            .timeout(timeout)
            .send()
            .await
            .map_err(|err| map_error(err, timeout))?;

        let status = response.status().as_u16();
        let url = response.url().clone();
        let body = response
            .bytes()
            .await
            .map_err(|err| map_error(err, timeout))?
            .to_vec();

        Ok(PortalHttpResponse { status, body, url })
    }
}

#[async_trait]
impl PortalHttpClient for ReqwestPortalClient {
    async fn get(
        &self,
        url: &Url,
        timeout: Duration,
    ) -> Result<PortalHttpResponse, PortalHttpClientError> {
        log::debug!("-> GET {url}");
        self.execute(self.client.get(url.as_str()), timeout).await
    }

    async fn post_json(
        &self,
        url: &Url,
        body: &Value,
        timeout: Duration,
    ) -> Result<PortalHttpResponse, PortalHttpClientError> {
        log::debug!("-> POST {url}");
        self.execute(self.client.post(url.as_str()).json(body), timeout)
            .await
    }
}

fn map_error(err: reqwest::Error, timeout: Duration) -> PortalHttpClientError {
    if err.is_timeout() {
        PortalHttpClientError::Timeout(timeout)
    } else {
        PortalHttpClientError::Transport(err.to_string())
    }
}
