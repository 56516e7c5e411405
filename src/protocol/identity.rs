//! Browser identity presented to the portal.
//!
//! The portal expects the headers of a desktop Chrome session plus a device
//! fingerprint (WebGL vendor/renderer and a canvas hash). Both are fixed per
//! run so every request describes the same client.

use http::header::{
    ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CONNECTION, CONTENT_TYPE, HeaderMap, HeaderName,
    HeaderValue, ORIGIN, REFERER, USER_AGENT,
};

use crate::config::ConfigError;
use crate::protocol::puzzles::sha256_hex;

/// Header set sent with every request of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIdentity {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub accept_encoding: String,
}

impl Default for ClientIdentity {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".into(),
            accept: "application/json, text/plain, */*".into(),
            accept_language: "en-US,en;q=0.9".into(),
            accept_encoding: "gzip, deflate".into(),
        }
    }
}

impl ClientIdentity {
    /// Build the default header map for a session targeting `origin`.
    pub fn session_headers(&self, origin: &str, referer: &str) -> Result<HeaderMap, ConfigError> {
        let mut headers = HeaderMap::new();
        insert(&mut headers, USER_AGENT, &self.user_agent)?;
        insert(&mut headers, ACCEPT, &self.accept)?;
        insert(&mut headers, ACCEPT_LANGUAGE, &self.accept_language)?;
        insert(&mut headers, ACCEPT_ENCODING, &self.accept_encoding)?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        insert(&mut headers, ORIGIN, origin)?;
        insert(&mut headers, REFERER, referer)?;
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        Ok(headers)
    }
}

fn insert(headers: &mut HeaderMap, name: HeaderName, value: &str) -> Result<(), ConfigError> {
    let header_value =
        HeaderValue::from_str(value).map_err(|_| ConfigError::InvalidHeader(name.to_string()))?;
    headers.insert(name, header_value);
    Ok(())
}

/// Inputs used to synthesise the device fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceProfile {
    pub webgl_vendor: String,
    pub webgl_renderer: String,
    /// Text hashed to stand in for the canvas rendering digest.
    pub canvas_seed: String,
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self {
            webgl_vendor: "Intel Inc.".into(),
            webgl_renderer: "Intel Iris OpenGL Engine".into(),
            canvas_seed: "canvas-fingerprint-seed".into(),
        }
    }
}

impl DeviceProfile {
    pub fn fingerprint(&self) -> DeviceFingerprint {
        DeviceFingerprint {
            webgl_vendor: self.webgl_vendor.clone(),
            webgl_renderer: self.webgl_renderer.clone(),
            canvas_fingerprint: sha256_hex(&self.canvas_seed),
        }
    }
}

/// Fingerprint fields submitted with the device check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceFingerprint {
    pub webgl_vendor: String,
    pub webgl_renderer: String,
    pub canvas_fingerprint: String,
}
