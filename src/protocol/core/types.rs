//! Response representation returned by the transport abstraction.

use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

/// Fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct PortalHttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub url: Url,
}

#[derive(Debug, Error)]
pub enum ResponseBodyError {
    #[error("response body is not valid json: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("response body is json but not an object")]
    NotAnObject,
}

impl PortalHttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>, url: Url) -> Self {
        Self {
            status,
            body: body.into(),
            url,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse the body as a JSON object. A blank body yields `None`.
    pub fn json_object(&self) -> Result<Option<Map<String, Value>>, ResponseBodyError> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        match serde_json::from_slice::<Value>(&self.body)? {
            Value::Object(map) => Ok(Some(map)),
            _ => Err(ResponseBodyError::NotAnObject),
        }
    }

    /// Human readable reason attached to an error response.
    ///
    /// Prefers the `detail` field of a JSON body, then the raw text.
    pub fn error_detail(&self) -> String {
        if let Ok(Some(map)) = self.json_object()
            && let Some(detail) = map.get("detail")
        {
            return match detail {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
        }

        let text = self.text();
        if text.trim().is_empty() {
            "Unknown".to_string()
        } else {
            text
        }
    }
}
