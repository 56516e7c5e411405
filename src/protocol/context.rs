//! Session context threaded through the step pipeline.
//!
//! Fields issued by the portal's init call are kept verbatim in a JSON map and
//! read through typed accessors that fail fast when a key is absent or has
//! the wrong shape. Values computed by the client live in typed slots.

use bigdecimal::BigDecimal;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::protocol::identity::DeviceFingerprint;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("context key '{0}' has not been set by an earlier step")]
    MissingKey(String),
    #[error("context key '{key}' is not {expected}")]
    WrongType { key: String, expected: &'static str },
}

/// Accumulated state for one walk.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    issued: Map<String, Value>,
    math_proof: Option<u64>,
    fingerprint: Option<DeviceFingerprint>,
    v_token: Option<String>,
    seq_proof: Option<BigDecimal>,
    hash_proof: Option<String>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge server-issued fields, overwriting keys that already exist.
    pub fn merge_issued(&mut self, fields: Map<String, Value>) {
        self.issued.extend(fields);
    }

    pub fn issued(&self) -> &Map<String, Value> {
        &self.issued
    }

    pub fn contains(&self, key: &str) -> bool {
        self.issued.contains_key(key)
    }

    pub fn session_id(&self) -> Option<&str> {
        self.issued.get("session_id").and_then(Value::as_str)
    }

    pub fn require(&self, key: &str) -> Result<&Value, ContextError> {
        self.issued
            .get(key)
            .ok_or_else(|| ContextError::MissingKey(key.to_string()))
    }

    pub fn require_str(&self, key: &str) -> Result<&str, ContextError> {
        self.require(key)?
            .as_str()
            .ok_or_else(|| wrong_type(key, "a string"))
    }

    pub fn require_u64(&self, key: &str) -> Result<u64, ContextError> {
        self.require(key)?
            .as_u64()
            .ok_or_else(|| wrong_type(key, "a non-negative integer"))
    }

    /// Read an array whose every element is a string.
    pub fn require_str_array(&self, key: &str) -> Result<Vec<&str>, ContextError> {
        let items = self
            .require(key)?
            .as_array()
            .ok_or_else(|| wrong_type(key, "an array"))?;
        items
            .iter()
            .map(|item| item.as_str().ok_or_else(|| wrong_type(key, "an array of strings")))
            .collect()
    }

    pub fn math_proof(&self) -> Option<u64> {
        self.math_proof
    }

    pub fn require_math_proof(&self) -> Result<u64, ContextError> {
        self.math_proof
            .ok_or_else(|| ContextError::MissingKey("math_proof".into()))
    }

    pub fn set_math_proof(&mut self, proof: u64) {
        self.math_proof = Some(proof);
    }

    pub fn fingerprint(&self) -> Option<&DeviceFingerprint> {
        self.fingerprint.as_ref()
    }

    pub fn require_fingerprint(&self) -> Result<&DeviceFingerprint, ContextError> {
        self.fingerprint
            .as_ref()
            .ok_or_else(|| ContextError::MissingKey("fingerprint".into()))
    }

    pub fn set_fingerprint(&mut self, fingerprint: DeviceFingerprint) {
        self.fingerprint = Some(fingerprint);
    }

    /// Verification token returned by the device check; empty if the portal
    /// omitted it.
    pub fn v_token(&self) -> Option<&str> {
        self.v_token.as_deref()
    }

    pub fn set_v_token(&mut self, token: String) {
        self.v_token = Some(token);
    }

    pub fn seq_proof(&self) -> Option<&BigDecimal> {
        self.seq_proof.as_ref()
    }

    pub fn set_seq_proof(&mut self, proof: BigDecimal) {
        self.seq_proof = Some(proof);
    }

    pub fn hash_proof(&self) -> Option<&str> {
        self.hash_proof.as_deref()
    }

    pub fn set_hash_proof(&mut self, proof: String) {
        self.hash_proof = Some(proof);
    }
}

fn wrong_type(key: &str, expected: &'static str) -> ContextError {
    ContextError::WrongType {
        key: key.to_string(),
        expected,
    }
}
