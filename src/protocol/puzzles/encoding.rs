//! Base64-wrapped decimal integers.
//!
//! The portal encodes puzzle inputs as standard base64 of the decimal text,
//! e.g. `"NDI="` for `42`. Values are not bounded to a machine word.

use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bigdecimal::BigDecimal;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("'{value}' is not valid base64: {reason}")]
    Base64 { value: String, reason: String },
    #[error("'{value}' does not decode to utf-8 text")]
    Utf8 { value: String },
    #[error("'{value}' decodes to '{text}', which is not an integer in range")]
    NotAnInteger { value: String, text: String },
}

/// Decode a non-negative integer of any length, returning its decimal
/// digits with an optional leading `+` removed.
///
/// Surrounding whitespace in the decoded text is ignored.
pub fn decode_b64_digits(value: &str) -> Result<String, DecodeError> {
    let text = decode_b64_text(value)?;
    let digits = text.strip_prefix('+').unwrap_or(&text);
    if is_decimal(digits) {
        Ok(digits.to_string())
    } else {
        Err(not_an_integer(value, text))
    }
}

/// Decode a signed integer of any length.
pub fn decode_b64_bigint(value: &str) -> Result<BigDecimal, DecodeError> {
    let text = decode_b64_text(value)?;
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(&text)),
    };
    if !is_decimal(digits) {
        return Err(not_an_integer(value, text));
    }

    let literal = if negative {
        format!("-{digits}")
    } else {
        digits.to_string()
    };
    BigDecimal::from_str(&literal).map_err(|_| not_an_integer(value, text))
}

fn decode_b64_text(value: &str) -> Result<String, DecodeError> {
    let bytes = STANDARD
        .decode(value.trim())
        .map_err(|err| DecodeError::Base64 {
            value: value.to_string(),
            reason: err.to_string(),
        })?;

    let text = String::from_utf8(bytes).map_err(|_| DecodeError::Utf8 {
        value: value.to_string(),
    })?;
    Ok(text.trim().to_string())
}

fn is_decimal(digits: &str) -> bool {
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn not_an_integer(value: &str, text: String) -> DecodeError {
    DecodeError::NotAnInteger {
        value: value.to_string(),
        text,
    }
}
