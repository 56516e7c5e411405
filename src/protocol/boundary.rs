//! Analysis of the encrypted security verification the walk cannot pass.
//!
//! `POST /api/v1/security_verify` expects a payload encrypted in the browser
//! with CryptoJS. The parameters below were read from the portal's scripts;
//! they are reported when the walk halts, never used to encrypt anything.

use std::fmt;

use crate::protocol::endpoints::Endpoint;

/// What blocks an endpoint and what was learned about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CryptoBoundary {
    pub endpoint: Endpoint,
    /// Key passphrase as it appears in the page script.
    pub key_text: &'static str,
    pub iv_text: &'static str,
    pub algorithm: &'static str,
    pub key_encoding: &'static str,
    pub output_encoding: &'static str,
    /// Ways a byte-level port diverges from the CryptoJS output.
    pub divergences: &'static [&'static str],
    /// Key/IV derivations already tried against the server.
    pub attempted: &'static [&'static str],
    /// Routes that would get past the boundary, none of them plain HTTP.
    pub requirements: &'static [&'static str],
}

pub const SECURITY_VERIFY_BOUNDARY: CryptoBoundary = CryptoBoundary {
    endpoint: Endpoint::SECURITY_VERIFY,
    key_text: "fdhdfsjhdf(9999dfhfdshjddhfdh5",
    iv_text: "topest_IV",
    algorithm: "AES-CBC with PKCS7 padding",
    key_encoding: "CryptoJS.enc.Utf8.parse() -> WordArray",
    output_encoding: "base64 ciphertext",
    divergences: &[
        "a WordArray carries word/sigBytes structure that raw key bytes lack",
        "CryptoJS sizes short keys and IVs differently from standard AES libraries",
        "JSON.stringify() output may not match the client's serialisation",
        "the base64 framing of the ciphertext may differ",
    ],
    attempted: &[
        "16-byte key with null padding",
        "32-byte key with null padding",
        "various key substring lengths",
        "different IV padding approaches",
    ],
    requirements: &[
        "run the page JavaScript in a JS engine",
        "drive a real browser",
        "reimplement the CryptoJS WordArray encoding exactly",
    ],
};

impl CryptoBoundary {
    pub fn key_chars(&self) -> usize {
        self.key_text.chars().count()
    }

    pub fn iv_chars(&self) -> usize {
        self.iv_text.chars().count()
    }

    /// Multi-line report printed when the walk halts here.
    pub fn render(&self) -> String {
        let mut lines = vec![
            format!("  {} requires an encrypted payload", self.endpoint),
            String::new(),
            "  TECHNICAL ANALYSIS:".to_string(),
            format!(
                "  Key (from JS):  \"{}\" ({} chars)",
                self.key_text,
                self.key_chars()
            ),
            format!(
                "  IV (from JS):   \"{}\" ({} chars)",
                self.iv_text,
                self.iv_chars()
            ),
            format!("  Algorithm:      {}", self.algorithm),
            format!("  Encoding:       {}", self.key_encoding),
            format!("  Output:         {}", self.output_encoding),
            String::new(),
            "  WHY A BYTE-LEVEL PORT DIVERGES:".to_string(),
        ];
        lines.extend(
            self.divergences
                .iter()
                .enumerate()
                .map(|(index, reason)| format!("  {}. {reason}", index + 1)),
        );
        lines.push(String::new());
        lines.push("  TESTED COMBINATIONS (all rejected):".to_string());
        lines.extend(self.attempted.iter().map(|attempt| format!("  - {attempt}")));
        lines.push(String::new());
        lines.push("  TO COMPLETE WOULD REQUIRE ONE OF:".to_string());
        lines.extend(self.requirements.iter().map(|route| format!("  - {route}")));
        lines.join("\n")
    }
}

impl fmt::Display for CryptoBoundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} needs an encrypted payload ({}, key via {})",
            self.endpoint.path, self.algorithm, self.key_encoding
        )
    }
}
