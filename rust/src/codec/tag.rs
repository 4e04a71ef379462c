//! Verification tag for the whole payload. The digest is computed once before
//! splitting and printed on every page; after re-scanning, recomputing it over
//! the joined fragments tells the operator whether anything was misread,
//! dropped or reordered. It cannot say which fragment is wrong.

use std::fmt;

use sha2::{Digest as _, Sha256};
use thiserror::Error;

/// Number of hex characters in the short printable form.
pub const SHORT_HEX_LEN: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TagError {
    #[error("digest is not valid hex: {0}")]
    MalformedHex(String),
    #[error("digest prefix too short; need at least {min} hex characters, got {got}")]
    TooShort { min: usize, got: usize },
    #[error("digest mismatch: expected {expected}, reconstructed payload hashes to {actual}")]
    Mismatch { expected: String, actual: String },
}

/// SHA-256 of a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; 32]);

impl Digest {
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Leading hex characters, short enough for a page footer or a code label.
    pub fn short(&self) -> String {
        let mut hex = self.to_hex();
        hex.truncate(SHORT_HEX_LEN);
        hex
    }

    pub fn from_hex(value: &str) -> Result<Self, TagError> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(value.trim(), &mut bytes)
            .map_err(|e| TagError::MalformedHex(format!("{e}")))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Hashes the full payload bytes.
pub fn digest(payload: &str) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    Digest(hasher.finalize().into())
}

/// Compares a recomputed digest with the one printed on the pages.
pub fn verify(actual: &Digest, expected: &Digest) -> Result<(), TagError> {
    if actual == expected {
        return Ok(());
    }
    Err(TagError::Mismatch {
        expected: expected.to_hex(),
        actual: actual.to_hex(),
    })
}

/// Accepts either the full hex digest or its short form, case-insensitively.
pub fn verify_hex(actual: &Digest, expected: &str) -> Result<(), TagError> {
    let expected = expected.trim().to_ascii_lowercase();
    if !expected.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(TagError::MalformedHex(expected));
    }
    if expected.len() == 64 {
        return verify(actual, &Digest::from_hex(&expected)?);
    }
    if expected.len() < SHORT_HEX_LEN {
        return Err(TagError::TooShort {
            min: SHORT_HEX_LEN,
            got: expected.len(),
        });
    }

    let actual_hex = actual.to_hex();
    if actual_hex.starts_with(&expected) {
        Ok(())
    } else {
        Err(TagError::Mismatch {
            expected,
            actual: actual_hex,
        })
    }
}
