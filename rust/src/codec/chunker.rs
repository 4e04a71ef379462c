//! Deterministic payload splitting. Every fragment but the last holds exactly
//! `ceil(len / n)` characters and the last one takes the remainder, so the
//! final QR code is the only one that may carry less data.

use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChunkError {
    #[error("fragment count must be >= 1")]
    ZeroFragments,
    #[error("payload is empty; nothing to split")]
    EmptyPayload,
}

/// Splits `payload` into at most `n` ordered fragments.
///
/// `n == 0` yields no fragments at all. When `n` exceeds the payload length it
/// is clamped to one fragment per character. If front-loaded sizing fills the
/// payload before `n` fragments are produced, fewer fragments are returned
/// rather than empty ones.
pub fn split(payload: &str, n: usize) -> Vec<String> {
    let chars: Vec<char> = payload.chars().collect();
    if n == 0 || chars.is_empty() {
        return Vec::new();
    }

    let n = n.min(chars.len());
    let part_len = chars.len().div_ceil(n);

    chars
        .chunks(part_len)
        .map(|part| part.iter().collect())
        .collect()
}

/// Like [`split`], but refuses inputs that would silently drop data.
pub fn split_checked(payload: &str, n: usize) -> Result<Vec<String>, ChunkError> {
    if n == 0 {
        return Err(ChunkError::ZeroFragments);
    }
    if payload.is_empty() {
        return Err(ChunkError::EmptyPayload);
    }

    let fragments = split(payload, n);
    if fragments.len() != n {
        warn!(
            requested = n,
            produced = fragments.len(),
            payload_len = payload.len(),
            "payload does not fill the requested number of fragments"
        );
    }
    Ok(fragments)
}

/// Concatenates fragments in the order given. No separator is inserted.
pub fn join<S: AsRef<str>>(fragments: &[S]) -> String {
    fragments.iter().map(AsRef::as_ref).collect()
}
