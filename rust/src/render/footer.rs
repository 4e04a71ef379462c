//! Provenance text printed at the bottom of every page.

use crate::codec::tag::Digest;

/// Everything a footer needs besides the page number.
#[derive(Debug, Clone)]
pub struct FooterInfo {
    pub digest: Digest,
    pub fingerprint: String,
    pub version: String,
}

impl FooterInfo {
    pub fn new(digest: Digest, fingerprint: impl Into<String>) -> Self {
        Self {
            digest,
            fingerprint: fingerprint.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Footer lines for one page. Pages are numbered from 1.
    pub fn lines(&self, page: usize, pages: usize) -> Vec<String> {
        vec![
            format!("qrbak {}  key {}", self.version, self.fingerprint.to_uppercase()),
            format!("payload sha256 {}", self.digest),
            format!(
                "tag {}  page {page} of {pages}  scan codes left to right, top to bottom",
                self.digest.short()
            ),
        ]
    }
}
