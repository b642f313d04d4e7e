//! Transient media resources.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Opaque handle for a buffered blob, valid until revoked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A blob the media backend can open.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaResource {
    pub url: ObjectUrl,
    /// Where the buffered bytes can be read from while the URL is live.
    pub location: PathBuf,
    pub mime_type: String,
    pub size: u64,
}

/// Acquisition counters, used to prove every resource was released.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlobStats {
    pub acquired: u64,
    pub revoked: u64,
}

impl BlobStats {
    /// Resources created but not yet revoked.
    pub fn live(&self) -> u64 {
        self.acquired.saturating_sub(self.revoked)
    }
}

/// Creates and revokes transient blob resources.
pub trait BlobStore: Send + Sync {
    /// Buffers `bytes` and returns a live resource for them.
    fn create(&self, bytes: &[u8], mime_type: &str) -> Result<MediaResource>;

    /// Releases the resource behind `url`.
    ///
    /// Revoking an unknown or already revoked URL is a no-op and is not counted.
    fn revoke(&self, url: &ObjectUrl);

    fn stats(&self) -> BlobStats;
}
