//! Temp-file backed blob store.
//!
//! Each blob is written to its own file in a private temp directory and is
//! addressed by a `blob:tunedeck/<uuid>` URL. Revoking the URL deletes the file.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tempfile::{TempDir, TempPath};
use tunedeck_core::media::{BlobStats, BlobStore, MediaResource, ObjectUrl};
use tunedeck_core::{Result, TunedeckError};
use uuid::Uuid;

/// [`BlobStore`] that buffers blobs as temp files.
///
/// Files still live when the store is dropped are removed with it.
pub struct TempFileBlobStore {
    dir: TempDir,
    live: Mutex<HashMap<ObjectUrl, TempPath>>,
    acquired: AtomicU64,
    revoked: AtomicU64,
}

impl TempFileBlobStore {
    /// Creates a store under the system temp directory.
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("tunedeck-blobs-").tempdir()?;
        Ok(Self::with_dir(dir))
    }

    /// Creates a store under `parent`.
    pub fn new_in(parent: &Path) -> Result<Self> {
        std::fs::create_dir_all(parent)?;
        let dir = tempfile::Builder::new()
            .prefix("tunedeck-blobs-")
            .tempdir_in(parent)?;
        Ok(Self::with_dir(dir))
    }

    fn with_dir(dir: TempDir) -> Self {
        Self {
            dir,
            live: Mutex::new(HashMap::new()),
            acquired: AtomicU64::new(0),
            revoked: AtomicU64::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }
}

/// File suffix for a content type, e.g. `.mp3` for `audio/mpeg`.
fn suffix_for(mime_type: &str) -> String {
    let essence = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    // mime_guess lists aliases alphabetically (m2a before mp3), so pin the common ones
    match essence.as_str() {
        "audio/mpeg" | "audio/mp3" => ".mp3".to_string(),
        "audio/wav" | "audio/x-wav" | "audio/wave" => ".wav".to_string(),
        "audio/ogg" => ".ogg".to_string(),
        other => mime_guess::get_mime_extensions_str(other)
            .and_then(|exts| exts.first())
            .map(|ext| format!(".{}", ext))
            .unwrap_or_else(|| ".bin".to_string()),
    }
}

impl BlobStore for TempFileBlobStore {
    fn create(&self, bytes: &[u8], mime_type: &str) -> Result<MediaResource> {
        let mut file = tempfile::Builder::new()
            .prefix("blob-")
            .suffix(&suffix_for(mime_type))
            .tempfile_in(self.dir.path())?;
        file.write_all(bytes)?;
        file.flush()?;

        let temp_path = file.into_temp_path();
        let location: PathBuf = temp_path.to_path_buf();
        let url = ObjectUrl::new(format!("blob:tunedeck/{}", Uuid::new_v4()));

        self.live
            .lock()
            .map_err(|_| TunedeckError::internal("blob registry lock poisoned"))?
            .insert(url.clone(), temp_path);
        self.acquired.fetch_add(1, Ordering::SeqCst);

        tracing::debug!(url = %url, size = bytes.len(), mime_type, "Blob created");
        Ok(MediaResource {
            url,
            location,
            mime_type: mime_type.to_string(),
            size: bytes.len() as u64,
        })
    }

    fn revoke(&self, url: &ObjectUrl) {
        let removed = self
            .live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(url);

        if let Some(temp_path) = removed {
            if let Err(e) = temp_path.close() {
                tracing::warn!(url = %url, "Failed to delete blob file: {}", e);
            }
            self.revoked.fetch_add(1, Ordering::SeqCst);
            tracing::debug!(url = %url, "Blob revoked");
        }
    }

    fn stats(&self) -> BlobStats {
        BlobStats {
            acquired: self.acquired.load(Ordering::SeqCst),
            revoked: self.revoked.load(Ordering::SeqCst),
        }
    }
}
