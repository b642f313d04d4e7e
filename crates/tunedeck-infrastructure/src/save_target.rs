//! Saves downloaded blobs into a directory.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tunedeck_core::media::MediaResource;
use tunedeck_core::transfer::SaveTarget;
use tunedeck_core::Result;

/// [`SaveTarget`] writing into one directory, never overwriting.
///
/// When `X.wav` already exists the blob is saved as `X (1).wav`, `X (2).wav`, ...
#[derive(Debug, Clone)]
pub struct DirectorySaveTarget {
    dir: PathBuf,
}

impl DirectorySaveTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn free_path(&self, file_name: &str) -> Result<PathBuf> {
        let candidate = self.dir.join(file_name);
        if !tokio::fs::try_exists(&candidate).await? {
            return Ok(candidate);
        }

        let path = Path::new(file_name);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.to_string());
        let extension = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        let mut n = 1u32;
        loop {
            let candidate = self.dir.join(format!("{} ({}){}", stem, n, extension));
            if !tokio::fs::try_exists(&candidate).await? {
                return Ok(candidate);
            }
            n += 1;
        }
    }
}

#[async_trait]
impl SaveTarget for DirectorySaveTarget {
    async fn save(&self, file_name: &str, resource: &MediaResource) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let target = self.free_path(file_name).await?;

        let written = tokio::fs::copy(&resource.location, &target).await?;
        tracing::info!(path = %target.display(), bytes = written, "Saved download");
        Ok(target)
    }
}
