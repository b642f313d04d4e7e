//! Transfer Service
//!
//! Downloads a song in a chosen format and hands it to a [`SaveTarget`].
//! Runs independently of playback: it never touches the controller or catalog.

use crate::session::SessionHolder;
use std::path::PathBuf;
use std::sync::Arc;
use tunedeck_core::api::MusicApi;
use tunedeck_core::error::Result;
use tunedeck_core::media::BlobStore;
use tunedeck_core::song::{AudioFormat, Song};
use tunedeck_core::transfer::{PendingDownload, SaveTarget};

pub struct TransferService {
    api: Arc<dyn MusicApi>,
    session: Arc<SessionHolder>,
    blobs: Arc<dyn BlobStore>,
    target: Arc<dyn SaveTarget>,
}

impl TransferService {
    pub fn new(
        api: Arc<dyn MusicApi>,
        session: Arc<SessionHolder>,
        blobs: Arc<dyn BlobStore>,
        target: Arc<dyn SaveTarget>,
    ) -> Self {
        Self {
            api,
            session,
            blobs,
            target,
        }
    }

    /// Fetches `song` converted to `format` and saves it as `<title>.<format>`.
    ///
    /// The transient blob is revoked whether or not the save succeeds.
    ///
    /// # Errors
    ///
    /// - `NotAuthenticated`: no token; no request was made
    /// - `Auth`/`NotFound`/`Network`/`Http`: the fetch failed
    /// - `Io`: the file could not be written
    pub async fn download(&self, song: &Song, format: AudioFormat) -> Result<PathBuf> {
        let token = self.session.require_token().await?;
        let pending = PendingDownload::new(song.clone(), format);

        tracing::info!(song_id = %song.id, format = %format, "Starting download");
        let payload = self
            .api
            .fetch_audio(&token, &song.file_path, Some(format))
            .await
            .inspect_err(|e| tracing::warn!(song_id = %song.id, "Download failed: {}", e))?;

        let resource = self
            .blobs
            .create(&payload.bytes, &payload.mime_type(Some(format)))?;
        let saved = self.target.save(&pending.file_name(), &resource).await;
        self.blobs.revoke(&resource.url);

        let path = saved?;
        tracing::info!(song_id = %song.id, path = %path.display(), "Download saved");
        Ok(path)
    }
}
