//! Music Client facade
//!
//! Wires the session, catalog, playback, transfer and library services around
//! one shared [`SessionHolder`] and applies the cross-service rules:
//! a `NotFound` from playback refreshes the catalog, and logout stops playback
//! and forgets the catalog.

use crate::catalog::CatalogService;
use crate::library::LibraryService;
use crate::playback::PlaybackController;
use crate::session::SessionHolder;
use crate::transfer::TransferService;
use std::path::PathBuf;
use std::sync::Arc;
use tunedeck_core::api::MusicApi;
use tunedeck_core::error::{Result, TunedeckError};
use tunedeck_core::media::{BlobStore, MediaBackend, PlaybackStatus};
use tunedeck_core::session::TokenStore;
use tunedeck_core::song::{AudioFormat, Song};
use tunedeck_core::transfer::SaveTarget;
use tunedeck_core::user::UserProfile;

/// Adapters a [`MusicClient`] is assembled from.
pub struct ClientParts {
    pub api: Arc<dyn MusicApi>,
    pub token_store: Arc<dyn TokenStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub media: Arc<dyn MediaBackend>,
    pub save_target: Arc<dyn SaveTarget>,
    /// Starting playback volume in `[0, 1]`.
    pub volume: f32,
}

pub struct MusicClient {
    session: Arc<SessionHolder>,
    catalog: Arc<CatalogService>,
    playback: Arc<PlaybackController>,
    transfer: TransferService,
    library: LibraryService,
}

impl MusicClient {
    pub fn new(parts: ClientParts) -> Self {
        let ClientParts {
            api,
            token_store,
            blobs,
            media,
            save_target,
            volume,
        } = parts;

        let session = Arc::new(SessionHolder::new(api.clone(), token_store));
        let catalog = Arc::new(CatalogService::new(api.clone(), session.clone()));
        let playback = Arc::new(
            PlaybackController::new(api.clone(), session.clone(), blobs.clone(), media)
                .with_volume(volume),
        );
        let transfer = TransferService::new(api.clone(), session.clone(), blobs, save_target);
        let library = LibraryService::new(api, session.clone(), catalog.clone(), playback.clone());

        Self {
            session,
            catalog,
            playback,
            transfer,
            library,
        }
    }

    pub fn session(&self) -> &SessionHolder {
        &self.session
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    pub fn playback(&self) -> &PlaybackController {
        &self.playback
    }

    pub fn library(&self) -> &LibraryService {
        &self.library
    }

    /// Restores a persisted session and, if it is still valid, loads the catalog.
    ///
    /// A failed catalog load is logged, not returned; the session stays restored.
    pub async fn start(&self) -> Result<Option<UserProfile>> {
        let restored = self.session.restore().await?;
        if restored.is_some() {
            self.refresh_quietly().await;
        }
        Ok(restored)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<UserProfile> {
        let user = self.session.login(username, password).await?;
        self.refresh_quietly().await;
        Ok(user)
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<UserProfile> {
        let user = self.session.register(username, email, password).await?;
        self.refresh_quietly().await;
        Ok(user)
    }

    /// Stops playback, forgets the catalog and clears the session.
    pub async fn logout(&self) -> Result<()> {
        self.playback.stop();
        self.catalog.clear();
        self.session.logout().await
    }

    /// Plays `song`; if the backend no longer has it, the catalog is refreshed
    /// before the error is returned.
    pub async fn play(&self, song: &Song) -> Result<PlaybackStatus> {
        match self.playback.play(song).await {
            Err(e) if e.is_not_found() => {
                tracing::info!(song_id = %song.id, "Song missing on backend; refreshing catalog");
                self.refresh_quietly().await;
                Err(e)
            }
            other => other,
        }
    }

    /// Plays a song from the loaded catalog by id.
    pub async fn play_by_id(&self, song_id: &str) -> Result<PlaybackStatus> {
        let song = self.song(song_id)?;
        self.play(&song).await
    }

    pub async fn download(&self, song_id: &str, format: AudioFormat) -> Result<PathBuf> {
        let song = self.song(song_id)?;
        self.transfer.download(&song, format).await
    }

    /// Looks a song up in the loaded catalog.
    pub fn song(&self, song_id: &str) -> Result<Song> {
        self.catalog
            .find(song_id)
            .ok_or_else(|| TunedeckError::not_found("song", song_id))
    }

    /// Releases the playback session.
    pub fn shutdown(&self) {
        self.playback.shutdown();
    }

    async fn refresh_quietly(&self) {
        if let Err(e) = self.catalog.refresh().await {
            tracing::warn!("Catalog refresh failed: {}", e);
        }
    }
}
