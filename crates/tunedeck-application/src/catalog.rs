//! Catalog Service
//!
//! Fetches the user's song list and keeps the last good copy in memory.

use crate::session::SessionHolder;
use std::sync::{Arc, PoisonError, RwLock};
use tunedeck_core::api::MusicApi;
use tunedeck_core::error::Result;
use tunedeck_core::song::Song;

/// The user's library as last fetched from the backend.
pub struct CatalogService {
    api: Arc<dyn MusicApi>,
    session: Arc<SessionHolder>,
    songs: RwLock<Vec<Song>>,
}

impl CatalogService {
    pub fn new(api: Arc<dyn MusicApi>, session: Arc<SessionHolder>) -> Self {
        Self {
            api,
            session,
            songs: RwLock::new(Vec::new()),
        }
    }

    /// Fetches the song list and replaces the cached one wholesale.
    ///
    /// Without a token this fails with `NotAuthenticated` before any request.
    /// On failure the previous list is kept; an auth rejection here does not
    /// end the session.
    pub async fn refresh(&self) -> Result<Vec<Song>> {
        let token = self.session.require_token().await?;

        let songs = self.api.list_songs(&token).await.inspect_err(|e| {
            tracing::warn!("Failed to refresh catalog: {}", e);
        })?;

        tracing::debug!(count = songs.len(), "Catalog refreshed");
        *self.songs.write().unwrap_or_else(PoisonError::into_inner) = songs.clone();
        Ok(songs)
    }

    pub fn songs(&self) -> Vec<Song> {
        self.songs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn find(&self, song_id: &str) -> Option<Song> {
        self.songs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|s| s.id == song_id)
            .cloned()
    }

    /// Songs whose title, artist or album contains `term`, ignoring case.
    pub fn search(&self, term: &str) -> Vec<Song> {
        self.songs
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|s| s.matches(term))
            .cloned()
            .collect()
    }

    /// Forgets the cached list, e.g. after logout.
    pub fn clear(&self) {
        self.songs
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
