//! Remote music library API trait.
//!
//! Defines the contract with the REST backend. Every authenticated call takes the
//! bearer token as an explicit argument; implementations hold no credentials.

use crate::error::Result;
use crate::song::{AudioFormat, Song};
use crate::user::{AuthGrant, Credentials, Registration, UserProfile};
use async_trait::async_trait;

/// Raw audio returned by the stream endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioPayload {
    pub bytes: Vec<u8>,
    /// `Content-Type` reported by the backend, if any.
    pub content_type: Option<String>,
}

impl AudioPayload {
    /// Content type to label a blob with, falling back to the requested format.
    pub fn mime_type(&self, requested: Option<AudioFormat>) -> String {
        match &self.content_type {
            Some(content_type) if !content_type.is_empty() => content_type.clone(),
            _ => requested.unwrap_or_default().mime_type().to_string(),
        }
    }
}

/// A local file to be sent as `multipart/form-data` to the upload endpoint.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
}

/// The music library backend.
///
/// # Error mapping
///
/// Implementations must map responses as follows:
/// - 401/422 → [`crate::TunedeckError::Auth`]
/// - 404 → [`crate::TunedeckError::NotFound`]
/// - transport failures → [`crate::TunedeckError::Network`]
/// - other non-2xx → [`crate::TunedeckError::Http`]
///
/// Deciding whether an `Auth` clears the session is the caller's business.
#[async_trait]
pub trait MusicApi: Send + Sync {
    /// `POST /api/auth/login`
    async fn login(&self, credentials: &Credentials) -> Result<AuthGrant>;

    /// `POST /api/auth/register`
    async fn register(&self, registration: &Registration) -> Result<AuthGrant>;

    /// `GET /api/auth/profile`
    async fn profile(&self, token: &str) -> Result<UserProfile>;

    /// `GET /api/songs/list`
    async fn list_songs(&self, token: &str) -> Result<Vec<Song>>;

    /// `GET /api/songs/stream/{file_path}[?format=..]`
    ///
    /// With `format` unset the backend serves its default encoding.
    async fn fetch_audio(
        &self,
        token: &str,
        file_path: &str,
        format: Option<AudioFormat>,
    ) -> Result<AudioPayload>;

    /// `POST /api/songs/upload`; returns the created song when the backend echoes it.
    async fn upload_file(&self, token: &str, upload: FileUpload) -> Result<Option<Song>>;

    /// `POST /api/songs/upload/spotify`
    async fn upload_link(&self, token: &str, spotify_url: &str) -> Result<Option<Song>>;

    /// `DELETE /api/songs/{id}`
    async fn delete_song(&self, token: &str, song_id: &str) -> Result<()>;
}
