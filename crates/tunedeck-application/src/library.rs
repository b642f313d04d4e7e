//! Library Service
//!
//! Mutations of the user's library: uploading local files or Spotify links and
//! deleting songs. Each successful mutation refreshes the catalog.

use crate::catalog::CatalogService;
use crate::playback::PlaybackController;
use crate::session::SessionHolder;
use std::path::Path;
use std::sync::Arc;
use tunedeck_core::api::{FileUpload, MusicApi};
use tunedeck_core::error::{Result, TunedeckError};
use tunedeck_core::song::Song;

/// Extensions the backend accepts for uploads.
pub const UPLOAD_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg"];

const SPOTIFY_TRACK_MARKER: &str = "spotify.com/track/";

/// Optional tags sent alongside an uploaded file.
#[derive(Debug, Clone, Default)]
pub struct UploadMetadata {
    /// Defaults to the file stem when unset or blank.
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
}

pub struct LibraryService {
    api: Arc<dyn MusicApi>,
    session: Arc<SessionHolder>,
    catalog: Arc<CatalogService>,
    playback: Arc<PlaybackController>,
}

impl LibraryService {
    pub fn new(
        api: Arc<dyn MusicApi>,
        session: Arc<SessionHolder>,
        catalog: Arc<CatalogService>,
        playback: Arc<PlaybackController>,
    ) -> Self {
        Self {
            api,
            session,
            catalog,
            playback,
        }
    }

    /// Uploads a local audio file.
    ///
    /// # Errors
    ///
    /// - `Validation`: the extension is not one of [`UPLOAD_EXTENSIONS`]
    /// - `Io`: the file could not be read
    /// - `NotAuthenticated`, or any error of the upload request
    pub async fn upload_file(&self, path: &Path, metadata: UploadMetadata) -> Result<Option<Song>> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if !UPLOAD_EXTENSIONS.contains(&extension.as_str()) {
            return Err(TunedeckError::validation(format!(
                "Unsupported file type '{}'; expected one of: {}",
                path.display(),
                UPLOAD_EXTENSIONS.join(", ")
            )));
        }

        let token = self.session.require_token().await?;
        let bytes = tokio::fs::read(path).await?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("upload.{}", extension));
        let title = non_blank(metadata.title).unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| file_name.clone())
        });

        tracing::info!(file = %file_name, size = bytes.len(), "Uploading file");
        let created = self
            .api
            .upload_file(
                &token,
                FileUpload {
                    file_name,
                    bytes,
                    title,
                    artist: non_blank(metadata.artist),
                    album: non_blank(metadata.album),
                },
            )
            .await?;

        self.refresh_after_mutation().await;
        Ok(created)
    }

    /// Asks the backend to import a Spotify track.
    pub async fn upload_link(&self, spotify_url: &str) -> Result<Option<Song>> {
        let spotify_url = spotify_url.trim();
        if !spotify_url.contains(SPOTIFY_TRACK_MARKER) {
            return Err(TunedeckError::validation(
                "Please provide a valid Spotify track URL",
            ));
        }

        let token = self.session.require_token().await?;
        tracing::info!(url = %spotify_url, "Importing Spotify track");
        let created = self.api.upload_link(&token, spotify_url).await?;

        self.refresh_after_mutation().await;
        Ok(created)
    }

    /// Deletes a song. Once the backend confirms, playback stops if the song is
    /// playing or still loading; a load in flight then completes as `Superseded`.
    ///
    /// An auth rejection is returned to the caller; it does not end the session.
    pub async fn delete(&self, song_id: &str) -> Result<()> {
        let token = self.session.require_token().await?;

        self.api
            .delete_song(&token, song_id)
            .await
            .inspect_err(|e| tracing::warn!(song_id = %song_id, "Delete failed: {}", e))?;
        tracing::info!(song_id = %song_id, "Song deleted");

        if self.playback.target_song_id().as_deref() == Some(song_id) {
            self.playback.stop();
        }

        self.refresh_after_mutation().await;
        Ok(())
    }

    /// The mutation already succeeded; a failed refresh only leaves the list stale.
    async fn refresh_after_mutation(&self) {
        if let Err(e) = self.catalog.refresh().await {
            tracing::warn!("Catalog refresh after library change failed: {}", e);
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{
        song, EventLog, MemoryBlobStore, MemoryTokenStore, MockMusicApi, RecordingMediaBackend,
    };
    use std::sync::Mutex;
    use tempfile::TempDir;
    use tunedeck_core::media::{BlobStore, PlaybackStatus};

    struct Fixture {
        library: LibraryService,
        api: Arc<MockMusicApi>,
        session: Arc<SessionHolder>,
        catalog: Arc<CatalogService>,
        playback: Arc<PlaybackController>,
        blobs: Arc<MemoryBlobStore>,
    }

    async fn fixture() -> Fixture {
        let log: EventLog = Arc::new(Mutex::new(Vec::new()));
        let api = Arc::new(MockMusicApi::new());
        let session = Arc::new(SessionHolder::new(
            api.clone(),
            Arc::new(MemoryTokenStore::default()),
        ));
        session.set_token("t1".to_string(), None).await.unwrap();
        let blobs = Arc::new(MemoryBlobStore::new(log.clone()));
        let catalog = Arc::new(CatalogService::new(api.clone(), session.clone()));
        let playback = Arc::new(PlaybackController::new(
            api.clone(),
            session.clone(),
            blobs.clone(),
            Arc::new(RecordingMediaBackend::new(log)),
        ));
        let library = LibraryService::new(
            api.clone(),
            session.clone(),
            catalog.clone(),
            playback.clone(),
        );
        Fixture {
            library,
            api,
            session,
            catalog,
            playback,
            blobs,
        }
    }

    #[tokio::test]
    async fn test_upload_file_defaults_title_to_stem() {
        let f = fixture().await;
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Night Drive.MP3");
        std::fs::write(&path, b"ID3 fake").unwrap();

        let created = f
            .library
            .upload_file(&path, UploadMetadata {
                artist: Some("  Kavinsky ".to_string()),
                album: Some("   ".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(created.unwrap().id, "9");
        let uploads = f.api.uploads.lock().unwrap();
        assert_eq!(uploads[0].file_name, "Night Drive.MP3");
        assert_eq!(uploads[0].title, "Night Drive");
        assert_eq!(uploads[0].artist.as_deref(), Some("Kavinsky"));
        assert!(uploads[0].album.is_none());
        assert_eq!(uploads[0].bytes, b"ID3 fake");
        assert!(f.catalog.find("9").is_some());
    }

    #[tokio::test]
    async fn test_upload_rejects_unknown_extension() {
        let f = fixture().await;
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, b"hello").unwrap();

        let err = f
            .library
            .upload_file(&path, UploadMetadata::default())
            .await
            .unwrap_err();

        assert!(matches!(err, TunedeckError::Validation(_)));
        assert_eq!(f.api.call_count(), 0);
    }

    #[tokio::test]
    async fn test_upload_missing_file_is_io_error() {
        let f = fixture().await;
        let dir = TempDir::new().unwrap();

        let err = f
            .library
            .upload_file(&dir.path().join("gone.wav"), UploadMetadata::default())
            .await
            .unwrap_err();

        assert!(err.is_io());
        assert_eq!(f.api.calls_to("upload"), 0);
    }

    #[tokio::test]
    async fn test_upload_link_validates_url() {
        let f = fixture().await;

        let err = f
            .library
            .upload_link("https://example.com/track/1")
            .await
            .unwrap_err();
        assert!(matches!(err, TunedeckError::Validation(_)));
        assert_eq!(f.api.call_count(), 0);

        f.library
            .upload_link(" https://open.spotify.com/track/abc ")
            .await
            .unwrap();
        assert_eq!(f.api.calls_to("upload_link"), 1);
        assert_eq!(f.api.calls_to("list"), 1);
    }

    #[tokio::test]
    async fn test_delete_current_song_stops_playback() {
        let f = fixture().await;
        f.catalog.refresh().await.unwrap();
        f.playback.play(&song("1", "X")).await.unwrap();

        f.library.delete("1").await.unwrap();

        assert_eq!(f.playback.status(), PlaybackStatus::Idle);
        assert_eq!(f.blobs.stats().live(), 0);
        assert!(f.catalog.find("1").is_none());
        assert_eq!(f.catalog.songs().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_other_song_keeps_playing() {
        let f = fixture().await;
        f.playback.play(&song("1", "X")).await.unwrap();

        f.library.delete("2").await.unwrap();

        assert_eq!(f.playback.status(), PlaybackStatus::Playing);
        assert_eq!(f.playback.current_song_id().as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_delete_loading_song_cancels_load() {
        let f = fixture().await;
        let a = song("1", "X");
        let gate = f.api.gate(&a.file_path);

        let load = f.playback.play(&a);
        let delete = async {
            tokio::task::yield_now().await;
            assert_eq!(f.playback.status(), PlaybackStatus::Loading);
            let result = f.library.delete("1").await;
            gate.notify_one();
            result
        };
        let (load_result, delete_result) = tokio::join!(load, delete);

        delete_result.unwrap();
        assert!(load_result.unwrap_err().is_superseded());
        assert_eq!(f.playback.status(), PlaybackStatus::Idle);
        assert!(f.playback.target_song_id().is_none());
        assert_eq!(f.blobs.stats().acquired, 0);
        assert_eq!(f.blobs.stats().live(), 0);
    }

    #[tokio::test]
    async fn test_delete_auth_failure_keeps_session() {
        let f = fixture().await;
        f.playback.play(&song("1", "X")).await.unwrap();
        *f.api.delete_failure.lock().unwrap() = Some(TunedeckError::auth(401, "expired"));

        let err = f.library.delete("1").await.unwrap_err();

        assert!(err.is_auth_rejection());
        assert!(f.session.is_authenticated().await);
        assert_eq!(f.playback.status(), PlaybackStatus::Playing);
        assert_eq!(f.api.calls_to("list"), 0);
    }
}
