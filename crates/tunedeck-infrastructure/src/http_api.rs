//! HttpMusicApi - REST client for the music library backend.
//!
//! Talks JSON to the auth and song endpoints, streams audio as raw bytes, and
//! uploads files as `multipart/form-data`. Every authenticated request carries
//! `Authorization: Bearer <token>` built from the token passed to the call.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tunedeck_core::api::{AudioPayload, FileUpload, MusicApi};
use tunedeck_core::config::ClientConfig;
use tunedeck_core::song::{AudioFormat, Song};
use tunedeck_core::user::{AuthGrant, Credentials, Registration, UserProfile};
use tunedeck_core::{Result, TunedeckError};

/// [`MusicApi`] over HTTP.
#[derive(Clone)]
pub struct HttpMusicApi {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<UserProfile>,
    #[serde(default)]
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProfileResponse {
    Wrapped { user: UserProfile },
    Flat(UserProfile),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SongListResponse {
    Wrapped { songs: Vec<Song> },
    Bare(Vec<Song>),
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    song: Option<serde_json::Value>,
}

/// Error body: `{ "message": ... }`, sometimes `{ "error": ... }`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Serialize)]
struct SpotifyRequest<'a> {
    spotify_url: &'a str,
}

impl HttpMusicApi {
    /// Creates a client for `base_url` (e.g. `http://localhost:5000`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| TunedeckError::config(format!("Invalid API base URL '{}': {}", base_url, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TunedeckError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(
            config.base_url(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends each segment, percent-encoding it, to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TunedeckError::config("API base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Passes 2xx responses through; turns everything else into a typed error.
    ///
    /// `entity` and `id` label a 404.
    async fn check(response: Response, entity: &'static str, id: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let message = error_message(status, &text);
        tracing::debug!(status = %status, entity, "Backend returned error: {}", message);

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::UNPROCESSABLE_ENTITY => {
                TunedeckError::auth(status.as_u16(), message)
            }
            StatusCode::NOT_FOUND => TunedeckError::not_found(entity, id),
            _ => TunedeckError::http(status.as_u16(), message),
        })
    }

    async fn authenticate<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        username: &str,
    ) -> Result<AuthGrant> {
        let url = self.endpoint(&["api", "auth", path])?;
        let response = self.client.post(url).json(body).send().await?;
        let response = Self::check(response, "user", username).await?;

        let parsed: AuthResponse = response
            .json()
            .await
            .map_err(|e| TunedeckError::invalid_response(format!("Failed to parse auth response: {}", e)))?;

        let token = parsed
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| TunedeckError::invalid_response("Auth response carried no token"))?;

        let user = parsed
            .user
            .or_else(|| parsed.username.map(UserProfile::from_username))
            .unwrap_or_else(|| UserProfile::from_username(username));

        Ok(AuthGrant { token, user })
    }
}

/// Picks the most useful human-readable message from an error response.
fn error_message(status: StatusCode, body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .message
        .or(parsed.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() || trimmed.starts_with('<') {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            } else {
                trimmed.to_string()
            }
        })
}

#[async_trait]
impl MusicApi for HttpMusicApi {
    async fn login(&self, credentials: &Credentials) -> Result<AuthGrant> {
        tracing::debug!(username = %credentials.username, "POST /api/auth/login");
        self.authenticate("login", credentials, &credentials.username)
            .await
    }

    async fn register(&self, registration: &Registration) -> Result<AuthGrant> {
        tracing::debug!(username = %registration.username, "POST /api/auth/register");
        self.authenticate("register", registration, &registration.username)
            .await
    }

    async fn profile(&self, token: &str) -> Result<UserProfile> {
        let url = self.endpoint(&["api", "auth", "profile"])?;
        let response = self.client.get(url).bearer_auth(token).send().await?;
        let response = Self::check(response, "user", "me").await?;

        let parsed: ProfileResponse = response
            .json()
            .await
            .map_err(|e| TunedeckError::invalid_response(format!("Failed to parse profile: {}", e)))?;

        Ok(match parsed {
            ProfileResponse::Wrapped { user } => user,
            ProfileResponse::Flat(user) => user,
        })
    }

    async fn list_songs(&self, token: &str) -> Result<Vec<Song>> {
        let url = self.endpoint(&["api", "songs", "list"])?;
        let response = self.client.get(url).bearer_auth(token).send().await?;
        let response = Self::check(response, "song list", "").await?;

        let parsed: SongListResponse = response
            .json()
            .await
            .map_err(|e| TunedeckError::invalid_response(format!("Failed to parse song list: {}", e)))?;

        let songs = match parsed {
            SongListResponse::Wrapped { songs } => songs,
            SongListResponse::Bare(songs) => songs,
        };
        tracing::debug!(count = songs.len(), "Fetched song list");
        Ok(songs)
    }

    async fn fetch_audio(
        &self,
        token: &str,
        file_path: &str,
        format: Option<AudioFormat>,
    ) -> Result<AudioPayload> {
        let url = self.endpoint(&["api", "songs", "stream", file_path])?;
        let mut request = self.client.get(url).bearer_auth(token);
        if let Some(format) = format {
            request = request.query(&[("format", format.extension())]);
        }

        let response = request.send().await?;
        let response = Self::check(response, "song file", file_path).await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let bytes = response.bytes().await?.to_vec();

        tracing::debug!(file_path, size = bytes.len(), "Fetched audio");
        Ok(AudioPayload {
            bytes,
            content_type,
        })
    }

    async fn upload_file(&self, token: &str, upload: FileUpload) -> Result<Option<Song>> {
        use reqwest::multipart::{Form, Part};

        let mime = mime_guess::from_path(&upload.file_name)
            .first_or_octet_stream()
            .to_string();
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name.clone())
            .mime_str(&mime)
            .map_err(|e| TunedeckError::validation(format!("Invalid content type '{}': {}", mime, e)))?;

        let mut form = Form::new().part("file", part).text("title", upload.title);
        if let Some(artist) = upload.artist {
            form = form.text("artist", artist);
        }
        if let Some(album) = upload.album {
            form = form.text("album", album);
        }

        let url = self.endpoint(&["api", "songs", "upload"])?;
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        let response = Self::check(response, "upload", &upload.file_name).await?;

        Ok(parse_uploaded_song(response).await)
    }

    async fn upload_link(&self, token: &str, spotify_url: &str) -> Result<Option<Song>> {
        let url = self.endpoint(&["api", "songs", "upload", "spotify"])?;
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(&SpotifyRequest { spotify_url })
            .send()
            .await?;
        let response = Self::check(response, "track", spotify_url).await?;

        Ok(parse_uploaded_song(response).await)
    }

    async fn delete_song(&self, token: &str, song_id: &str) -> Result<()> {
        let url = self.endpoint(&["api", "songs", song_id])?;
        let response = self.client.delete(url).bearer_auth(token).send().await?;
        Self::check(response, "song", song_id).await?;
        Ok(())
    }
}

/// The created song is informational; a body we cannot read is not a failure.
async fn parse_uploaded_song(response: Response) -> Option<Song> {
    let parsed: UploadResponse = response.json().await.ok()?;
    parsed
        .song
        .and_then(|value| serde_json::from_value(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_message_field() {
        let body = r#"{"message": "Invalid token", "error": "jwt"}"#;
        assert_eq!(error_message(StatusCode::UNAUTHORIZED, body), "Invalid token");
    }

    #[test]
    fn test_error_message_falls_back_to_error_field() {
        let body = r#"{"error": "Signature verification failed"}"#;
        assert_eq!(
            error_message(StatusCode::UNPROCESSABLE_ENTITY, body),
            "Signature verification failed"
        );
    }

    #[test]
    fn test_error_message_plain_and_html_bodies() {
        assert_eq!(error_message(StatusCode::BAD_REQUEST, "Unsupported format"), "Unsupported format");
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, "<html>boom</html>"),
            "Internal Server Error"
        );
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, ""), "Bad Gateway");
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let api = HttpMusicApi::new("http://localhost:5000/", Duration::from_secs(5)).unwrap();
        let url = api.endpoint(&["api", "songs", "stream", "my song.mp3"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/songs/stream/my%20song.mp3");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = HttpMusicApi::new("not a url", Duration::from_secs(5)).err().unwrap();
        assert!(matches!(err, TunedeckError::Config(_)));
    }
}
