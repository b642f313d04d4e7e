//! Hand-written fakes of the core traits, shared by the service tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tunedeck_core::api::{AudioPayload, FileUpload, MusicApi};
use tunedeck_core::media::{
    BlobStats, BlobStore, MediaBackend, MediaEvent, MediaHandle, MediaResource, ObjectUrl,
};
use tunedeck_core::session::{StoredSession, TokenStore};
use tunedeck_core::song::{AudioFormat, Song};
use tunedeck_core::transfer::SaveTarget;
use tunedeck_core::user::{AuthGrant, Credentials, Registration, UserProfile};
use tunedeck_core::{Result, TunedeckError};

/// Ordered trace of side effects across fakes ("create:..", "revoke:..", "pause:..").
pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn song(id: &str, title: &str) -> Song {
    let mut song = Song::new(id, title, format!("{}.mp3", id));
    song.duration = Some(120.0);
    song
}

// ============================================================================
// MusicApi
// ============================================================================

pub struct MockMusicApi {
    pub songs: Mutex<Vec<Song>>,
    /// Errors to return instead of audio, keyed by file path.
    pub audio_failures: Mutex<HashMap<String, TunedeckError>>,
    pub list_failure: Mutex<Option<TunedeckError>>,
    pub profile_failure: Mutex<Option<TunedeckError>>,
    pub delete_failure: Mutex<Option<TunedeckError>>,
    /// Fetches for these file paths wait until notified.
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    /// `"<endpoint> <token>"` per call.
    pub calls: Mutex<Vec<String>>,
    pub audio_requests: Mutex<Vec<(String, Option<AudioFormat>)>>,
    pub uploads: Mutex<Vec<FileUpload>>,
}

impl MockMusicApi {
    pub fn new() -> Self {
        Self {
            songs: Mutex::new(vec![song("1", "X"), song("2", "Y")]),
            audio_failures: Mutex::new(HashMap::new()),
            list_failure: Mutex::new(None),
            profile_failure: Mutex::new(None),
            delete_failure: Mutex::new(None),
            gates: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            audio_requests: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn gate(&self, file_path: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(file_path.to_string(), notify.clone());
        notify
    }

    pub fn fail_audio(&self, file_path: &str, err: TunedeckError) {
        self.audio_failures
            .lock()
            .unwrap()
            .insert(file_path.to_string(), err);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(endpoint))
            .count()
    }

    fn record(&self, endpoint: &str, token: &str) {
        self.calls
            .lock()
            .unwrap()
            .push(format!("{} {}", endpoint, token));
    }
}

#[async_trait]
impl MusicApi for MockMusicApi {
    async fn login(&self, credentials: &Credentials) -> Result<AuthGrant> {
        self.record("login", "-");
        if credentials.username == "u" && credentials.password == "p" {
            Ok(AuthGrant {
                token: "t1".to_string(),
                user: UserProfile::from_username("u"),
            })
        } else {
            Err(TunedeckError::auth(401, "Invalid credentials"))
        }
    }

    async fn register(&self, registration: &Registration) -> Result<AuthGrant> {
        self.record("register", "-");
        if registration.username == "taken" {
            return Err(TunedeckError::auth(422, "Username already exists"));
        }
        Ok(AuthGrant {
            token: "t2".to_string(),
            user: UserProfile::from_username(registration.username.clone()),
        })
    }

    async fn profile(&self, token: &str) -> Result<UserProfile> {
        self.record("profile", token);
        if let Some(err) = self.profile_failure.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(UserProfile {
            id: "42".to_string(),
            username: "u".to_string(),
            email: Some("u@example.com".to_string()),
        })
    }

    async fn list_songs(&self, token: &str) -> Result<Vec<Song>> {
        self.record("list", token);
        if let Some(err) = self.list_failure.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self.songs.lock().unwrap().clone())
    }

    async fn fetch_audio(
        &self,
        token: &str,
        file_path: &str,
        format: Option<AudioFormat>,
    ) -> Result<AudioPayload> {
        self.record("stream", token);
        self.audio_requests
            .lock()
            .unwrap()
            .push((file_path.to_string(), format));

        let gate = self.gates.lock().unwrap().remove(file_path);
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if let Some(err) = self.audio_failures.lock().unwrap().get(file_path).cloned() {
            return Err(err);
        }
        Ok(AudioPayload {
            bytes: format!("audio:{}", file_path).into_bytes(),
            content_type: Some(format.unwrap_or_default().mime_type().to_string()),
        })
    }

    async fn upload_file(&self, token: &str, upload: FileUpload) -> Result<Option<Song>> {
        self.record("upload", token);
        let created = Song::new("9", upload.title.clone(), upload.file_name.clone());
        self.uploads.lock().unwrap().push(upload);
        self.songs.lock().unwrap().push(created.clone());
        Ok(Some(created))
    }

    async fn upload_link(&self, token: &str, _spotify_url: &str) -> Result<Option<Song>> {
        self.record("upload_link", token);
        Ok(None)
    }

    async fn delete_song(&self, token: &str, song_id: &str) -> Result<()> {
        self.record("delete", token);
        if let Some(err) = self.delete_failure.lock().unwrap().clone() {
            return Err(err);
        }
        self.songs.lock().unwrap().retain(|s| s.id != song_id);
        Ok(())
    }
}

// ============================================================================
// TokenStore
// ============================================================================

#[derive(Default)]
pub struct MemoryTokenStore {
    pub stored: Mutex<Option<StoredSession>>,
    pub saves: AtomicU64,
}

impl MemoryTokenStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            stored: Mutex::new(Some(StoredSession::new(token, Some("u".to_string())))),
            saves: AtomicU64::new(0),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.stored.lock().unwrap().as_ref().map(|s| s.token.clone())
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<StoredSession>> {
        Ok(self.stored.lock().unwrap().clone())
    }

    async fn save(&self, session: &StoredSession) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        *self.stored.lock().unwrap() = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.stored.lock().unwrap() = None;
        Ok(())
    }
}

// ============================================================================
// BlobStore
// ============================================================================

pub struct MemoryBlobStore {
    log: EventLog,
    live: Mutex<HashSet<ObjectUrl>>,
    next: AtomicU64,
    acquired: AtomicU64,
    revoked: AtomicU64,
}

impl MemoryBlobStore {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            live: Mutex::new(HashSet::new()),
            next: AtomicU64::new(1),
            acquired: AtomicU64::new(0),
            revoked: AtomicU64::new(0),
        }
    }

    pub fn live_urls(&self) -> Vec<ObjectUrl> {
        self.live.lock().unwrap().iter().cloned().collect()
    }
}

impl BlobStore for MemoryBlobStore {
    fn create(&self, bytes: &[u8], mime_type: &str) -> Result<MediaResource> {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        let url = ObjectUrl::new(format!("blob:test/{}", n));
        self.live.lock().unwrap().insert(url.clone());
        self.acquired.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(format!("create:{}", url));
        Ok(MediaResource {
            url,
            location: PathBuf::from(format!("/virtual/blob-{}", n)),
            mime_type: mime_type.to_string(),
            size: bytes.len() as u64,
        })
    }

    fn revoke(&self, url: &ObjectUrl) {
        if self.live.lock().unwrap().remove(url) {
            self.revoked.fetch_add(1, Ordering::SeqCst);
            self.log.lock().unwrap().push(format!("revoke:{}", url));
        }
    }

    fn stats(&self) -> BlobStats {
        BlobStats {
            acquired: self.acquired.load(Ordering::SeqCst),
            revoked: self.revoked.load(Ordering::SeqCst),
        }
    }
}

// ============================================================================
// MediaBackend
// ============================================================================

#[derive(Debug, Default)]
pub struct HandleState {
    pub url: String,
    pub playing: bool,
    pub position: f64,
    pub duration: Option<f64>,
    pub gain: f32,
    pub position_sets: Vec<f64>,
    pub gain_sets: Vec<f32>,
    pub detached: bool,
    pub queued: VecDeque<MediaEvent>,
}

pub struct RecordingMediaBackend {
    log: EventLog,
    pub handles: Mutex<Vec<Arc<Mutex<HandleState>>>>,
    pub fail_open: Mutex<bool>,
    pub fail_play: Mutex<bool>,
}

impl RecordingMediaBackend {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            handles: Mutex::new(Vec::new()),
            fail_open: Mutex::new(false),
            fail_play: Mutex::new(false),
        }
    }

    pub fn handle(&self, index: usize) -> Arc<Mutex<HandleState>> {
        self.handles.lock().unwrap()[index].clone()
    }

    pub fn last(&self) -> Arc<Mutex<HandleState>> {
        self.handles
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no handle opened")
    }

    pub fn opened(&self) -> usize {
        self.handles.lock().unwrap().len()
    }

    pub fn push_event(&self, event: MediaEvent) {
        self.last().lock().unwrap().queued.push_back(event);
    }
}

struct RecordingHandle {
    log: EventLog,
    state: Arc<Mutex<HandleState>>,
    fail_play: bool,
}

impl MediaBackend for RecordingMediaBackend {
    fn open(
        &self,
        resource: &MediaResource,
        duration_hint: Option<f64>,
    ) -> Result<Box<dyn MediaHandle>> {
        if *self.fail_open.lock().unwrap() {
            return Err(TunedeckError::media("cannot decode"));
        }
        let state = Arc::new(Mutex::new(HandleState {
            url: resource.url.to_string(),
            duration: duration_hint,
            gain: 1.0,
            ..Default::default()
        }));
        self.handles.lock().unwrap().push(state.clone());
        self.log
            .lock()
            .unwrap()
            .push(format!("open:{}", resource.url));
        Ok(Box::new(RecordingHandle {
            log: self.log.clone(),
            state,
            fail_play: *self.fail_play.lock().unwrap(),
        }))
    }
}

impl MediaHandle for RecordingHandle {
    fn play(&mut self) -> Result<()> {
        if self.fail_play {
            return Err(TunedeckError::media("autoplay blocked"));
        }
        self.state.lock().unwrap().playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.playing = false;
        self.log.lock().unwrap().push(format!("pause:{}", state.url));
    }

    fn set_position(&mut self, seconds: f64) {
        let mut state = self.state.lock().unwrap();
        state.position = seconds;
        state.position_sets.push(seconds);
    }

    fn position(&self) -> f64 {
        self.state.lock().unwrap().position
    }

    fn duration(&self) -> Option<f64> {
        self.state.lock().unwrap().duration
    }

    fn set_gain(&mut self, gain: f32) {
        let mut state = self.state.lock().unwrap();
        state.gain = gain;
        state.gain_sets.push(gain);
    }

    fn poll_events(&mut self) -> Vec<MediaEvent> {
        let mut state = self.state.lock().unwrap();
        if state.detached {
            return Vec::new();
        }
        state.queued.drain(..).collect()
    }

    fn detach(&mut self) {
        let mut state = self.state.lock().unwrap();
        state.detached = true;
        self.log.lock().unwrap().push(format!("detach:{}", state.url));
    }
}

// ============================================================================
// SaveTarget
// ============================================================================

#[derive(Default)]
pub struct RecordingSaveTarget {
    /// `(file_name, blob url)` per save.
    pub saved: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl SaveTarget for RecordingSaveTarget {
    async fn save(&self, file_name: &str, resource: &MediaResource) -> Result<PathBuf> {
        self.saved
            .lock()
            .unwrap()
            .push((file_name.to_string(), resource.url.to_string()));
        Ok(PathBuf::from("/downloads").join(file_name))
    }
}
