use crate::session::SessionHolder;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tunedeck_core::api::MusicApi;
use tunedeck_core::error::{Result, TunedeckError};
use tunedeck_core::media::{
    BlobStore, MediaBackend, MediaEvent, MediaHandle, MediaResource, PlaybackSnapshot,
    PlaybackStatus,
};
use tunedeck_core::song::Song;

/// The song currently owning a media element.
struct ActiveSession {
    song: Song,
    resource: MediaResource,
    handle: Box<dyn MediaHandle>,
}

struct PlaybackInner {
    status: PlaybackStatus,
    current: Option<ActiveSession>,
    /// Song whose audio is being fetched.
    loading: Option<Song>,
    /// Bumped by every load and stop; a fetch completing under an older value is stale.
    generation: u64,
    position: f64,
    duration: Option<f64>,
    volume: f32,
    muted: bool,
    /// Set while the user drags the seek bar.
    drag_position: Option<f64>,
    last_error: Option<String>,
}

impl PlaybackInner {
    fn effective_gain(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    fn clamp_to_duration(&self, seconds: f64) -> f64 {
        let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        match self.duration {
            Some(duration) => seconds.min(duration),
            None => seconds,
        }
    }

    fn fail(&mut self, err: &TunedeckError) {
        self.status = PlaybackStatus::Error;
        self.loading = None;
        self.position = 0.0;
        self.last_error = Some(err.to_string());
    }
}

/// Releases the active media element: pause, drop subscriptions, revoke the blob.
fn teardown(blobs: &dyn BlobStore, inner: &mut PlaybackInner) {
    if let Some(mut active) = inner.current.take() {
        active.handle.pause();
        active.handle.detach();
        blobs.revoke(&active.resource.url);
        tracing::debug!(song_id = %active.song.id, url = %active.resource.url, "Playback session torn down");
    }
    inner.drag_position = None;
}

/// Plays one song at a time from fully buffered blobs.
///
/// # States
///
/// `Idle → Loading → Playing ⇄ Paused → Idle`, with `Error` reachable from
/// `Loading`, `Playing` and `Paused`.
///
/// # Resource model
///
/// Each successful [`PlaybackController::play`] owns exactly one blob and one
/// media handle. They are released on natural end, song switch, stop, media
/// error and drop, so `BlobStore::stats().live()` returns to zero once playback
/// is over. Controller state sits behind a `std::sync::Mutex` that is never held
/// across an `.await`.
pub struct PlaybackController {
    api: Arc<dyn MusicApi>,
    session: Arc<SessionHolder>,
    blobs: Arc<dyn BlobStore>,
    media: Arc<dyn MediaBackend>,
    inner: Mutex<PlaybackInner>,
}

impl PlaybackController {
    pub fn new(
        api: Arc<dyn MusicApi>,
        session: Arc<SessionHolder>,
        blobs: Arc<dyn BlobStore>,
        media: Arc<dyn MediaBackend>,
    ) -> Self {
        Self {
            api,
            session,
            blobs,
            media,
            inner: Mutex::new(PlaybackInner {
                status: PlaybackStatus::Idle,
                current: None,
                loading: None,
                generation: 0,
                position: 0.0,
                duration: None,
                volume: 1.0,
                muted: false,
                drag_position: None,
                last_error: None,
            }),
        }
    }

    /// Sets the starting volume, clamped to `[0, 1]`.
    pub fn with_volume(self, volume: f32) -> Self {
        self.set_volume(volume);
        self
    }

    fn lock(&self) -> MutexGuard<'_, PlaybackInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Plays `song`, or toggles pause if it is already the current song.
    ///
    /// Switching songs tears the previous session down before the new audio is
    /// requested. If another `play` or a `stop` happens while this fetch is in
    /// flight, the result is discarded and `Superseded` is returned.
    ///
    /// # Errors
    ///
    /// - `NotAuthenticated`: no token; no request was made
    /// - `Auth`/`NotFound`/`Network`/`Http`: the fetch failed; status is `Error`
    /// - `Media`: the audio could not be opened or started; status is `Error`
    /// - `Superseded`: a newer request won
    pub async fn play(&self, song: &Song) -> Result<PlaybackStatus> {
        let token = self.session.require_token().await?;

        let generation = {
            let mut inner = self.lock();

            let is_current = inner
                .current
                .as_ref()
                .is_some_and(|active| active.song.id == song.id);
            if is_current {
                let status = inner.status;
                return match status {
                    PlaybackStatus::Playing => {
                        self.pause_locked(&mut inner);
                        Ok(inner.status)
                    }
                    PlaybackStatus::Paused => {
                        self.resume_locked(&mut inner)?;
                        Ok(inner.status)
                    }
                    status => Ok(status),
                };
            }

            let already_loading = inner.status == PlaybackStatus::Loading
                && inner.loading.as_ref().is_some_and(|s| s.id == song.id);
            if already_loading {
                return Ok(PlaybackStatus::Loading);
            }

            teardown(self.blobs.as_ref(), &mut inner);
            inner.generation += 1;
            inner.status = PlaybackStatus::Loading;
            inner.loading = Some(song.clone());
            inner.position = 0.0;
            inner.duration = song.duration;
            inner.last_error = None;
            inner.generation
        };

        tracing::info!(song_id = %song.id, title = %song.title, "Loading song");
        let fetched = self.api.fetch_audio(&token, &song.file_path, None).await;

        let mut inner = self.lock();
        if inner.generation != generation {
            tracing::debug!(song_id = %song.id, "Discarding superseded load");
            return Err(TunedeckError::Superseded);
        }

        let payload = match fetched {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(song_id = %song.id, "Failed to fetch audio: {}", e);
                inner.fail(&e);
                return Err(e);
            }
        };

        let resource = match self.blobs.create(&payload.bytes, &payload.mime_type(None)) {
            Ok(resource) => resource,
            Err(e) => {
                inner.fail(&e);
                return Err(e);
            }
        };

        let mut handle = match self.media.open(&resource, song.duration) {
            Ok(handle) => handle,
            Err(e) => {
                self.blobs.revoke(&resource.url);
                let e = into_media_error(e);
                inner.fail(&e);
                return Err(e);
            }
        };

        handle.set_gain(inner.effective_gain());
        if let Err(e) = handle.play() {
            handle.detach();
            self.blobs.revoke(&resource.url);
            let e = into_media_error(e);
            inner.fail(&e);
            return Err(e);
        }

        inner.duration = handle.duration().or(song.duration);
        inner.current = Some(ActiveSession {
            song: song.clone(),
            resource,
            handle,
        });
        inner.loading = None;
        inner.status = PlaybackStatus::Playing;
        tracing::info!(song_id = %song.id, "Playing");
        Ok(PlaybackStatus::Playing)
    }

    /// Pauses if playing; otherwise a no-op.
    pub fn pause(&self) {
        let mut inner = self.lock();
        self.pause_locked(&mut inner);
    }

    /// Resumes if paused; otherwise a no-op.
    pub fn resume(&self) -> Result<()> {
        let mut inner = self.lock();
        self.resume_locked(&mut inner)
    }

    /// Pauses when playing, resumes when paused.
    pub fn toggle(&self) -> Result<()> {
        let mut inner = self.lock();
        let status = inner.status;
        match status {
            PlaybackStatus::Playing => {
                self.pause_locked(&mut inner);
                Ok(())
            }
            PlaybackStatus::Paused => self.resume_locked(&mut inner),
            _ => Ok(()),
        }
    }

    fn pause_locked(&self, inner: &mut PlaybackInner) {
        if inner.status != PlaybackStatus::Playing {
            return;
        }
        if let Some(active) = inner.current.as_mut() {
            active.handle.pause();
            inner.position = active.handle.position();
            inner.status = PlaybackStatus::Paused;
        }
    }

    fn resume_locked(&self, inner: &mut PlaybackInner) -> Result<()> {
        if inner.status != PlaybackStatus::Paused {
            return Ok(());
        }
        let resumed = match inner.current.as_mut() {
            Some(active) => active.handle.play(),
            None => return Ok(()),
        };
        match resumed {
            Ok(()) => {
                inner.status = PlaybackStatus::Playing;
                Ok(())
            }
            Err(e) => {
                let e = into_media_error(e);
                teardown(self.blobs.as_ref(), inner);
                inner.fail(&e);
                Err(e)
            }
        }
    }

    /// Shows `seconds` as the position while dragging; the media is untouched.
    pub fn seek_preview(&self, seconds: f64) {
        let mut inner = self.lock();
        if inner.current.is_none() {
            return;
        }
        inner.drag_position = Some(inner.clamp_to_duration(seconds));
    }

    /// Ends a drag and moves the playhead once, to `clamp(seconds, 0, duration)`.
    ///
    /// Returns the applied position, or `None` without an active session.
    pub fn seek_commit(&self, seconds: f64) -> Option<f64> {
        let mut inner = self.lock();
        inner.drag_position = None;
        let target = inner.clamp_to_duration(seconds);
        let active = inner.current.as_mut()?;
        active.handle.set_position(target);
        inner.position = target;
        Some(target)
    }

    /// Preview and commit in one step.
    pub fn seek(&self, seconds: f64) -> Option<f64> {
        self.seek_preview(seconds);
        self.seek_commit(seconds)
    }

    /// Stores `volume` (clamped to `[0, 1]`) and applies it unless muted.
    ///
    /// A volume of zero reports as muted without touching the mute flag.
    pub fn set_volume(&self, volume: f32) {
        let mut inner = self.lock();
        inner.volume = if volume.is_finite() { volume.clamp(0.0, 1.0) } else { 0.0 };
        let gain = inner.effective_gain();
        if let Some(active) = inner.current.as_mut() {
            active.handle.set_gain(gain);
        }
    }

    /// Flips the mute flag. Unmuting restores the stored volume.
    ///
    /// Returns the new mute state.
    pub fn toggle_mute(&self) -> bool {
        let mut inner = self.lock();
        inner.muted = !inner.muted;
        let gain = inner.effective_gain();
        if let Some(active) = inner.current.as_mut() {
            active.handle.set_gain(gain);
        }
        inner.muted
    }

    /// Drains media events and applies them.
    ///
    /// Call regularly while playing. Natural end tears the session down and
    /// returns to `Idle` at position 0; a media error tears it down into `Error`.
    pub fn sync(&self) -> PlaybackSnapshot {
        let mut inner = self.lock();

        let events = match inner.current.as_mut() {
            Some(active) => active.handle.poll_events(),
            None => Vec::new(),
        };

        for event in events {
            match event {
                MediaEvent::LoadedMetadata { duration } => {
                    inner.duration = Some(duration);
                }
                MediaEvent::TimeUpdate { position } => {
                    inner.position = position;
                }
                MediaEvent::Ended => {
                    tracing::info!("Playback ended");
                    teardown(self.blobs.as_ref(), &mut inner);
                    inner.status = PlaybackStatus::Idle;
                    inner.position = 0.0;
                    break;
                }
                MediaEvent::Error(message) => {
                    tracing::warn!("Media error: {}", message);
                    teardown(self.blobs.as_ref(), &mut inner);
                    inner.fail(&TunedeckError::media(message));
                    break;
                }
            }
        }

        Self::snapshot_of(&inner)
    }

    /// Stops playback, releases the media and cancels any load in flight.
    pub fn stop(&self) {
        let mut inner = self.lock();
        teardown(self.blobs.as_ref(), &mut inner);
        inner.generation += 1;
        inner.loading = None;
        inner.status = PlaybackStatus::Idle;
        inner.position = 0.0;
    }

    /// Final teardown; the controller stays usable afterwards.
    pub fn shutdown(&self) {
        self.stop();
        tracing::debug!(stats = ?self.blobs.stats(), "Playback shut down");
    }

    /// Id of the song owning the media element, if any.
    pub fn current_song_id(&self) -> Option<String> {
        self.lock().current.as_ref().map(|a| a.song.id.clone())
    }

    /// Id of the song playing or being fetched.
    pub fn target_song_id(&self) -> Option<String> {
        let inner = self.lock();
        inner
            .current
            .as_ref()
            .map(|a| a.song.id.clone())
            .or_else(|| inner.loading.as_ref().map(|s| s.id.clone()))
    }

    pub fn status(&self) -> PlaybackStatus {
        self.lock().status
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        Self::snapshot_of(&self.lock())
    }

    fn snapshot_of(inner: &PlaybackInner) -> PlaybackSnapshot {
        let song = inner
            .current
            .as_ref()
            .map(|a| a.song.clone())
            .or_else(|| inner.loading.clone());

        PlaybackSnapshot {
            status: inner.status,
            song,
            position: inner.drag_position.unwrap_or(inner.position),
            duration: inner.duration,
            volume: inner.volume,
            muted: inner.muted,
            effectively_muted: inner.muted || inner.volume == 0.0,
            seeking: inner.drag_position.is_some(),
            last_error: inner.last_error.clone(),
        }
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        let inner = self.inner.get_mut().unwrap_or_else(PoisonError::into_inner);
        teardown(self.blobs.as_ref(), inner);
    }
}

fn into_media_error(err: TunedeckError) -> TunedeckError {
    match err {
        TunedeckError::Media(_) => err,
        other => TunedeckError::media(other.to_string()),
    }
}
