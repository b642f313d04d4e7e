//! Media element seam.

use super::blob::MediaResource;
use crate::error::Result;

/// Notifications a media handle queues for its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// The length became known.
    LoadedMetadata { duration: f64 },
    /// Playback advanced to `position` seconds.
    TimeUpdate { position: f64 },
    /// Playback reached the end of the stream.
    Ended,
    /// Decoding or output failed; the handle is unusable.
    Error(String),
}

/// One opened media element.
///
/// Events are queued until drained with [`MediaHandle::poll_events`]. After
/// [`MediaHandle::detach`] no further events are delivered.
pub trait MediaHandle: Send {
    fn play(&mut self) -> Result<()>;

    fn pause(&mut self);

    /// Moves the playhead. Callers clamp to `[0, duration]` first.
    fn set_position(&mut self, seconds: f64);

    fn position(&self) -> f64;

    /// Known length in seconds, once metadata has loaded.
    fn duration(&self) -> Option<f64>;

    /// Output gain in `[0, 1]`.
    fn set_gain(&mut self, gain: f32);

    fn poll_events(&mut self) -> Vec<MediaEvent>;

    /// Drops every event subscription.
    fn detach(&mut self);
}

/// Opens media handles over buffered resources.
pub trait MediaBackend: Send + Sync {
    /// `duration_hint` comes from the catalog and is used until metadata loads.
    fn open(
        &self,
        resource: &MediaResource,
        duration_hint: Option<f64>,
    ) -> Result<Box<dyn MediaHandle>>;
}
