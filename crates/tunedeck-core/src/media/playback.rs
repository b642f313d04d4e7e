//! Observable playback state.

use crate::song::Song;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Playback controller states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    #[default]
    Idle,
    Loading,
    Playing,
    Paused,
    Error,
}

/// Point-in-time view of the playback controller, for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackSnapshot {
    pub status: PlaybackStatus,
    /// The song being loaded or played.
    pub song: Option<Song>,
    /// Playhead in seconds; while a seek drag is active this is the drag position.
    pub position: f64,
    pub duration: Option<f64>,
    pub volume: f32,
    /// Explicit mute flag.
    pub muted: bool,
    /// True when muted explicitly or when the volume is zero.
    pub effectively_muted: bool,
    pub seeking: bool,
    pub last_error: Option<String>,
}

impl PlaybackSnapshot {
    pub fn is_playing(&self) -> bool {
        self.status == PlaybackStatus::Playing
    }

    /// Progress in `[0, 1]`, or 0 when the duration is unknown.
    pub fn progress(&self) -> f64 {
        match self.duration {
            Some(duration) if duration > 0.0 => (self.position / duration).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(position: f64, duration: Option<f64>) -> PlaybackSnapshot {
        PlaybackSnapshot {
            status: PlaybackStatus::Playing,
            song: None,
            position,
            duration,
            volume: 1.0,
            muted: false,
            effectively_muted: false,
            seeking: false,
            last_error: None,
        }
    }

    #[test]
    fn test_progress() {
        assert_eq!(snapshot(30.0, Some(120.0)).progress(), 0.25);
        assert_eq!(snapshot(30.0, None).progress(), 0.0);
        assert_eq!(snapshot(500.0, Some(120.0)).progress(), 1.0);
    }

    #[test]
    fn test_status_display() {
        assert_eq!(PlaybackStatus::Paused.to_string(), "paused");
        assert!(snapshot(0.0, None).is_playing());
    }
}
