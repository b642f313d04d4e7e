//! Headless media backend driven by the wall clock.
//!
//! There is no audio output: a handle tracks where playback *would* be from
//! the moment it was started, the time spent paused, and the stream length.
//! It emits the same events a media element would (metadata, time updates,
//! end of stream), so the playback controller can run unchanged in a terminal.

use std::collections::VecDeque;
use std::time::Instant;
use tunedeck_core::media::{MediaBackend, MediaEvent, MediaHandle, MediaResource};
use tunedeck_core::{Result, TunedeckError};

/// Bitrate assumed for compressed audio with no known length.
const ASSUMED_BITRATE_BPS: f64 = 128_000.0;

/// [`MediaBackend`] producing [`ClockHandle`]s.
#[derive(Debug, Clone, Default)]
pub struct ClockMediaBackend;

impl ClockMediaBackend {
    pub fn new() -> Self {
        Self
    }
}

impl MediaBackend for ClockMediaBackend {
    fn open(
        &self,
        resource: &MediaResource,
        duration_hint: Option<f64>,
    ) -> Result<Box<dyn MediaHandle>> {
        let header = read_header(resource)?;
        let duration = duration_hint
            .filter(|d| d.is_finite() && *d > 0.0)
            .or_else(|| wav_duration(&header, resource.size))
            .unwrap_or_else(|| resource.size as f64 * 8.0 / ASSUMED_BITRATE_BPS);

        tracing::debug!(url = %resource.url, duration, "Opened clock media handle");
        Ok(Box::new(ClockHandle::new(duration)))
    }
}

fn read_header(resource: &MediaResource) -> Result<Vec<u8>> {
    use std::io::Read;

    let file = std::fs::File::open(&resource.location).map_err(|e| {
        TunedeckError::media(format!("Cannot open {}: {}", resource.url, e))
    })?;
    let mut header = Vec::with_capacity(44);
    file.take(44)
        .read_to_end(&mut header)
        .map_err(|e| TunedeckError::media(format!("Cannot read {}: {}", resource.url, e)))?;

    if header.is_empty() {
        return Err(TunedeckError::media(format!("{} is empty", resource.url)));
    }
    Ok(header)
}

/// Length of a canonical PCM WAV file from its RIFF header.
fn wav_duration(header: &[u8], size: u64) -> Option<f64> {
    if header.len() < 44 || &header[0..4] != b"RIFF" || &header[8..12] != b"WAVE" {
        return None;
    }
    let byte_rate = u32::from_le_bytes([header[28], header[29], header[30], header[31]]);
    if byte_rate == 0 {
        return None;
    }
    Some(size.saturating_sub(44) as f64 / byte_rate as f64)
}

/// One headless "media element".
pub struct ClockHandle {
    duration: f64,
    /// Position when the clock was last anchored.
    anchor_position: f64,
    /// Set while playing.
    started_at: Option<Instant>,
    gain: f32,
    events: VecDeque<MediaEvent>,
    metadata_sent: bool,
    detached: bool,
}

impl ClockHandle {
    fn new(duration: f64) -> Self {
        Self {
            duration,
            anchor_position: 0.0,
            started_at: None,
            gain: 1.0,
            events: VecDeque::new(),
            metadata_sent: false,
            detached: false,
        }
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn is_playing(&self) -> bool {
        self.started_at.is_some()
    }

    fn raw_position(&self) -> f64 {
        match self.started_at {
            Some(started) => self.anchor_position + started.elapsed().as_secs_f64(),
            None => self.anchor_position,
        }
    }
}

impl MediaHandle for ClockHandle {
    fn play(&mut self) -> Result<()> {
        if self.started_at.is_some() {
            return Ok(());
        }
        if self.anchor_position >= self.duration {
            self.anchor_position = 0.0;
        }
        self.started_at = Some(Instant::now());
        Ok(())
    }

    fn pause(&mut self) {
        if self.started_at.is_some() {
            self.anchor_position = self.raw_position().min(self.duration);
            self.started_at = None;
        }
    }

    fn set_position(&mut self, seconds: f64) {
        self.anchor_position = seconds.clamp(0.0, self.duration);
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }

    fn position(&self) -> f64 {
        self.raw_position().min(self.duration)
    }

    fn duration(&self) -> Option<f64> {
        Some(self.duration)
    }

    fn set_gain(&mut self, gain: f32) {
        self.gain = gain.clamp(0.0, 1.0);
    }

    fn poll_events(&mut self) -> Vec<MediaEvent> {
        if self.detached {
            return Vec::new();
        }

        if !self.metadata_sent {
            self.metadata_sent = true;
            self.events.push_back(MediaEvent::LoadedMetadata {
                duration: self.duration,
            });
        }

        if self.started_at.is_some() {
            let position = self.raw_position();
            if position >= self.duration {
                self.anchor_position = self.duration;
                self.started_at = None;
                self.events.push_back(MediaEvent::TimeUpdate {
                    position: self.duration,
                });
                self.events.push_back(MediaEvent::Ended);
            } else {
                self.events.push_back(MediaEvent::TimeUpdate { position });
            }
        }

        self.events.drain(..).collect()
    }

    fn detach(&mut self) {
        self.detached = true;
        self.events.clear();
    }
}
