//! Playback Controller
//!
//! Owns the single playback session: fetches audio, wraps it in a blob,
//! drives a media handle and releases both when playback ends.
//!
//! # Module Structure
//!
//! - `controller`: [`PlaybackController`], the state machine and its resource bookkeeping

mod controller;

pub use controller::PlaybackController;
