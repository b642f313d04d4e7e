//! Song domain module.
//!
//! # Module Structure
//!
//! - `model`: `Song` as listed by the backend, and the display helpers around it
//! - `format`: `AudioFormat`, the encodings a song can be streamed or downloaded in
//!
//! # Usage
//!
//! ```ignore
//! use tunedeck_core::song::{AudioFormat, Song};
//! ```

mod format;
mod model;

pub use format::AudioFormat;
pub use model::{format_duration, Song};
