//! Media domain module.
//!
//! Audio is played from fully buffered blobs. A blob is exposed through a
//! transient [`ObjectUrl`] that must be revoked once the media element using it
//! is gone.
//!
//! # Module Structure
//!
//! - `blob`: Transient resources (`ObjectUrl`, `MediaResource`, `BlobStore`)
//! - `backend`: The media element seam (`MediaBackend`, `MediaHandle`, `MediaEvent`)
//! - `playback`: Observable playback state (`PlaybackStatus`, `PlaybackSnapshot`)
//!
//! # Usage
//!
//! ```ignore
//! use tunedeck_core::media::{BlobStore, MediaBackend, PlaybackSnapshot};
//! ```

mod backend;
mod blob;
mod playback;

pub use backend::{MediaBackend, MediaEvent, MediaHandle};
pub use blob::{BlobStats, BlobStore, MediaResource, ObjectUrl};
pub use playback::{PlaybackSnapshot, PlaybackStatus};
