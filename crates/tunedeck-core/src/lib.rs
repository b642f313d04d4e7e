//! Domain layer for TuneDeck.
//!
//! Models, the shared error type, and the traits the infrastructure layer
//! implements (`TokenStore`, `MusicApi`, `BlobStore`, `MediaBackend`, `SaveTarget`).

pub mod api;
pub mod config;
pub mod error;
pub mod media;
pub mod session;
pub mod song;
pub mod transfer;
pub mod user;

// Re-export common error type
pub use error::{Result, TunedeckError};
