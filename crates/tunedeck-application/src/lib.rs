//! Application layer for TuneDeck.
//!
//! Use cases that drive the core traits: they hold no I/O of their own and are
//! wired to concrete adapters by the caller (see `tunedeck-infrastructure`).
//!
//! # Module Structure
//!
//! - `session`: [`SessionHolder`], the process-wide bearer token
//! - `catalog`: [`CatalogService`], the cached song list
//! - `playback`: [`PlaybackController`], the single playback session
//! - `transfer`: [`TransferService`], format-converted downloads
//! - `library`: [`LibraryService`], uploads and deletes
//! - `client`: [`MusicClient`], the facade tying them together
//!
//! # Usage
//!
//! ```ignore
//! let client = MusicClient::new(ClientParts { api, token_store, blobs, media, save_target, volume: 1.0 });
//! client.start().await?;
//! client.play_by_id("1").await?;
//! ```

pub mod catalog;
pub mod client;
pub mod library;
pub mod playback;
pub mod session;
pub mod transfer;

#[cfg(test)]
mod test_support;

pub use catalog::CatalogService;
pub use client::{ClientParts, MusicClient};
pub use library::{LibraryService, UploadMetadata, UPLOAD_EXTENSIONS};
pub use playback::PlaybackController;
pub use session::SessionHolder;
pub use transfer::TransferService;
