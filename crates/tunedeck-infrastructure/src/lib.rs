//! Infrastructure layer for TuneDeck.
//!
//! Concrete implementations of the `tunedeck-core` traits: the HTTP backend
//! client, file-backed token and config storage, temp-file blobs, the headless
//! media backend, and the download directory.

pub mod blob_store;
pub mod clock_media;
pub mod config_service;
pub mod http_api;
pub mod paths;
pub mod save_target;
pub mod storage;
pub mod token_store;

pub use crate::blob_store::TempFileBlobStore;
pub use crate::clock_media::ClockMediaBackend;
pub use crate::config_service::ConfigService;
pub use crate::http_api::HttpMusicApi;
pub use crate::paths::TunedeckPaths;
pub use crate::save_target::DirectorySaveTarget;
pub use crate::token_store::TomlTokenStore;
