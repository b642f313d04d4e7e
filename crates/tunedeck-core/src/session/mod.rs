//! Session domain module.
//!
//! This module contains the persisted login session and the repository
//! interface that keeps it durable across restarts.
//!
//! # Module Structure
//!
//! - `model`: The persisted session record (`StoredSession`)
//! - `repository`: Repository trait for token persistence (`TokenStore`)
//!
//! # Usage
//!
//! ```ignore
//! use tunedeck_core::session::{StoredSession, TokenStore};
//! ```

mod model;
mod repository;

// Re-export public API
pub use model::StoredSession;
pub use repository::TokenStore;
