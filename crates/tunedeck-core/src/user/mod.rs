//! User domain module.
//!
//! # Module Structure
//!
//! - `model`: the profile returned by the auth endpoints and the credentials sent to them
//!
//! # Usage
//!
//! ```ignore
//! use tunedeck_core::user::{Credentials, Registration, UserProfile};
//! ```

mod model;

// Re-export public API
pub use model::{AuthGrant, Credentials, Registration, UserProfile};
