//! Token store trait.
//!
//! Defines the interface for durable token persistence.

use super::model::StoredSession;
use crate::error::Result;
use async_trait::async_trait;

/// Durable storage for the bearer token.
///
/// The in-memory token lives in the session holder; this store only makes it
/// survive a restart.
///
/// # Security Note
///
/// Implementations should keep the backing file private to the user
/// (0600 on Unix) and must never log the token.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Loads the persisted session.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(StoredSession))`: A token was persisted
    /// - `Ok(None)`: Nothing stored (first run, or after logout)
    /// - `Err(_)`: The store exists but could not be read
    async fn load(&self) -> Result<Option<StoredSession>>;

    /// Replaces the persisted session.
    async fn save(&self, session: &StoredSession) -> Result<()>;

    /// Removes any persisted session. Clearing an empty store is not an error.
    async fn clear(&self) -> Result<()>;
}
