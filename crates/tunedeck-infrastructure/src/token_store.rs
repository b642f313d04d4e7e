//! TOML-backed token store.
//!
//! Persists the bearer token in `session.toml` so a restart keeps the user
//! logged in.

use crate::paths::TunedeckPaths;
use crate::storage::AtomicTomlFile;
use async_trait::async_trait;
use std::path::PathBuf;
use tunedeck_core::session::{StoredSession, TokenStore};
use tunedeck_core::Result;

/// [`TokenStore`] over an atomic, user-private TOML file.
///
/// # Example
///
/// ```ignore
/// use tunedeck_infrastructure::{TomlTokenStore, TunedeckPaths};
///
/// let store = TomlTokenStore::from_paths(&TunedeckPaths::from_env())?;
/// let session = store.load().await?;
/// ```
pub struct TomlTokenStore {
    file: AtomicTomlFile<StoredSession>,
}

impl TomlTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicTomlFile::new(path).private(),
        }
    }

    pub fn from_paths(paths: &TunedeckPaths) -> Result<Self> {
        Ok(Self::new(paths.session_file()?))
    }
}

#[async_trait]
impl TokenStore for TomlTokenStore {
    async fn load(&self) -> Result<Option<StoredSession>> {
        let session = self.file.load()?;
        // A hand-edited file with an empty token counts as logged out
        Ok(session.filter(|s| !s.token.trim().is_empty()))
    }

    async fn save(&self, session: &StoredSession) -> Result<()> {
        self.file.save(session)?;
        tracing::debug!(path = %self.file.path().display(), "Session persisted");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.file.remove()?;
        tracing::debug!(path = %self.file.path().display(), "Session cleared");
        Ok(())
    }
}
