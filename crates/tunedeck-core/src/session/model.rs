//! Persisted session record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What survives a restart: the bearer token and who it was issued to.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    #[serde(default)]
    pub username: Option<String>,
    pub saved_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn new(token: impl Into<String>, username: Option<String>) -> Self {
        Self {
            token: token.into(),
            username,
            saved_at: Utc::now(),
        }
    }
}

impl std::fmt::Debug for StoredSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoredSession")
            .field("token", &"<redacted>")
            .field("username", &self.username)
            .field("saved_at", &self.saved_at)
            .finish()
    }
}
