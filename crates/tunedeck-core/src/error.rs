//! Error types for the TuneDeck client.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for every TuneDeck crate.
///
/// Each operation converts its failures into one of these variants at its own
/// boundary. Only [`TunedeckError::Auth`] coming from an auth endpoint is allowed
/// to cascade into a session reset.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum TunedeckError {
    /// No bearer token is held; the caller should route to login.
    #[error("Not authenticated: please log in")]
    NotAuthenticated,

    /// The backend rejected the credentials (401/422)
    #[error("Authentication rejected ({status}): {message}")]
    Auth { status: u16, message: String },

    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Transport failure (connect, timeout, body read). Retryable.
    #[error("Network error: {0}")]
    Network(String),

    /// Any other non-2xx response
    #[error("HTTP error ({status}): {message}")]
    Http { status: u16, message: String },

    /// The media element failed to open, play or decode
    #[error("Media error: {0}")]
    Media(String),

    /// The backend answered 2xx with a body we could not use
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Client-side input validation failed before any request was made
    #[error("Validation error: {0}")]
    Validation(String),

    /// A newer load replaced this one before it completed
    #[error("Load superseded by a newer request")]
    Superseded,

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl TunedeckError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an Auth error
    pub fn auth(status: u16, message: impl Into<String>) -> Self {
        Self::Auth {
            status,
            message: message.into(),
        }
    }

    /// Creates an Http error
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a Media error
    pub fn media(message: impl Into<String>) -> Self {
        Self::Media(message.into())
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates an InvalidResponse error
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a NotAuthenticated error
    pub fn is_not_authenticated(&self) -> bool {
        matches!(self, Self::NotAuthenticated)
    }

    /// Check if the backend rejected the credentials (401 or 422).
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Whether the caller should be sent back to the login screen.
    pub fn requires_login(&self) -> bool {
        self.is_not_authenticated() || self.is_auth_rejection()
    }

    /// Check if retrying the same request may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Check if this is a Superseded error
    pub fn is_superseded(&self) -> bool {
        matches!(self, Self::Superseded)
    }

    /// Check if this is an IO error
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. } | Self::Http { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for TunedeckError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for TunedeckError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for TunedeckError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for TunedeckError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// Transport-level reqwest failures. Status handling happens in the HTTP adapter,
/// which sees the response body; this only covers errors without one.
impl From<reqwest::Error> for TunedeckError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::InvalidResponse(err.to_string());
        }
        if let Some(status) = err.status() {
            return Self::http(status.as_u16(), err.to_string());
        }
        Self::Network(err.to_string())
    }
}

/// A type alias for `Result<T, TunedeckError>`.
pub type Result<T> = std::result::Result<T, TunedeckError>;
