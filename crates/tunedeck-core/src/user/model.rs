//! User profile and credential models.

use serde::{Deserialize, Serialize};

/// The logged-in user as returned by `GET /api/auth/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(alias = "_id", default)]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserProfile {
    /// Profile known only by name, as returned by login/register without a `user` object.
    pub fn from_username(username: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            username: username.into(),
            email: None,
        }
    }
}

/// Body of `POST /api/auth/login`.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Body of `POST /api/auth/register`.
#[derive(Clone, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A successful login or registration: the bearer token plus whoever it belongs to.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthGrant {
    pub token: String,
    pub user: UserProfile,
}

impl std::fmt::Debug for AuthGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGrant")
            .field("token", &"<redacted>")
            .field("user", &self.user)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_from_backend() {
        let json = r#"{"_id": "abc", "username": "ana", "email": "ana@example.com"}"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.id, "abc");
        assert_eq!(profile.email.as_deref(), Some("ana@example.com"));
    }

    #[test]
    fn test_debug_hides_secrets() {
        let creds = Credentials::new("ana", "hunter2");
        assert!(!format!("{:?}", creds).contains("hunter2"));

        let grant = AuthGrant {
            token: "t1".to_string(),
            user: UserProfile::from_username("ana"),
        };
        assert!(!format!("{:?}", grant).contains("t1"));
    }
}
