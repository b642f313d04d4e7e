use std::sync::Arc;
use tokio::sync::RwLock;
use tunedeck_core::api::MusicApi;
use tunedeck_core::error::{Result, TunedeckError};
use tunedeck_core::session::{StoredSession, TokenStore};
use tunedeck_core::user::{AuthGrant, Credentials, Registration, UserProfile};

#[derive(Default)]
struct SessionState {
    token: Option<String>,
    user: Option<UserProfile>,
}

/// Holds the bearer token for the whole process.
///
/// `SessionHolder` is responsible for:
/// - Logging in and registering
/// - Persisting the token through a [`TokenStore`]
/// - Restoring and validating a persisted token on startup
/// - Dropping the session when an auth endpoint rejects it
///
/// Other services read the token through [`SessionHolder::require_token`] and
/// pass it explicitly to each [`MusicApi`] call.
pub struct SessionHolder {
    api: Arc<dyn MusicApi>,
    store: Arc<dyn TokenStore>,
    state: RwLock<SessionState>,
}

impl SessionHolder {
    /// Creates a logged-out holder. Call [`SessionHolder::restore`] to pick up
    /// a persisted token.
    pub fn new(api: Arc<dyn MusicApi>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            store,
            state: RwLock::new(SessionState::default()),
        }
    }

    pub async fn get_token(&self) -> Option<String> {
        self.state.read().await.token.clone()
    }

    /// The current token, or `NotAuthenticated` so the caller can route to login.
    pub async fn require_token(&self) -> Result<String> {
        self.get_token().await.ok_or(TunedeckError::NotAuthenticated)
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.token.is_some()
    }

    pub async fn current_user(&self) -> Option<UserProfile> {
        self.state.read().await.user.clone()
    }

    /// Persists `token` and makes it the active credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be persisted; the in-memory session
    /// is left unchanged in that case.
    pub async fn set_token(&self, token: String, user: Option<UserProfile>) -> Result<()> {
        let stored = StoredSession::new(token.clone(), user.as_ref().map(|u| u.username.clone()));
        self.store.save(&stored).await?;

        let mut state = self.state.write().await;
        state.token = Some(token);
        state.user = user;
        Ok(())
    }

    /// Drops the in-memory session and removes the persisted token.
    ///
    /// The in-memory session is cleared even when the store fails.
    pub async fn clear_token(&self) -> Result<()> {
        {
            let mut state = self.state.write().await;
            state.token = None;
            state.user = None;
        }
        self.store.clear().await
    }

    pub async fn logout(&self) -> Result<()> {
        tracing::info!("Logging out");
        self.clear_token().await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<UserProfile> {
        let credentials = Credentials::new(username, password);
        let grant = match self.api.login(&credentials).await {
            Ok(grant) => grant,
            Err(e) => return Err(self.reject_on_auth_error(e).await),
        };
        self.accept(grant).await
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<UserProfile> {
        let registration = Registration {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let grant = match self.api.register(&registration).await {
            Ok(grant) => grant,
            Err(e) => return Err(self.reject_on_auth_error(e).await),
        };
        self.accept(grant).await
    }

    /// Fetches the profile for the current token and records it.
    pub async fn fetch_profile(&self) -> Result<UserProfile> {
        let token = self.require_token().await?;
        match self.api.profile(&token).await {
            Ok(profile) => {
                self.state.write().await.user = Some(profile.clone());
                Ok(profile)
            }
            Err(e) => Err(self.reject_on_auth_error(e).await),
        }
    }

    /// Attempts to restore the persisted session on startup.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(profile))`: a token was found and the backend accepted it
    /// - `Ok(None)`: nothing persisted, or the backend rejected the token
    ///   (the session has been cleared)
    ///
    /// # Errors
    ///
    /// Storage failures, and profile failures other than an auth rejection.
    /// On a network error the token is kept so a later call can retry.
    pub async fn restore(&self) -> Result<Option<UserProfile>> {
        let Some(stored) = self.store.load().await? else {
            return Ok(None);
        };

        {
            let mut state = self.state.write().await;
            state.token = Some(stored.token.clone());
            state.user = stored.username.map(UserProfile::from_username);
        }

        match self.fetch_profile().await {
            Ok(profile) => {
                tracing::info!(username = %profile.username, "Session restored");
                Ok(Some(profile))
            }
            Err(e) if e.is_auth_rejection() => {
                tracing::info!("Persisted session was rejected; logged out");
                Ok(None)
            }
            Err(e) => {
                tracing::warn!("Could not validate persisted session: {}", e);
                Err(e)
            }
        }
    }

    async fn accept(&self, grant: AuthGrant) -> Result<UserProfile> {
        let user = grant.user.clone();
        self.set_token(grant.token, Some(user.clone())).await?;
        tracing::info!(username = %user.username, "Logged in");
        Ok(user)
    }

    /// Auth endpoints only: a 401/422 clears the session.
    async fn reject_on_auth_error(&self, err: TunedeckError) -> TunedeckError {
        if err.is_auth_rejection() {
            if let Err(clear_err) = self.clear_token().await {
                tracing::warn!("Failed to clear persisted session: {}", clear_err);
            }
        }
        err
    }
}
