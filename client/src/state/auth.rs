//! Auth-session state for the current operator.
//!
//! SYSTEM CONTEXT
//! ==============
//! One [`AuthContext`] is created at startup and cloned into every view. It
//! is initialised once (validating any stored credential) and torn down on
//! logout (clearing the credential and redirecting to login).

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use models::User;
use tokio::sync::RwLock;

use crate::net::{ApiClient, ApiError};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("credential store failed: {0}")]
    Store(#[from] io::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Where an unauthenticated caller should be sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Redirect {
    Login,
}

/// Authentication state tracking the current user and loading status.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub loading: bool,
}

/// Persistence for the bearer credential between runs.
pub trait TokenStore: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the store exists but cannot be read.
    fn load(&self) -> io::Result<Option<String>>;

    /// # Errors
    ///
    /// Returns an error if the token cannot be written.
    fn save(&self, token: &str) -> io::Result<()>;

    /// Remove the stored token. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing token cannot be removed.
    fn clear(&self) -> io::Result<()>;
}

/// Token kept in a single file, created with its parent directories on save.
#[derive(Clone, Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| token.to_owned()))
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error),
        }
    }

    fn save(&self, token: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token)
    }

    fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// In-process store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self { token: Mutex::new(Some(token.to_owned())) }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> io::Result<Option<String>> {
        Ok(self.token.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, token: &str) -> io::Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Process-wide session handle. Clones share state.
#[derive(Clone)]
pub struct AuthContext {
    api: ApiClient,
    store: Arc<dyn TokenStore>,
    state: Arc<RwLock<AuthState>>,
}

impl AuthContext {
    /// A context that has not been initialised yet: `loading` is true until
    /// [`AuthContext::init`] completes.
    pub fn new(api: ApiClient, store: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            store,
            state: Arc::new(RwLock::new(AuthState { user: None, loading: true })),
        }
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub async fn state(&self) -> AuthState {
        self.state.read().await.clone()
    }

    pub async fn user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    /// Validate the stored credential, if any.
    ///
    /// A credential the backend refuses (401/403) is dropped from both the
    /// client and the store; the session simply ends up logged out. Any other
    /// failure keeps the stored credential for the next run.
    ///
    /// # Errors
    ///
    /// Returns an error if the token store fails, or if the credential could
    /// not be checked because the backend was unreachable or misbehaved.
    pub async fn init(&self) -> Result<Option<User>, AuthError> {
        self.state.write().await.loading = true;
        let result = self.validate_stored().await;

        let mut state = self.state.write().await;
        state.user = result.as_ref().ok().cloned().flatten();
        state.loading = false;
        result
    }

    async fn validate_stored(&self) -> Result<Option<User>, AuthError> {
        let Some(token) = self.store.load()? else {
            return Ok(None);
        };
        self.api.set_token(Some(token)).await;
        match self.api.current_user().await {
            Ok(user) => {
                tracing::debug!(user_id = %user.id, "stored credential accepted");
                Ok(Some(user))
            }
            Err(error) if error.is_unauthorized() => {
                tracing::warn!(%error, "stored credential rejected; clearing");
                self.api.set_token(None).await;
                self.store.clear()?;
                Ok(None)
            }
            Err(error) => {
                tracing::warn!(%error, "could not validate stored credential");
                Err(error.into())
            }
        }
    }

    /// Exchange credentials for a token and persist it.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses the login or the token cannot
    /// be stored.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let response = self.api.login(email, password).await?;
        self.store.save(&response.token)?;
        self.api.set_token(Some(response.token)).await;

        let mut state = self.state.write().await;
        state.user = Some(response.user.clone());
        state.loading = false;
        tracing::info!(user_id = %response.user.id, "logged in");
        Ok(response.user)
    }

    /// Clear the credential everywhere and send the caller to login.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored token cannot be removed.
    pub async fn logout(&self) -> Result<Redirect, AuthError> {
        self.api.set_token(None).await;
        self.store.clear()?;
        let mut state = self.state.write().await;
        state.user = None;
        state.loading = false;
        tracing::info!("logged out");
        Ok(Redirect::Login)
    }

    /// Route guard: the current user, or a redirect to login while nobody is
    /// signed in (including while init is still running).
    ///
    /// # Errors
    ///
    /// Returns [`Redirect::Login`] when no user is authenticated.
    pub async fn require_user(&self) -> Result<User, Redirect> {
        self.state.read().await.user.clone().ok_or(Redirect::Login)
    }
}
