//! Sign-in state: the token lifecycle between the API client and the token store.

use crate::api::client::ApiClient;
use crate::auth::error::TokenStoreError;
use crate::auth::token_store::TokenStore;
use crate::error::FloodAlertError;
use crate::types::user::Acknowledgement;
use log::{info, warn};
use std::sync::{Arc, RwLock};

/// Authentication state as seen by the UI.
///
/// `authenticated` is `None` until the stored token has been checked, so a splash
/// screen can tell "not yet known" apart from "signed out".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub token: Option<String>,
    pub authenticated: Option<bool>,
}

impl AuthState {
    fn signed_in(token: String) -> Self {
        Self {
            token: Some(token),
            authenticated: Some(true),
        }
    }

    fn signed_out() -> Self {
        Self {
            token: None,
            authenticated: Some(false),
        }
    }
}

/// Owns the sign-in/sign-out transitions.
///
/// The token is kept in three places that must agree: the [`TokenStore`], the
/// `Authorization` header of the [`ApiClient`], and the [`AuthState`].
pub struct Session {
    api: Arc<ApiClient>,
    store: Arc<dyn TokenStore>,
    state: RwLock<AuthState>,
}

impl Session {
    pub fn new(api: Arc<ApiClient>, store: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            store,
            state: RwLock::new(AuthState::default()),
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().authenticated == Some(true)
    }

    fn set_state(&self, state: AuthState) {
        *self.state.write().unwrap_or_else(|e| e.into_inner()) = state;
    }

    /// Persists `token`, attaches it to the client and marks the session signed in.
    pub(crate) fn establish(&self, token: String) -> Result<AuthState, FloodAlertError> {
        self.store.save(&token)?;
        self.api.set_token(Some(token.clone()));
        let state = AuthState::signed_in(token);
        self.set_state(state.clone());
        Ok(state)
    }

    /// Logs in and, on success, persists and attaches the returned token.
    /// A failed login leaves the previous state untouched.
    pub async fn sign_in(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthState, FloodAlertError> {
        let token = self.api.login(username, password).await?;
        self.establish(token)
    }

    /// Registers a new account. The caller still has to sign in afterwards.
    pub async fn sign_up(
        &self,
        username: &str,
        password: &str,
        password2: &str,
    ) -> Result<Acknowledgement, FloodAlertError> {
        Ok(self.api.register(username, password, password2).await?)
    }

    /// Clears the token everywhere. The in-memory state is cleared even when the
    /// store fails, in which case the store error is returned.
    pub fn sign_out(&self) -> Result<(), FloodAlertError> {
        self.api.set_token(None);
        self.set_state(AuthState::signed_out());
        self.store.clear()?;
        info!("Signed out");
        Ok(())
    }

    /// Restores a previous session on launch.
    ///
    /// A stored token is attached and checked against `user/me`. If there is no
    /// token, the stored token is unreadable, or the check fails for any reason, the
    /// session is signed out.
    pub async fn restore(&self) -> Result<AuthState, FloodAlertError> {
        info!("Checking for an existing token");
        let stored = match self.store.load() {
            Ok(stored) => stored,
            Err(TokenStoreError::Decode(path, e)) => {
                warn!(
                    "Stored token at {} is unreadable ({}), signing out",
                    path.display(),
                    e
                );
                None
            }
            Err(e) => return Err(e.into()),
        };
        let Some(token) = stored else {
            info!("No token found, signing out");
            self.sign_out()?;
            return Ok(self.state());
        };

        self.api.set_token(Some(token.clone()));
        match self.api.me().await {
            Ok(profile) => {
                info!("Token valid for {}", profile.username);
                let state = AuthState::signed_in(token);
                self.set_state(state.clone());
                Ok(state)
            }
            Err(e) => {
                warn!("Stored token rejected ({}), signing out", e);
                self.sign_out()?;
                Ok(self.state())
            }
        }
    }
}
