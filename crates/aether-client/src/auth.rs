//! Authenticated-user session.
//!
//! Wraps the login/signup/logout flows and keeps the user record persisted
//! across restarts. Auth failures propagate to the caller (the UI shows
//! them inline); only persistence hiccups are logged and swallowed.

use std::sync::Arc;

use tracing::warn;

use aether_config::{CredentialStore, StoredUser};

use crate::protocol::{LoginRequest, SignupRequest};
use crate::{ApiError, ChatBackend};

/// The logged-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub token: String,
}

impl From<StoredUser> for User {
    fn from(stored: StoredUser) -> Self {
        Self {
            id: stored.user_id,
            email: stored.email,
            name: stored.name,
            token: stored.token,
        }
    }
}

pub struct AuthSession {
    backend: Arc<dyn ChatBackend>,
    store: Option<CredentialStore>,
    user: Option<User>,
}

impl AuthSession {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            backend,
            store: None,
            user: None,
        }
    }

    /// Attach a credential store and restore any persisted user from it.
    pub fn with_store(mut self, store: CredentialStore) -> Self {
        self.user = store.load().map(User::from);
        self.store = Some(store);
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<&User, ApiError> {
        let response = self
            .backend
            .login(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .await?;

        self.install_user(User {
            id: response.user_id,
            email: response.email,
            name: response.name,
            token: response.token,
        });
        Ok(self.user.as_ref().unwrap())
    }

    pub async fn signup(
        &mut self,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<&User, ApiError> {
        let response = self
            .backend
            .signup(&SignupRequest {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                confirm_password: confirm_password.to_string(),
            })
            .await?;

        self.install_user(User {
            id: response.user_id,
            email: response.email,
            name: response.name,
            token: response.token,
        });
        Ok(self.user.as_ref().unwrap())
    }

    /// Forget the user in memory and on disk.
    pub fn logout(&mut self) {
        self.user = None;
        if let Some(store) = &self.store {
            if let Err(e) = store.clear() {
                warn!("failed to clear persisted credentials: {e}");
            }
        }
    }

    fn install_user(&mut self, user: User) {
        if let Some(store) = &self.store {
            let record = StoredUser {
                user_id: user.id.clone(),
                email: user.email.clone(),
                name: user.name.clone(),
                token: user.token.clone(),
            };
            if let Err(e) = store.save(&record) {
                warn!("failed to persist credentials: {e}");
            }
        }
        self.user = Some(user);
    }
}
