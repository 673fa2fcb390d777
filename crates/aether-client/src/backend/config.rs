//! Backend API client configuration.

use std::fmt;

/// Connection settings for the Aether backend.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL, no trailing slash (e.g. `http://127.0.0.1:8000`).
    pub base_url: String,
    /// Bearer token of the authenticated user, if any.
    pub token: Option<String>,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            token: None,
        }
    }

    /// Create config from the environment, falling back to localhost.
    ///
    /// Resolution order:
    /// 1. `AETHER_API_URL` env var
    /// 2. `http://127.0.0.1:8000`
    pub fn from_env() -> Self {
        match std::env::var("AETHER_API_URL") {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::new("http://127.0.0.1:8000"),
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}
