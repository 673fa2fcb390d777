//! Persisted credentials for the authenticated user.
//!
//! The user record (id, email, name, bearer token) is written as JSON next
//! to the config file and survives restarts. Clearing it on logout removes
//! the file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use aether_common::ConfigError;

/// The authenticated user as returned by the login/signup endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUser {
    pub user_id: String,
    pub email: String,
    pub name: Option<String>,
    pub token: String,
}

/// Reads and writes the credentials file.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Store at the platform default path (`~/.config/aether/credentials.json`).
    pub fn default_store() -> Result<Self, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))?;
        Ok(Self::at_path(
            config_dir.join("aether").join("credentials.json"),
        ))
    }

    /// Store at an explicit path. Used by tests.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted user, if any. A missing or unreadable file is
    /// treated as "not logged in" rather than an error; a corrupt file is
    /// removed so the next login starts clean.
    pub fn load(&self) -> Option<StoredUser> {
        let data = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&data) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("discarding corrupt credentials file: {e}");
                let _ = std::fs::remove_file(&self.path);
                None
            }
        }
    }

    pub fn save(&self, user: &StoredUser) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::WriteError(format!(
                    "failed to create credentials directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let json = serde_json::to_string_pretty(user)
            .map_err(|e| ConfigError::WriteError(format!("failed to serialize user: {e}")))?;

        std::fs::write(&self.path, json).map_err(|e| {
            ConfigError::WriteError(format!(
                "failed to write credentials to {}: {e}",
                self.path.display()
            ))
        })?;

        debug!(path = %self.path.display(), "Credentials saved");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), ConfigError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ConfigError::WriteError(format!(
                "failed to remove credentials at {}: {e}",
                self.path.display()
            ))),
        }
    }
}
