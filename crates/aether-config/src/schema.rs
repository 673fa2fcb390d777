//! Configuration schema types for the Aether client.
//!
//! All structs use `serde(default)` so partial configs work correctly.

use serde::{Deserialize, Serialize};

use crate::theme::Theme;

/// Top-level client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// UI theme preference. Cosmetic only; persisted across runs.
    pub theme: Theme,
    pub api: ApiSection,
    pub chat: ChatSection,
}

/// Backend API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    /// Base URL of the Aether backend.
    pub base_url: String,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".into(),
        }
    }
}

/// Chat defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSection {
    /// Model selected at startup.
    pub default_model: String,
}

impl Default for ChatSection {
    fn default() -> Self {
        Self {
            default_model: "meta-llama/llama-3.3-70b-instruct:free".into(),
        }
    }
}
