//! Wire types for the backend REST API.
//!
//! Field names match the backend's JSON exactly; the session layer maps
//! these into the domain types in the crate root.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Role, Source};

/// `POST /api/auth/login` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /api/auth/signup` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Success body of both auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user_id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    pub token: String,
}

/// `POST /api/chat` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub conversation_id: String,
    pub model: String,
    pub use_rag: bool,
    pub web_search: bool,
    pub image_generation: bool,
    /// Ids of enabled plugins.
    pub enabled_mcps: Vec<String>,
    /// Enabled plugin id -> ids of its enabled tools. A plugin with zero
    /// enabled tools still appears here with an empty list.
    pub enabled_tools: HashMap<String, Vec<String>>,
    pub message: String,
}

/// `POST /api/chat` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub conversation_id: Option<String>,
    pub message: String,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub tools_used: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// `POST /api/upload` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub filename: String,
    #[serde(rename = "type")]
    pub kind: UploadKind,
    /// Data URI of the uploaded image; absent for documents.
    #[serde(default)]
    pub image_data: Option<String>,
}

/// What the backend made of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadKind {
    Image,
    /// Anything the backend indexed for retrieval (PDF, TXT, ...).
    #[serde(other)]
    Document,
}

/// One message inside a backend conversation payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDto {
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// `GET /api/conversations/{id}` body, and the element type of the list call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationDto {
    pub conversation_id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub messages: Vec<MessageDto>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// `GET /api/conversations` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationListResponse {
    #[serde(default)]
    pub conversations: Vec<ConversationDto>,
}

/// Error body carried by non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}
