//! Client core for the Aether chat backend.
//!
//! Provides:
//! - An HTTP client for the backend REST API (auth, chat, upload,
//!   conversation history)
//! - The session orchestrator: conversation identity, message history,
//!   in-flight request state, feature toggles
//! - The MCP plugin/tool registry and the selectable model catalog
//!
//! All business logic (inference, RAG, web search, tool execution) lives in
//! the backend; this crate is presentation-side state orchestration only.

pub mod auth;
pub mod backend;
pub mod models;
pub mod plugins;
pub mod protocol;
pub mod session;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub use auth::AuthSession;
pub use backend::{ApiConfig, HttpBackend};
pub use models::{ChatModel, ModelProvider, CHAT_MODELS};
pub use plugins::{McpPlugin, McpTool, PluginSet};
pub use session::{ChatSession, ConversationIdentity, UploadResult};

use protocol::{
    AuthResponse, ChatRequest, ChatResponse, ConversationDto, LoginRequest, SignupRequest,
    UploadResponse,
};

/// The backend REST surface the client talks to. `HttpBackend` is the real
/// implementation; tests drive the orchestrator with a mock.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn login(&self, req: &LoginRequest) -> Result<AuthResponse, ApiError>;

    async fn signup(&self, req: &SignupRequest) -> Result<AuthResponse, ApiError>;

    async fn send_chat(&self, req: &ChatRequest) -> Result<ChatResponse, ApiError>;

    async fn upload_document(
        &self,
        conversation_id: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, ApiError>;

    async fn list_conversations(&self) -> Result<Vec<ConversationDto>, ApiError>;

    async fn get_conversation(&self, id: &str) -> Result<ConversationDto, ApiError>;
}

/// A single chat message. Immutable once appended to a conversation.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<Source>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools_used: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl Message {
    /// A plain message with a freshly minted id and no extras.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: aether_common::new_id(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
            sources: Vec::new(),
            image_url: None,
            tools_used: Vec::new(),
            attachments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A retrieval/web-search citation attached to an assistant message.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Source {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

/// A file attached to an outgoing user message, produced by the upload flow.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Attachment {
    pub kind: AttachmentKind,
    /// Data URI or remote URL.
    pub url: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    File,
}

/// Summary form of a backend conversation, as cached in the sidebar list.
#[derive(Debug, Clone)]
pub struct ConversationSummary {
    pub id: aether_common::ConversationId,
    pub title: String,
    pub date: DateTime<Utc>,
    pub messages: Vec<Message>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Backend answered with a non-2xx status; carries the `detail` text
    /// (or the per-endpoint fallback when the body was unparseable).
    #[error("API error: {0}")]
    Api(String),
    /// The request never reached the server.
    #[error("network error: {0}")]
    Network(String),
    /// A 2xx response whose body could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}
