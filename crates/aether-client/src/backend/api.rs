//! ChatBackend trait implementation for HttpBackend.

use async_trait::async_trait;
use tracing::debug;

use crate::protocol::{
    AuthResponse, ChatRequest, ChatResponse, ConversationDto, ConversationListResponse,
    LoginRequest, SignupRequest, UploadResponse,
};
use crate::{ApiError, ChatBackend};

use super::client::HttpBackend;

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn login(&self, req: &LoginRequest) -> Result<AuthResponse, ApiError> {
        debug!(email = %req.email, "login request");

        let response = self
            .http
            .post(self.url("/api/auth/login"))
            .json(req)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response, "Invalid credentials").await);
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn signup(&self, req: &SignupRequest) -> Result<AuthResponse, ApiError> {
        debug!(email = %req.email, "signup request");

        let response = self
            .http
            .post(self.url("/api/auth/signup"))
            .json(req)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response, "Signup failed").await);
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn send_chat(&self, req: &ChatRequest) -> Result<ChatResponse, ApiError> {
        debug!(
            conversation = %req.conversation_id,
            model = %req.model,
            use_rag = req.use_rag,
            "chat request"
        );

        let response = self
            .authorize(self.http.post(self.url("/api/chat")))
            .json(req)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response, "Unknown error occurred").await);
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn upload_document(
        &self,
        conversation_id: &str,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResponse, ApiError> {
        debug!(conversation = %conversation_id, file = %filename, "upload request");

        let mime = mime_guess::from_path(filename).first_or_octet_stream();
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime.as_ref())
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("conversation_id", conversation_id.to_string());

        let response = self
            .authorize(self.http.post(self.url("/api/upload")))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response, "Upload failed").await);
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn list_conversations(&self) -> Result<Vec<ConversationDto>, ApiError> {
        let response = self
            .authorize(self.http.get(self.url("/api/conversations")))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(
                Self::error_from_response(response, "Failed to load conversations").await,
            );
        }

        let list: ConversationListResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;
        Ok(list.conversations)
    }

    async fn get_conversation(&self, id: &str) -> Result<ConversationDto, ApiError> {
        let response = self
            .authorize(self.http.get(self.url(&format!("/api/conversations/{id}"))))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response, "Failed to load conversation").await);
        }

        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }
}
