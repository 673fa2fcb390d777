//! Network-facing session operations: send, upload, load, refresh.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use aether_common::ConversationId;

use crate::protocol::{ChatRequest, ConversationDto, MessageDto, UploadKind};
use crate::{
    ApiError, Attachment, AttachmentKind, ChatBackend, ConversationSummary, Message, Role,
};

use super::manager::{lock_state, ChatSession};
use super::types::{ConversationIdentity, SendGuard, UploadResult};

impl ChatSession {
    /// Send a user message and append the assistant's reply.
    ///
    /// No-op when there is nothing to send or a request is already in
    /// flight. The user message is appended optimistically and is not
    /// rolled back on failure; failures surface as a synthetic
    /// assistant-role message instead of an error return.
    pub async fn send_message(&self, content: &str, attachments: Vec<Attachment>) {
        if content.trim().is_empty() && attachments.is_empty() {
            return;
        }
        let Some(_guard) = SendGuard::try_acquire(&self.busy) else {
            debug!("send ignored: a chat request is already in flight");
            return;
        };

        let request = {
            let mut state = self.lock();
            let conversation_id = state.identity.ensure_id();

            let mut user_msg = Message::new(Role::User, content);
            user_msg.attachments = attachments;
            state.messages.push(user_msg);

            ChatRequest {
                conversation_id: conversation_id.to_string(),
                model: state.selected_model.clone(),
                use_rag: state.use_rag,
                web_search: state.web_search_enabled,
                image_generation: state.image_gen_enabled,
                enabled_mcps: state.plugins.enabled_plugin_ids(),
                enabled_tools: state.plugins.enabled_tools(),
                message: content.to_string(),
            }
        };

        let result = self.backend.send_chat(&request).await;

        let succeeded = {
            let mut state = self.lock();
            // The user may have switched conversations while this request
            // was in flight; a reply tagged with a stale id must not be
            // appended to whatever conversation is now active.
            if state.identity.id().map(ConversationId::as_str)
                != Some(request.conversation_id.as_str())
            {
                debug!(
                    issued_for = %request.conversation_id,
                    "discarding reply for a conversation that is no longer active"
                );
                return;
            }

            match result {
                Ok(response) => {
                    // The backend may echo a canonical conversation id;
                    // adopt it, otherwise promote the one we minted.
                    match response.conversation_id {
                        Some(id) => {
                            state.identity =
                                ConversationIdentity::Confirmed(ConversationId::from(id));
                        }
                        None => state.identity.confirm(),
                    }

                    let mut reply = Message::new(Role::Assistant, response.message);
                    reply.sources = response.sources;
                    reply.tools_used = response.tools_used;
                    reply.image_url = response.image_url;
                    state.messages.push(reply);
                    true
                }
                Err(err) => {
                    warn!("chat request failed: {err}");
                    state
                        .messages
                        .push(Message::new(Role::Assistant, error_reply(&err)));
                    false
                }
            }
        };

        if succeeded {
            self.spawn_refresh();
        }
    }

    /// Upload a file for this conversation, minting a conversation id first
    /// if none exists (the upload must be attributable to one).
    ///
    /// Non-image uploads enable the RAG toggle as a side effect; failures
    /// propagate to the caller and leave message state untouched.
    pub async fn upload_document(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<UploadResult, ApiError> {
        let conversation_id = self.lock().identity.ensure_id();

        let response = self
            .backend
            .upload_document(conversation_id.as_str(), filename, bytes)
            .await?;

        let kind = match response.kind {
            UploadKind::Image => AttachmentKind::Image,
            UploadKind::Document => {
                self.lock().use_rag = true;
                AttachmentKind::File
            }
        };

        Ok(UploadResult {
            kind,
            data: response.image_data,
            filename: response.filename,
        })
    }

    /// Switch to another conversation, replacing the active id and message
    /// list. On fetch failure the cached summary (if any) is restored;
    /// otherwise the current state is left untouched.
    pub async fn load_conversation(&self, id: &str) {
        match self.backend.get_conversation(id).await {
            Ok(dto) => {
                let messages = map_messages(dto.messages);
                let mut state = self.lock();
                state.identity =
                    ConversationIdentity::Confirmed(ConversationId::from(dto.conversation_id));
                state.messages = messages;
            }
            Err(err) => {
                warn!("failed to load conversation {id}: {err}");
                let mut state = self.lock();
                if let Some(cached) = state.conversations.iter().find(|c| c.id.as_str() == id) {
                    let cached = cached.clone();
                    state.identity = ConversationIdentity::Confirmed(cached.id);
                    state.messages = cached.messages;
                }
            }
        }
    }

    /// Re-fetch the conversation summary list. Failures are logged and the
    /// last-known-good list is kept.
    pub async fn refresh_conversations(&self) {
        match fetch_summaries(self.backend.as_ref()).await {
            Ok(summaries) => self.lock().conversations = summaries,
            Err(err) => warn!("failed to refresh conversations: {err}"),
        }
    }

    /// Fire-and-forget summary refresh. Runs detached from the caller with
    /// its own failure handling.
    pub(super) fn spawn_refresh(&self) {
        let state = Arc::clone(&self.state);
        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            match fetch_summaries(backend.as_ref()).await {
                Ok(summaries) => lock_state(&state).conversations = summaries,
                Err(err) => warn!("background conversation refresh failed: {err}"),
            }
        });
    }
}

async fn fetch_summaries(
    backend: &dyn ChatBackend,
) -> Result<Vec<ConversationSummary>, ApiError> {
    let dtos = backend.list_conversations().await?;
    let mut summaries: Vec<ConversationSummary> = dtos.into_iter().map(map_summary).collect();
    // Most recent activity first
    summaries.sort_by(|a, b| b.date.cmp(&a.date));
    Ok(summaries)
}

fn map_summary(dto: ConversationDto) -> ConversationSummary {
    ConversationSummary {
        id: ConversationId::from(dto.conversation_id),
        title: dto.title.unwrap_or_else(|| "New Conversation".to_string()),
        date: dto.created_at.or(dto.updated_at).unwrap_or_else(Utc::now),
        messages: map_messages(dto.messages),
    }
}

/// Map backend messages into domain messages, minting fresh client ids.
fn map_messages(dtos: Vec<MessageDto>) -> Vec<Message> {
    dtos.into_iter()
        .map(|dto| {
            let mut msg = Message::new(dto.role, dto.content);
            if let Some(ts) = dto.timestamp {
                msg.timestamp = ts;
            }
            msg
        })
        .collect()
}

/// Render a failed chat request as a conversation entry, keeping API
/// failures visually distinct from transport failures.
fn error_reply(err: &ApiError) -> String {
    match err {
        ApiError::Api(detail) => format!("⚠️ Error: {detail}"),
        ApiError::Network(_) | ApiError::Parse(_) => {
            "⚠️ Network Error: Unable to reach the server. Please check your connection."
                .to_string()
        }
    }
}
