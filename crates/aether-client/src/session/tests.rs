//! Orchestrator behavior tests against a scripted backend.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::protocol::{
    AuthResponse, ChatRequest, ChatResponse, ConversationDto, LoginRequest, MessageDto,
    SignupRequest, UploadKind, UploadResponse,
};
use crate::{ApiError, Attachment, AttachmentKind, ChatBackend, ChatSession, Role};

use super::types::ConversationIdentity;

#[derive(Default)]
struct MockBackend {
    chat_requests: Mutex<Vec<ChatRequest>>,
    chat_replies: Mutex<VecDeque<Result<ChatResponse, ApiError>>>,
    upload_replies: Mutex<VecDeque<Result<UploadResponse, ApiError>>>,
    conversations: Mutex<Vec<ConversationDto>>,
    details: Mutex<HashMap<String, ConversationDto>>,
    /// When set, `send_chat` parks until notified, simulating a slow server.
    gate: Option<Arc<Notify>>,
}

impl MockBackend {
    fn with_reply(self, reply: Result<ChatResponse, ApiError>) -> Self {
        self.chat_replies.lock().unwrap().push_back(reply);
        self
    }

    fn with_upload_reply(self, reply: Result<UploadResponse, ApiError>) -> Self {
        self.upload_replies.lock().unwrap().push_back(reply);
        self
    }

    fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    fn chat_request_count(&self) -> usize {
        self.chat_requests.lock().unwrap().len()
    }

    fn chat_request(&self, index: usize) -> ChatRequest {
        self.chat_requests.lock().unwrap()[index].clone()
    }
}

fn reply(text: &str) -> ChatResponse {
    ChatResponse {
        conversation_id: None,
        message: text.to_string(),
        sources: Vec::new(),
        tools_used: Vec::new(),
        image_url: None,
    }
}

fn dto(id: &str, title: Option<&str>, contents: &[(&str, Role)]) -> ConversationDto {
    ConversationDto {
        conversation_id: id.to_string(),
        title: title.map(String::from),
        messages: contents
            .iter()
            .map(|(content, role)| MessageDto {
                role: *role,
                content: content.to_string(),
                timestamp: None,
            })
            .collect(),
        created_at: None,
        updated_at: None,
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn login(&self, _req: &LoginRequest) -> Result<AuthResponse, ApiError> {
        unreachable!("not used in session tests")
    }

    async fn signup(&self, _req: &SignupRequest) -> Result<AuthResponse, ApiError> {
        unreachable!("not used in session tests")
    }

    async fn send_chat(&self, req: &ChatRequest) -> Result<ChatResponse, ApiError> {
        self.chat_requests.lock().unwrap().push(req.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.chat_replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(reply("ok")))
    }

    async fn upload_document(
        &self,
        _conversation_id: &str,
        _filename: &str,
        _bytes: Vec<u8>,
    ) -> Result<UploadResponse, ApiError> {
        self.upload_replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted upload reply")
    }

    async fn list_conversations(&self) -> Result<Vec<ConversationDto>, ApiError> {
        Ok(self.conversations.lock().unwrap().clone())
    }

    async fn get_conversation(&self, id: &str) -> Result<ConversationDto, ApiError> {
        self.details
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::Api("Failed to load conversation".into()))
    }
}

fn session_with(backend: MockBackend) -> (ChatSession, Arc<MockBackend>) {
    let backend = Arc::new(backend);
    (ChatSession::new(backend.clone()), backend)
}

fn image_attachment() -> Attachment {
    Attachment {
        kind: AttachmentKind::Image,
        url: "data:image/png;base64,xx".into(),
        name: "pic.png".into(),
        mime_type: Some("image/png".into()),
    }
}

// --- sending ---------------------------------------------------------------

#[tokio::test]
async fn successful_send_appends_user_then_assistant() {
    let mut response = reply("hello back");
    response.tools_used = vec!["web_search".into()];
    response.image_url = Some("https://img".into());
    let (session, backend) = session_with(MockBackend::default().with_reply(Ok(response)));

    session.send_message("hello", Vec::new()).await;

    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].content, "hello");
    assert_eq!(messages[1].role, Role::Assistant);
    assert_eq!(messages[1].content, "hello back");
    assert_eq!(messages[1].tools_used, vec!["web_search"]);
    assert_eq!(messages[1].image_url.as_deref(), Some("https://img"));
    assert_ne!(messages[0].id, messages[1].id);

    assert_eq!(backend.chat_request_count(), 1);
    assert!(!session.is_typing());
}

#[tokio::test]
async fn empty_send_is_a_noop() {
    let (session, backend) = session_with(MockBackend::default());

    session.send_message("", Vec::new()).await;
    session.send_message("   \n\t", Vec::new()).await;

    assert!(session.messages().is_empty());
    assert_eq!(backend.chat_request_count(), 0);
    assert!(session.conversation_id().is_none());
}

#[tokio::test]
async fn attachment_only_send_goes_through() {
    let (session, backend) = session_with(MockBackend::default().with_reply(Ok(reply("seen"))));

    session.send_message("", vec![image_attachment()]).await;

    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].attachments.len(), 1);
    assert_eq!(backend.chat_request_count(), 1);
}

#[tokio::test]
async fn api_failure_appends_error_reply_without_rollback() {
    let (session, _backend) = session_with(
        MockBackend::default().with_reply(Err(ApiError::Api("Rate limit exceeded".into()))),
    );

    session.send_message("hello", Vec::new()).await;

    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[1].role, Role::Assistant);
    assert!(messages[1].content.starts_with("⚠️ Error:"));
    assert!(messages[1].content.contains("Rate limit exceeded"));
    assert!(!session.is_typing());
}

#[tokio::test]
async fn network_failure_appends_distinct_error_reply() {
    let (session, _backend) = session_with(
        MockBackend::default().with_reply(Err(ApiError::Network("connection refused".into()))),
    );

    session.send_message("hello", Vec::new()).await;

    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    assert!(messages[1].content.starts_with("⚠️ Network Error:"));
    assert!(!messages[1].content.contains("connection refused"));
}

#[tokio::test]
async fn second_send_while_pending_is_a_noop() {
    let gate = Arc::new(Notify::new());
    let backend = Arc::new(
        MockBackend::default()
            .with_reply(Ok(reply("first reply")))
            .with_gate(gate.clone()),
    );
    let session = Arc::new(ChatSession::new(backend.clone()));

    let sender = Arc::clone(&session);
    let in_flight = tokio::spawn(async move { sender.send_message("first", Vec::new()).await });

    // Wait for the first request to reach the backend and park on the gate
    while backend.chat_request_count() < 1 {
        tokio::task::yield_now().await;
    }
    assert!(session.is_typing());

    // A second send while one is pending changes nothing
    session.send_message("second", Vec::new()).await;
    assert_eq!(session.message_count(), 1);
    assert_eq!(backend.chat_request_count(), 1);

    gate.notify_one();
    in_flight.await.unwrap();

    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[1].content, "first reply");
}

// --- conversation identity -------------------------------------------------

#[tokio::test]
async fn conversation_id_minted_once_and_reused() {
    let (session, backend) = session_with(
        MockBackend::default()
            .with_reply(Ok(reply("one")))
            .with_reply(Ok(reply("two"))),
    );

    assert!(session.conversation_id().is_none());
    session.send_message("first", Vec::new()).await;

    let id = session.conversation_id().expect("id minted on first send");
    assert!(matches!(session.identity(), ConversationIdentity::Confirmed(_)));

    session.send_message("second", Vec::new()).await;
    assert_eq!(session.conversation_id(), Some(id.clone()));

    assert_eq!(backend.chat_request(0).conversation_id, id.to_string());
    assert_eq!(backend.chat_request(1).conversation_id, id.to_string());
}

#[tokio::test]
async fn server_echoed_conversation_id_is_adopted() {
    let mut response = reply("hello back");
    response.conversation_id = Some("server-id".into());
    let (session, backend) = session_with(
        MockBackend::default()
            .with_reply(Ok(response))
            .with_reply(Ok(reply("again"))),
    );

    session.send_message("hello", Vec::new()).await;

    let id = session.conversation_id().expect("id confirmed");
    assert_eq!(id.as_str(), "server-id");
    assert!(matches!(session.identity(), ConversationIdentity::Confirmed(_)));
    assert_ne!(backend.chat_request(0).conversation_id, "server-id");

    // Subsequent sends use the adopted id
    session.send_message("second", Vec::new()).await;
    assert_eq!(backend.chat_request(1).conversation_id, "server-id");
}

#[tokio::test]
async fn identity_stays_pending_after_failed_send() {
    let (session, _backend) =
        session_with(MockBackend::default().with_reply(Err(ApiError::Api("boom".into()))));

    session.send_message("hello", Vec::new()).await;
    assert!(matches!(session.identity(), ConversationIdentity::Pending(_)));
}

#[tokio::test]
async fn new_conversation_mints_a_fresh_id() {
    let (session, backend) = session_with(
        MockBackend::default()
            .with_reply(Ok(reply("one")))
            .with_reply(Ok(reply("two"))),
    );

    session.send_message("first", Vec::new()).await;
    let first_id = session.conversation_id().unwrap();

    session.create_new_conversation();
    assert!(session.conversation_id().is_none());
    assert!(session.messages().is_empty());

    session.send_message("fresh start", Vec::new()).await;
    let second_id = session.conversation_id().unwrap();
    assert_ne!(first_id, second_id);
    assert_eq!(
        backend.chat_request(1).conversation_id,
        second_id.to_string()
    );
}

// --- request payload -------------------------------------------------------

#[tokio::test]
async fn request_carries_toggles_and_plugin_selection() {
    let (session, backend) = session_with(MockBackend::default().with_reply(Ok(reply("ok"))));

    session.set_selected_model("google/gemma-3-12b-it:free");
    session.set_use_rag(true);
    session.set_web_search_enabled(true);
    session.toggle_mcp("gmail");
    session.toggle_tool("gmail", "send_email");

    session.send_message("hello", Vec::new()).await;

    let req = backend.chat_request(0);
    assert_eq!(req.model, "google/gemma-3-12b-it:free");
    assert!(req.use_rag);
    assert!(req.web_search);
    assert!(!req.image_generation);
    assert_eq!(req.enabled_mcps, vec!["gmail".to_string()]);
    let gmail_tools = &req.enabled_tools["gmail"];
    assert!(gmail_tools.contains(&"read_email".to_string()));
    assert!(!gmail_tools.contains(&"send_email".to_string()));
}

#[tokio::test]
async fn disabled_plugins_are_not_sent() {
    let (session, backend) = session_with(MockBackend::default().with_reply(Ok(reply("ok"))));

    // Tools stay individually enabled, but their plugins are all off
    session.send_message("hello", Vec::new()).await;

    let req = backend.chat_request(0);
    assert!(req.enabled_mcps.is_empty());
    assert!(req.enabled_tools.is_empty());
}

// --- uploads ---------------------------------------------------------------

#[tokio::test]
async fn document_upload_enables_rag_and_mints_id() {
    let (session, _backend) = session_with(MockBackend::default().with_upload_reply(Ok(
        UploadResponse {
            filename: "notes.pdf".into(),
            kind: UploadKind::Document,
            image_data: None,
        },
    )));

    assert!(!session.use_rag());
    let result = session
        .upload_document("notes.pdf", b"pdf bytes".to_vec())
        .await
        .unwrap();

    assert_eq!(result.kind, AttachmentKind::File);
    assert_eq!(result.filename, "notes.pdf");
    assert!(result.data.is_none());
    assert!(session.use_rag());
    assert!(matches!(session.identity(), ConversationIdentity::Pending(_)));
}

#[tokio::test]
async fn image_upload_leaves_rag_untouched() {
    let (session, _backend) = session_with(MockBackend::default().with_upload_reply(Ok(
        UploadResponse {
            filename: "pic.png".into(),
            kind: UploadKind::Image,
            image_data: Some("data:image/png;base64,xx".into()),
        },
    )));

    let result = session
        .upload_document("pic.png", b"png bytes".to_vec())
        .await
        .unwrap();

    assert_eq!(result.kind, AttachmentKind::Image);
    assert!(result.data.is_some());
    assert!(!session.use_rag());
}

#[tokio::test]
async fn upload_failure_propagates_without_state_changes() {
    let (session, _backend) = session_with(
        MockBackend::default().with_upload_reply(Err(ApiError::Api("Upload failed".into()))),
    );

    let err = session
        .upload_document("notes.pdf", b"pdf bytes".to_vec())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Upload failed"));
    assert!(!session.use_rag());
    assert!(session.messages().is_empty());
}

#[tokio::test]
async fn upload_reuses_existing_conversation_id() {
    let (session, backend) = session_with(
        MockBackend::default()
            .with_reply(Ok(reply("ok")))
            .with_upload_reply(Ok(UploadResponse {
                filename: "notes.pdf".into(),
                kind: UploadKind::Document,
                image_data: None,
            })),
    );

    session.send_message("hello", Vec::new()).await;
    let id = session.conversation_id().unwrap();

    session
        .upload_document("notes.pdf", b"pdf bytes".to_vec())
        .await
        .unwrap();
    assert_eq!(session.conversation_id(), Some(id));
    assert_eq!(backend.chat_request_count(), 1);
}

// --- loading and refreshing ------------------------------------------------

#[tokio::test]
async fn load_conversation_replaces_active_state() {
    let backend = MockBackend::default();
    backend.details.lock().unwrap().insert(
        "other".into(),
        dto(
            "other",
            Some("Other chat"),
            &[("hi", Role::User), ("hello!", Role::Assistant)],
        ),
    );
    let (session, _backend) = session_with(backend);

    session.load_conversation("other").await;

    assert_eq!(
        session.conversation_id().map(|id| id.to_string()),
        Some("other".to_string())
    );
    assert!(matches!(
        session.identity(),
        ConversationIdentity::Confirmed(_)
    ));
    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].content, "hi");
    assert_eq!(messages[1].role, Role::Assistant);
}

#[tokio::test]
async fn load_failure_falls_back_to_cached_summary() {
    let backend = MockBackend::default();
    backend
        .conversations
        .lock()
        .unwrap()
        .push(dto("cached", Some("Cached"), &[("remembered", Role::User)]));
    let (session, _backend) = session_with(backend);

    session.refresh_conversations().await;
    session.load_conversation("cached").await;

    assert_eq!(
        session.conversation_id().map(|id| id.to_string()),
        Some("cached".to_string())
    );
    let messages = session.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "remembered");
}

#[tokio::test]
async fn load_failure_without_cache_leaves_state_untouched() {
    let (session, _backend) = session_with(MockBackend::default().with_reply(Ok(reply("ok"))));

    session.send_message("hello", Vec::new()).await;
    let id = session.conversation_id();

    session.load_conversation("missing").await;

    assert_eq!(session.conversation_id(), id);
    assert_eq!(session.message_count(), 2);
}

#[tokio::test]
async fn summaries_are_sorted_most_recent_first() {
    let backend = MockBackend::default();
    {
        let mut conversations = backend.conversations.lock().unwrap();
        let mut older = dto("old", Some("Old"), &[]);
        older.created_at = Some("2026-01-01T00:00:00Z".parse().unwrap());
        let mut newer = dto("new", None, &[]);
        newer.updated_at = Some("2026-02-01T00:00:00Z".parse().unwrap());
        conversations.push(older);
        conversations.push(newer);
    }
    let (session, _backend) = session_with(backend);

    session.refresh_conversations().await;

    let summaries = session.conversations();
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].id.as_str(), "new");
    assert_eq!(summaries[0].title, "New Conversation");
    assert_eq!(summaries[1].id.as_str(), "old");
}

#[tokio::test]
async fn stale_reply_is_discarded_after_switching_conversations() {
    let gate = Arc::new(Notify::new());
    let backend = MockBackend::default()
        .with_reply(Ok(reply("late reply")))
        .with_gate(gate.clone());
    backend
        .details
        .lock()
        .unwrap()
        .insert("other".into(), dto("other", None, &[("from other", Role::User)]));
    let backend = Arc::new(backend);
    let session = Arc::new(ChatSession::new(backend.clone()));

    let sender = Arc::clone(&session);
    let in_flight = tokio::spawn(async move { sender.send_message("hello", Vec::new()).await });

    while backend.chat_request_count() < 1 {
        tokio::task::yield_now().await;
    }

    // User switches away while the request is pending
    session.load_conversation("other").await;

    gate.notify_one();
    in_flight.await.unwrap();

    // The late reply must not leak into the newly loaded conversation
    let messages = session.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "from other");
    assert_eq!(
        session.conversation_id().map(|id| id.to_string()),
        Some("other".to_string())
    );
    assert!(!session.is_typing());
}
