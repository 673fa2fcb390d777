//! ChatSession struct, local state, and pure (non-network) operations.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use aether_common::ConversationId;

use crate::plugins::PluginSet;
use crate::{ChatBackend, ConversationSummary, McpPlugin, Message};

use super::types::ConversationIdentity;

/// Mutable session state, guarded by a mutex. Never held across an await;
/// each mutation is a single short critical section.
pub(super) struct SessionState {
    pub identity: ConversationIdentity,
    pub selected_model: String,
    pub messages: Vec<Message>,
    pub use_rag: bool,
    pub web_search_enabled: bool,
    pub image_gen_enabled: bool,
    pub conversations: Vec<ConversationSummary>,
    pub plugins: PluginSet,
}

/// The session orchestrator. Explicitly constructed and passed by reference
/// to whatever UI layer needs it; there is no ambient singleton.
pub struct ChatSession {
    pub(super) state: Arc<Mutex<SessionState>>,
    pub(super) backend: Arc<dyn ChatBackend>,
    /// At most one outbound chat request at a time.
    pub(super) busy: AtomicBool,
}

pub(super) fn lock_state(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ChatSession {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState {
                identity: ConversationIdentity::New,
                selected_model: crate::models::default_model().to_string(),
                messages: Vec::new(),
                use_rag: false,
                web_search_enabled: false,
                image_gen_enabled: false,
                conversations: Vec::new(),
                plugins: PluginSet::default(),
            })),
            backend,
            busy: AtomicBool::new(false),
        }
    }

    pub fn with_model(self, model: impl Into<String>) -> Self {
        lock_state(&self.state).selected_model = model.into();
        self
    }

    pub fn with_plugins(self, plugins: PluginSet) -> Self {
        lock_state(&self.state).plugins = plugins;
        self
    }

    pub(super) fn lock(&self) -> MutexGuard<'_, SessionState> {
        lock_state(&self.state)
    }

    // --- read surface ----------------------------------------------------

    pub fn conversation_id(&self) -> Option<ConversationId> {
        self.lock().identity.id().cloned()
    }

    pub fn identity(&self) -> ConversationIdentity {
        self.lock().identity.clone()
    }

    /// Snapshot of the active conversation's messages.
    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages.clone()
    }

    pub fn message_count(&self) -> usize {
        self.lock().messages.len()
    }

    /// Snapshot of the cached conversation summaries, most recent first.
    pub fn conversations(&self) -> Vec<ConversationSummary> {
        self.lock().conversations.clone()
    }

    pub fn plugins(&self) -> Vec<McpPlugin> {
        self.lock().plugins.plugins().to_vec()
    }

    pub fn selected_model(&self) -> String {
        self.lock().selected_model.clone()
    }

    pub fn use_rag(&self) -> bool {
        self.lock().use_rag
    }

    pub fn web_search_enabled(&self) -> bool {
        self.lock().web_search_enabled
    }

    pub fn image_gen_enabled(&self) -> bool {
        self.lock().image_gen_enabled
    }

    /// Whether a chat request is in flight (the typing indicator).
    pub fn is_typing(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    // --- local state flips (no network) ----------------------------------

    pub fn set_selected_model(&self, model: impl Into<String>) {
        self.lock().selected_model = model.into();
    }

    pub fn set_use_rag(&self, value: bool) {
        self.lock().use_rag = value;
    }

    pub fn set_web_search_enabled(&self, value: bool) {
        self.lock().web_search_enabled = value;
    }

    pub fn set_image_gen_enabled(&self, value: bool) {
        self.lock().image_gen_enabled = value;
    }

    pub fn toggle_mcp(&self, plugin_id: &str) {
        self.lock().plugins.toggle_plugin(plugin_id);
    }

    pub fn toggle_tool(&self, plugin_id: &str, tool_id: &str) {
        self.lock().plugins.toggle_tool(plugin_id, tool_id);
    }

    pub fn is_tool_active(&self, plugin_id: &str, tool_id: &str) -> bool {
        self.lock().plugins.is_tool_active(plugin_id, tool_id)
    }

    /// Reset to the empty "new conversation" slot. The finished conversation
    /// already lives server-side, so only the summary list needs refreshing
    /// for it to appear in history.
    pub fn create_new_conversation(&self) {
        {
            let mut state = self.lock();
            state.identity = ConversationIdentity::New;
            state.messages.clear();
        }
        self.spawn_refresh();
    }
}
