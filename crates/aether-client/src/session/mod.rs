//! Conversation session orchestration.
//!
//! `ChatSession` owns the active conversation (identity, message list),
//! the cached conversation summaries, the feature toggles, and the
//! at-most-one-in-flight chat request state. Every backend read/write for
//! the chat surface goes through it.

mod chat;
mod manager;
mod types;

#[cfg(test)]
mod tests;

pub use manager::ChatSession;
pub use types::{ConversationIdentity, UploadResult};
