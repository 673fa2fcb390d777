//! Session types and concurrency guards.

use std::sync::atomic::{AtomicBool, Ordering};

use aether_common::ConversationId;

use crate::AttachmentKind;

/// Identity of the current conversation slot.
///
/// Ids are minted client-side on the first send, so there is an explicit
/// window where the client holds an id the backend has never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationIdentity {
    /// Fresh slot; no id until the first message is sent.
    New,
    /// Client-minted id, not yet acknowledged by the backend.
    Pending(ConversationId),
    /// Id the backend has confirmed (successful reply, or loaded from it).
    Confirmed(ConversationId),
}

impl ConversationIdentity {
    pub fn id(&self) -> Option<&ConversationId> {
        match self {
            ConversationIdentity::New => None,
            ConversationIdentity::Pending(id) | ConversationIdentity::Confirmed(id) => Some(id),
        }
    }

    /// Return the current id, minting a pending one if the slot is fresh.
    pub fn ensure_id(&mut self) -> ConversationId {
        if let Some(id) = self.id() {
            return id.clone();
        }
        let id = ConversationId::mint();
        *self = ConversationIdentity::Pending(id.clone());
        id
    }

    /// Promote a pending id to confirmed. No-op otherwise.
    pub fn confirm(&mut self) {
        if let ConversationIdentity::Pending(id) = self {
            *self = ConversationIdentity::Confirmed(id.clone());
        }
    }
}

/// Guard that clears the in-flight flag on drop, ensuring it is always
/// released even if the future is cancelled or an early return occurs.
pub(super) struct SendGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> SendGuard<'a> {
    /// Attempt to mark a request in flight. Returns `None` if one already
    /// is; the caller treats that as a silent no-op.
    pub(super) fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_ok()
            .then_some(Self { flag })
    }
}

impl Drop for SendGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// What the upload flow hands back for the caller to turn into an
/// [`Attachment`](crate::Attachment).
#[derive(Debug, Clone)]
pub struct UploadResult {
    pub kind: AttachmentKind,
    /// Data URI for images; `None` for documents, which live server-side.
    pub data: Option<String>,
    pub filename: String,
}
