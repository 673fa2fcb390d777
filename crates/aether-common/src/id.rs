use serde::{Deserialize, Serialize};
use std::fmt;

/// Mint a fresh opaque identifier (message ids, conversation ids).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Opaque conversation identifier. Minted client-side before the backend
/// ever sees it, then used as the server correlation key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(String);

impl ConversationId {
    pub fn mint() -> Self {
        Self(new_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for ConversationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ConversationId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_id_is_valid_uuid() {
        let id = new_id();
        let parsed = uuid::Uuid::parse_str(&id);
        assert!(parsed.is_ok());
        assert_eq!(parsed.unwrap().get_version_num(), 4);
    }

    #[test]
    fn new_id_is_unique() {
        let a = new_id();
        let b = new_id();
        assert_ne!(a, b);
    }

    #[test]
    fn conversation_id_mint() {
        let cid = ConversationId::mint();
        assert!(uuid::Uuid::parse_str(cid.as_str()).is_ok());
    }

    #[test]
    fn conversation_id_display() {
        let cid = ConversationId::from("abc-123");
        assert_eq!(cid.to_string(), "abc-123");
        assert_eq!(cid.as_str(), "abc-123");
    }

    #[test]
    fn conversation_id_equality() {
        let cid = ConversationId::mint();
        let cloned = cid.clone();
        assert_eq!(cid, cloned);

        let other = ConversationId::mint();
        assert_ne!(cid, other);
    }

    #[test]
    fn conversation_id_serialization() {
        let cid = ConversationId::from("conv-1");
        let json = serde_json::to_string(&cid).unwrap();
        assert_eq!(json, "\"conv-1\"");
        let back: ConversationId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cid);
    }
}
