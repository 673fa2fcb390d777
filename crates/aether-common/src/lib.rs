pub mod errors;
pub mod id;

pub use errors::{AetherError, ConfigError};
pub use id::{new_id, ConversationId};

pub type Result<T> = std::result::Result<T, AetherError>;
