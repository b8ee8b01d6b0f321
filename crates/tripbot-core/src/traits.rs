//! The messaging capability boundary.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ChatInfo, TargetId};

/// Opaque messaging transport. The scheduler core only ever needs two
/// primitives: enumerate the chats the session can see, and deliver a text
/// body to one of them. Pairing, session persistence, and delivery mechanics
/// live behind the implementation.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// List all chats known to the messaging session.
    async fn list_chats(&self) -> Result<Vec<ChatInfo>>;

    /// Deliver `body` to `target`. Errors are transport-level failures and
    /// must be handled by the caller — callers in the dispatch path convert
    /// them into logged boolean failures.
    async fn send_message(&self, target: &TargetId, body: &str) -> Result<()>;
}
