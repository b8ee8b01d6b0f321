//! Target resolution — maps human-readable chat names (or raw numeric ids)
//! to serialized target ids via the transport's chat listing.

use std::sync::Arc;

use tripbot_core::error::{Result, TripBotError};
use tripbot_core::traits::Messenger;
use tripbot_core::types::{ChatInfo, ChatKind, TargetId};

/// Resolves destinations against the live chat listing.
pub struct TargetSelector {
    messenger: Arc<dyn Messenger>,
    country_code: String,
}

impl TargetSelector {
    pub fn new(messenger: Arc<dyn Messenger>, country_code: impl Into<String>) -> Self {
        Self {
            messenger,
            country_code: country_code.into(),
        }
    }

    /// Resolve a display name within one address space. First exact match in
    /// listing order wins; duplicate names are not disambiguated. On a miss
    /// the error carries every candidate name so the caller can correct the
    /// request.
    pub async fn resolve_by_name(&self, name: &str, kind: ChatKind) -> Result<ChatInfo> {
        let chats = self.messenger.list_chats().await?;
        let candidates: Vec<ChatInfo> = chats.into_iter().filter(|c| c.kind == kind).collect();

        match candidates.iter().find(|c| c.name == name) {
            Some(chat) => {
                tracing::info!("target resolved: '{}' -> {}", chat.name, chat.id);
                Ok(chat.clone())
            }
            None => Err(TripBotError::NotFound {
                name: name.to_string(),
                candidates: candidates.into_iter().map(|c| c.name).collect(),
            }),
        }
    }

    /// Build an individual-chat id directly from a raw numeric string. No
    /// existence check against the transport — the id may point nowhere.
    pub fn resolve_by_id(&self, raw: &str) -> TargetId {
        TargetId(format!(
            "{}{}@{}",
            self.country_code,
            raw,
            ChatKind::Individual.server()
        ))
    }
}
