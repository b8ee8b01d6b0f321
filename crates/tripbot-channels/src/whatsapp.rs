//! WhatsApp transport over an HTTP bridge.
//!
//! The bridge process owns the WhatsApp Web session (QR pairing, session
//! persistence, message delivery). This client only speaks a small JSON API
//! to it: session status, chat listing, and text sending.

use async_trait::async_trait;
use serde::Deserialize;
use tripbot_core::error::{Result, TripBotError};
use tripbot_core::traits::Messenger;
use tripbot_core::types::{ChatInfo, ChatKind, TargetId};
use tripbot_core::config::BridgeConfig;

/// HTTP client for the WhatsApp bridge.
pub struct WhatsAppBridge {
    config: BridgeConfig,
    client: reqwest::Client,
}

/// Bridge session status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BridgeStatus {
    pub ready: bool,
    #[serde(default)]
    pub session: Option<String>,
}

/// Standard bridge response envelope.
#[derive(Debug, Deserialize)]
struct BridgeEnvelope<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

/// One chat as the bridge enumerates it. The server suffix in the serialized
/// id is the address-space discriminator (`g.us` group, `c.us` individual).
#[derive(Debug, Clone, Deserialize)]
struct BridgeChat {
    id: String,
    #[serde(default)]
    name: String,
}

impl WhatsAppBridge {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.config.api_token.is_empty() {
            req
        } else {
            req.header("Authorization", format!("Bearer {}", self.config.api_token))
        }
    }

    fn unwrap_envelope<T>(body: BridgeEnvelope<T>, what: &str) -> Result<T> {
        if !body.ok {
            return Err(TripBotError::Transport(format!(
                "bridge {what} failed: {}",
                body.error.unwrap_or_default()
            )));
        }
        body.result
            .ok_or_else(|| TripBotError::Transport(format!("bridge {what}: empty result")))
    }

    /// Query session readiness. Used at startup; the bridge may still be
    /// pairing, in which case sends will fail until it is ready.
    pub async fn status(&self) -> Result<BridgeStatus> {
        let response = self
            .authorize(self.client.get(self.api_url("session/status")))
            .send()
            .await
            .map_err(|e| TripBotError::Transport(format!("bridge status failed: {e}")))?;

        let body: BridgeEnvelope<BridgeStatus> = response
            .json()
            .await
            .map_err(|e| TripBotError::Transport(format!("invalid bridge response: {e}")))?;

        Self::unwrap_envelope(body, "status")
    }
}

#[async_trait]
impl Messenger for WhatsAppBridge {
    async fn list_chats(&self) -> Result<Vec<ChatInfo>> {
        let response = self
            .authorize(self.client.get(self.api_url("client/chats")))
            .send()
            .await
            .map_err(|e| TripBotError::Transport(format!("bridge getChats failed: {e}")))?;

        let body: BridgeEnvelope<Vec<BridgeChat>> = response
            .json()
            .await
            .map_err(|e| TripBotError::Transport(format!("invalid bridge response: {e}")))?;

        let chats = Self::unwrap_envelope(body, "getChats")?;
        Ok(chats
            .into_iter()
            .map(|c| ChatInfo {
                kind: ChatKind::of_id(&c.id),
                id: TargetId(c.id),
                name: c.name,
            })
            .collect())
    }

    async fn send_message(&self, target: &TargetId, body: &str) -> Result<()> {
        let payload = serde_json::json!({
            "chatId": target.as_str(),
            "message": body,
        });

        let response = self
            .authorize(self.client.post(self.api_url("client/send-message")))
            .json(&payload)
            .send()
            .await
            .map_err(|e| TripBotError::Transport(format!("bridge sendMessage failed: {e}")))?;

        let result: BridgeEnvelope<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| TripBotError::Transport(format!("invalid send response: {e}")))?;

        if !result.ok {
            return Err(TripBotError::Transport(format!(
                "send failed: {}",
                result.error.unwrap_or_default()
            )));
        }
        tracing::debug!("WhatsApp message sent to {target}");
        Ok(())
    }
}
