//! API route handlers for the gateway.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tripbot_core::error::TripBotError;
use tripbot_core::types::{ChatKind, LOCAL_TZ};
use tripbot_scheduler::{plan_for_tomorrow, send_now};

use super::server::AppState;

/// Render a timestamp for API callers in the fixed display zone.
fn render_local(dt: DateTime<Utc>) -> String {
    dt.with_timezone(&LOCAL_TZ)
        .format("%d/%m/%Y, %I:%M:%S %p")
        .to_string()
}

/// Best-effort LAN IPv4 discovery. Connecting a UDP socket picks the
/// outbound interface without sending any packet.
fn local_ipv4() -> Option<String> {
    let socket = std::net::UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    Some(socket.local_addr().ok()?.ip().to_string())
}

/// Liveness/info endpoint.
pub async fn welcome(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let port = state.config.gateway.port;
    match local_ipv4() {
        Some(ip) => Json(serde_json::json!({
            "message": "welcome to tripbot",
            "local": format!("http://localhost:{port}/"),
            "ipv4": format!("http://{ip}:{port}/"),
        })),
        None => Json(serde_json::json!({
            "message": "welcome to tripbot (no network connection)",
        })),
    }
}

/// Shared resolve-and-select path for /set-group and /set-chat.
async fn set_target_by_name(
    state: &AppState,
    name: &str,
    kind: ChatKind,
) -> (StatusCode, Json<serde_json::Value>) {
    match state.selector.resolve_by_name(name, kind).await {
        Ok(chat) => {
            state.store.lock().await.set_target(chat.id.clone());
            let noun = match kind {
                ChatKind::Group => "Group",
                ChatKind::Individual => "Chat",
            };
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "message": format!("{noun} set to: {}", chat.name),
                    "groupId": chat.id.as_str(),
                })),
            )
        }
        // Listing is surfaced on a miss so the caller can correct the name
        Err(TripBotError::NotFound { candidates, .. }) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "groupNameList": candidates })),
        ),
        Err(e) => {
            tracing::error!("error setting target '{name}': {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "message": "Error setting group",
                    "error": e.to_string(),
                })),
            )
        }
    }
}

/// GET /set-group/{groupName} — select a group chat by display name.
pub async fn set_group(
    State(state): State<Arc<AppState>>,
    Path(group_name): Path<String>,
) -> (StatusCode, Json<serde_json::Value>) {
    set_target_by_name(&state, &group_name, ChatKind::Group).await
}

/// GET /set-chat/{chatName} — select an individual chat by display name.
pub async fn set_chat(
    State(state): State<Arc<AppState>>,
    Path(chat_name): Path<String>,
) -> (StatusCode, Json<serde_json::Value>) {
    set_target_by_name(&state, &chat_name, ChatKind::Individual).await
}

/// GET /set-chat-id/{id} — build an individual-chat target from a raw
/// numeric id. No existence validation against the transport.
pub async fn set_chat_id(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Json<serde_json::Value> {
    let target = state.selector.resolve_by_id(&id);
    state.store.lock().await.set_target(target.clone());
    Json(serde_json::json!({
        "message": format!("Chat set to: {target}"),
        "groupId": target.as_str(),
    }))
}

async fn send_and_report(state: &AppState, body: &str) -> (StatusCode, Json<serde_json::Value>) {
    if send_now(&state.store, state.messenger.as_ref(), body).await {
        (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "Message sent successfully" })),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "message": "Error sending message" })),
        )
    }
}

/// GET /send-message — immediate send of the fixed message body.
pub async fn send_fixed_message(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<serde_json::Value>) {
    let body = state.config.scheduler.default_message.clone();
    send_and_report(&state, &body).await
}

#[derive(Debug, Deserialize)]
pub struct SendMessageBody {
    pub message: String,
}

/// POST /send-message — immediate send with a caller-supplied body.
pub async fn send_custom_message(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SendMessageBody>,
) -> (StatusCode, Json<serde_json::Value>) {
    send_and_report(&state, &payload.message).await
}

/// GET /schedule-for-tomorrow — validate and arm the single pending
/// schedule for tomorrow at midnight. Rejections mutate nothing.
pub async fn schedule_for_tomorrow(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<serde_json::Value>) {
    let now = Utc::now().with_timezone(&LOCAL_TZ);
    match plan_for_tomorrow(now) {
        Ok(target) => {
            let target_utc = target.with_timezone(&Utc);
            state.store.lock().await.set_schedule(target_utc);
            tracing::info!("message scheduled for {}", target);
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "message": "Message scheduled for tomorrow at midnight",
                    "scheduledDate": render_local(target_utc),
                })),
            )
        }
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "message": e.to_string() })),
        ),
    }
}

/// GET /schedule-status — read-only snapshot of the pending schedule.
pub async fn schedule_status(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let status = state.store.lock().await.status();
    match status.target_date {
        Some(at) if status.is_scheduled => Json(serde_json::json!({
            "message": "Message scheduled",
            "scheduledFor": render_local(at),
        })),
        _ => Json(serde_json::json!({ "message": "No message currently scheduled" })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::build_router;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;
    use tower::ServiceExt;
    use tripbot_core::config::TripBotConfig;
    use tripbot_core::error::{Result, TripBotError};
    use tripbot_core::traits::Messenger;
    use tripbot_core::types::{ChatInfo, TargetId};
    use tripbot_scheduler::ScheduleStore;

    struct StubMessenger {
        chats: Vec<ChatInfo>,
        sent: AtomicUsize,
        fail_send: bool,
    }

    #[async_trait]
    impl Messenger for StubMessenger {
        async fn list_chats(&self) -> Result<Vec<ChatInfo>> {
            Ok(self.chats.clone())
        }

        async fn send_message(&self, _target: &TargetId, _body: &str) -> Result<()> {
            self.sent.fetch_add(1, Ordering::SeqCst);
            if self.fail_send {
                Err(TripBotError::Transport("bridge down".into()))
            } else {
                Ok(())
            }
        }
    }

    fn group(id: &str, name: &str) -> ChatInfo {
        ChatInfo {
            kind: ChatKind::Group,
            id: TargetId(id.into()),
            name: name.into(),
        }
    }

    fn app(
        chats: Vec<ChatInfo>,
        fail_send: bool,
    ) -> (axum::Router, Arc<AppState>, Arc<StubMessenger>) {
        let messenger = Arc::new(StubMessenger {
            chats,
            sent: AtomicUsize::new(0),
            fail_send,
        });
        let store = Arc::new(Mutex::new(ScheduleStore::new()));
        let state = Arc::new(AppState::new(
            TripBotConfig::default(),
            messenger.clone(),
            store,
        ));
        (build_router(state.clone()), state, messenger)
    }

    async fn get_json(
        router: axum::Router,
        uri: &str,
    ) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_set_group_resolves_and_stores_target() {
        let (router, state, _) = app(vec![group("1@g.us", "Office Car")], false);
        let (status, body) = get_json(router, "/set-group/Office%20Car").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["groupId"], "1@g.us");
        assert_eq!(body["message"], "Group set to: Office Car");
        assert_eq!(
            state.store.lock().await.target(),
            Some(TargetId("1@g.us".into()))
        );
    }

    #[tokio::test]
    async fn test_set_group_unknown_name_404_with_listing() {
        let (router, state, _) = app(
            vec![group("1@g.us", "Family"), group("2@g.us", "Cricket")],
            false,
        );
        let (status, body) = get_json(router, "/set-group/Office%20Car").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["groupNameList"], serde_json::json!(["Family", "Cricket"]));
        // Target unchanged by the failed call
        assert!(state.store.lock().await.target().is_none());
    }

    #[tokio::test]
    async fn test_set_chat_id_formats_target() {
        let (router, state, _) = app(vec![], false);
        let (status, body) = get_json(router, "/set-chat-id/9876543210").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["groupId"], "919876543210@c.us");
        assert_eq!(
            state.store.lock().await.target(),
            Some(TargetId("919876543210@c.us".into()))
        );
    }

    #[tokio::test]
    async fn test_send_message_without_target_is_500() {
        let (router, _, messenger) = app(vec![], false);
        let (status, body) = get_json(router, "/send-message").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Error sending message");
        assert_eq!(messenger.sent.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_post_send_message_uses_payload_body() {
        let (router, state, messenger) = app(vec![], false);
        state
            .store
            .lock()
            .await
            .set_target(TargetId("1@g.us".into()));

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/send-message")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"message": "leaving early"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(messenger.sent.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_schedule_status_empty() {
        let (router, _, _) = app(vec![], false);
        let (status, body) = get_json(router, "/schedule-status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "No message currently scheduled");
    }

    #[tokio::test]
    async fn test_schedule_status_armed_renders_local_time() {
        let (router, state, _) = app(vec![], false);
        let at = LOCAL_TZ
            .with_ymd_and_hms(2024, 8, 14, 0, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        state.store.lock().await.set_schedule(at);

        let (status, body) = get_json(router, "/schedule-status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Message scheduled");
        assert_eq!(body["scheduledFor"], "14/08/2024, 12:00:00 AM");
    }
}
