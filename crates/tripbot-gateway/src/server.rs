//! HTTP server implementation using Axum.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tripbot_core::config::TripBotConfig;
use tripbot_core::error::Result;
use tripbot_core::traits::Messenger;
use tripbot_channels::TargetSelector;
use tripbot_scheduler::ScheduleStore;

/// Shared state for the gateway server.
pub struct AppState {
    pub config: TripBotConfig,
    pub start_time: std::time::Instant,
    /// The messaging transport — opaque capability behind the bridge.
    pub messenger: Arc<dyn Messenger>,
    /// Single pending schedule + active target, shared with the poller.
    pub store: Arc<Mutex<ScheduleStore>>,
    pub selector: TargetSelector,
}

impl AppState {
    pub fn new(
        config: TripBotConfig,
        messenger: Arc<dyn Messenger>,
        store: Arc<Mutex<ScheduleStore>>,
    ) -> Self {
        let selector = TargetSelector::new(messenger.clone(), config.bridge.country_code.clone());
        Self {
            config,
            start_time: std::time::Instant::now(),
            messenger,
            store,
            selector,
        }
    }
}

/// Build the Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(super::routes::welcome))
        .route("/set-group/{group_name}", get(super::routes::set_group))
        .route("/set-chat/{chat_name}", get(super::routes::set_chat))
        .route("/set-chat-id/{id}", get(super::routes::set_chat_id))
        .route("/send-message", get(super::routes::send_fixed_message))
        .route("/send-message", post(super::routes::send_custom_message))
        .route(
            "/schedule-for-tomorrow",
            get(super::routes::schedule_for_tomorrow),
        )
        .route("/schedule-status", get(super::routes::schedule_status))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any))
        .with_state(state)
}

/// Bind and serve until shutdown.
pub async fn serve(state: Arc<AppState>) -> Result<()> {
    let addr = format!(
        "{}:{}",
        state.config.gateway.host, state.config.gateway.port
    );
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("server running at http://localhost:{}", state.config.gateway.port);

    let router = build_router(state);
    axum::serve(listener, router).await?;
    Ok(())
}
