//! SendAction — deliver one message to the active target, containing every
//! failure as a logged boolean. Nothing here may panic or propagate an error
//! into the poller loop or an HTTP handler.

use tokio::sync::Mutex;
use tripbot_core::traits::Messenger;

use crate::store::ScheduleStore;

/// Send `body` to the currently selected target. Returns `true` on success.
///
/// No target set is a fail-fast: logged, no transport call made. Transport
/// failures are logged and surface as `false`, never as an error.
pub async fn send_now(store: &Mutex<ScheduleStore>, messenger: &dyn Messenger, body: &str) -> bool {
    let target = { store.lock().await.target() };

    let Some(target) = target else {
        tracing::error!("no target chat set; use /set-group or /set-chat first");
        return false;
    };

    match messenger.send_message(&target, body).await {
        Ok(()) => {
            tracing::info!("message sent to {target}");
            true
        }
        Err(e) => {
            tracing::error!("error sending message to {target}: {e}");
            false
        }
    }
}
