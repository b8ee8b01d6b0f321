//! Dispatch poller — the main loop that matches wall-clock time against the
//! pending schedule and fires the send.
//!
//! Two states: Idle (nothing pending) and Armed (one pending schedule). The
//! tick period equals the width of the minute-match window, so an armed
//! schedule fires at most once. Ticks are serialized: the loop awaits each
//! tick's full match-act-clear sequence before the next begins, which is
//! what prevents double dispatch while the settle delay is in flight.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Tz;
use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tripbot_core::config::SchedulerConfig;
use tripbot_core::traits::Messenger;
use tripbot_core::types::LOCAL_TZ;

use crate::calendar::is_working_day;
use crate::send::send_now;
use crate::store::ScheduleStore;

/// Result of one poller tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No pending schedule.
    Idle,
    /// Armed, but the current minute is not the target minute.
    NoMatch,
    /// Matched and delivered.
    Sent,
    /// Matched but the day failed the working-day re-check; nothing sent.
    SkippedNonWorkingDay,
    /// Matched but the send failed (no target, or transport error).
    SendFailed,
}

/// The dispatch engine. One per process; driven by [`spawn_dispatcher`].
pub struct DispatchEngine {
    store: Arc<Mutex<ScheduleStore>>,
    messenger: Arc<dyn Messenger>,
    settle_delay: Duration,
    message: String,
}

impl DispatchEngine {
    pub fn new(
        store: Arc<Mutex<ScheduleStore>>,
        messenger: Arc<dyn Messenger>,
        config: &SchedulerConfig,
    ) -> Self {
        Self {
            store,
            messenger,
            settle_delay: Duration::from_millis(config.settle_delay_ms),
            message: config.default_message.clone(),
        }
    }

    /// Run one tick against the given instant. After a minute match the
    /// store is cleared unconditionally — sent, skipped, or failed — so a
    /// miss is silent and non-retryable.
    pub async fn tick(&self, now: DateTime<Utc>) -> TickOutcome {
        let target_date = {
            let store = self.store.lock().await;
            match store.status().target_date {
                Some(t) => t,
                None => return TickOutcome::Idle,
            }
        };

        let local_now = now.with_timezone(&LOCAL_TZ);
        let local_target = target_date.with_timezone(&LOCAL_TZ);
        if !same_minute(&local_now, &local_target) {
            return TickOutcome::NoMatch;
        }

        tracing::info!(
            "time matched, waiting {}ms before sending",
            self.settle_delay.as_millis()
        );
        tokio::time::sleep(self.settle_delay).await;

        let outcome = if is_working_day(local_now.date_naive()) {
            tracing::info!("sending scheduled message at {}", local_now);
            if send_now(&self.store, self.messenger.as_ref(), &self.message).await {
                TickOutcome::Sent
            } else {
                TickOutcome::SendFailed
            }
        } else {
            tracing::info!("{} is not a working day, skipping send", local_now.date_naive());
            TickOutcome::SkippedNonWorkingDay
        };

        self.store.lock().await.clear();
        outcome
    }
}

/// Minute-window equality: seconds and below are ignored.
fn same_minute(a: &DateTime<Tz>, b: &DateTime<Tz>) -> bool {
    a.year() == b.year()
        && a.month() == b.month()
        && a.day() == b.day()
        && a.hour() == b.hour()
        && a.minute() == b.minute()
}

/// Spawn the poller loop as a background tokio task. Missed ticks are
/// skipped, not replayed — a minute that passes while the process is busy or
/// down is simply gone.
pub fn spawn_dispatcher(engine: Arc<DispatchEngine>, tick_secs: u64) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        tracing::info!("⏰ dispatch poller started (tick every {tick_secs}s)");
        let mut interval = tokio::time::interval(Duration::from_secs(tick_secs));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            match engine.tick(Utc::now()).await {
                TickOutcome::Sent => tracing::info!("scheduled message dispatched"),
                TickOutcome::SendFailed => tracing::warn!("scheduled dispatch failed; schedule cleared"),
                TickOutcome::SkippedNonWorkingDay => {
                    tracing::info!("scheduled dispatch skipped (non-working day); schedule cleared")
                }
                TickOutcome::Idle | TickOutcome::NoMatch => {}
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tripbot_core::error::{Result, TripBotError};
    use tripbot_core::types::{ChatInfo, TargetId};

    struct RecordingMessenger {
        sent: AtomicUsize,
        last_body: Mutex<Option<String>>,
        fail: bool,
    }

    impl RecordingMessenger {
        fn new(fail: bool) -> Arc<Self> {
            Arc::new(Self {
                sent: AtomicUsize::new(0),
                last_body: Mutex::new(None),
                fail,
            })
        }
    }

    #[async_trait]
    impl Messenger for RecordingMessenger {
        async fn list_chats(&self) -> Result<Vec<ChatInfo>> {
            Ok(vec![])
        }

        async fn send_message(&self, _target: &TargetId, body: &str) -> Result<()> {
            self.sent.fetch_add(1, Ordering::SeqCst);
            *self.last_body.lock().await = Some(body.to_string());
            if self.fail {
                Err(TripBotError::Transport("bridge down".into()))
            } else {
                Ok(())
            }
        }
    }

    fn config() -> SchedulerConfig {
        SchedulerConfig::default()
    }

    fn utc_of_local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        LOCAL_TZ
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    async fn armed_engine(
        target: DateTime<Utc>,
        messenger: Arc<RecordingMessenger>,
    ) -> (DispatchEngine, Arc<Mutex<ScheduleStore>>) {
        let store = Arc::new(Mutex::new(ScheduleStore::new()));
        {
            let mut s = store.lock().await;
            s.set_target(TargetId("1@g.us".into()));
            s.set_schedule(target);
        }
        let engine = DispatchEngine::new(store.clone(), messenger, &config());
        (engine, store)
    }

    #[tokio::test]
    async fn test_idle_when_nothing_scheduled() {
        let store = Arc::new(Mutex::new(ScheduleStore::new()));
        let engine = DispatchEngine::new(store, RecordingMessenger::new(false), &config());
        assert_eq!(engine.tick(Utc::now()).await, TickOutcome::Idle);
    }

    #[tokio::test]
    async fn test_armed_but_wrong_minute_stays_armed() {
        let messenger = RecordingMessenger::new(false);
        let target = utc_of_local(2024, 8, 14, 0, 0);
        let (engine, store) = armed_engine(target, messenger.clone()).await;

        let outcome = engine.tick(utc_of_local(2024, 8, 13, 23, 59)).await;
        assert_eq!(outcome, TickOutcome::NoMatch);
        assert!(store.lock().await.status().is_scheduled);
        assert_eq!(messenger.sent.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_match_sends_once_and_clears() {
        let messenger = RecordingMessenger::new(false);
        let target = utc_of_local(2024, 8, 14, 0, 0);
        let (engine, store) = armed_engine(target, messenger.clone()).await;

        // Seconds within the target minute are ignored
        let now = target + chrono::Duration::seconds(23);
        assert_eq!(engine.tick(now).await, TickOutcome::Sent);
        assert_eq!(messenger.sent.load(Ordering::SeqCst), 1);
        assert_eq!(
            messenger.last_body.lock().await.as_deref(),
            Some("1st trip")
        );
        assert!(!store.lock().await.status().is_scheduled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_to_back_ticks_single_send() {
        let messenger = RecordingMessenger::new(false);
        let target = utc_of_local(2024, 8, 14, 0, 0);
        let (engine, store) = armed_engine(target, messenger.clone()).await;

        // Ticks are serialized by the poller loop; the second observes the
        // cleared store and goes idle.
        assert_eq!(engine.tick(target).await, TickOutcome::Sent);
        assert_eq!(engine.tick(target).await, TickOutcome::Idle);
        assert_eq!(messenger.sent.load(Ordering::SeqCst), 1);
        assert!(!store.lock().await.status().is_scheduled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_working_day_skips_but_clears() {
        let messenger = RecordingMessenger::new(false);
        // Independence Day midnight — armed state survives until the tick
        let target = utc_of_local(2024, 8, 15, 0, 0);
        let (engine, store) = armed_engine(target, messenger.clone()).await;

        assert_eq!(engine.tick(target).await, TickOutcome::SkippedNonWorkingDay);
        assert_eq!(messenger.sent.load(Ordering::SeqCst), 0);
        assert!(!store.lock().await.status().is_scheduled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_send_still_clears() {
        let messenger = RecordingMessenger::new(true);
        let target = utc_of_local(2024, 8, 14, 0, 0);
        let (engine, store) = armed_engine(target, messenger.clone()).await;

        assert_eq!(engine.tick(target).await, TickOutcome::SendFailed);
        assert!(!store.lock().await.status().is_scheduled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_target_is_send_failed() {
        let messenger = RecordingMessenger::new(false);
        let store = Arc::new(Mutex::new(ScheduleStore::new()));
        let target = utc_of_local(2024, 8, 14, 0, 0);
        store.lock().await.set_schedule(target);
        let engine = DispatchEngine::new(store.clone(), messenger.clone(), &config());

        assert_eq!(engine.tick(target).await, TickOutcome::SendFailed);
        assert_eq!(messenger.sent.load(Ordering::SeqCst), 0);
        assert!(!store.lock().await.status().is_scheduled);
    }
}
