//! Process-wide mutable state: the single pending schedule and the active
//! target chat. Shared as `Arc<tokio::sync::Mutex<ScheduleStore>>` between
//! the HTTP handlers and the dispatch poller; the mutex supplies the mutual
//! exclusion the single-owner design requires.

use chrono::{DateTime, Utc};
use tripbot_core::types::{ScheduleState, TargetId};

/// Holds at most one pending schedule and at most one active target.
/// Both are overwritten, never queued.
#[derive(Debug, Default)]
pub struct ScheduleStore {
    target_date: Option<DateTime<Utc>>,
    target: Option<TargetId>,
}

impl ScheduleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unconditionally overwrite the pending schedule. Validation (midnight
    /// guard, working-day check) is the caller's responsibility — see
    /// [`crate::plan::plan_for_tomorrow`].
    pub fn set_schedule(&mut self, at: DateTime<Utc>) {
        self.target_date = Some(at);
    }

    /// Reset to the disarmed state. Idempotent.
    pub fn clear(&mut self) {
        self.target_date = None;
    }

    /// Read-only snapshot of the pending schedule.
    pub fn status(&self) -> ScheduleState {
        ScheduleState {
            is_scheduled: self.target_date.is_some(),
            target_date: self.target_date,
        }
    }

    /// Overwrite the active target chat.
    pub fn set_target(&mut self, target: TargetId) {
        self.target = Some(target);
    }

    pub fn target(&self) -> Option<TargetId> {
        self.target.clone()
    }
}
