//! Core types — target addressing and schedule state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The one wall-clock zone the scheduler reasons in. All minute matching and
/// all timestamps rendered to API callers use this zone.
pub const LOCAL_TZ: chrono_tz::Tz = chrono_tz::Asia::Kolkata;

/// Opaque serialized identifier of a destination chat/group within the
/// transport's addressing scheme, e.g. `911234567890@c.us` or
/// `120363041234567890@g.us`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetId(pub String);

impl TargetId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Address-space discriminator: group chats live under `g.us`, individual
/// chats under `c.us`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatKind {
    Group,
    Individual,
}

impl ChatKind {
    /// The id suffix for this address space.
    pub fn server(&self) -> &'static str {
        match self {
            ChatKind::Group => "g.us",
            ChatKind::Individual => "c.us",
        }
    }

    /// Classify a serialized chat id by its suffix.
    pub fn of_id(id: &str) -> ChatKind {
        if id.ends_with("@g.us") {
            ChatKind::Group
        } else {
            ChatKind::Individual
        }
    }
}

/// One entry from the transport's chat listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatInfo {
    pub id: TargetId,
    pub name: String,
    pub kind: ChatKind,
}

/// Snapshot of the single pending schedule.
///
/// Invariant: `is_scheduled` implies `target_date` is present. There is
/// exactly one of these per process — no queue, no history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleState {
    pub is_scheduled: bool,
    pub target_date: Option<DateTime<Utc>>,
}

impl ScheduleState {
    pub fn empty() -> Self {
        Self {
            is_scheduled: false,
            target_date: None,
        }
    }
}
