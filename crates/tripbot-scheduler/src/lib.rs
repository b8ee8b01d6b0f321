//! # TripBot Scheduler
//!
//! The scheduling core: a minute-granularity poller that holds at most one
//! pending scheduled send, matches wall-clock time (Asia/Kolkata) against a
//! target timestamp, applies the working-day policy, and performs an
//! at-most-once delayed dispatch with post-send state reset.
//!
//! ## Architecture
//! ```text
//! HTTP routes ──mutate──▶ ScheduleStore ◀──read/clear── DispatchEngine
//!                            (Arc<Mutex>)                     │
//!                                                  tokio interval, 60s tick
//!                                                             │
//!                      minute match → settle delay → working-day check
//!                                    → SendAction → unconditional clear
//! ```
//!
//! A missed minute (process down, bridge hung past the window) is silently
//! dropped — there is no catch-up and no retry.

pub mod calendar;
pub mod engine;
pub mod plan;
pub mod send;
pub mod store;

pub use calendar::{is_holiday, is_working_day};
pub use engine::{spawn_dispatcher, DispatchEngine, TickOutcome};
pub use plan::plan_for_tomorrow;
pub use send::send_now;
pub use store::ScheduleStore;
