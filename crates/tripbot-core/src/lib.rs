//! # TripBot Core
//!
//! Shared foundation for the TripBot workspace: configuration, the error
//! taxonomy, core types (target ids, chat listings, schedule state), and
//! the `Messenger` trait that abstracts the WhatsApp transport.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::TripBotConfig;
pub use error::{Result, TripBotError};
pub use traits::Messenger;
pub use types::{ChatInfo, ChatKind, ScheduleState, TargetId, LOCAL_TZ};
