//! # TripBot Channels
//! WhatsApp transport implementation and target resolution.

pub mod selector;
pub mod whatsapp;

pub use selector::TargetSelector;
pub use whatsapp::{BridgeStatus, WhatsAppBridge};
