//! # TripBot Gateway
//! JSON HTTP surface: target selection, manual sends, and schedule control.

pub mod routes;
pub mod server;

pub use server::{build_router, serve, AppState};
