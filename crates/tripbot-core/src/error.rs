//! Error taxonomy shared across the workspace.

use thiserror::Error;

/// Workspace-wide result alias.
pub type Result<T> = std::result::Result<T, TripBotError>;

#[derive(Debug, Error)]
pub enum TripBotError {
    /// The external messaging capability failed (HTTP error, bad payload,
    /// bridge not ready). Always contained at the call site — never allowed
    /// to escape into the poller loop.
    #[error("transport error: {0}")]
    Transport(String),

    /// Configuration could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// A chat/group display name did not resolve. Carries the full candidate
    /// list so the caller can correct the name.
    #[error("no chat named '{name}' found")]
    NotFound {
        name: String,
        candidates: Vec<String>,
    },

    /// A scheduling request was rejected (disallowed time or non-working
    /// day). No state is mutated when this is returned.
    #[error("{0}")]
    Validation(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
