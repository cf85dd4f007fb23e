//! Error types for convoy-core

use thiserror::Error;

/// Result type alias using convoy-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in convoy-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// No resolvable user or workspace at the time of a mutating call
    #[error("Not signed in to a workspace")]
    Unauthenticated,

    /// A create/update/delete call against the backend failed
    #[error("Backend write failed: {0}")]
    BackendWrite(String),

    /// A full collection fetch failed; the previous collection is kept
    #[error("Fetch failed: {0}")]
    Fetch(String),

    /// A change-notification subscription could not be established
    #[error("Subscription failed: {0}")]
    Subscribe(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
