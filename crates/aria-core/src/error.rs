//! Error types for aria-core

use thiserror::Error;

/// Session error type
#[derive(Debug, Error)]
pub enum Error {
    /// Referenced mode does not exist
    #[error("unknown mode: {0}")]
    UnknownMode(String),

    /// Connector drafts require operator notes
    #[error("connector drafts require non-empty operator notes")]
    NotesRequired,

    /// Gateway failure
    #[error(transparent)]
    Gateway(#[from] aria_llm::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
