//! Error types for aria-speech

use thiserror::Error;

/// Speech bridge error type
#[derive(Debug, Error)]
pub enum Error {
    /// No engine was detected at startup for this capability
    #[error("speech capability disabled: {0}")]
    Disabled(&'static str),

    /// Engine reported a failure
    #[error("engine error: {0}")]
    Engine(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
