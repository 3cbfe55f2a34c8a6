//! Error types for aria-llm

use thiserror::Error;

/// Gateway error type
#[derive(Debug, Error)]
pub enum Error {
    /// No API credential configured
    #[error("gateway not configured: {0}")]
    NotConfigured(String),

    /// Upstream returned a non-success status
    #[error("upstream error (HTTP {status}): {body}")]
    Upstream {
        /// HTTP status code reported by the upstream API
        status: u16,
        /// Raw upstream response body
        body: String,
    },

    /// Network / transport failure
    #[error("network error: {0}")]
    Network(String),

    /// Upstream response could not be decoded
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
