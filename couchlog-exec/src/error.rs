//! Execution layer error types.

use thiserror::Error;

/// Errors crossing the tracker client boundary.
///
/// Every variant is caught by the executor and turned into a displayable
/// outcome; none of them propagates past it.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connection-level failure (DNS, connect, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The exchange completed but the payload was malformed or rejected
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Stored credentials are missing or could not be used
    #[error("Credential error: {0}")]
    Credentials(String),
}

/// Result type for tracker client operations.
pub type ClientResult<T> = Result<T, ClientError>;
