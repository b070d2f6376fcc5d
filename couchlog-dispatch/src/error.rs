//! Dispatch error types.

use thiserror::Error;

/// Runtime-layer errors.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Worker task terminated without completing
    #[error("Action task failed: {0}")]
    Join(String),
}

/// Result type for dispatch operations.
pub type DispatchResult<T> = Result<T, DispatchError>;
