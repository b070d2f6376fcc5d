//! Outcome classification for executed actions.
//!
//! Every execution that is not abandoned produces exactly one [`Outcome`].
//! The variants separate what the UI layer must do next: show a success
//! message, offer a retry-after countdown, show an error, or ask the user
//! to connect their account.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classified result of one remote action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Outcome {
    /// The action took effect remotely
    Success {
        /// User-displayable confirmation message
        message: String,
    },

    /// The service refused for now (another check-in is still running)
    Blocked {
        /// Seconds until the action can be retried
        wait_secs: u32,
    },

    /// The action definitively failed
    Failure {
        /// User-displayable error message, never empty
        error: String,
    },

    /// Valid credentials are required before this action can run
    AuthRequired,
}

impl Outcome {
    /// Whether the action took effect remotely
    pub fn was_successful(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    /// Whether this outcome is final for the request
    ///
    /// `Blocked` and `AuthRequired` are not terminal: the same request can
    /// be resubmitted once the wait elapses or credentials are fixed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Outcome::Success { .. } | Outcome::Failure { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success { message } => write!(f, "success: {}", message),
            Outcome::Blocked { wait_secs } => write!(f, "blocked for {}s", wait_secs),
            Outcome::Failure { error } => write!(f, "failure: {}", error),
            Outcome::AuthRequired => write!(f, "auth required"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
