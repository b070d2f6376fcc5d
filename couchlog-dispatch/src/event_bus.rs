//! Event bus for process-wide completion broadcasts.
//!
//! Observer registration (see the router) serves components that care
//! about one specific submission. The bus serves everything else: any part
//! of the host application can subscribe and hear about every terminal
//! action without knowing who submitted it.
//!
//! Fan-out is a tokio broadcast channel under the hood.

use chrono::{DateTime, Utc};
use couchlog_domain::ActionRequest;
use tokio::sync::broadcast;
use tracing::warn;

// =============================================================================
// Event Types
// =============================================================================

/// Broadcast when an action reaches a terminal result.
///
/// Published for `Success` and `Failure` only. A blocked check-in and a
/// missing-credentials result are not terminal (the same request may be
/// resubmitted), so nothing is broadcast for them.
#[derive(Debug, Clone)]
pub struct ActionCompleted {
    /// The request that was executed
    pub request: ActionRequest,
    /// Whether the action took effect remotely
    pub success: bool,
    /// When the outcome was routed
    pub completed_at: DateTime<Utc>,
}

// =============================================================================
// Event Bus
// =============================================================================

/// Event bus for process-wide completion events.
///
/// Any number of senders and subscribers; every subscriber hears every
/// event sent while it is live.
pub struct EventBus {
    sender: broadcast::Sender<ActionCompleted>,
}

impl EventBus {
    /// Create a new event bus holding up to `capacity` undelivered events.
    ///
    /// A receiver that falls further behind than the capacity loses the
    /// oldest events and is told how many it missed.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Broadcast an event to every current subscriber.
    ///
    /// Returns how many receivers the event reached. Zero subscribers is
    /// a normal state, not an error.
    pub fn send(&self, event: ActionCompleted) -> usize {
        // broadcast::Sender errors on zero receivers; fold that into a count
        self.sender.send(event).unwrap_or(0)
    }

    /// Open a new subscription.
    ///
    /// The receiver sees events sent after this call, nothing retroactive.
    pub fn subscribe(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.sender.subscribe(),
        }
    }

    /// Get the number of active receivers.
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(64)
    }
}

/// Receiver for completion events.
pub struct EventReceiver {
    receiver: broadcast::Receiver<ActionCompleted>,
}

impl EventReceiver {
    /// Wait for the next completion event.
    ///
    /// Yields `None` once the bus itself is gone. A receiver that fell
    /// behind the bus capacity gets one `Some(Err(..))` naming how many
    /// events it missed, then resumes from the oldest retained event on
    /// the next call.
    pub async fn recv(&mut self) -> Option<Result<ActionCompleted, String>> {
        match self.receiver.recv().await {
            Ok(event) => Some(Ok(event)),
            Err(broadcast::error::RecvError::Closed) => None,
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                warn!(missed, "Completion receiver lagged");
                Some(Err(format!("Receiver fell behind, missed {} events", missed)))
            }
        }
    }

    /// Poll for a completion event without waiting.
    ///
    /// `None` covers both "nothing pending" and "bus gone". Lag is
    /// surfaced the same way as in [`recv`](Self::recv).
    pub fn try_recv(&mut self) -> Option<Result<ActionCompleted, String>> {
        match self.receiver.try_recv() {
            Ok(event) => Some(Ok(event)),
            Err(broadcast::error::TryRecvError::Empty) => None,
            Err(broadcast::error::TryRecvError::Closed) => None,
            Err(broadcast::error::TryRecvError::Lagged(missed)) => {
                warn!(missed, "Completion receiver lagged");
                Some(Err(format!("Receiver fell behind, missed {} events", missed)))
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
