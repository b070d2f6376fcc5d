//! Outcome routing: one executed request, one delivery.
//!
//! The router is the single place where a classified [`Outcome`] turns
//! into observer callbacks and bus events:
//!
//! ```text
//! Success      → on_action_complete(request, true, Some(message)) + bus event
//! Blocked      → on_checkin_blocked(request, wait_secs)
//! Failure      → on_action_complete(request, false, Some(error))  + bus event
//! AuthRequired → on_action_complete(request, false, None)
//! ```
//!
//! Observers are held weakly: one torn down between submission and
//! delivery is skipped silently, never an error.

use std::sync::{Arc, PoisonError, RwLock, Weak};

use chrono::Utc;
use tracing::debug;

use couchlog_domain::ActionRequest;
use couchlog_exec::Outcome;

use crate::event_bus::{ActionCompleted, EventBus};

// =============================================================================
// Observer
// =============================================================================

/// Callback surface for components interested in action results.
pub trait ActionObserver: Send + Sync {
    /// An action finished.
    ///
    /// `message` carries the success message or the failure error; it is
    /// `None` exactly when valid credentials are required first.
    fn on_action_complete(&self, request: &ActionRequest, success: bool, message: Option<&str>);

    /// A check-in was refused because another one is still running.
    ///
    /// Default is a no-op; only check-in surfaces care.
    fn on_checkin_blocked(&self, _request: &ActionRequest, _wait_secs: u32) {}
}

// =============================================================================
// Observer Set
// =============================================================================

/// Registry of weakly-held observers.
pub struct ObserverSet {
    /// Registered observers; dead entries are dropped on delivery
    observers: RwLock<Vec<Weak<dyn ActionObserver>>>,
}

impl ObserverSet {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Register an observer.
    ///
    /// The registry does not keep the observer alive; hold the `Arc`
    /// elsewhere for as long as deliveries are wanted.
    pub fn register(&self, observer: Weak<dyn ActionObserver>) {
        let mut observers = self.observers.write().unwrap_or_else(PoisonError::into_inner);
        observers.push(observer);
    }

    /// Number of registered observers that are still alive.
    pub fn live_count(&self) -> usize {
        let observers = self.observers.read().unwrap_or_else(PoisonError::into_inner);
        observers.iter().filter(|weak| weak.strong_count() > 0).count()
    }

    /// Upgrade all live observers and drop dead entries.
    ///
    /// Callbacks run on the returned handles with the registry lock
    /// already released.
    fn collect_live(&self) -> Vec<Arc<dyn ActionObserver>> {
        let mut observers = self.observers.write().unwrap_or_else(PoisonError::into_inner);
        let mut live = Vec::with_capacity(observers.len());
        observers.retain(|weak| match weak.upgrade() {
            Some(observer) => {
                live.push(observer);
                true
            },
            None => false,
        });
        live
    }
}

impl Default for ObserverSet {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Outcome Router
// =============================================================================

/// Routes each executed request's outcome to observers and the event bus.
pub struct OutcomeRouter {
    /// Registered observers
    observers: ObserverSet,
    /// Bus for process-wide terminal events
    event_bus: Arc<EventBus>,
}

impl OutcomeRouter {
    /// Create a router publishing terminal events on the given bus.
    pub fn new(event_bus: Arc<EventBus>) -> Self {
        Self {
            observers: ObserverSet::new(),
            event_bus,
        }
    }

    /// Register an observer for future deliveries.
    pub fn register(&self, observer: Weak<dyn ActionObserver>) {
        self.observers.register(observer);
    }

    /// Number of registered observers that are still alive.
    pub fn observer_count(&self) -> usize {
        self.observers.live_count()
    }

    /// Deliver one outcome.
    ///
    /// Called exactly once per executed request, on the worker task. Each
    /// live observer hears about it exactly once, and a terminal outcome
    /// is broadcast exactly once.
    pub fn deliver(&self, request: &ActionRequest, outcome: Outcome) {
        let kind = request.kind();

        match outcome {
            Outcome::Success { message } => {
                debug!(kind = kind.as_str(), "Routing success");
                self.notify_complete(request, true, Some(&message));
                self.broadcast(request, true);
            },

            Outcome::Blocked { wait_secs } => {
                debug!(kind = kind.as_str(), wait_secs, "Routing blocked check-in");
                for observer in self.observers.collect_live() {
                    observer.on_checkin_blocked(request, wait_secs);
                }
            },

            Outcome::Failure { error } => {
                debug!(kind = kind.as_str(), "Routing failure");
                self.notify_complete(request, false, Some(&error));
                self.broadcast(request, false);
            },

            // No message here: nothing failed, the user just needs to
            // connect their account first
            Outcome::AuthRequired => {
                debug!(kind = kind.as_str(), "Routing auth-required");
                self.notify_complete(request, false, None);
            },
        }
    }

    fn notify_complete(&self, request: &ActionRequest, success: bool, message: Option<&str>) {
        for observer in self.observers.collect_live() {
            observer.on_action_complete(request, success, message);
        }
    }

    fn broadcast(&self, request: &ActionRequest, success: bool) {
        self.event_bus.send(ActionCompleted {
            request: request.clone(),
            success,
            completed_at: Utc::now(),
        });
    }
}

// =============================================================================
// Tests
// =============================================================================
