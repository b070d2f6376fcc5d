//! Dispatcher: background execution of submitted actions.
//!
//! One submission, one tokio task, at most one delivery. Requests are
//! independent of each other: no queueing, no cross-request coordination.
//!
//! # Flow
//!
//! ```text
//! submit(request) → spawn worker → executor.execute(request, cancel)
//!                                    → Some(outcome) → router.deliver(...)
//!                                    → None (cancelled) → nothing delivered
//! ```

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use couchlog_domain::ActionRequest;
use couchlog_exec::{ActionExecutor, CancelFlag, EnvironmentPort};

use crate::error::{DispatchError, DispatchResult};
use crate::router::OutcomeRouter;

// =============================================================================
// Action Dispatcher
// =============================================================================

/// Submits actions for background execution and routes their outcomes.
pub struct ActionDispatcher<E: EnvironmentPort + 'static> {
    /// Executor shared by all worker tasks
    executor: Arc<ActionExecutor<E>>,
    /// Router shared by all worker tasks
    router: Arc<OutcomeRouter>,
}

impl<E: EnvironmentPort + 'static> ActionDispatcher<E> {
    /// Create a new dispatcher.
    pub fn new(executor: ActionExecutor<E>, router: OutcomeRouter) -> Self {
        Self {
            executor: Arc::new(executor),
            router: Arc::new(router),
        }
    }

    /// The router, for observer registration.
    pub fn router(&self) -> &OutcomeRouter {
        &self.router
    }

    /// Submit a request for background execution.
    ///
    /// Returns immediately; the request runs on its own tokio task.
    /// Within the worker the order is fixed: precondition gates, then the
    /// remote call, then classification, then delivery. Delivery happens
    /// at most once, and not at all for a request abandoned by
    /// cancellation.
    pub fn submit(&self, request: ActionRequest) -> ActionHandle {
        let submission_id = Uuid::now_v7();
        let cancel = CancelFlag::new();

        info!(
            %submission_id,
            kind = request.kind().as_str(),
            "Action submitted"
        );

        let executor = self.executor.clone();
        let router = self.router.clone();
        let flag = cancel.clone();

        let task = tokio::spawn(async move {
            match executor.execute(&request, &flag).await {
                Some(outcome) => router.deliver(&request, outcome),
                None => debug!(%submission_id, "Action abandoned, nothing delivered"),
            }
        });

        ActionHandle {
            submission_id,
            task,
            cancel,
        }
    }
}

// =============================================================================
// Action Handle
// =============================================================================

/// Handle to one submitted action.
pub struct ActionHandle {
    /// Correlation id for this submission
    submission_id: Uuid,
    /// The worker task
    task: JoinHandle<()>,
    /// Cancellation flag shared with the worker
    cancel: CancelFlag,
}

impl ActionHandle {
    /// Correlation id for this submission (appears in worker logs).
    pub fn submission_id(&self) -> Uuid {
        self.submission_id
    }

    /// Request cancellation.
    ///
    /// Cooperative: the worker abandons the request only if its remote
    /// call has not been issued yet. A remote call already in flight runs
    /// to completion and its outcome is still delivered.
    pub fn cancel(&self) {
        debug!(submission_id = %self.submission_id, "Cancellation requested");
        self.cancel.cancel();
    }

    /// Whether the worker task has finished.
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the worker task to finish.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::Join`] if the worker task panicked or was
    /// aborted by the runtime.
    pub async fn join(self) -> DispatchResult<()> {
        self.task.await.map_err(|e| DispatchError::Join(e.to_string()))
    }
}

// =============================================================================
// Tests
// =============================================================================
