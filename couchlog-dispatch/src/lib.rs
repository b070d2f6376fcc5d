//! Couchlog Dispatch Library
//!
//! Runtime layer: submits remote actions for background execution and
//! routes their outcomes back to the host application.
//!
//! # Architecture
//!
//! ```text
//! Host app → ActionDispatcher → worker task → ActionExecutor → TrackerPort
//!                 ↓ (outcome)
//!           OutcomeRouter → ActionObserver callbacks
//!                         → EventBus (terminal outcomes only)
//! ```
//!
//! # Components
//!
//! - **ActionDispatcher**: One tokio task per submitted request
//! - **ActionHandle**: Cooperative cancellation, completion tracking
//! - **OutcomeRouter**: Exactly-once delivery to weakly-held observers
//! - **EventBus**: Process-wide broadcast of terminal outcomes
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use couchlog_dispatch::{ActionDispatcher, EventBus, OutcomeRouter};
//! use couchlog_domain::{ActionRequest, TmdbId};
//! use couchlog_exec::{ActionExecutor, StubEnvironment};
//!
//! let env = Arc::new(StubEnvironment::new());
//! let bus = Arc::new(EventBus::default());
//! let dispatcher = ActionDispatcher::new(
//!     ActionExecutor::new(env),
//!     OutcomeRouter::new(bus.clone()),
//! );
//!
//! let request = ActionRequest::WatchlistAddMovie {
//!     tmdb_id: TmdbId::new(603)?,
//! };
//! dispatcher.submit(request).join().await?;
//! ```

#![warn(clippy::all)]

pub mod dispatcher;
pub mod error;
pub mod event_bus;
pub mod router;

// Re-exports for convenience
pub use dispatcher::{ActionDispatcher, ActionHandle};
pub use error::{DispatchError, DispatchResult};
pub use event_bus::{ActionCompleted, EventBus, EventReceiver};
pub use router::{ActionObserver, ObserverSet, OutcomeRouter};
