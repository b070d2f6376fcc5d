//! Couchlog Execution Layer
//!
//! Precondition-gated execution of one remote action at a time.
//!
//! # Architecture
//!
//! ```text
//! ActionRequest → ActionExecutor → gates → TrackerPort → Outcome
//! ```
//!
//! # Components
//!
//! - **Ports**: Traits defining the tracker and environment interfaces
//! - **Executor**: Runs the gates, dispatches one tracker call, classifies
//! - **Outcome**: The single classified result of an execution
//! - **Stub**: Test implementations with scripted responses and call logs
//!
//! # Example
//!
//! ```rust,ignore
//! use couchlog_exec::{ActionExecutor, CancelFlag, StubEnvironment};
//! use std::sync::Arc;
//!
//! let env = Arc::new(StubEnvironment::new());
//! let executor = ActionExecutor::new(env);
//!
//! // None means the request was cancelled before its remote call
//! let outcome = executor.execute(&request, &CancelFlag::new()).await;
//! ```

#![warn(clippy::all)]

pub mod error;
pub mod executor;
pub mod outcome;
pub mod ports;
pub mod stub;

// Re-exports for convenience
pub use error::{ClientError, ClientResult};
pub use executor::{ActionExecutor, CancelFlag};
pub use outcome::Outcome;
pub use ports::{EnvironmentPort, RemoteResponse, ResponseStatus, TrackerPort};
pub use stub::{StubCall, StubEnvironment, StubTracker};
