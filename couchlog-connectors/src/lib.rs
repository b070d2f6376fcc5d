//! Couchlog Tracker Connectors
//!
//! Production adapters for the tracking service: a REST client
//! implementing the tracker port and a host-facing environment holding
//! connectivity state and credentials.

#![warn(clippy::all)]

// Public modules
pub mod config;
pub mod environment;
pub mod trakt_rest;

// Re-exports
pub use config::{ConfigError, TraktConfig};
pub use environment::TraktEnvironment;
pub use trakt_rest::{TraktRestClient, TraktRestError};
