//! Couchlog Domain Layer
//!
//! Pure domain model with zero I/O dependencies.
//! Contains the action request model and validated value objects.

#![warn(missing_docs)]
#![warn(clippy::all)]

// Public modules
pub mod action;
pub mod value_objects;

// Re-export commonly used types
pub use action::{ActionKind, ActionRequest};
pub use value_objects::{DomainError, EpisodeRef, ImdbId, Rating, ShowId, TmdbId};
