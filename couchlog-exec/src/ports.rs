//! Execution layer port definitions.
//!
//! Ports define the interfaces for the tracking service and the host
//! environment. Adapters implement these ports for specific backends
//! (REST client, stub, etc.).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use couchlog_domain::{EpisodeRef, ImdbId, Rating, ShowId, TmdbId};

use crate::error::ClientResult;

// =============================================================================
// Tracker Port
// =============================================================================

/// Port for remote tracker operations.
///
/// One method per action kind; the executor calls exactly one of them per
/// request. Response-bearing operations return the service's uniform
/// [`RemoteResponse`] document. Watchlist operations have no structured
/// body; their `Ok(())` means the call made it out and back.
///
/// Implementations:
/// - `StubTracker` - For testing (scripted responses, recorded calls)
/// - `TraktRestClient` - Real REST client in couchlog-connectors
#[async_trait]
pub trait TrackerPort: Send + Sync {
    /// Check in to an episode the user is watching right now.
    ///
    /// # Arguments
    ///
    /// * `episode` - Episode being watched
    /// * `message` - Optional message shared with the check-in
    async fn checkin_episode(
        &self,
        episode: &EpisodeRef,
        message: Option<&str>,
    ) -> ClientResult<RemoteResponse>;

    /// Check in to a movie the user is watching right now.
    async fn checkin_movie(
        &self,
        imdb_id: &ImdbId,
        message: Option<&str>,
    ) -> ClientResult<RemoteResponse>;

    /// Rate one episode.
    async fn rate_episode(
        &self,
        episode: &EpisodeRef,
        rating: Rating,
    ) -> ClientResult<RemoteResponse>;

    /// Rate a whole show.
    async fn rate_show(&self, show: ShowId, rating: Rating) -> ClientResult<RemoteResponse>;

    /// Post a comment about a whole show.
    ///
    /// Distinct from [`TrackerPort::comment_episode`]; the two must never
    /// be substituted for each other.
    async fn comment_show(
        &self,
        show: ShowId,
        comment: &str,
        spoiler: bool,
    ) -> ClientResult<RemoteResponse>;

    /// Post a comment about one episode.
    async fn comment_episode(
        &self,
        episode: &EpisodeRef,
        comment: &str,
        spoiler: bool,
    ) -> ClientResult<RemoteResponse>;

    /// Add a movie to the user's watchlist.
    ///
    /// Fire-and-forget: the service sends no structured body worth
    /// inspecting, so success is the absence of a transport error.
    async fn watchlist_movie(&self, tmdb_id: TmdbId) -> ClientResult<()>;

    /// Remove a movie from the user's watchlist.
    async fn unwatchlist_movie(&self, tmdb_id: TmdbId) -> ClientResult<()>;
}

/// Uniform response document shared by all response-bearing operations.
///
/// The tracker reports every one of them in the same shape; the executor
/// classifies outcomes from these fields alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteResponse {
    /// Structural result reported by the service
    pub status: ResponseStatus,
    /// Service-provided success message
    #[serde(default)]
    pub message: Option<String>,
    /// Service-provided error message
    #[serde(default)]
    pub error: Option<String>,
    /// Seconds until a blocked check-in can be retried (0 = not blocked)
    #[serde(default)]
    pub wait_secs: u32,
    /// Title of the show the action was about, when the service echoes it
    #[serde(default)]
    pub show_title: Option<String>,
    /// Title of the movie the action was about, when the service echoes it
    #[serde(default)]
    pub movie_title: Option<String>,
}

impl RemoteResponse {
    /// A plain success with no message
    pub fn success() -> Self {
        Self {
            status: ResponseStatus::Success,
            message: None,
            error: None,
            wait_secs: 0,
            show_title: None,
            movie_title: None,
        }
    }

    /// A failure carrying a service error message
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Failure,
            message: None,
            error: Some(error.into()),
            wait_secs: 0,
            show_title: None,
            movie_title: None,
        }
    }

    /// A check-in refusal with a retry-after duration
    pub fn blocked(error: impl Into<String>, wait_secs: u32) -> Self {
        Self {
            status: ResponseStatus::Failure,
            message: None,
            error: Some(error.into()),
            wait_secs,
            show_title: None,
            movie_title: None,
        }
    }

    /// Whether the service reported structural success
    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

/// Structural result field of a [`RemoteResponse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// The action took effect
    Success,
    /// The action was refused or failed
    Failure,
}

// =============================================================================
// Environment Port
// =============================================================================

/// Port for host environment capabilities: connectivity, credentials, and
/// access to an authenticated tracker client.
///
/// The two boolean checks are cheap, synchronous reads of already-known
/// state. Only `authenticated_client` may do real work (token decryption,
/// client construction), and it is re-run for every request so a fixed
/// credential problem never requires restarting anything.
#[async_trait]
pub trait EnvironmentPort: Send + Sync {
    /// Whether the network is currently reachable.
    fn is_network_reachable(&self) -> bool;

    /// Whether usable credentials for the tracker are stored.
    fn has_valid_credentials(&self) -> bool;

    /// Build an authenticated tracker client.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`](crate::error::ClientError) when credentials
    /// cannot be used or the client cannot be constructed.
    async fn authenticated_client(&self) -> ClientResult<Arc<dyn TrackerPort>>;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_response_serialization() {
        let response = RemoteResponse {
            status: ResponseStatus::Failure,
            message: None,
            error: Some("already watching something".to_string()),
            wait_secs: 30,
            show_title: None,
            movie_title: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        let parsed: RemoteResponse = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, response);
        assert!(!parsed.is_success());
        assert_eq!(parsed.wait_secs, 30);
    }

    #[test]
    fn test_remote_response_defaults_absent_fields() {
        // A minimal success document parses with all optionals absent
        let parsed: RemoteResponse = serde_json::from_str(r#"{"status":"success"}"#).unwrap();
        assert!(parsed.is_success());
        assert_eq!(parsed.wait_secs, 0);
        assert!(parsed.message.is_none());
        assert!(parsed.error.is_none());
    }

    #[test]
    fn test_remote_response_constructors() {
        assert!(RemoteResponse::success().is_success());

        let failure = RemoteResponse::failure("nope");
        assert!(!failure.is_success());
        assert_eq!(failure.error.as_deref(), Some("nope"));
        assert_eq!(failure.wait_secs, 0);

        let blocked = RemoteResponse::blocked("busy", 45);
        assert!(!blocked.is_success());
        assert_eq!(blocked.wait_secs, 45);
    }
}
