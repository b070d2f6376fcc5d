//! Stub implementations for testing.
//!
//! These implementations simulate the tracker and the host environment
//! without making real API calls. The tracker records every invocation so
//! tests can assert on exactly which operations ran.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use couchlog_domain::{ActionKind, EpisodeRef, ImdbId, Rating, ShowId, TmdbId};

use crate::error::{ClientError, ClientResult};
use crate::ports::{EnvironmentPort, RemoteResponse, TrackerPort};

// =============================================================================
// Stub Tracker
// =============================================================================

/// One recorded tracker invocation, with the arguments it received.
#[derive(Debug, Clone, PartialEq)]
pub enum StubCall {
    /// checkin_episode was called
    CheckinEpisode {
        /// Episode argument
        episode: EpisodeRef,
        /// Message argument
        message: Option<String>,
    },
    /// checkin_movie was called
    CheckinMovie {
        /// Movie argument
        imdb_id: ImdbId,
        /// Message argument
        message: Option<String>,
    },
    /// rate_episode was called
    RateEpisode {
        /// Episode argument
        episode: EpisodeRef,
        /// Rating argument
        rating: Rating,
    },
    /// rate_show was called
    RateShow {
        /// Show argument
        show: ShowId,
        /// Rating argument
        rating: Rating,
    },
    /// comment_show was called
    CommentShow {
        /// Show argument
        show: ShowId,
        /// Comment text
        comment: String,
        /// Spoiler flag
        spoiler: bool,
    },
    /// comment_episode was called
    CommentEpisode {
        /// Episode argument
        episode: EpisodeRef,
        /// Comment text
        comment: String,
        /// Spoiler flag
        spoiler: bool,
    },
    /// watchlist_movie was called
    WatchlistMovie {
        /// Movie argument
        tmdb_id: TmdbId,
    },
    /// unwatchlist_movie was called
    UnwatchlistMovie {
        /// Movie argument
        tmdb_id: TmdbId,
    },
}

impl StubCall {
    /// The action kind this invocation corresponds to.
    pub fn kind(&self) -> ActionKind {
        match self {
            StubCall::CheckinEpisode { .. } => ActionKind::CheckinEpisode,
            StubCall::CheckinMovie { .. } => ActionKind::CheckinMovie,
            StubCall::RateEpisode { .. } => ActionKind::RateEpisode,
            StubCall::RateShow { .. } => ActionKind::RateShow,
            StubCall::CommentShow { .. } => ActionKind::PostShowComment,
            StubCall::CommentEpisode { .. } => ActionKind::PostEpisodeComment,
            StubCall::WatchlistMovie { .. } => ActionKind::WatchlistAddMovie,
            StubCall::UnwatchlistMovie { .. } => ActionKind::WatchlistRemoveMovie,
        }
    }
}

/// Stub tracker for testing.
///
/// Returns a scripted response for response-bearing operations and
/// records every call it receives.
pub struct StubTracker {
    /// Scripted response for response-bearing operations
    response: RwLock<RemoteResponse>,
    /// Every invocation in arrival order
    calls: RwLock<Vec<StubCall>>,
    /// Whether to simulate a transport failure on the next call
    fail_next: RwLock<bool>,
}

impl StubTracker {
    /// Create a stub that answers every call with a plain success.
    pub fn new() -> Self {
        Self {
            response: RwLock::new(RemoteResponse::success()),
            calls: RwLock::new(Vec::new()),
            fail_next: RwLock::new(false),
        }
    }

    /// Script the response returned by subsequent response-bearing calls.
    pub fn set_response(&self, response: RemoteResponse) {
        let mut scripted = self.response.write().unwrap();
        *scripted = response;
    }

    /// Configure the next call to fail with a transport error.
    pub fn set_fail_next(&self, fail: bool) {
        let mut fail_next = self.fail_next.write().unwrap();
        *fail_next = fail;
    }

    /// Get all recorded invocations in arrival order.
    pub fn calls(&self) -> Vec<StubCall> {
        self.calls.read().unwrap().clone()
    }

    /// Check if we should fail the next operation.
    fn should_fail(&self) -> bool {
        let mut fail_next = self.fail_next.write().unwrap();
        let fail = *fail_next;
        *fail_next = false; // Reset after check
        fail
    }

    fn record(&self, call: StubCall) {
        self.calls.write().unwrap().push(call);
    }

    fn scripted_response(&self) -> RemoteResponse {
        self.response.read().unwrap().clone()
    }

    fn respond(&self, call: StubCall) -> ClientResult<RemoteResponse> {
        if self.should_fail() {
            return Err(ClientError::Transport("Simulated connection failure".to_string()));
        }
        self.record(call);
        Ok(self.scripted_response())
    }

    fn acknowledge(&self, call: StubCall) -> ClientResult<()> {
        if self.should_fail() {
            return Err(ClientError::Transport("Simulated connection failure".to_string()));
        }
        self.record(call);
        Ok(())
    }
}

impl Default for StubTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TrackerPort for StubTracker {
    async fn checkin_episode(
        &self,
        episode: &EpisodeRef,
        message: Option<&str>,
    ) -> ClientResult<RemoteResponse> {
        self.respond(StubCall::CheckinEpisode {
            episode: *episode,
            message: message.map(str::to_string),
        })
    }

    async fn checkin_movie(
        &self,
        imdb_id: &ImdbId,
        message: Option<&str>,
    ) -> ClientResult<RemoteResponse> {
        self.respond(StubCall::CheckinMovie {
            imdb_id: imdb_id.clone(),
            message: message.map(str::to_string),
        })
    }

    async fn rate_episode(
        &self,
        episode: &EpisodeRef,
        rating: Rating,
    ) -> ClientResult<RemoteResponse> {
        self.respond(StubCall::RateEpisode { episode: *episode, rating })
    }

    async fn rate_show(&self, show: ShowId, rating: Rating) -> ClientResult<RemoteResponse> {
        self.respond(StubCall::RateShow { show, rating })
    }

    async fn comment_show(
        &self,
        show: ShowId,
        comment: &str,
        spoiler: bool,
    ) -> ClientResult<RemoteResponse> {
        self.respond(StubCall::CommentShow {
            show,
            comment: comment.to_string(),
            spoiler,
        })
    }

    async fn comment_episode(
        &self,
        episode: &EpisodeRef,
        comment: &str,
        spoiler: bool,
    ) -> ClientResult<RemoteResponse> {
        self.respond(StubCall::CommentEpisode {
            episode: *episode,
            comment: comment.to_string(),
            spoiler,
        })
    }

    async fn watchlist_movie(&self, tmdb_id: TmdbId) -> ClientResult<()> {
        self.acknowledge(StubCall::WatchlistMovie { tmdb_id })
    }

    async fn unwatchlist_movie(&self, tmdb_id: TmdbId) -> ClientResult<()> {
        self.acknowledge(StubCall::UnwatchlistMovie { tmdb_id })
    }
}

// =============================================================================
// Stub Environment
// =============================================================================

/// Stub environment for testing.
///
/// All gates are settable; the authenticated client is a shared
/// [`StubTracker`] so tests can script responses and inspect calls.
pub struct StubEnvironment {
    /// Network reachability gate
    online: AtomicBool,
    /// Credentials gate
    credentials_valid: AtomicBool,
    /// Whether client acquisition should fail
    fail_acquire: AtomicBool,
    /// The tracker handed out by authenticated_client
    tracker: Arc<StubTracker>,
}

impl StubEnvironment {
    /// Create an environment that is online with valid credentials.
    pub fn new() -> Self {
        Self {
            online: AtomicBool::new(true),
            credentials_valid: AtomicBool::new(true),
            fail_acquire: AtomicBool::new(false),
            tracker: Arc::new(StubTracker::new()),
        }
    }

    /// Set network reachability.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    /// Set whether stored credentials count as valid.
    pub fn set_credentials_valid(&self, valid: bool) {
        self.credentials_valid.store(valid, Ordering::SeqCst);
    }

    /// Set whether client acquisition fails.
    pub fn set_fail_acquire(&self, fail: bool) {
        self.fail_acquire.store(fail, Ordering::SeqCst);
    }

    /// Get the shared tracker for scripting and call inspection.
    pub fn tracker(&self) -> Arc<StubTracker> {
        self.tracker.clone()
    }
}

impl Default for StubEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EnvironmentPort for StubEnvironment {
    fn is_network_reachable(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    fn has_valid_credentials(&self) -> bool {
        self.credentials_valid.load(Ordering::SeqCst)
    }

    async fn authenticated_client(&self) -> ClientResult<Arc<dyn TrackerPort>> {
        if self.fail_acquire.load(Ordering::SeqCst) {
            return Err(ClientError::Credentials(
                "Simulated credential store failure".to_string(),
            ));
        }
        Ok(self.tracker.clone())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_tracker_records_calls() {
        let tracker = StubTracker::new();
        let episode = EpisodeRef::new(ShowId::new(42).unwrap(), 1, 3).unwrap();

        tracker.checkin_episode(&episode, Some("hello")).await.unwrap();
        tracker.rate_show(ShowId::new(42).unwrap(), Rating::Good).await.unwrap();

        let calls = tracker.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(
            calls[0],
            StubCall::CheckinEpisode { episode, message: Some("hello".to_string()) }
        );
        assert_eq!(calls[1].kind(), ActionKind::RateShow);
    }

    #[tokio::test]
    async fn test_stub_tracker_simulated_failure_is_one_shot() {
        let tracker = StubTracker::new();
        let episode = EpisodeRef::new(ShowId::new(42).unwrap(), 1, 3).unwrap();

        tracker.set_fail_next(true);
        let failed = tracker.checkin_episode(&episode, None).await;
        assert!(failed.is_err());
        assert!(tracker.calls().is_empty(), "Failed call must not be recorded");

        // Next call should succeed
        let ok = tracker.checkin_episode(&episode, None).await;
        assert!(ok.is_ok());
        assert_eq!(tracker.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_stub_tracker_scripted_response() {
        let tracker = StubTracker::new();
        tracker.set_response(RemoteResponse::blocked("busy", 15));

        let episode = EpisodeRef::new(ShowId::new(42).unwrap(), 1, 3).unwrap();
        let response = tracker.checkin_episode(&episode, None).await.unwrap();

        assert!(!response.is_success());
        assert_eq!(response.wait_secs, 15);
    }

    #[tokio::test]
    async fn test_stub_environment_gates() {
        let env = StubEnvironment::new();
        assert!(env.is_network_reachable());
        assert!(env.has_valid_credentials());
        assert!(env.authenticated_client().await.is_ok());

        env.set_online(false);
        assert!(!env.is_network_reachable());

        env.set_credentials_valid(false);
        assert!(!env.has_valid_credentials());

        env.set_fail_acquire(true);
        assert!(env.authenticated_client().await.is_err());
    }
}
