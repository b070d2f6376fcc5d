//! Executor: runs one action request against the tracker.
//!
//! The ActionExecutor is the bridge between an immutable [`ActionRequest`]
//! and the impure tracker client. It gates on the environment before any
//! remote work, dispatches to exactly one tracker operation, and folds
//! every possible result (including client errors) into one [`Outcome`].
//!
//! # Flow
//!
//! ```text
//! ActionRequest → gates (network, credentials, client, cancel)
//!               → one TrackerPort call
//!               → classify → Outcome (or abandoned)
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use couchlog_domain::{ActionRequest, EpisodeRef};

use crate::error::ClientResult;
use crate::outcome::Outcome;
use crate::ports::{EnvironmentPort, RemoteResponse, TrackerPort};

// =============================================================================
// Messages
// =============================================================================

/// Shown when the network gate fails; nothing was sent.
pub const MSG_OFFLINE: &str = "Not connected. The action was not sent.";

/// Shown for any client-side or unspecified service failure.
pub const MSG_GENERIC_ERROR: &str = "The action failed. Please try again.";

/// Synthesized for a watchlist addition (the service sends no body).
pub const MSG_WATCHLIST_ADDED: &str = "Added to watchlist.";

/// Synthesized for a watchlist removal (the service sends no body).
pub const MSG_WATCHLIST_REMOVED: &str = "Removed from watchlist.";

/// Fallback success message for ratings without a service message.
pub const MSG_RATING_SAVED: &str = "Rating saved.";

/// Fallback success message for comments without a service message.
pub const MSG_COMMENT_POSTED: &str = "Comment posted.";

// =============================================================================
// CancelFlag
// =============================================================================

/// Cooperative cancellation flag for one submitted request.
///
/// Cancellation is consultative: the executor checks the flag before the
/// remote call and abandons the request if it is set. Once the remote call
/// has been issued it always runs to completion; the flag is never
/// consulted again.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Create a flag in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// =============================================================================
// ActionExecutor
// =============================================================================

/// Executes one action request end to end.
///
/// The executor:
/// 1. Refuses early when the network is unreachable (nothing is sent)
/// 2. Refuses early when no valid credentials are stored
/// 3. Acquires a fresh authenticated client from the environment
/// 4. Abandons the request if it was cancelled before the remote call
/// 5. Dispatches to exactly one tracker operation
/// 6. Classifies the response (or client error) into an [`Outcome`]
///
/// It holds no per-request state and never returns an error: anything that
/// goes wrong becomes a displayable `Outcome`.
pub struct ActionExecutor<E: EnvironmentPort> {
    /// Environment supplying gates and the tracker client
    env: Arc<E>,
}

impl<E: EnvironmentPort> ActionExecutor<E> {
    /// Create a new executor over the given environment.
    pub fn new(env: Arc<E>) -> Self {
        Self { env }
    }

    /// Execute a single request.
    ///
    /// Returns `None` only when the request was cancelled before its
    /// remote call; an abandoned request produces no outcome and nothing
    /// must be delivered for it.
    pub async fn execute(&self, request: &ActionRequest, cancel: &CancelFlag) -> Option<Outcome> {
        let kind = request.kind();

        // 1. Network gate: refuse before any client work
        if !self.env.is_network_reachable() {
            info!(kind = kind.as_str(), "Network unreachable, action not sent");
            return Some(Outcome::Failure { error: MSG_OFFLINE.to_string() });
        }

        // 2. Credentials gate: not an error, the user must (re)connect
        if !self.env.has_valid_credentials() {
            info!(kind = kind.as_str(), "No valid credentials stored");
            return Some(Outcome::AuthRequired);
        }

        // 3. Acquire an authenticated client
        let client = match self.env.authenticated_client().await {
            Ok(client) => client,
            Err(e) => {
                error!(kind = kind.as_str(), error = %e, "Failed to acquire tracker client");
                return Some(Outcome::Failure { error: MSG_GENERIC_ERROR.to_string() });
            },
        };

        // 4. Last cancellation check before the remote call
        if cancel.is_cancelled() {
            debug!(kind = kind.as_str(), "Cancelled before remote call, abandoning");
            return None;
        }

        // 5. + 6. Dispatch and classify
        info!(kind = kind.as_str(), "Sending action to tracker");
        let outcome = match self.dispatch(request, client.as_ref()).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(kind = kind.as_str(), error = %e, "Tracker call failed");
                Outcome::Failure { error: MSG_GENERIC_ERROR.to_string() }
            },
        };

        match &outcome {
            Outcome::Success { .. } => info!(kind = kind.as_str(), "Action completed"),
            Outcome::Blocked { wait_secs } => {
                warn!(kind = kind.as_str(), wait_secs, "Check-in blocked by the service")
            },
            Outcome::Failure { error } => {
                warn!(kind = kind.as_str(), error = %error, "Action failed")
            },
            Outcome::AuthRequired => {},
        }

        Some(outcome)
    }

    /// Route the request to exactly one tracker operation and classify
    /// the structured response.
    async fn dispatch(
        &self,
        request: &ActionRequest,
        client: &dyn TrackerPort,
    ) -> ClientResult<Outcome> {
        match request {
            ActionRequest::CheckinEpisode { episode, message } => {
                let response = client.checkin_episode(episode, message.as_deref()).await?;
                let success_message = checkin_episode_message(&response, episode);
                Ok(classify(response, success_message))
            },

            ActionRequest::CheckinMovie { imdb_id, message } => {
                let response = client.checkin_movie(imdb_id, message.as_deref()).await?;
                let success_message = checkin_movie_message(&response);
                Ok(classify(response, success_message))
            },

            ActionRequest::RateEpisode { episode, rating } => {
                let response = client.rate_episode(episode, *rating).await?;
                let success_message = pass_through_message(&response, MSG_RATING_SAVED);
                Ok(classify(response, success_message))
            },

            ActionRequest::RateShow { show, rating } => {
                let response = client.rate_show(*show, *rating).await?;
                let success_message = pass_through_message(&response, MSG_RATING_SAVED);
                Ok(classify(response, success_message))
            },

            ActionRequest::PostShowComment { show, comment, spoiler } => {
                let response = client.comment_show(*show, comment, *spoiler).await?;
                let success_message = pass_through_message(&response, MSG_COMMENT_POSTED);
                Ok(classify(response, success_message))
            },

            ActionRequest::PostEpisodeComment { episode, comment, spoiler } => {
                let response = client.comment_episode(episode, comment, *spoiler).await?;
                let success_message = pass_through_message(&response, MSG_COMMENT_POSTED);
                Ok(classify(response, success_message))
            },

            // Watchlist calls carry no structured body: reaching the Ok arm
            // means the call went out without a transport error, which is
            // the whole success criterion.
            ActionRequest::WatchlistAddMovie { tmdb_id } => {
                client.watchlist_movie(*tmdb_id).await?;
                Ok(Outcome::Success { message: MSG_WATCHLIST_ADDED.to_string() })
            },

            ActionRequest::WatchlistRemoveMovie { tmdb_id } => {
                client.unwatchlist_movie(*tmdb_id).await?;
                Ok(Outcome::Success { message: MSG_WATCHLIST_REMOVED.to_string() })
            },
        }
    }
}

// =============================================================================
// Classification helpers
// =============================================================================

/// Fold a structured response into an outcome.
///
/// A non-success with a positive wait is the service's "check-in already
/// running" refusal and is always `Blocked`, never `Failure`.
fn classify(response: RemoteResponse, success_message: String) -> Outcome {
    if response.is_success() {
        Outcome::Success { message: success_message }
    } else if response.wait_secs > 0 {
        Outcome::Blocked { wait_secs: response.wait_secs }
    } else {
        Outcome::Failure {
            error: response.error.unwrap_or_else(|| MSG_GENERIC_ERROR.to_string()),
        }
    }
}

/// Success message for an episode check-in, e.g. "Checked in to Lost 1x3."
///
/// The episode number always comes from the request; the show title is
/// used when the service echoes it.
fn checkin_episode_message(response: &RemoteResponse, episode: &EpisodeRef) -> String {
    match &response.show_title {
        Some(title) => format!("Checked in to {} {}.", title, episode),
        None => format!("Checked in to {}.", episode),
    }
}

/// Success message for a movie check-in.
fn checkin_movie_message(response: &RemoteResponse) -> String {
    match &response.movie_title {
        Some(title) => format!("Checked in to {}.", title),
        None => "Checked in.".to_string(),
    }
}

/// Pass the service's success message through, with a fallback.
fn pass_through_message(response: &RemoteResponse, fallback: &str) -> String {
    response.message.clone().unwrap_or_else(|| fallback.to_string())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::RemoteResponse;
    use crate::stub::{StubCall, StubEnvironment};
    use couchlog_domain::{EpisodeRef, ImdbId, Rating, ShowId, TmdbId};

    fn create_test_env() -> Arc<StubEnvironment> {
        Arc::new(StubEnvironment::new())
    }

    fn create_test_executor(env: Arc<StubEnvironment>) -> ActionExecutor<StubEnvironment> {
        ActionExecutor::new(env)
    }

    fn checkin_1x3() -> ActionRequest {
        ActionRequest::CheckinEpisode {
            episode: EpisodeRef::new(ShowId::new(42).unwrap(), 1, 3).unwrap(),
            message: Some("watching!".to_string()),
        }
    }

    fn all_requests() -> Vec<ActionRequest> {
        let episode = EpisodeRef::new(ShowId::new(42).unwrap(), 1, 3).unwrap();
        vec![
            ActionRequest::CheckinEpisode { episode, message: None },
            ActionRequest::CheckinMovie {
                imdb_id: ImdbId::new("tt0133093").unwrap(),
                message: None,
            },
            ActionRequest::RateEpisode { episode, rating: Rating::Good },
            ActionRequest::RateShow { show: ShowId::new(42).unwrap(), rating: Rating::Great },
            ActionRequest::PostShowComment {
                show: ShowId::new(42).unwrap(),
                comment: "solid".to_string(),
                spoiler: false,
            },
            ActionRequest::PostEpisodeComment {
                episode,
                comment: "that ending".to_string(),
                spoiler: true,
            },
            ActionRequest::WatchlistAddMovie { tmdb_id: TmdbId::new(100).unwrap() },
            ActionRequest::WatchlistRemoveMovie { tmdb_id: TmdbId::new(100).unwrap() },
        ]
    }

    #[tokio::test]
    async fn test_offline_fails_without_remote_call() {
        let env = create_test_env();
        env.set_online(false);
        let executor = create_test_executor(env.clone());

        let outcome = executor.execute(&checkin_1x3(), &CancelFlag::new()).await;

        match outcome {
            Some(Outcome::Failure { error }) => assert!(!error.is_empty()),
            other => panic!("Expected Failure, got {:?}", other),
        }
        assert!(env.tracker().calls().is_empty(), "No remote call may happen offline");
    }

    #[tokio::test]
    async fn test_missing_credentials_yield_auth_required() {
        let env = create_test_env();
        env.set_credentials_valid(false);
        let executor = create_test_executor(env.clone());

        let outcome = executor.execute(&checkin_1x3(), &CancelFlag::new()).await;

        assert_eq!(outcome, Some(Outcome::AuthRequired));
        assert!(env.tracker().calls().is_empty());
    }

    #[tokio::test]
    async fn test_resubmission_after_credentials_fixed_reaches_tracker() {
        let env = create_test_env();
        env.set_credentials_valid(false);
        let executor = create_test_executor(env.clone());
        let request = checkin_1x3();

        let first = executor.execute(&request, &CancelFlag::new()).await;
        assert_eq!(first, Some(Outcome::AuthRequired));
        assert!(env.tracker().calls().is_empty());

        // The exact same request is valid again once credentials are fixed
        env.set_credentials_valid(true);
        let second = executor.execute(&request, &CancelFlag::new()).await;

        assert!(matches!(second, Some(Outcome::Success { .. })));
        assert_eq!(env.tracker().calls().len(), 1);
    }

    #[tokio::test]
    async fn test_client_acquisition_failure_is_generic_failure() {
        let env = create_test_env();
        env.set_fail_acquire(true);
        let executor = create_test_executor(env.clone());

        let outcome = executor.execute(&checkin_1x3(), &CancelFlag::new()).await;

        assert_eq!(outcome, Some(Outcome::Failure { error: MSG_GENERIC_ERROR.to_string() }));
        assert!(env.tracker().calls().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_request_is_abandoned() {
        let env = create_test_env();
        let executor = create_test_executor(env.clone());

        let cancel = CancelFlag::new();
        cancel.cancel();
        let outcome = executor.execute(&checkin_1x3(), &cancel).await;

        assert_eq!(outcome, None);
        assert!(env.tracker().calls().is_empty());
    }

    #[tokio::test]
    async fn test_each_kind_calls_exactly_one_operation() {
        for request in all_requests() {
            let env = create_test_env();
            let executor = create_test_executor(env.clone());

            executor.execute(&request, &CancelFlag::new()).await;

            let calls = env.tracker().calls();
            assert_eq!(calls.len(), 1, "{} must make exactly one call", request.kind());
            assert_eq!(
                calls[0].kind(),
                request.kind(),
                "{} hit the wrong operation",
                request.kind()
            );
        }
    }

    #[tokio::test]
    async fn test_show_comment_never_hits_episode_comment() {
        let env = create_test_env();
        let executor = create_test_executor(env.clone());

        let request = ActionRequest::PostShowComment {
            show: ShowId::new(42).unwrap(),
            comment: "about the show".to_string(),
            spoiler: false,
        };
        executor.execute(&request, &CancelFlag::new()).await;

        let calls = env.tracker().calls();
        assert!(matches!(calls[0], StubCall::CommentShow { .. }));
        assert!(!calls.iter().any(|c| matches!(c, StubCall::CommentEpisode { .. })));
    }

    #[tokio::test]
    async fn test_episode_comment_never_hits_show_comment() {
        let env = create_test_env();
        let executor = create_test_executor(env.clone());

        let request = ActionRequest::PostEpisodeComment {
            episode: EpisodeRef::new(ShowId::new(42).unwrap(), 1, 3).unwrap(),
            comment: "about the episode".to_string(),
            spoiler: false,
        };
        executor.execute(&request, &CancelFlag::new()).await;

        let calls = env.tracker().calls();
        assert!(matches!(calls[0], StubCall::CommentEpisode { .. }));
        assert!(!calls.iter().any(|c| matches!(c, StubCall::CommentShow { .. })));
    }

    #[tokio::test]
    async fn test_checkin_success_message_mentions_episode_number() {
        let env = create_test_env();
        env.tracker().set_response(RemoteResponse {
            show_title: Some("The Example Show".to_string()),
            ..RemoteResponse::success()
        });
        let executor = create_test_executor(env.clone());

        let outcome = executor.execute(&checkin_1x3(), &CancelFlag::new()).await;

        match outcome {
            Some(Outcome::Success { message }) => {
                assert!(message.contains("1x3"), "message was: {}", message);
                assert!(message.contains("The Example Show"), "message was: {}", message);
            },
            other => panic!("Expected Success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_blocked_checkin_maps_to_blocked() {
        let env = create_test_env();
        env.tracker().set_response(RemoteResponse::blocked("already watching", 30));
        let executor = create_test_executor(env.clone());

        let outcome = executor.execute(&checkin_1x3(), &CancelFlag::new()).await;

        assert_eq!(outcome, Some(Outcome::Blocked { wait_secs: 30 }));
    }

    #[tokio::test]
    async fn test_failure_without_wait_is_hard_failure() {
        let env = create_test_env();
        env.tracker().set_response(RemoteResponse::failure("episode not found"));
        let executor = create_test_executor(env.clone());

        let outcome = executor.execute(&checkin_1x3(), &CancelFlag::new()).await;

        assert_eq!(outcome, Some(Outcome::Failure { error: "episode not found".to_string() }));
    }

    #[tokio::test]
    async fn test_failure_without_error_text_gets_fallback() {
        let env = create_test_env();
        env.tracker().set_response(RemoteResponse {
            error: None,
            ..RemoteResponse::failure("")
        });
        let executor = create_test_executor(env.clone());

        let outcome = executor.execute(&checkin_1x3(), &CancelFlag::new()).await;

        match outcome {
            Some(Outcome::Failure { error }) => assert_eq!(error, MSG_GENERIC_ERROR),
            other => panic!("Expected Failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_transport_error_becomes_displayable_failure() {
        let env = create_test_env();
        env.tracker().set_fail_next(true);
        let executor = create_test_executor(env.clone());

        let outcome = executor.execute(&checkin_1x3(), &CancelFlag::new()).await;

        match outcome {
            Some(Outcome::Failure { error }) => assert!(!error.is_empty()),
            other => panic!("Expected Failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_watchlist_add_succeeds_without_body() {
        let env = create_test_env();
        let executor = create_test_executor(env.clone());

        let request = ActionRequest::WatchlistAddMovie { tmdb_id: TmdbId::new(100).unwrap() };
        let outcome = executor.execute(&request, &CancelFlag::new()).await;

        assert_eq!(outcome, Some(Outcome::Success { message: MSG_WATCHLIST_ADDED.to_string() }));
    }

    #[tokio::test]
    async fn test_watchlist_remove_succeeds_without_body() {
        let env = create_test_env();
        let executor = create_test_executor(env.clone());

        let request = ActionRequest::WatchlistRemoveMovie { tmdb_id: TmdbId::new(100).unwrap() };
        let outcome = executor.execute(&request, &CancelFlag::new()).await;

        assert_eq!(
            outcome,
            Some(Outcome::Success { message: MSG_WATCHLIST_REMOVED.to_string() })
        );
    }

    #[tokio::test]
    async fn test_watchlist_transport_error_still_fails() {
        let env = create_test_env();
        env.tracker().set_fail_next(true);
        let executor = create_test_executor(env.clone());

        let request = ActionRequest::WatchlistAddMovie { tmdb_id: TmdbId::new(100).unwrap() };
        let outcome = executor.execute(&request, &CancelFlag::new()).await;

        assert!(matches!(outcome, Some(Outcome::Failure { .. })));
    }

    #[tokio::test]
    async fn test_rating_passes_service_message_through() {
        let env = create_test_env();
        let mut response = RemoteResponse::success();
        response.message = Some("rating submitted".to_string());
        env.tracker().set_response(response);
        let executor = create_test_executor(env.clone());

        let request = ActionRequest::RateShow {
            show: ShowId::new(42).unwrap(),
            rating: Rating::TotallyNinja,
        };
        let outcome = executor.execute(&request, &CancelFlag::new()).await;

        assert_eq!(outcome, Some(Outcome::Success { message: "rating submitted".to_string() }));
    }

    #[tokio::test]
    async fn test_rating_without_service_message_gets_fallback() {
        let env = create_test_env();
        let executor = create_test_executor(env.clone());

        let request = ActionRequest::RateEpisode {
            episode: EpisodeRef::new(ShowId::new(42).unwrap(), 1, 3).unwrap(),
            rating: Rating::Meh,
        };
        let outcome = executor.execute(&request, &CancelFlag::new()).await;

        assert_eq!(outcome, Some(Outcome::Success { message: MSG_RATING_SAVED.to_string() }));
    }
}
