//! Action Requests for Couchlog
//!
//! An [`ActionRequest`] is the immutable, self-contained description of one
//! remote action. It is built on the caller's thread, handed to a background
//! worker, and read back verbatim when the outcome is delivered. Each variant
//! carries exactly the fields its action needs; a request that is invalid for
//! its action kind is unrepresentable.

use crate::value_objects::{EpisodeRef, ImdbId, Rating, ShowId, TmdbId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One remote action against the tracking service
///
/// Requests are immutable records. They serialize to a flat key/value
/// document (the episode reference is inlined), so a request can be
/// persisted or shipped across a process boundary and reconstructed
/// without loss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionRequest {
    /// Check in to an episode the user is watching right now
    CheckinEpisode {
        /// Episode being watched
        #[serde(flatten)]
        episode: EpisodeRef,
        /// Optional message shared with the check-in
        message: Option<String>,
    },

    /// Check in to a movie the user is watching right now
    CheckinMovie {
        /// Movie being watched
        imdb_id: ImdbId,
        /// Optional message shared with the check-in
        message: Option<String>,
    },

    /// Rate one episode
    RateEpisode {
        /// Episode being rated
        #[serde(flatten)]
        episode: EpisodeRef,
        /// Rating on the 10-step scale
        rating: Rating,
    },

    /// Rate a whole show
    RateShow {
        /// Show being rated
        show: ShowId,
        /// Rating on the 10-step scale
        rating: Rating,
    },

    /// Post a comment about a whole show
    PostShowComment {
        /// Show the comment is about
        show: ShowId,
        /// Comment text
        comment: String,
        /// Whether the comment reveals plot details
        spoiler: bool,
    },

    /// Post a comment about one episode
    PostEpisodeComment {
        /// Episode the comment is about
        #[serde(flatten)]
        episode: EpisodeRef,
        /// Comment text
        comment: String,
        /// Whether the comment reveals plot details
        spoiler: bool,
    },

    /// Add a movie to the user's watchlist
    WatchlistAddMovie {
        /// Movie to add
        tmdb_id: TmdbId,
    },

    /// Remove a movie from the user's watchlist
    WatchlistRemoveMovie {
        /// Movie to remove
        tmdb_id: TmdbId,
    },
}

impl ActionRequest {
    /// Get the kind discriminant of this request
    pub fn kind(&self) -> ActionKind {
        match self {
            ActionRequest::CheckinEpisode { .. } => ActionKind::CheckinEpisode,
            ActionRequest::CheckinMovie { .. } => ActionKind::CheckinMovie,
            ActionRequest::RateEpisode { .. } => ActionKind::RateEpisode,
            ActionRequest::RateShow { .. } => ActionKind::RateShow,
            ActionRequest::PostShowComment { .. } => ActionKind::PostShowComment,
            ActionRequest::PostEpisodeComment { .. } => ActionKind::PostEpisodeComment,
            ActionRequest::WatchlistAddMovie { .. } => ActionKind::WatchlistAddMovie,
            ActionRequest::WatchlistRemoveMovie { .. } => ActionKind::WatchlistRemoveMovie,
        }
    }

    /// Whether this request is a check-in (subject to the service's
    /// one-check-in-at-a-time rule)
    pub fn is_checkin(&self) -> bool {
        matches!(
            self.kind(),
            ActionKind::CheckinEpisode | ActionKind::CheckinMovie
        )
    }
}

/// Fieldless discriminant of [`ActionRequest`], for dispatch tables and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Check in to an episode
    CheckinEpisode,
    /// Check in to a movie
    CheckinMovie,
    /// Rate one episode
    RateEpisode,
    /// Rate a whole show
    RateShow,
    /// Post a comment about a whole show
    PostShowComment,
    /// Post a comment about one episode
    PostEpisodeComment,
    /// Add a movie to the watchlist
    WatchlistAddMovie,
    /// Remove a movie from the watchlist
    WatchlistRemoveMovie,
}

impl ActionKind {
    /// Stable snake_case name, matching the serialized `kind` tag
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::CheckinEpisode => "checkin_episode",
            ActionKind::CheckinMovie => "checkin_movie",
            ActionKind::RateEpisode => "rate_episode",
            ActionKind::RateShow => "rate_show",
            ActionKind::PostShowComment => "post_show_comment",
            ActionKind::PostEpisodeComment => "post_episode_comment",
            ActionKind::WatchlistAddMovie => "watchlist_add_movie",
            ActionKind::WatchlistRemoveMovie => "watchlist_remove_movie",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{EpisodeRef, ImdbId, Rating, ShowId, TmdbId};
    use serde_json::Value;

    fn episode_1x3() -> EpisodeRef {
        EpisodeRef::new(ShowId::new(42).unwrap(), 1, 3).unwrap()
    }

    fn all_requests() -> Vec<ActionRequest> {
        vec![
            ActionRequest::CheckinEpisode {
                episode: episode_1x3(),
                message: Some("watching!".to_string()),
            },
            ActionRequest::CheckinMovie {
                imdb_id: ImdbId::new("tt0133093").unwrap(),
                message: None,
            },
            ActionRequest::RateEpisode {
                episode: episode_1x3(),
                rating: Rating::Good,
            },
            ActionRequest::RateShow {
                show: ShowId::new(42).unwrap(),
                rating: Rating::TotallyNinja,
            },
            ActionRequest::PostShowComment {
                show: ShowId::new(42).unwrap(),
                comment: "great pilot".to_string(),
                spoiler: false,
            },
            ActionRequest::PostEpisodeComment {
                episode: episode_1x3(),
                comment: "that twist".to_string(),
                spoiler: true,
            },
            ActionRequest::WatchlistAddMovie {
                tmdb_id: TmdbId::new(100).unwrap(),
            },
            ActionRequest::WatchlistRemoveMovie {
                tmdb_id: TmdbId::new(100).unwrap(),
            },
        ]
    }

    #[test]
    fn test_request_serde_round_trip() {
        for request in all_requests() {
            let json = serde_json::to_string(&request).unwrap();
            let back: ActionRequest = serde_json::from_str(&json).unwrap();
            assert_eq!(back, request, "round trip changed: {}", json);
        }
    }

    #[test]
    fn test_request_serializes_flat() {
        let request = ActionRequest::CheckinEpisode {
            episode: episode_1x3(),
            message: Some("watching!".to_string()),
        };
        let value: Value = serde_json::to_value(&request).unwrap();
        let object = value.as_object().unwrap();

        // Everything at the top level, episode reference inlined
        assert_eq!(object["kind"], "checkin_episode");
        assert_eq!(object["show"], 42);
        assert_eq!(object["season"], 1);
        assert_eq!(object["episode"], 3);
        assert_eq!(object["message"], "watching!");
        assert!(object.values().all(|v| !v.is_object()), "nested object found");
    }

    #[test]
    fn test_request_kind_tags() {
        let expected = [
            "checkin_episode",
            "checkin_movie",
            "rate_episode",
            "rate_show",
            "post_show_comment",
            "post_episode_comment",
            "watchlist_add_movie",
            "watchlist_remove_movie",
        ];
        for (request, tag) in all_requests().iter().zip(expected) {
            let value: Value = serde_json::to_value(request).unwrap();
            assert_eq!(value["kind"], tag);
            assert_eq!(request.kind().as_str(), tag);
        }
    }

    #[test]
    fn test_rate_show_has_no_episode_fields() {
        let request = ActionRequest::RateShow {
            show: ShowId::new(42).unwrap(),
            rating: Rating::Good,
        };
        let value: Value = serde_json::to_value(&request).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.get("season").is_none());
        assert!(object.get("episode").is_none());
        assert_eq!(object["rating"], 7);
    }

    #[test]
    fn test_is_checkin() {
        assert!(ActionRequest::CheckinMovie {
            imdb_id: ImdbId::new("tt0133093").unwrap(),
            message: None,
        }
        .is_checkin());
        assert!(!ActionRequest::WatchlistAddMovie {
            tmdb_id: TmdbId::new(100).unwrap(),
        }
        .is_checkin());
    }

    #[test]
    fn test_request_rejects_unknown_kind() {
        let json = r#"{"kind":"delete_account","show":42}"#;
        assert!(serde_json::from_str::<ActionRequest>(json).is_err());
    }

    #[test]
    fn test_request_rejects_invalid_field_values() {
        // Identifier invariants hold when a request is rebuilt from JSON,
        // not only when it is constructed directly
        let zero_episode =
            r#"{"kind":"checkin_episode","show":42,"season":1,"episode":0,"message":null}"#;
        assert!(serde_json::from_str::<ActionRequest>(zero_episode).is_err());

        let zero_show = r#"{"kind":"rate_show","show":0,"rating":7}"#;
        assert!(serde_json::from_str::<ActionRequest>(zero_show).is_err());

        let zero_movie = r#"{"kind":"watchlist_add_movie","tmdb_id":0}"#;
        assert!(serde_json::from_str::<ActionRequest>(zero_movie).is_err());

        let bad_imdb = r#"{"kind":"checkin_movie","imdb_id":"0133093","message":null}"#;
        assert!(serde_json::from_str::<ActionRequest>(bad_imdb).is_err());
    }
}
