//! Trakt REST API Client
//!
//! Provides the [`TrackerPort`] adapter for a trakt-style REST API:
//! check-ins, ratings, comments, and watchlist edits, all POSTed as JSON
//! and answered with the service's uniform response document.
//!
//! # Authentication
//!
//! Every request carries:
//! - `trakt-api-key` header (application key)
//! - `Authorization: Bearer <token>` header (user access token)
//!
//! The client is built per request by the environment, so a refreshed
//! token is picked up without tearing anything down.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use zeroize::Zeroizing;

use couchlog_domain::{EpisodeRef, ImdbId, Rating, ShowId, TmdbId};
use couchlog_exec::{ClientError, ClientResult, RemoteResponse, ResponseStatus, TrackerPort};

use crate::config::TraktConfig;

// =============================================================================
// Errors
// =============================================================================

/// Errors that can occur in the Trakt REST client.
#[derive(Debug, Clone, Error)]
pub enum TraktRestError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    /// API returned an error status without a parseable response document
    #[error("Trakt API error: HTTP {status}: {body}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Request timed out
    #[error("Request timed out")]
    Timeout,
}

impl From<TraktRestError> for ClientError {
    fn from(e: TraktRestError) -> Self {
        match e {
            TraktRestError::Timeout => ClientError::Transport("Request timed out".to_string()),
            TraktRestError::RequestFailed(msg) => ClientError::Transport(msg),
            TraktRestError::ApiError { status, body } => {
                ClientError::Protocol(format!("HTTP {}: {}", status, body))
            },
            TraktRestError::ParseError(msg) => ClientError::Protocol(msg),
        }
    }
}

// =============================================================================
// Trakt REST Client
// =============================================================================

/// Trakt REST API client.
pub struct TraktRestClient {
    /// HTTP client
    client: Client,
    /// API base URL
    base_url: String,
    /// Application API key
    api_key: String,
    /// User access token, zeroized on drop
    access_token: Zeroizing<String>,
    /// Per-request timeout
    timeout: Duration,
}

impl TraktRestClient {
    /// Create a new Trakt REST client.
    ///
    /// # Arguments
    ///
    /// * `config` - Base URL, API key, and timeout
    /// * `access_token` - User access token for the Authorization header
    pub fn new(config: &TraktConfig, access_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            access_token: Zeroizing::new(access_token.into()),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// Build the full URL for an endpoint path.
    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// POST a JSON body and parse the uniform response document.
    async fn post(&self, endpoint: &str, body: Value) -> Result<RemoteResponse, TraktRestError> {
        let response = timeout(
            self.timeout,
            self.client
                .post(self.url(endpoint))
                .header("trakt-api-key", &self.api_key)
                .bearer_auth(self.access_token.as_str())
                .json(&body)
                .send(),
        )
        .await
        .map_err(|_| TraktRestError::Timeout)?
        .map_err(|e| TraktRestError::RequestFailed(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TraktRestError::ParseError(e.to_string()))?;

        if !status.is_success() {
            // Action-level refusals (e.g., a check-in conflict) ride on an
            // error status but still carry the uniform response document
            if let Ok(wire) = serde_json::from_str::<TraktResponse>(&text) {
                return wire.into_remote();
            }
            return Err(TraktRestError::ApiError { status: status.as_u16(), body: text });
        }

        let wire: TraktResponse = serde_json::from_str(&text)
            .map_err(|e| TraktRestError::ParseError(e.to_string()))?;
        wire.into_remote()
    }

    /// POST a JSON body and discard the response body.
    ///
    /// Used for watchlist edits: the service sends nothing structured
    /// back, so a delivered request is a successful one.
    async fn post_ack(&self, endpoint: &str, body: Value) -> Result<(), TraktRestError> {
        let response = timeout(
            self.timeout,
            self.client
                .post(self.url(endpoint))
                .header("trakt-api-key", &self.api_key)
                .bearer_auth(self.access_token.as_str())
                .json(&body)
                .send(),
        )
        .await
        .map_err(|_| TraktRestError::Timeout)?
        .map_err(|e| TraktRestError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TraktRestError::ApiError { status: status.as_u16(), body });
        }

        Ok(())
    }
}

#[async_trait]
impl TrackerPort for TraktRestClient {
    async fn checkin_episode(
        &self,
        episode: &EpisodeRef,
        message: Option<&str>,
    ) -> ClientResult<RemoteResponse> {
        let body = json!({
            "show": episode.show().value(),
            "season": episode.season(),
            "episode": episode.episode(),
            "message": message,
        });
        Ok(self.post("/checkin/episode", body).await?)
    }

    async fn checkin_movie(
        &self,
        imdb_id: &ImdbId,
        message: Option<&str>,
    ) -> ClientResult<RemoteResponse> {
        let body = json!({
            "imdb_id": imdb_id.as_str(),
            "message": message,
        });
        Ok(self.post("/checkin/movie", body).await?)
    }

    async fn rate_episode(
        &self,
        episode: &EpisodeRef,
        rating: Rating,
    ) -> ClientResult<RemoteResponse> {
        let body = json!({
            "show": episode.show().value(),
            "season": episode.season(),
            "episode": episode.episode(),
            "rating": rating.value(),
        });
        Ok(self.post("/rate/episode", body).await?)
    }

    async fn rate_show(&self, show: ShowId, rating: Rating) -> ClientResult<RemoteResponse> {
        let body = json!({
            "show": show.value(),
            "rating": rating.value(),
        });
        Ok(self.post("/rate/show", body).await?)
    }

    async fn comment_show(
        &self,
        show: ShowId,
        comment: &str,
        spoiler: bool,
    ) -> ClientResult<RemoteResponse> {
        let body = json!({
            "show": show.value(),
            "comment": comment,
            "spoiler": spoiler,
        });
        Ok(self.post("/comment/show", body).await?)
    }

    async fn comment_episode(
        &self,
        episode: &EpisodeRef,
        comment: &str,
        spoiler: bool,
    ) -> ClientResult<RemoteResponse> {
        let body = json!({
            "show": episode.show().value(),
            "season": episode.season(),
            "episode": episode.episode(),
            "comment": comment,
            "spoiler": spoiler,
        });
        Ok(self.post("/comment/episode", body).await?)
    }

    async fn watchlist_movie(&self, tmdb_id: TmdbId) -> ClientResult<()> {
        let body = json!({ "tmdb_id": tmdb_id.value() });
        Ok(self.post_ack("/watchlist/movies", body).await?)
    }

    async fn unwatchlist_movie(&self, tmdb_id: TmdbId) -> ClientResult<()> {
        let body = json!({ "tmdb_id": tmdb_id.value() });
        Ok(self.post_ack("/watchlist/movies/remove", body).await?)
    }
}

// =============================================================================
// Trakt Types (from API responses)
// =============================================================================

/// Uniform response document as it appears on the wire.
#[derive(Debug, Deserialize)]
struct TraktResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    wait: u32,
    #[serde(default)]
    show: Option<TraktShow>,
    #[serde(default)]
    movie: Option<TraktMovie>,
}

/// Show stanza echoed in check-in responses.
#[derive(Debug, Deserialize)]
struct TraktShow {
    #[serde(default)]
    title: Option<String>,
}

/// Movie stanza echoed in check-in responses.
#[derive(Debug, Deserialize)]
struct TraktMovie {
    #[serde(default)]
    title: Option<String>,
}

impl TraktResponse {
    /// Map the wire document into the port-level response shape.
    fn into_remote(self) -> Result<RemoteResponse, TraktRestError> {
        let status = match self.status.as_str() {
            "success" => ResponseStatus::Success,
            "failure" => ResponseStatus::Failure,
            other => {
                return Err(TraktRestError::ParseError(format!(
                    "Unknown response status: {}",
                    other
                )))
            },
        };

        Ok(RemoteResponse {
            status,
            message: self.message,
            error: self.error,
            wait_secs: self.wait,
            show_title: self.show.and_then(|s| s.title),
            movie_title: self.movie.and_then(|m| m.title),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
