//! Trakt connector configuration.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;
use thiserror::Error;

// =============================================================================
// Errors
// =============================================================================

/// Configuration loading errors.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// An environment variable held an unusable value
    #[error("Configuration error: {0}")]
    Invalid(String),
}

// =============================================================================
// Configuration
// =============================================================================

/// Default API base URL.
const DEFAULT_BASE_URL: &str = "https://api.trakt.tv";

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Trakt connector configuration.
#[derive(Debug, Clone)]
pub struct TraktConfig {
    /// API base URL
    pub base_url: String,
    /// Application API key sent with every request
    pub api_key: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl TraktConfig {
    /// Load configuration from environment variables.
    ///
    /// Recognized variables:
    /// - `COUCHLOG_TRAKT_BASE_URL`
    /// - `COUCHLOG_TRAKT_API_KEY`
    /// - `COUCHLOG_TRAKT_TIMEOUT_SECS`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a variable is present but
    /// unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors)
        let _ = dotenvy::dotenv();

        let base_url =
            env::var("COUCHLOG_TRAKT_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        if base_url.is_empty() {
            return Err(ConfigError::Invalid("COUCHLOG_TRAKT_BASE_URL is empty".to_string()));
        }

        let api_key = env::var("COUCHLOG_TRAKT_API_KEY").unwrap_or_default();

        let timeout_secs = match env::var("COUCHLOG_TRAKT_TIMEOUT_SECS") {
            Ok(val) => val.parse::<u64>().map_err(|_| {
                ConfigError::Invalid(format!("Invalid COUCHLOG_TRAKT_TIMEOUT_SECS: {}", val))
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self { base_url, api_key, timeout_secs })
    }

    /// Create test configuration pointing at an unroutable address.
    pub fn test() -> Self {
        Self {
            base_url: "http://127.0.0.1:0".to_string(),
            api_key: "test-api-key".to_string(),
            timeout_secs: 1,
        }
    }
}

impl Default for TraktConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
