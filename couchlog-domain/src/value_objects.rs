//! Value Objects for the Couchlog Domain
//!
//! Immutable, validated media identifiers and ratings.
//! All value objects enforce invariants at construction time, and
//! deserialization routes through the same checks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Domain errors for value object validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Show identifier must be non-zero
    #[error("Invalid show id: {0}")]
    InvalidShowId(String),

    /// TMDb identifier must be non-zero
    #[error("Invalid TMDb id: {0}")]
    InvalidTmdbId(String),

    /// IMDb identifier must match the tt-prefixed format
    #[error("Invalid IMDb id: {0}")]
    InvalidImdbId(String),

    /// Episode reference validation error
    #[error("Invalid episode: {0}")]
    InvalidEpisode(String),

    /// Rating must be on the 1..=10 scale
    #[error("Invalid rating: {0}")]
    InvalidRating(String),
}

// =============================================================================
// ShowId
// =============================================================================

/// ShowId identifies a show at the tracking service
///
/// # Invariants
/// - Must be > 0 (0 is the service's "unknown" marker)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32")]
pub struct ShowId(u32);

impl ShowId {
    /// Create a new ShowId with validation
    ///
    /// # Errors
    /// Returns `DomainError::InvalidShowId` if value == 0
    pub fn new(value: u32) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::InvalidShowId("Show id must be non-zero".to_string()));
        }
        Ok(Self(value))
    }

    /// Get the underlying numeric id
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for ShowId {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ShowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// TmdbId
// =============================================================================

/// TmdbId identifies a movie in The Movie Database
///
/// # Invariants
/// - Must be > 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32")]
pub struct TmdbId(u32);

impl TmdbId {
    /// Create a new TmdbId with validation
    ///
    /// # Errors
    /// Returns `DomainError::InvalidTmdbId` if value == 0
    pub fn new(value: u32) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::InvalidTmdbId("TMDb id must be non-zero".to_string()));
        }
        Ok(Self(value))
    }

    /// Get the underlying numeric id
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for TmdbId {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for TmdbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// ImdbId
// =============================================================================

/// ImdbId identifies a movie in IMDb (e.g., tt0133093)
///
/// # Invariants
/// - Must start with "tt"
/// - Remainder must be one or more ASCII digits
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct ImdbId(String);

impl ImdbId {
    /// Create an ImdbId from its canonical string form
    ///
    /// # Examples
    /// ```
    /// # use couchlog_domain::value_objects::ImdbId;
    /// let id = ImdbId::new("tt0133093").unwrap();
    /// assert_eq!(id.as_str(), "tt0133093");
    /// ```
    ///
    /// # Errors
    /// Returns `DomainError::InvalidImdbId` if the format is invalid
    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        let digits = value
            .strip_prefix("tt")
            .ok_or_else(|| DomainError::InvalidImdbId(format!("Missing tt prefix: {}", value)))?;

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidImdbId(format!(
                "Expected digits after tt prefix: {}",
                value
            )));
        }

        Ok(Self(value))
    }

    /// Get the canonical string form
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ImdbId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ImdbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// EpisodeRef
// =============================================================================

/// EpisodeRef addresses one episode of a show by season and episode number
///
/// # Invariants
/// - Episode number must be >= 1 (there is no "episode zero"; a request
///   that is about a whole show uses a show-level variant instead)
/// - Season 0 is valid (specials)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawEpisodeRef")]
pub struct EpisodeRef {
    show: ShowId,
    season: u32,
    episode: u32,
}

impl EpisodeRef {
    /// Create an EpisodeRef with validation
    ///
    /// # Examples
    /// ```
    /// # use couchlog_domain::value_objects::{EpisodeRef, ShowId};
    /// let show = ShowId::new(42).unwrap();
    /// let episode = EpisodeRef::new(show, 1, 3).unwrap();
    /// assert_eq!(episode.to_string(), "1x3");
    /// ```
    ///
    /// # Errors
    /// Returns `DomainError::InvalidEpisode` if episode == 0
    pub fn new(show: ShowId, season: u32, episode: u32) -> Result<Self, DomainError> {
        if episode == 0 {
            return Err(DomainError::InvalidEpisode(
                "Episode number must be >= 1".to_string(),
            ));
        }
        Ok(Self { show, season, episode })
    }

    /// Get the show this episode belongs to
    pub fn show(&self) -> ShowId {
        self.show
    }

    /// Get the season number
    pub fn season(&self) -> u32 {
        self.season
    }

    /// Get the episode number within the season
    pub fn episode(&self) -> u32 {
        self.episode
    }
}

/// Raw fields accepted during deserialization, before validation runs
#[derive(Deserialize)]
struct RawEpisodeRef {
    show: ShowId,
    season: u32,
    episode: u32,
}

impl TryFrom<RawEpisodeRef> for EpisodeRef {
    type Error = DomainError;

    fn try_from(raw: RawEpisodeRef) -> Result<Self, Self::Error> {
        Self::new(raw.show, raw.season, raw.episode)
    }
}

impl fmt::Display for EpisodeRef {
    /// Renders the season-x-episode number, e.g. "1x3"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.season, self.episode)
    }
}

// =============================================================================
// Rating
// =============================================================================

/// Rating on the service's 10-step scale
///
/// Serialized as its numeric value (1..=10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Rating {
    /// 1 of 10
    WeakSauce = 1,
    /// 2 of 10
    Terrible = 2,
    /// 3 of 10
    Bad = 3,
    /// 4 of 10
    Poor = 4,
    /// 5 of 10
    Meh = 5,
    /// 6 of 10
    Fair = 6,
    /// 7 of 10
    Good = 7,
    /// 8 of 10
    Great = 8,
    /// 9 of 10
    Superb = 9,
    /// 10 of 10
    TotallyNinja = 10,
}

impl Rating {
    /// Create a Rating from its numeric value
    ///
    /// # Errors
    /// Returns `DomainError::InvalidRating` if value is outside 1..=10
    pub fn from_value(value: u8) -> Result<Self, DomainError> {
        match value {
            1 => Ok(Rating::WeakSauce),
            2 => Ok(Rating::Terrible),
            3 => Ok(Rating::Bad),
            4 => Ok(Rating::Poor),
            5 => Ok(Rating::Meh),
            6 => Ok(Rating::Fair),
            7 => Ok(Rating::Good),
            8 => Ok(Rating::Great),
            9 => Ok(Rating::Superb),
            10 => Ok(Rating::TotallyNinja),
            other => Err(DomainError::InvalidRating(format!(
                "Rating must be 1..=10, got {}",
                other
            ))),
        }
    }

    /// Get the numeric value (1..=10)
    pub fn value(&self) -> u8 {
        *self as u8
    }

    /// Get the service's label for this rating step
    pub fn label(&self) -> &'static str {
        match self {
            Rating::WeakSauce => "Weak Sauce",
            Rating::Terrible => "Terrible",
            Rating::Bad => "Bad",
            Rating::Poor => "Poor",
            Rating::Meh => "Meh",
            Rating::Fair => "Fair",
            Rating::Good => "Good",
            Rating::Great => "Great",
            Rating::Superb => "Superb",
            Rating::TotallyNinja => "Totally Ninja",
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.value()
    }
}

impl TryFrom<u8> for Rating {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::from_value(value)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// =============================================================================
// Tests
// =============================================================================
