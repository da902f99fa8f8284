//! The catalog's domain: media kinds, genres, and the [`MediaItem`] entity.
//!
//! `MediaItem` keeps its fields private. Construction and every mutator
//! re-check the invariants they touch, so an instance that exists in memory
//! is always valid:
//!
//! - the title is never empty or whitespace-only;
//! - the release year lies in `[1888, current_year + 5]` when set;
//! - the rating, when present, lies in `[0, 10]`;
//! - the id is assigned once, at construction.

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::ids::MediaId;

/// Earliest accepted release year.
pub const MIN_RELEASE_YEAR: i32 = 1888;

/// How many years past the current one a release year may be announced.
pub const RELEASE_YEAR_LOOKAHEAD: i32 = 5;

/// Lowest accepted rating.
pub const MIN_RATING: f64 = 0.0;

/// Highest accepted rating.
pub const MAX_RATING: f64 = 10.0;

// ---------------------------------------------------------------------------
// MediaKind
// ---------------------------------------------------------------------------

/// Whether a catalog entry is a movie or a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Series,
}

impl MediaKind {
    /// Stable lowercase name, as stored and serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "movie" => Ok(Self::Movie),
            "series" => Ok(Self::Series),
            other => Err(Error::invalid(format!(
                "unknown media kind '{other}' (valid: movie, series)"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Genre
// ---------------------------------------------------------------------------

/// Known genres. An item's stored genre is free text, but a genre that
/// matches one of these is stored under its canonical name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
pub enum Genre {
    Action,
    Adventure,
    Comedy,
    Drama,
    Thriller,
    Horror,
    Romance,
    ScienceFiction,
    Animation,
    Documentary,
    Other,
}

impl Genre {
    /// Every known genre, in declaration order.
    pub const ALL: [Genre; 11] = [
        Genre::Action,
        Genre::Adventure,
        Genre::Comedy,
        Genre::Drama,
        Genre::Thriller,
        Genre::Horror,
        Genre::Romance,
        Genre::ScienceFiction,
        Genre::Animation,
        Genre::Documentary,
        Genre::Other,
    ];

    /// Canonical name, as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Action => "Action",
            Self::Adventure => "Adventure",
            Self::Comedy => "Comedy",
            Self::Drama => "Drama",
            Self::Thriller => "Thriller",
            Self::Horror => "Horror",
            Self::Romance => "Romance",
            Self::ScienceFiction => "ScienceFiction",
            Self::Animation => "Animation",
            Self::Documentary => "Documentary",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = Error;

    /// Case-insensitive; spaces, hyphens and underscores are ignored so that
    /// "science fiction" and "Science_Fiction" both parse.
    fn from_str(s: &str) -> Result<Self> {
        let folded: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();

        Genre::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(&folded))
            .ok_or_else(|| {
                let valid: Vec<&str> = Genre::ALL.iter().map(Genre::as_str).collect();
                Error::invalid(format!(
                    "unknown genre '{}' (valid: {})",
                    s.trim(),
                    valid.join(", ")
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Reject an empty or whitespace-only title.
pub fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::invalid("title must not be empty"));
    }
    Ok(())
}

/// Latest release year accepted right now.
pub fn max_release_year() -> i32 {
    Utc::now().year() + RELEASE_YEAR_LOOKAHEAD
}

/// Reject a release year outside `[1888, current_year + 5]`.
pub fn validate_release_year(year: i32) -> Result<()> {
    let max = max_release_year();
    if !(MIN_RELEASE_YEAR..=max).contains(&year) {
        return Err(Error::invalid(format!(
            "release year {year} is outside {MIN_RELEASE_YEAR}..={max}"
        )));
    }
    Ok(())
}

/// Reject a rating outside `[0, 10]`. NaN is rejected too.
pub fn validate_rating(rating: f64) -> Result<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(Error::invalid(format!(
            "rating {rating} is outside {MIN_RATING}..={MAX_RATING}"
        )));
    }
    Ok(())
}

/// Validate a rating and fold `-0.0` into `0.0`, so every zero compares equal.
fn checked_rating(rating: Option<f64>) -> Result<Option<f64>> {
    rating
        .map(|r| validate_rating(r).map(|()| if r == 0.0 { 0.0 } else { r }))
        .transpose()
}

/// Blank genres become `None`; known genres take their canonical spelling.
fn normalize_genre(genre: Option<String>) -> Option<String> {
    let genre = genre?;
    let trimmed = genre.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<Genre>() {
        Ok(known) => Some(known.as_str().to_string()),
        Err(_) => Some(trimmed.to_string()),
    }
}

// ---------------------------------------------------------------------------
// MediaItem
// ---------------------------------------------------------------------------

/// Caller-supplied fields for a new catalog entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMedia {
    pub title: String,
    pub release_year: i32,
    pub kind: MediaKind,
    pub genre: Option<String>,
    pub rating: Option<f64>,
    pub watched: bool,
}

/// Every persisted field of a [`MediaItem`], used to rebuild one from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaParts {
    pub id: MediaId,
    pub title: String,
    pub release_year: i32,
    pub kind: MediaKind,
    pub genre: Option<String>,
    pub rating: Option<f64>,
    pub watched: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A catalogued movie or series.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaItem {
    id: MediaId,
    title: String,
    release_year: i32,
    kind: MediaKind,
    genre: Option<String>,
    rating: Option<f64>,
    watched: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MediaItem {
    /// Create a new entry with a fresh id and both timestamps set to now.
    pub fn new(draft: NewMedia) -> Result<Self> {
        validate_title(&draft.title)?;
        validate_release_year(draft.release_year)?;
        let rating = checked_rating(draft.rating)?;

        let now = Utc::now();
        Ok(Self {
            id: MediaId::new(),
            title: draft.title,
            release_year: draft.release_year,
            kind: draft.kind,
            genre: normalize_genre(draft.genre),
            rating,
            watched: draft.watched,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild an entry read back from storage.
    ///
    /// Title and rating are re-checked. The release year is not: the upper
    /// bound moves with the clock, and a year that was valid when written
    /// stays valid.
    pub fn restore(parts: MediaParts) -> Result<Self> {
        validate_title(&parts.title)?;
        let rating = checked_rating(parts.rating)?;

        Ok(Self {
            id: parts.id,
            title: parts.title,
            release_year: parts.release_year,
            kind: parts.kind,
            genre: parts.genre,
            rating,
            watched: parts.watched,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
        })
    }

    /// Set the rating.
    pub fn set_rating(&mut self, rating: f64) -> Result<()> {
        self.rating = checked_rating(Some(rating))?;
        self.touch();
        Ok(())
    }

    /// Flag the entry as watched. Calling it again only advances `updated_at`.
    pub fn mark_watched(&mut self) {
        self.watched = true;
        self.touch();
    }

    /// Replace title, release year, kind and genre after re-validating them.
    pub fn update_basic_fields(
        &mut self,
        title: impl Into<String>,
        release_year: i32,
        kind: MediaKind,
        genre: Option<String>,
    ) -> Result<()> {
        let title = title.into();
        validate_title(&title)?;
        validate_release_year(release_year)?;

        self.title = title;
        self.release_year = release_year;
        self.kind = kind;
        self.genre = normalize_genre(genre);
        self.touch();
        Ok(())
    }

    /// Advance `updated_at`, strictly, even if the clock has not moved.
    fn touch(&mut self) {
        let floor = self.updated_at + Duration::microseconds(1);
        self.updated_at = Utc::now().max(floor);
    }

    pub fn id(&self) -> MediaId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn release_year(&self) -> i32 {
        self.release_year
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref()
    }

    pub fn rating(&self) -> Option<f64> {
        self.rating
    }

    pub fn watched(&self) -> bool {
        self.watched
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
