//! Row model for the `media_items` table.

use chrono::{DateTime, SecondsFormat, Utc};
use mc_core::{Error, MediaId, MediaItem, MediaKind, MediaParts, Result};
use uuid::Uuid;

/// Parse a UUID-based ID from a text column.
fn parse_id<T: From<Uuid>>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<T> {
    let s: String = row.get(idx)?;
    let uuid = Uuid::parse_str(&s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(T::from(uuid))
}

/// Format a timestamp for storage. Nanosecond precision keeps round-trips exact.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(id: MediaId, column: &str, value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::storage(format!("media {id}: bad {column} '{value}': {e}")))
}

/// A `media_items` row as stored, before domain validation.
#[derive(Debug, Clone)]
pub struct MediaRow {
    pub id: MediaId,
    pub title: String,
    pub release_year: i32,
    pub kind: String,
    pub genre: Option<String>,
    pub rating: Option<f64>,
    pub watched: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl MediaRow {
    pub fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: parse_id(row, 0)?,
            title: row.get(1)?,
            release_year: row.get(2)?,
            kind: row.get(3)?,
            genre: row.get(4)?,
            rating: row.get(5)?,
            watched: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }
}

impl TryFrom<MediaRow> for MediaItem {
    type Error = Error;

    /// A row that breaks an entity invariant is reported as a storage
    /// failure, not as bad caller input.
    fn try_from(row: MediaRow) -> Result<Self> {
        let id = row.id;
        let kind: MediaKind = row
            .kind
            .parse()
            .map_err(|e| Error::storage(format!("media {id}: {e}")))?;

        MediaItem::restore(MediaParts {
            id,
            title: row.title,
            release_year: row.release_year,
            kind,
            genre: row.genre,
            rating: row.rating,
            watched: row.watched,
            created_at: parse_timestamp(id, "created_at", &row.created_at)?,
            updated_at: parse_timestamp(id, "updated_at", &row.updated_at)?,
        })
        .map_err(|e| Error::storage(format!("media {id}: {e}")))
    }
}
