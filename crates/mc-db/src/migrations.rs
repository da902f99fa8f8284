//! Versioned schema for the catalog database.
//!
//! Each migration is an embedded SQL batch with a version number. The
//! highest applied version is tracked in `schema_migrations`.

use mc_core::{Error, Result};
use rusqlite::Connection;

/// V1: the `media_items` table and its lookup indexes.
const V1_INITIAL: &str = r#"
CREATE TABLE media_items (
    id           TEXT PRIMARY KEY,
    title        TEXT NOT NULL,
    release_year INTEGER NOT NULL,
    kind         TEXT NOT NULL,
    genre        TEXT,
    rating       REAL,
    watched      INTEGER NOT NULL DEFAULT 0,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
);

CREATE INDEX idx_media_items_title ON media_items(title);
CREATE INDEX idx_media_items_kind ON media_items(kind);
CREATE INDEX idx_media_items_watched ON media_items(watched);
"#;

/// Ordered list of `(version, sql)` pairs.
const MIGRATIONS: &[(i64, &str)] = &[(1, V1_INITIAL)];

/// Newest schema version this build knows about.
pub fn latest_version() -> i64 {
    MIGRATIONS.last().map_or(0, |&(version, _)| version)
}

/// Highest version recorded in `schema_migrations`, or 0 on a fresh file.
pub fn current_version(conn: &Connection) -> Result<i64> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )
    .map_err(Error::storage)?;

    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )
    .map_err(Error::storage)
}

/// Bring the schema up to [`latest_version`]. Each pending migration runs in
/// its own transaction together with its `schema_migrations` row.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let applied = current_version(conn)?;

    MIGRATIONS
        .iter()
        .filter(|&&(version, _)| version > applied)
        .try_for_each(|&(version, sql)| {
            apply(conn, version, sql)
                .map_err(|e| Error::storage(format!("migration V{version}: {e}")))
        })
}

fn apply(conn: &Connection, version: i64, sql: &str) -> rusqlite::Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(sql)?;
    tx.execute(
        "INSERT INTO schema_migrations (version) VALUES (?1)",
        [version],
    )?;
    tx.commit()
}
