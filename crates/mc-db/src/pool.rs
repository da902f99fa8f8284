//! r2d2 pools over SQLite, migrated on creation.

use std::sync::atomic::{AtomicU64, Ordering};

use mc_core::{Error, Result};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use crate::migrations;

pub type DbPool = Pool<SqliteConnectionManager>;

pub type PooledConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// Connections held by an in-memory pool.
const MEMORY_POOL_SIZE: u32 = 4;

/// Open (or create) the database file at `db_path` with room for
/// `max_size` connections, then migrate it.
pub fn init_pool(db_path: &str, max_size: u32) -> Result<DbPool> {
    let manager = SqliteConnectionManager::file(db_path).with_init(configure_file_connection);
    build_migrated(manager, max_size)
}

/// A fresh in-memory database. Every call gets its own shared-cache name, so
/// pools never see each other while connections inside one pool share data.
pub fn init_memory_pool() -> Result<DbPool> {
    static NEXT: AtomicU64 = AtomicU64::new(0);
    let name = NEXT.fetch_add(1, Ordering::Relaxed);

    let manager =
        SqliteConnectionManager::file(format!("file:mediacat_mem_{name}?mode=memory&cache=shared"))
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
    build_migrated(manager, MEMORY_POOL_SIZE)
}

pub fn get_conn(pool: &DbPool) -> Result<PooledConnection> {
    pool.get()
        .map_err(|e| Error::storage(format!("no connection available: {e}")))
}

fn configure_file_connection(conn: &mut Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "PRAGMA foreign_keys = ON;
         PRAGMA journal_mode = WAL;",
    )
}

fn build_migrated(manager: SqliteConnectionManager, max_size: u32) -> Result<DbPool> {
    let pool = Pool::builder()
        .max_size(max_size.max(1))
        .build(manager)
        .map_err(|e| Error::storage(format!("cannot open connection pool: {e}")))?;

    migrations::run_migrations(&*get_conn(&pool)?)?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_memory_pool_is_a_separate_database() {
        let a = init_memory_pool().unwrap();
        let b = init_memory_pool().unwrap();
        get_conn(&a)
            .unwrap()
            .execute_batch("CREATE TABLE only_in_a (x INTEGER)")
            .unwrap();

        let in_b: bool = get_conn(&b)
            .unwrap()
            .query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE name = 'only_in_a'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(!in_b);
    }

    #[test]
    fn connections_enforce_foreign_keys() {
        let pool = init_memory_pool().unwrap();
        let conn = get_conn(&pool).unwrap();
        let fk: i32 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn file_pool_is_migrated_and_sized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");
        let pool = init_pool(&path.to_string_lossy(), 2).unwrap();
        assert_eq!(pool.max_size(), 2);

        let conn = get_conn(&pool).unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='media_items'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
