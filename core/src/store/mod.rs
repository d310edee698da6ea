//! SQLite persistence layer.
//!
//! RULE: Only the store module talks to the database.
//! State containers go through the `KvStore` trait; the engine appends
//! audit entries through `append_event`. Nothing else executes SQL.

mod event_log;
mod kv;

use crate::error::MatrixResult;
use rusqlite::Connection;

pub struct MatrixStore {
    conn: Connection,
}

impl MatrixStore {
    pub fn open(path: &str) -> MatrixResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> MatrixResult<Self> {
        let conn = Connection::open(":memory:")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> MatrixResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        Ok(())
    }
}
