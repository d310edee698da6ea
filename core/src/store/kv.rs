use super::MatrixStore;
use crate::{error::MatrixResult, persist::KvStore};
use rusqlite::{params, OptionalExtension};

impl KvStore for MatrixStore {
    fn get(&self, key: &str) -> MatrixResult<Option<Vec<u8>>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entry WHERE key = ?1",
                params![key],
                |row| row.get::<_, Vec<u8>>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &[u8]) -> MatrixResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entry (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn keys(&self, prefix: &str) -> MatrixResult<Vec<String>> {
        // Literal prefix match; LIKE would treat '%' and '_' in role ids as wildcards.
        let mut stmt = self.conn.prepare(
            "SELECT key FROM kv_entry
             WHERE substr(key, 1, length(?1)) = ?1
             ORDER BY key ASC",
        )?;
        let keys = stmt
            .query_map(params![prefix], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }
}

impl MatrixStore {
    /// Number of persisted blobs (for tests and the runner summary).
    pub fn kv_entry_count(&self) -> MatrixResult<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM kv_entry", [], |row| row.get(0))?;
        Ok(count)
    }
}
