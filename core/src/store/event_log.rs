use super::MatrixStore;
use crate::{error::MatrixResult, event::EventLogEntry};
use rusqlite::params;

impl MatrixStore {
    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> MatrixResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (event_type, subject, payload, recorded_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![entry.event_type, entry.subject, entry.payload, entry.recorded_at],
        )?;
        Ok(())
    }

    pub fn events(&self) -> MatrixResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, event_type, subject, payload, recorded_at
             FROM event_log ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map([], row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn events_for(&self, subject: &str) -> MatrixResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, event_type, subject, payload, recorded_at
             FROM event_log WHERE subject = ?1
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![subject], row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn event_count(&self, event_type: &str) -> MatrixResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE event_type = ?1",
            params![event_type],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<EventLogEntry> {
    Ok(EventLogEntry {
        id:          Some(row.get(0)?),
        event_type:  row.get(1)?,
        subject:     row.get(2)?,
        payload:     row.get(3)?,
        recorded_at: row.get(4)?,
    })
}
