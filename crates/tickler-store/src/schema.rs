use crate::error::Result;
use rusqlite::Connection;

/// Initialize the event table and its due-scan index.
pub(crate) fn init(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS scheduled_events (
            event_id TEXT PRIMARY KEY,
            task_id TEXT NOT NULL,
            kind TEXT NOT NULL,
            fire_at INTEGER NOT NULL,
            description TEXT NOT NULL,
            recipient TEXT NOT NULL,
            deadline_text TEXT NOT NULL,
            reminder_texts TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending',
            error TEXT,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_scheduled_events_due
            ON scheduled_events(status, fire_at);
        "#,
    )?;
    Ok(())
}

/// Configure the SQLite connection.
pub(crate) fn configure(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    Ok(())
}
