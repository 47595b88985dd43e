//! SQLite-backed event queue.

use crate::error::{Result, StoreError};
use crate::schema;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, warn};

/// Durable store of scheduled events, keyed by fire instant.
///
/// Events enter as `pending`, are claimed atomically by [`EventQueue::due_before`]
/// (moving to `in_flight`), and are resolved to a terminal status by the
/// dispatcher. Rows left `in_flight` by a crash are re-queued on open, so a
/// delivery interrupted mid-flight is retried after restart.
pub struct EventQueue {
    conn: Mutex<Connection>,
}

/// A persisted event together with its delivery state.
#[derive(Debug, Clone)]
pub struct StoredEvent {
    pub event: tickler_core::ScheduledEvent,
    pub status: tickler_core::EventStatus,
    /// Failure detail recorded at resolution time, if any.
    pub error: Option<String>,
}

impl EventQueue {
    /// Open (or create) a queue at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )?;
        Self::from_connection(conn)
    }

    /// Open an in-memory queue (tests and ephemeral runs).
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        schema::configure(&conn)?;
        schema::init(&conn)?;

        // Deliveries interrupted by a crash have unknown outcomes; re-queue
        // them rather than leave them stuck. Delivery is at-least-once
        // across a crash mid-flight.
        let recovered = conn.execute(
            "UPDATE scheduled_events SET status = 'pending', updated_at = ?1
             WHERE status = 'in_flight'",
            params![Utc::now().timestamp_millis()],
        )?;
        if recovered > 0 {
            warn!(count = recovered, "re-queued deliveries interrupted by restart");
        }

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Insert a new pending event.
    ///
    /// Fails with [`StoreError::DuplicateEvent`] if an event with the same
    /// id already exists, regardless of its status.
    pub fn insert(&self, event: &tickler_core::ScheduledEvent) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now().timestamp_millis();

        let result = conn.execute(
            r#"
            INSERT INTO scheduled_events
            (event_id, task_id, kind, fire_at, description, recipient,
             deadline_text, reminder_texts, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 'pending', ?9, ?9)
            "#,
            params![
                event.event_id,
                event.task_id,
                event.kind.as_str(),
                event.fire_at.timestamp_millis(),
                event.payload.description,
                event.payload.recipient,
                event.payload.deadline_text,
                serde_json::to_string(&event.payload.reminder_texts)?,
                now,
            ],
        );

        match result {
            Ok(_) => {
                debug!(event_id = %event.event_id, kind = event.kind.as_str(), "event inserted");
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(StoreError::DuplicateEvent(event.event_id.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Claim every pending event due at or before `now`.
    ///
    /// Returned events are moved to `in_flight` in the same transaction, so
    /// a second call with no intervening insert returns nothing: an event
    /// is never handed out twice.
    pub fn due_before(&self, now: DateTime<Utc>) -> Result<Vec<tickler_core::ScheduledEvent>> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let cutoff = now.timestamp_millis();

        let raw = {
            let mut stmt = tx.prepare(
                r#"
                SELECT event_id, task_id, kind, fire_at, description, recipient,
                       deadline_text, reminder_texts
                FROM scheduled_events
                WHERE status = 'pending' AND fire_at <= ?1
                ORDER BY fire_at ASC, rowid ASC
                "#,
            )?;
            let rows = stmt.query_map(params![cutoff], raw_event_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows
        };

        tx.execute(
            "UPDATE scheduled_events SET status = 'in_flight', updated_at = ?1
             WHERE status = 'pending' AND fire_at <= ?2",
            params![Utc::now().timestamp_millis(), cutoff],
        )?;
        tx.commit()?;

        raw.into_iter().map(RawEvent::decode).collect()
    }

    /// Remove a pending event.
    ///
    /// A no-op (not an error) if the event is unknown, already claimed, or
    /// already resolved: cancelling an event that has fired is not a failure.
    pub fn cancel(&self, event_id: &str) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let removed = conn.execute(
            "DELETE FROM scheduled_events WHERE event_id = ?1 AND status = 'pending'",
            params![event_id],
        )?;
        if removed > 0 {
            debug!(event_id, "event cancelled");
        }
        Ok(())
    }

    /// Record the terminal status of a claimed event.
    pub fn resolve(
        &self,
        event_id: &str,
        status: tickler_core::EventStatus,
        error: Option<&str>,
    ) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let updated = conn.execute(
            "UPDATE scheduled_events SET status = ?1, error = ?2, updated_at = ?3
             WHERE event_id = ?4",
            params![
                status.as_str(),
                error,
                Utc::now().timestamp_millis(),
                event_id
            ],
        )?;
        if updated == 0 {
            warn!(event_id, "resolve on unknown event");
        }
        Ok(())
    }

    /// Earliest pending fire instant, if any.
    pub fn next_fire_at(&self) -> Result<Option<DateTime<Utc>>> {
        let conn = self.conn.lock().unwrap();
        let next: Option<i64> = conn
            .query_row(
                "SELECT fire_at FROM scheduled_events
                 WHERE status = 'pending'
                 ORDER BY fire_at ASC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(next.and_then(DateTime::from_timestamp_millis))
    }

    /// Point lookup of a stored event and its state.
    pub fn event(&self, event_id: &str) -> Result<Option<StoredEvent>> {
        let conn = self.conn.lock().unwrap();
        let raw = conn
            .query_row(
                r#"
                SELECT event_id, task_id, kind, fire_at, description, recipient,
                       deadline_text, reminder_texts, status, error
                FROM scheduled_events
                WHERE event_id = ?1
                "#,
                params![event_id],
                |row| {
                    Ok((
                        raw_event_row(row)?,
                        row.get::<_, String>(8)?,
                        row.get::<_, Option<String>>(9)?,
                    ))
                },
            )
            .optional()?;

        match raw {
            None => Ok(None),
            Some((raw, status, error)) => {
                let status = tickler_core::EventStatus::parse(&status)
                    .ok_or_else(|| StoreError::EventDecode(format!("status {status:?}")))?;
                Ok(Some(StoredEvent {
                    event: raw.decode()?,
                    status,
                    error,
                }))
            }
        }
    }

    /// Delivery status of an event, if it exists.
    pub fn status(&self, event_id: &str) -> Result<Option<tickler_core::EventStatus>> {
        Ok(self.event(event_id)?.map(|stored| stored.status))
    }

    /// All events belonging to a task, in fire order.
    pub fn task_events(&self, task_id: &str) -> Result<Vec<StoredEvent>> {
        let conn = self.conn.lock().unwrap();
        let raw = {
            let mut stmt = conn.prepare(
                r#"
                SELECT event_id, task_id, kind, fire_at, description, recipient,
                       deadline_text, reminder_texts, status, error
                FROM scheduled_events
                WHERE task_id = ?1
                ORDER BY fire_at ASC, rowid ASC
                "#,
            )?;
            let rows = stmt.query_map(params![task_id], |row| {
                Ok((
                    raw_event_row(row)?,
                    row.get::<_, String>(8)?,
                    row.get::<_, Option<String>>(9)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
            rows
        };

        raw.into_iter()
            .map(|(raw, status, error)| {
                let status = tickler_core::EventStatus::parse(&status)
                    .ok_or_else(|| StoreError::EventDecode(format!("status {status:?}")))?;
                Ok(StoredEvent {
                    event: raw.decode()?,
                    status,
                    error,
                })
            })
            .collect()
    }

    /// Number of pending events.
    pub fn pending_count(&self) -> Result<u64> {
        let conn = self.conn.lock().unwrap();
        let count: u64 = conn.query_row(
            "SELECT COUNT(*) FROM scheduled_events WHERE status = 'pending'",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

/// Columns of an event row before decoding into domain types.
struct RawEvent {
    event_id: String,
    task_id: String,
    kind: String,
    fire_at: i64,
    description: String,
    recipient: String,
    deadline_text: String,
    reminder_texts: String,
}

fn raw_event_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEvent> {
    Ok(RawEvent {
        event_id: row.get(0)?,
        task_id: row.get(1)?,
        kind: row.get(2)?,
        fire_at: row.get(3)?,
        description: row.get(4)?,
        recipient: row.get(5)?,
        deadline_text: row.get(6)?,
        reminder_texts: row.get(7)?,
    })
}

impl RawEvent {
    fn decode(self) -> Result<tickler_core::ScheduledEvent> {
        let kind = tickler_core::EventKind::parse(&self.kind)
            .ok_or_else(|| StoreError::EventDecode(format!("kind {:?}", self.kind)))?;
        let fire_at = DateTime::from_timestamp_millis(self.fire_at)
            .ok_or_else(|| StoreError::EventDecode(format!("fire_at {}", self.fire_at)))?;
        let reminder_texts: Vec<String> = serde_json::from_str(&self.reminder_texts)?;

        Ok(tickler_core::ScheduledEvent {
            event_id: self.event_id,
            task_id: self.task_id,
            kind,
            fire_at,
            payload: tickler_core::EventPayload {
                description: self.description,
                recipient: self.recipient,
                deadline_text: self.deadline_text,
                reminder_texts,
            },
        })
    }
}
