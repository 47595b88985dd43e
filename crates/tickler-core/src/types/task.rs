use crate::error::ValidationError;
use crate::timeval;
use crate::types::event::{EventKind, EventPayload, ScheduledEvent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of reminders a single task may carry.
pub const MAX_REMINDERS: usize = 6;

/// A validated task: immutable once scheduled.
///
/// Construction through [`Task::new`] enforces the invariants: description
/// and recipient are non-empty, at most [`MAX_REMINDERS`] reminders, and
/// every reminder is at least the minimum lead before the deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Opaque unique identifier.
    pub id: String,
    /// Free-form description shown in every announcement.
    pub description: String,
    /// The deadline instant.
    pub deadline: DateTime<Utc>,
    /// Reminder instants, in the order the caller supplied them.
    pub reminders: Vec<DateTime<Utc>>,
    /// Recipient email address.
    pub recipient: String,
}

impl Task {
    /// Validate and build a task with a fresh id.
    pub fn new(
        description: impl Into<String>,
        deadline: DateTime<Utc>,
        reminders: Vec<DateTime<Utc>>,
        recipient: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let description = description.into();
        let recipient = recipient.into();

        if description.trim().is_empty() {
            return Err(ValidationError::MissingField("description"));
        }
        if recipient.trim().is_empty() {
            return Err(ValidationError::MissingField("recipient"));
        }
        if reminders.len() > MAX_REMINDERS {
            return Err(ValidationError::TooManyReminders(reminders.len()));
        }
        for reminder in &reminders {
            timeval::validate_reminder(*reminder, deadline)?;
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            description,
            deadline,
            reminders,
            recipient,
        })
    }

    /// Derive the scheduled events for this task.
    ///
    /// Exactly one confirmation (firing at `now`), one event per reminder,
    /// and one deadline event, each with a fresh event id. The confirmation
    /// payload carries the reminder list as display strings, captured here
    /// at creation time.
    pub fn events(&self, now: DateTime<Utc>) -> Vec<ScheduledEvent> {
        let deadline_text = timeval::format_instant(self.deadline);
        let reminder_texts: Vec<String> = self
            .reminders
            .iter()
            .map(|r| timeval::format_instant(*r))
            .collect();

        let mut events = Vec::with_capacity(self.reminders.len() + 2);

        events.push(ScheduledEvent {
            event_id: uuid::Uuid::new_v4().to_string(),
            task_id: self.id.clone(),
            kind: EventKind::Confirmation,
            fire_at: now,
            payload: EventPayload {
                description: self.description.clone(),
                recipient: self.recipient.clone(),
                deadline_text: deadline_text.clone(),
                reminder_texts,
            },
        });

        for reminder in &self.reminders {
            events.push(ScheduledEvent {
                event_id: uuid::Uuid::new_v4().to_string(),
                task_id: self.id.clone(),
                kind: EventKind::Reminder,
                fire_at: *reminder,
                payload: EventPayload {
                    description: self.description.clone(),
                    recipient: self.recipient.clone(),
                    deadline_text: deadline_text.clone(),
                    reminder_texts: Vec::new(),
                },
            });
        }

        events.push(ScheduledEvent {
            event_id: uuid::Uuid::new_v4().to_string(),
            task_id: self.id.clone(),
            kind: EventKind::Deadline,
            fire_at: self.deadline,
            payload: EventPayload {
                description: self.description.clone(),
                recipient: self.recipient.clone(),
                deadline_text,
                reminder_texts: Vec::new(),
            },
        });

        events
    }
}
