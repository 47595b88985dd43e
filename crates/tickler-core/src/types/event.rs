use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a scheduled event announces when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Fired immediately after a task is created, summarizing it.
    Confirmation,
    /// Fired at each reminder instant ahead of the deadline.
    Reminder,
    /// Fired at the deadline itself.
    Deadline,
}

impl EventKind {
    /// Stable string form used in the persisted layout.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmation => "confirmation",
            Self::Reminder => "reminder",
            Self::Deadline => "deadline",
        }
    }

    /// Inverse of [`EventKind::as_str`].
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "confirmation" => Some(Self::Confirmation),
            "reminder" => Some(Self::Reminder),
            "deadline" => Some(Self::Deadline),
            _ => None,
        }
    }
}

/// Lifecycle of a scheduled event.
///
/// `Pending -> InFlight -> {Delivered, Failed}`; the terminal states never
/// transition again, so an event is delivered at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Waiting for its fire instant.
    Pending,
    /// Claimed by the dispatcher, delivery running.
    InFlight,
    /// Both channels completed without failure.
    Delivered,
    /// At least one channel failed after exhausting its attempts.
    Failed,
}

impl EventStatus {
    /// Stable string form used in the persisted layout.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InFlight => "in_flight",
            Self::Delivered => "delivered",
            Self::Failed => "failed",
        }
    }

    /// Inverse of [`EventStatus::as_str`].
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "in_flight" => Some(Self::InFlight),
            "delivered" => Some(Self::Delivered),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Whether this status can never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Failed)
    }
}

/// Everything a delivery needs to render its notification and email.
///
/// `reminder_texts` is populated for confirmation events only: the full
/// reminder list as display strings, captured at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPayload {
    /// The task description shown in both channels.
    pub description: String,
    /// Recipient email address.
    pub recipient: String,
    /// Deadline as a display string.
    pub deadline_text: String,
    /// Reminder instants as display strings (confirmation events).
    #[serde(default)]
    pub reminder_texts: Vec<String>,
}

/// A single scheduled action tied to one fire instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    /// Opaque unique identifier; delivery is idempotent per id.
    pub event_id: String,
    /// The task this event belongs to.
    pub task_id: String,
    /// What kind of announcement this is.
    pub kind: EventKind,
    /// The instant at which the event becomes due.
    pub fire_at: DateTime<Utc>,
    /// Channel-facing payload.
    pub payload: EventPayload,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_string_roundtrip() {
        for kind in [EventKind::Confirmation, EventKind::Reminder, EventKind::Deadline] {
            assert_eq!(EventKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(EventKind::parse("unknown"), None);
    }

    #[test]
    fn test_status_string_roundtrip() {
        for status in [
            EventStatus::Pending,
            EventStatus::InFlight,
            EventStatus::Delivered,
            EventStatus::Failed,
        ] {
            assert_eq!(EventStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(EventStatus::parse(""), None);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!EventStatus::Pending.is_terminal());
        assert!(!EventStatus::InFlight.is_terminal());
        assert!(EventStatus::Delivered.is_terminal());
        assert!(EventStatus::Failed.is_terminal());
    }
}
