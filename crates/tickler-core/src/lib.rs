//! Tickler Core: types and validation for the reminder scheduling engine
//!
//! This crate defines the shared abstractions of the Tickler engine:
//! - Domain types: tasks, scheduled events, event kinds and statuses
//! - Time validation: strict date/time parsing and the reminder lead rule
//! - Channel traits: the notification and email side-effect seams
//! - Error taxonomy: user-correctable validation errors vs. channel failures
//!
//! The durable event queue lives in `tickler-store` and the dispatch loop in
//! `tickler-scheduler`; both build on the types defined here.

pub mod error;
pub mod timeval;
pub mod traits;
pub mod types;

pub use error::{ChannelError, ValidationError};
pub use traits::{Mailer, Notification, Notifier, OutgoingEmail};
pub use types::{
    EventKind, EventPayload, EventStatus, ScheduledEvent, Task, MAX_REMINDERS,
};
