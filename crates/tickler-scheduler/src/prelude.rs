//! Convenience re-exports for common types.

pub use crate::config::SchedulerConfig;
pub use crate::delivery::{ChannelStatus, DeliveryReport, DeliveryService};
pub use crate::dispatch::Dispatcher;
pub use crate::error::{Result, SchedulerError};
pub use crate::scheduler::{Scheduler, SchedulerBuilder, TaskRequest, TaskRequestBuilder};
pub use tickler_core::{
    timeval, ChannelError, EventKind, EventPayload, EventStatus, Mailer, Notification, Notifier,
    OutgoingEmail, ScheduledEvent, Task, ValidationError, MAX_REMINDERS,
};
pub use tickler_store::{EventQueue, StoreError, StoredEvent};
