//! Scheduling API: the surface a task-owning collaborator calls into.

use crate::config::SchedulerConfig;
use crate::delivery::DeliveryService;
use crate::dispatch::Dispatcher;
use crate::error::{Result, SchedulerError};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tickler_core::{timeval, Mailer, Notifier, Task, ValidationError};
use tickler_store::{EventQueue, StoredEvent};
use tracing::info;

/// The reminder engine: scheduling entry point plus the dispatch loop.
///
/// Cloning is cheap; clones share the same queue and dispatcher, so one
/// clone can run the loop while another accepts scheduling requests.
#[derive(Clone)]
pub struct Scheduler {
    queue: Arc<EventQueue>,
    dispatcher: Arc<Dispatcher>,
}

impl Scheduler {
    /// Create a new scheduler builder.
    pub fn builder(queue: Arc<EventQueue>) -> SchedulerBuilder {
        SchedulerBuilder::new(queue)
    }

    /// Validate a task request and enqueue its events.
    ///
    /// Derives one confirmation event (due immediately), one event per
    /// reminder and one deadline event, inserts them all, and wakes the
    /// dispatcher so a sooner instant shortens its current wait. On any
    /// validation error nothing is created; on an insert error the events
    /// already inserted for this task are removed again.
    pub fn schedule_task(&self, request: TaskRequest) -> Result<String> {
        let task = Task::new(
            request.description,
            request.deadline,
            request.reminders,
            request.recipient,
        )?;
        let events = task.events(Utc::now());

        let mut inserted: Vec<&str> = Vec::with_capacity(events.len());
        for event in &events {
            if let Err(e) = self.queue.insert(event) {
                for id in inserted {
                    let _ = self.queue.cancel(id);
                }
                return Err(e.into());
            }
            inserted.push(&event.event_id);
        }

        self.dispatcher.notify_inserted();
        info!(task_id = %task.id, events = events.len(), "task scheduled");
        Ok(task.id)
    }

    /// Cancel a pending event; a no-op if it already fired or never existed.
    pub fn cancel_event(&self, event_id: &str) -> Result<()> {
        self.queue.cancel(event_id)?;
        Ok(())
    }

    /// Look up one event and its delivery state.
    pub fn event(&self, event_id: &str) -> Result<Option<StoredEvent>> {
        Ok(self.queue.event(event_id)?)
    }

    /// All events derived from a task, in fire order.
    pub fn task_events(&self, task_id: &str) -> Result<Vec<StoredEvent>> {
        Ok(self.queue.task_events(task_id)?)
    }

    /// Run the dispatch loop until [`Scheduler::shutdown`] is called.
    pub async fn run(&self) -> Result<()> {
        self.dispatcher.run().await
    }

    /// Signal graceful shutdown; in-flight deliveries run to completion.
    pub fn shutdown(&self) {
        self.dispatcher.shutdown();
    }

    /// Number of deliveries currently in flight.
    pub fn in_flight(&self) -> usize {
        self.dispatcher.in_flight()
    }
}

/// Builder for creating a scheduler.
pub struct SchedulerBuilder {
    queue: Arc<EventQueue>,
    notifier: Option<Arc<dyn Notifier>>,
    mailer: Option<Arc<dyn Mailer>>,
    config: SchedulerConfig,
}

impl SchedulerBuilder {
    /// Create a new scheduler builder.
    pub fn new(queue: Arc<EventQueue>) -> Self {
        Self {
            queue,
            notifier: None,
            mailer: None,
            config: SchedulerConfig::default(),
        }
    }

    /// Set the notification channel.
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Some(Arc::new(notifier));
        self
    }

    /// Set the email channel.
    pub fn with_mailer(mut self, mailer: impl Mailer + 'static) -> Self {
        self.mailer = Some(Arc::new(mailer));
        self
    }

    /// Set the scheduler configuration.
    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the scheduler.
    pub fn build(self) -> Result<Scheduler> {
        let notifier = self
            .notifier
            .ok_or_else(|| SchedulerError::Configuration("a notifier is required".into()))?;
        let mailer = self
            .mailer
            .ok_or_else(|| SchedulerError::Configuration("a mailer is required".into()))?;

        let delivery = Arc::new(DeliveryService::new(notifier, mailer, self.config.clone()));
        let dispatcher = Arc::new(Dispatcher::new(self.queue.clone(), delivery, self.config));

        Ok(Scheduler {
            queue: self.queue,
            dispatcher,
        })
    }
}

/// A validated-enough scheduling request; full validation happens in
/// [`Scheduler::schedule_task`].
#[derive(Debug, Clone)]
pub struct TaskRequest {
    /// Free-form task description.
    pub description: String,
    /// Deadline instant.
    pub deadline: DateTime<Utc>,
    /// Reminder instants, in caller order.
    pub reminders: Vec<DateTime<Utc>>,
    /// Recipient email address.
    pub recipient: String,
}

impl TaskRequest {
    /// Create a new request builder.
    pub fn builder(description: impl Into<String>) -> TaskRequestBuilder {
        TaskRequestBuilder {
            description: description.into(),
            deadline: None,
            reminders: Vec::new(),
            recipient: None,
        }
    }
}

/// Builder for task requests.
///
/// The string-taking methods funnel through [`tickler_core::timeval`], so a
/// malformed date or time fails here, before anything is scheduled. A
/// reminder given without a date gets the current local date, resolved once
/// at this call.
pub struct TaskRequestBuilder {
    description: String,
    deadline: Option<DateTime<Utc>>,
    reminders: Vec<DateTime<Utc>>,
    recipient: Option<String>,
}

impl TaskRequestBuilder {
    /// Set the deadline from `YYYY-MM-DD` and `HH:MM` strings.
    pub fn deadline(mut self, date: &str, time: &str) -> Result<Self> {
        self.deadline = Some(timeval::parse(date, time)?);
        Ok(self)
    }

    /// Set the deadline from an instant.
    pub fn deadline_at(mut self, instant: DateTime<Utc>) -> Self {
        self.deadline = Some(instant);
        self
    }

    /// Add a reminder from an optional date and a `HH:MM` time string.
    pub fn reminder(mut self, date: Option<&str>, time: &str) -> Result<Self> {
        self.reminders.push(timeval::parse_reminder(date, time)?);
        Ok(self)
    }

    /// Add a reminder from an instant.
    pub fn reminder_at(mut self, instant: DateTime<Utc>) -> Self {
        self.reminders.push(instant);
        self
    }

    /// Set the recipient email address.
    pub fn recipient(mut self, email: impl Into<String>) -> Self {
        self.recipient = Some(email.into());
        self
    }

    /// Build the request.
    pub fn build(self) -> Result<TaskRequest> {
        let deadline = self
            .deadline
            .ok_or(ValidationError::MissingField("deadline"))?;
        let recipient = self
            .recipient
            .ok_or(ValidationError::MissingField("recipient"))?;

        Ok(TaskRequest {
            description: self.description,
            deadline,
            reminders: self.reminders,
            recipient,
        })
    }
}
