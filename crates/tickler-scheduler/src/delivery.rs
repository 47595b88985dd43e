//! Delivery of fired events through the notification and email channels.

use crate::config::SchedulerConfig;
use crate::message;
use std::sync::Arc;
use tickler_core::{
    ChannelError, Mailer, Notification, Notifier, OutgoingEmail, ScheduledEvent,
};
use tokio::time::timeout;
use tracing::{debug, warn};

/// Terminal outcome of one delivery channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelStatus {
    /// The channel completed.
    Delivered,
    /// The channel's surface is unavailable (e.g. notification permission
    /// denied); treated as success, not failure.
    Skipped,
    /// The channel exhausted its attempts; the last error is kept.
    Failed(String),
}

impl ChannelStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Per-channel outcome of delivering one event.
///
/// The two channels are independent: a failed notification does not stop
/// the email send, and vice versa. The event is delivered overall only if
/// neither channel failed.
#[derive(Debug, Clone)]
pub struct DeliveryReport {
    pub event_id: String,
    pub notification: ChannelStatus,
    pub email: ChannelStatus,
}

impl DeliveryReport {
    pub fn is_delivered(&self) -> bool {
        !self.notification.is_failed() && !self.email.is_failed()
    }

    /// Human-readable summary naming each failed channel, if any.
    pub fn failure(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let ChannelStatus::Failed(reason) = &self.notification {
            parts.push(format!("notification: {reason}"));
        }
        if let ChannelStatus::Failed(reason) = &self.email {
            parts.push(format!("email: {reason}"));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join("; "))
        }
    }
}

/// Executes the side effects for fired events.
///
/// Each channel gets up to `max_attempts` tries with exponential backoff,
/// and every attempt is bounded by `delivery_timeout` so a hung transport
/// cannot suspend the dispatcher's workers indefinitely.
pub struct DeliveryService {
    notifier: Arc<dyn Notifier>,
    mailer: Arc<dyn Mailer>,
    config: SchedulerConfig,
}

impl DeliveryService {
    pub fn new(
        notifier: Arc<dyn Notifier>,
        mailer: Arc<dyn Mailer>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            notifier,
            mailer,
            config,
        }
    }

    /// Deliver one event through both channels.
    pub async fn deliver(&self, event: &ScheduledEvent) -> DeliveryReport {
        let (note, mail) = message::compose(event);

        let notification = self.present_with_retry(event, &note).await;
        // Email is attempted regardless of the notification outcome.
        let email = self.send_with_retry(event, &mail).await;

        let report = DeliveryReport {
            event_id: event.event_id.clone(),
            notification,
            email,
        };

        match report.failure() {
            None => debug!(
                event_id = %event.event_id,
                kind = event.kind.as_str(),
                "event delivered"
            ),
            Some(failure) => warn!(
                event_id = %event.event_id,
                kind = event.kind.as_str(),
                %failure,
                "event delivery failed"
            ),
        }

        report
    }

    async fn present_with_retry(
        &self,
        event: &ScheduledEvent,
        note: &Notification,
    ) -> ChannelStatus {
        let attempts = self.config.max_attempts.max(1);
        let mut last = String::new();

        for attempt in 1..=attempts {
            match timeout(self.config.delivery_timeout, self.notifier.present(note)).await {
                Ok(Ok(true)) => return ChannelStatus::Delivered,
                Ok(Ok(false)) => {
                    debug!(event_id = %event.event_id, "notification surface unavailable, skipping");
                    return ChannelStatus::Skipped;
                }
                Ok(Err(e)) => last = e.to_string(),
                Err(_) => {
                    last = ChannelError::Timeout(self.config.delivery_timeout.as_secs()).to_string()
                }
            }
            warn!(event_id = %event.event_id, attempt, error = %last, "notification attempt failed");
            self.backoff(attempt, attempts).await;
        }

        ChannelStatus::Failed(last)
    }

    async fn send_with_retry(&self, event: &ScheduledEvent, mail: &OutgoingEmail) -> ChannelStatus {
        let attempts = self.config.max_attempts.max(1);
        let mut last = String::new();

        for attempt in 1..=attempts {
            match timeout(self.config.delivery_timeout, self.mailer.send(mail)).await {
                Ok(Ok(())) => return ChannelStatus::Delivered,
                Ok(Err(e)) => last = e.to_string(),
                Err(_) => {
                    last = ChannelError::Timeout(self.config.delivery_timeout.as_secs()).to_string()
                }
            }
            warn!(event_id = %event.event_id, attempt, error = %last, "email attempt failed");
            self.backoff(attempt, attempts).await;
        }

        ChannelStatus::Failed(last)
    }

    async fn backoff(&self, attempt: u32, attempts: u32) {
        if attempt < attempts {
            let delay = self.config.retry_backoff * 2u32.pow(attempt - 1);
            tokio::time::sleep(delay).await;
        }
    }
}
