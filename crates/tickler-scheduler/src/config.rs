//! Scheduler configuration.

use std::time::Duration;

/// Configuration for the dispatcher and delivery service.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Upper bound on how long the dispatcher sleeps between due checks.
    pub poll_interval: Duration,
    /// Timeout applied to each individual delivery attempt.
    pub delivery_timeout: Duration,
    /// Attempts per delivery channel before the channel is marked failed.
    pub max_attempts: u32,
    /// Base backoff between attempts; doubles after each failure.
    pub retry_backoff: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            delivery_timeout: Duration::from_secs(30),
            max_attempts: 3,
            retry_backoff: Duration::from_secs(1),
        }
    }
}

impl SchedulerConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the per-attempt delivery timeout.
    pub fn with_delivery_timeout(mut self, timeout: Duration) -> Self {
        self.delivery_timeout = timeout;
        self
    }

    /// Set the attempts per delivery channel.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Set the base retry backoff.
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }
}
