use thiserror::Error;

/// Validation failures raised while building or scheduling a task.
///
/// These are user-correctable: the caller reports them inline and nothing
/// is created. See [`crate::timeval`] for the parsing and lead-time rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The date or time string does not match the accepted format
    /// (`YYYY-MM-DD` / `HH:MM`) or names an impossible instant.
    #[error("invalid date/time: {0}")]
    InvalidFormat(String),

    /// The reminder is at or after the deadline.
    #[error("reminder must be before the deadline")]
    TooLate,

    /// The reminder is closer to the deadline than the minimum lead.
    #[error("reminder must be at least {} minutes before the deadline", crate::timeval::MIN_LEAD_MINUTES)]
    TooClose,

    /// More reminders than a task allows.
    #[error("a task may have at most {max} reminders, got {got}", max = crate::types::MAX_REMINDERS, got = .0)]
    TooManyReminders(usize),

    /// A required field was left empty.
    #[error("{0} must not be empty")]
    MissingField(&'static str),
}

/// Failures raised by a delivery channel at fire time.
///
/// Recorded on the event that was being delivered; never fatal to the
/// dispatcher loop.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The underlying transport (notification surface, SMTP relay) failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// A single delivery attempt exceeded the configured timeout.
    #[error("delivery attempt timed out after {0}s")]
    Timeout(u64),
}
