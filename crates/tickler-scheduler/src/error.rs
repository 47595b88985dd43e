//! Error types for the scheduler.

use thiserror::Error;

/// Result type for scheduler operations.
pub type Result<T> = std::result::Result<T, SchedulerError>;

/// Errors that can occur while scheduling or dispatching.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Event store error.
    #[error("store error: {0}")]
    Store(#[from] tickler_store::StoreError),

    /// Task or reminder validation error.
    #[error("validation error: {0}")]
    Validation(#[from] tickler_core::ValidationError),

    /// Invalid engine configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}
