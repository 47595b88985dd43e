use thiserror::Error;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in the event store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Database error.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An event with this id already exists.
    ///
    /// Ids are generated v4 uuids, so hitting this indicates a programming
    /// error rather than user input.
    #[error("duplicate event: {0}")]
    DuplicateEvent(String),

    /// A persisted row could not be decoded back into an event.
    #[error("corrupt event row: {0}")]
    EventDecode(String),
}
