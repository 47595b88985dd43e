//! Tickler Store: the durable pending-event queue
//!
//! A priority store of scheduled events ordered by fire instant (ties broken
//! by insertion order), backed by SQLite so pending work survives process
//! restart. On restart, events whose fire instant is already in the past are
//! simply due; they are never dropped.
//!
//! All mutations go through a single `Mutex<Connection>`, so insert,
//! `due_before` and cancel are mutually exclusive with each other; event
//! volume is low enough that finer-grained locking buys nothing.

pub mod error;
pub mod queue;

mod schema;

pub use error::{Result, StoreError};
pub use queue::{EventQueue, StoredEvent};
