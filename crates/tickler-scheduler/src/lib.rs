//! Tickler Scheduler
//!
//! The dispatch half of the Tickler reminder engine: accepts "fire event E
//! with payload P at time T" requests, queues them durably, and executes
//! each exactly once when T arrives.
//!
//! # Architecture
//!
//! 1. **Scheduling**: a task request is validated and unfolded into one
//!    confirmation event (due immediately), one event per reminder and one
//!    deadline event, all inserted into the durable queue.
//! 2. **Dispatch loop**: sleeps until the soonest pending instant or until
//!    a new insert wakes it, claims everything due, and spawns one delivery
//!    per event.
//! 3. **Delivery**: each event fans out to two independent channels
//!    (local notification and email) with bounded retries and per-attempt
//!    timeouts; per-channel outcomes are recorded on the event.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tickler_channels::LogNotifier;
//! use tickler_scheduler::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let queue = Arc::new(EventQueue::open("./data/queue.db")?);
//!
//!     let scheduler = Scheduler::builder(queue)
//!         .with_notifier(LogNotifier::new())
//!         .with_mailer(my_mailer)
//!         .build()?;
//!
//!     scheduler.schedule_task(
//!         TaskRequest::builder("Submit report")
//!             .deadline("2025-03-10", "17:00")?
//!             .reminder(None, "16:50")?
//!             .recipient("user@example.com")
//!             .build()?,
//!     )?;
//!
//!     scheduler.run().await
//! }
//! ```

pub mod config;
pub mod delivery;
pub mod dispatch;
pub mod error;
pub mod scheduler;

mod message;

pub mod prelude;

// Re-export main types
pub use config::SchedulerConfig;
pub use delivery::{ChannelStatus, DeliveryReport, DeliveryService};
pub use dispatch::Dispatcher;
pub use error::{Result, SchedulerError};
pub use scheduler::{Scheduler, SchedulerBuilder, TaskRequest, TaskRequestBuilder};
