//! Tickler Channels: side-effect implementations for fired events
//!
//! Two channels exist per the delivery contract: a local notification
//! surface and transactional email. This crate provides an SMTP mailer
//! built on lettre (STARTTLS relay with credentials) and a tracing-backed
//! notifier for headless deployments, both implementing the traits from
//! `tickler-core`.

pub mod email;
pub mod notify;

pub use email::{SmtpConfig, SmtpMailer};
pub use notify::LogNotifier;
