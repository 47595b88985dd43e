//! Delivery channel seams.
//!
//! A fired event produces side effects through two independent channels: a
//! local notification surface and transactional email. Both are collaborator
//! provided; the engine only sees these traits.

use crate::error::ChannelError;
use async_trait::async_trait;

/// A rendered local notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

/// A rendered transactional email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub recipient: String,
    pub subject: String,
    pub html_body: String,
}

/// The local notification surface.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Present a notification.
    ///
    /// `Ok(false)` means the capability is unavailable (e.g. permission
    /// denied); the caller treats that as a skip, not a failure, and other
    /// channels are still attempted.
    async fn present(&self, note: &Notification) -> Result<bool, ChannelError>;
}

/// The transactional email surface.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send one email; errors are per-attempt and may be retried.
    async fn send(&self, mail: &OutgoingEmail) -> Result<(), ChannelError>;
}
