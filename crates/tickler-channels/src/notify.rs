//! Tracing-backed notification channel.

use async_trait::async_trait;
use tickler_core::{ChannelError, Notification, Notifier};
use tracing::info;

/// Notifier that surfaces notifications through the tracing log.
///
/// Used headless and in examples, where no OS notification surface exists.
/// [`LogNotifier::disabled`] models a denied notification capability: it
/// reports the surface as unavailable without failing.
#[derive(Debug, Clone)]
pub struct LogNotifier {
    enabled: bool,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    /// A notifier whose surface is unavailable (`present` returns `Ok(false)`).
    pub fn disabled() -> Self {
        Self { enabled: false }
    }
}

impl Default for LogNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn present(&self, note: &Notification) -> Result<bool, ChannelError> {
        if !self.enabled {
            return Ok(false);
        }
        info!(title = %note.title, "{}", note.body);
        Ok(true)
    }
}
