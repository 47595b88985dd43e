pub mod channel;

pub use channel::{Mailer, Notification, Notifier, OutgoingEmail};
