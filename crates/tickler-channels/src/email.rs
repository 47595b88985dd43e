//! SMTP email channel.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tickler_core::{ChannelError, Mailer, OutgoingEmail};
use tracing::debug;

/// Connection settings for the SMTP relay.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    /// Relay hostname, e.g. `smtp.gmail.com`.
    pub host: String,
    /// Submission port (587 for STARTTLS).
    pub port: u16,
    /// Relay login.
    pub username: String,
    /// Relay password or app password.
    pub password: String,
    /// Sender address placed in the `From` header.
    pub from_address: String,
    /// Display name placed next to the sender address.
    pub from_name: String,
}

/// Transactional mailer over a STARTTLS SMTP relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Build a mailer from relay settings.
    pub fn new(config: SmtpConfig) -> Result<Self, ChannelError> {
        let address = config
            .from_address
            .parse()
            .map_err(|e| ChannelError::Transport(format!("invalid from address: {e}")))?;
        let from = Mailbox::new(Some(config.from_name), address);

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| ChannelError::Transport(e.to_string()))?
            .port(config.port)
            .credentials(Credentials::new(config.username, config.password))
            .build();

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, mail: &OutgoingEmail) -> Result<(), ChannelError> {
        let to: Mailbox = mail
            .recipient
            .parse()
            .map_err(|e| ChannelError::Transport(format!("invalid recipient address: {e}")))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(mail.html_body.clone())
            .map_err(|e| ChannelError::Transport(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| ChannelError::Transport(e.to_string()))?;

        debug!(recipient = %mail.recipient, subject = %mail.subject, "email sent");
        Ok(())
    }
}
