//! SMTP reminder delivery through `lettre`.

use async_trait::async_trait;
use lettre::{
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use crate::{
    config::NotificationConfig,
    workflow::ports::{MailerError, MailerResult, ReminderEmail, ReminderMailer},
};

/// Reminder mailer that submits through a STARTTLS relay.
#[derive(Clone)]
pub struct SmtpReminderMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpReminderMailer {
    /// Builds a mailer from the notification settings.
    ///
    /// # Errors
    ///
    /// Returns [`MailerError::NotConfigured`] without an SMTP section,
    /// [`MailerError::InvalidAddress`] for a malformed sender, or
    /// [`MailerError::Transport`] when the relay cannot be set up.
    pub fn from_config(config: &NotificationConfig) -> MailerResult<Self> {
        let smtp = config.smtp.as_ref().ok_or(MailerError::NotConfigured)?;
        let from = config
            .from_address
            .parse::<Mailbox>()
            .map_err(|_| MailerError::InvalidAddress(config.from_address.clone()))?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)
            .map_err(MailerError::transport)?
            .port(smtp.port)
            .credentials(Credentials::new(
                smtp.username.clone(),
                smtp.password.clone(),
            ))
            .build();
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl ReminderMailer for SmtpReminderMailer {
    async fn send_reminder(&self, email: &ReminderEmail) -> MailerResult<()> {
        let address = email
            .to
            .parse::<Address>()
            .map_err(|_| MailerError::InvalidAddress(email.to.clone()))?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(Mailbox::new(Some(email.recipient_name.clone()), address))
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())
            .map_err(MailerError::transport)?;
        self.transport
            .send(message)
            .await
            .map_err(MailerError::transport)?;
        tracing::debug!(recipient = %email.to, "reminder email submitted");
        Ok(())
    }
}
