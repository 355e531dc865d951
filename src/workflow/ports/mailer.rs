//! Outbound reminder email port.

use crate::error::ErrorKind;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for mailer operations.
pub type MailerResult<T> = Result<T, MailerError>;

/// Rendered reminder ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderEmail {
    /// Recipient address.
    pub to: String,
    /// Recipient display name.
    pub recipient_name: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Delivery contract for reminder emails. One attempt, no retry.
#[async_trait]
pub trait ReminderMailer: Send + Sync {
    /// Sends a single reminder.
    async fn send_reminder(&self, email: &ReminderEmail) -> MailerResult<()>;
}

/// Errors returned by mailer adapters.
#[derive(Debug, Clone, Error)]
pub enum MailerError {
    /// No relay is configured.
    #[error("email delivery is not configured")]
    NotConfigured,

    /// An address could not be parsed.
    #[error("invalid email address '{0}'")]
    InvalidAddress(String),

    /// The relay rejected or failed the delivery.
    #[error("email transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl MailerError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotConfigured | Self::InvalidAddress(_) => ErrorKind::Validation,
            Self::Transport(_) => ErrorKind::Unavailable,
        }
    }
}
