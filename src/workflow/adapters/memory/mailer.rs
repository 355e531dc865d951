//! Mailer that records reminders instead of delivering them.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::workflow::ports::{MailerError, MailerResult, ReminderEmail, ReminderMailer};

/// Reminder mailer that keeps every sent email in memory.
///
/// Clones share the same outbox.
#[derive(Debug, Clone, Default)]
pub struct RecordingMailer {
    outbox: Arc<RwLock<Vec<ReminderEmail>>>,
}

impl RecordingMailer {
    /// Creates a mailer with an empty outbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the emails sent so far, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`MailerError::Transport`] when the outbox lock is poisoned.
    pub fn sent(&self) -> MailerResult<Vec<ReminderEmail>> {
        let outbox = self
            .outbox
            .read()
            .map_err(|err| MailerError::transport(std::io::Error::other(err.to_string())))?;
        Ok(outbox.clone())
    }
}

#[async_trait]
impl ReminderMailer for RecordingMailer {
    async fn send_reminder(&self, email: &ReminderEmail) -> MailerResult<()> {
        let mut outbox = self
            .outbox
            .write()
            .map_err(|err| MailerError::transport(std::io::Error::other(err.to_string())))?;
        outbox.push(email.clone());
        Ok(())
    }
}
