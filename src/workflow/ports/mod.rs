//! Port contracts for workflow persistence and outbound side effects.

pub mod mailer;
pub mod repository;
pub mod webhook;

pub use mailer::{MailerError, MailerResult, ReminderEmail, ReminderMailer};
pub use repository::{WorkflowRepository, WorkflowRepositoryError, WorkflowRepositoryResult};
pub use webhook::{WebhookClient, WebhookError, WebhookRequest, WebhookResponse, WebhookResult};
