//! Reminder email rendering.

use crate::{
    config::NotificationConfig,
    error::ErrorKind,
    task::domain::Task,
    workflow::ports::ReminderEmail,
};
use minijinja::Environment;
use serde_json::json;
use thiserror::Error;

const SUBJECT_TEMPLATE: &str = "Reminder: {{ title }}";

const BODY_TEMPLATE: &str = "\
Hi {{ recipient }},

The \"{{ workflow }}\" workflow is reminding you about a task assigned to you.

Task: {{ title }}
Priority: {{ priority }}
{%- if due_date %}
Due: {{ due_date }}
{%- endif %}

Open the task: {{ link }}
";

/// Errors raised while rendering reminders.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReminderError {
    /// A template failed to render.
    #[error("failed to render reminder {part}: {reason}")]
    Template {
        /// Which template failed (`subject` or `body`).
        part: &'static str,
        /// Renderer message.
        reason: String,
    },
}

impl ReminderError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Template { .. } => ErrorKind::Validation,
        }
    }
}

/// Renders task reminders with links back into the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderRenderer {
    app_base_url: String,
}

impl ReminderRenderer {
    /// Creates a renderer linking to `app_base_url`.
    #[must_use]
    pub fn new(app_base_url: impl Into<String>) -> Self {
        let raw: String = app_base_url.into();
        Self {
            app_base_url: raw.trim_end_matches('/').to_owned(),
        }
    }

    /// Creates a renderer from the notification settings.
    #[must_use]
    pub fn from_config(config: &NotificationConfig) -> Self {
        Self::new(config.app_base_url.as_str())
    }

    /// Returns the application link for a task.
    #[must_use]
    pub fn task_link(&self, task: &Task) -> String {
        format!("{}/tasks/{}", self.app_base_url, task.id())
    }

    /// Renders a reminder about `task` for one recipient.
    ///
    /// # Errors
    ///
    /// Returns [`ReminderError::Template`] when rendering fails.
    pub fn render(
        &self,
        task: &Task,
        workflow_name: &str,
        to: &str,
        recipient_name: &str,
    ) -> Result<ReminderEmail, ReminderError> {
        let environment = Environment::new();
        let context = json!({
            "recipient": recipient_name,
            "workflow": workflow_name,
            "title": task.title(),
            "priority": task.priority().as_str(),
            "due_date": task.due_date().map(|due| due.format("%Y-%m-%d").to_string()),
            "link": self.task_link(task),
        });
        let subject = environment
            .render_str(SUBJECT_TEMPLATE, &context)
            .map_err(|error| ReminderError::Template {
                part: "subject",
                reason: error.to_string(),
            })?;
        let body = environment
            .render_str(BODY_TEMPLATE, &context)
            .map_err(|error| ReminderError::Template {
                part: "body",
                reason: error.to_string(),
            })?;
        Ok(ReminderEmail {
            to: to.to_owned(),
            recipient_name: recipient_name.to_owned(),
            subject,
            body,
        })
    }
}
