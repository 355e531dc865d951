//! Workflow actions.

use super::ParseHttpMethodError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

const SEND_EMAIL: &str = "send-email";
const SEND_SLACK: &str = "send-slack";
const ASSIGN_TASK: &str = "assign-task";
const CREATE_TASK: &str = "create-task";
const WEBHOOK: &str = "webhook";

/// Side effect a workflow performs once triggered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionType {
    /// Reminder email to the task assignee, or a member count broadcast.
    SendEmail,
    /// Slack message. Not implemented.
    SendSlack,
    /// Least-busy assignment of the triggering task.
    AssignTask,
    /// New task in the workspace's first project.
    CreateTask,
    /// Outbound HTTP call.
    Webhook,
    /// A stored type this engine does not recognise.
    Unknown(String),
}

impl ActionType {
    /// Returns the stored string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::SendEmail => SEND_EMAIL,
            Self::SendSlack => SEND_SLACK,
            Self::AssignTask => ASSIGN_TASK,
            Self::CreateTask => CREATE_TASK,
            Self::Webhook => WEBHOOK,
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<String> for ActionType {
    fn from(value: String) -> Self {
        match value.as_str() {
            SEND_EMAIL => Self::SendEmail,
            SEND_SLACK => Self::SendSlack,
            ASSIGN_TASK => Self::AssignTask,
            CREATE_TASK => Self::CreateTask,
            WEBHOOK => Self::Webhook,
            _ => Self::Unknown(value),
        }
    }
}

impl From<ActionType> for String {
    fn from(value: ActionType) -> Self {
        match value {
            ActionType::Unknown(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Action settings. Keys other than the webhook fields are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionConfig {
    /// Target URL for webhook actions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    /// HTTP method for webhook actions; POST when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_method: Option<String>,
    /// Remaining settings.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Configured workflow action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Action kind.
    #[serde(rename = "type")]
    pub action_type: ActionType,
    /// Kind-specific settings.
    #[serde(default)]
    pub config: ActionConfig,
}

impl Action {
    /// Creates an action with empty settings.
    #[must_use]
    pub fn new(action_type: ActionType) -> Self {
        Self {
            action_type,
            config: ActionConfig::default(),
        }
    }

    /// Creates a webhook action.
    #[must_use]
    pub fn webhook(url: impl Into<String>, method: Option<HttpMethod>) -> Self {
        Self {
            action_type: ActionType::Webhook,
            config: ActionConfig {
                webhook_url: Some(url.into()),
                webhook_method: method.map(|value| value.as_str().to_owned()),
                extra: Map::new(),
            },
        }
    }
}

/// HTTP method used for webhook calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// `GET`, sent without a body.
    Get,
    /// `POST`.
    #[default]
    Post,
    /// `PUT`.
    Put,
    /// `PATCH`.
    Patch,
    /// `DELETE`.
    Delete,
}

impl HttpMethod {
    /// Returns the canonical method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Returns `true` when requests carry a JSON body.
    #[must_use]
    pub const fn has_body(self) -> bool {
        !matches!(self, Self::Get)
    }
}

impl TryFrom<&str> for HttpMethod {
    type Error = ParseHttpMethodError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "PATCH" => Ok(Self::Patch),
            "DELETE" => Ok(Self::Delete),
            _ => Err(ParseHttpMethodError(value.to_owned())),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
