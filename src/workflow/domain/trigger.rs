//! Workflow triggers and the events that fire them.

use super::{ParseWorkflowEventError, Workflow};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

const SCHEDULE: &str = "schedule";
const TASK_EVENT: &str = "task-event";
const TEAM_EVENT: &str = "team-event";
const COMMENT_ADDED: &str = "comment-added";

/// Trigger family of a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TriggerType {
    /// Time-based trigger, fired by an external scheduler.
    Schedule,
    /// Task lifecycle events.
    TaskEvent,
    /// Team membership events.
    TeamEvent,
    /// A comment was added.
    CommentAdded,
    /// A stored type this engine does not recognise.
    Unknown(String),
}

impl TriggerType {
    /// Returns the stored string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Schedule => SCHEDULE,
            Self::TaskEvent => TASK_EVENT,
            Self::TeamEvent => TEAM_EVENT,
            Self::CommentAdded => COMMENT_ADDED,
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<String> for TriggerType {
    fn from(value: String) -> Self {
        match value.as_str() {
            SCHEDULE => Self::Schedule,
            TASK_EVENT => Self::TaskEvent,
            TEAM_EVENT => Self::TeamEvent,
            COMMENT_ADDED => Self::CommentAdded,
            _ => Self::Unknown(value),
        }
    }
}

impl From<TriggerType> for String {
    fn from(value: TriggerType) -> Self {
        match value {
            TriggerType::Unknown(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trigger settings. Keys other than `taskStatus` are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerConfig {
    /// Task sub-kind (`created`, `completed`, `overdue`) for task-event
    /// triggers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_status: Option<String>,
    /// Remaining settings.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Condition that must match an event for a workflow to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    /// Trigger family.
    #[serde(rename = "type")]
    pub trigger_type: TriggerType,
    /// Family-specific settings.
    #[serde(default)]
    pub config: TriggerConfig,
}

impl Trigger {
    /// Creates a trigger with empty settings.
    #[must_use]
    pub fn new(trigger_type: TriggerType) -> Self {
        Self {
            trigger_type,
            config: TriggerConfig::default(),
        }
    }

    /// Creates a task-event trigger for the given sub-kind.
    #[must_use]
    pub fn task_event(task_status: impl Into<String>) -> Self {
        Self {
            trigger_type: TriggerType::TaskEvent,
            config: TriggerConfig {
                task_status: Some(task_status.into()),
                extra: Map::new(),
            },
        }
    }

    /// Returns `true` when `event` belongs to this trigger's family and
    /// sub-kind.
    #[must_use]
    pub fn matches(&self, event: WorkflowEvent) -> bool {
        self.trigger_type == event.family()
            && self.config.task_status.as_deref() == Some(event.sub_kind())
    }
}

/// Event raised by the task lifecycle that may fire workflows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowEvent {
    /// A task was created.
    TaskCreated,
    /// A task was completed.
    TaskCompleted,
    /// An open task passed its due date.
    TaskOverdue,
}

impl WorkflowEvent {
    /// Returns the event name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TaskCreated => "task-created",
            Self::TaskCompleted => "task-completed",
            Self::TaskOverdue => "task-overdue",
        }
    }

    /// Returns the trigger family that handles this event.
    #[must_use]
    pub const fn family(self) -> TriggerType {
        match self {
            Self::TaskCreated | Self::TaskCompleted | Self::TaskOverdue => TriggerType::TaskEvent,
        }
    }

    /// Returns the sub-kind compared against `trigger.config.taskStatus`.
    #[must_use]
    pub const fn sub_kind(self) -> &'static str {
        match self {
            Self::TaskCreated => "created",
            Self::TaskCompleted => "completed",
            Self::TaskOverdue => "overdue",
        }
    }
}

impl TryFrom<&str> for WorkflowEvent {
    type Error = ParseWorkflowEventError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "task-created" => Ok(Self::TaskCreated),
            "task-completed" => Ok(Self::TaskCompleted),
            "task-overdue" => Ok(Self::TaskOverdue),
            other => Err(ParseWorkflowEventError(other.to_owned())),
        }
    }
}

impl fmt::Display for WorkflowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns `true` when `workflow` should run for the named event.
///
/// Unknown event names never match.
#[must_use]
pub fn matches(workflow: &Workflow, event_type: &str) -> bool {
    WorkflowEvent::try_from(event_type).is_ok_and(|event| workflow.trigger().matches(event))
}
