//! Execution context and result shape for workflow actions.

use crate::{
    project::domain::ProjectId, task::domain::TaskId, user::domain::UserId,
    workspace::domain::WorkspaceId,
};
use serde::{Deserialize, Serialize};

/// Data available to an action when a workflow runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionContext {
    /// Workspace the workflow runs in.
    pub workspace_id: WorkspaceId,
    /// Member whose action raised the event, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggered_by: Option<UserId>,
    /// Task the event concerns, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<TaskId>,
    /// Project the event concerns, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
}

impl ExecutionContext {
    /// Creates a context for a workspace with no task or project.
    #[must_use]
    pub const fn new(workspace_id: WorkspaceId) -> Self {
        Self {
            workspace_id,
            triggered_by: None,
            task_id: None,
            project_id: None,
        }
    }

    /// Sets the member who raised the event.
    #[must_use]
    pub fn triggered_by(mut self, user_id: UserId) -> Self {
        self.triggered_by = Some(user_id);
        self
    }

    /// Sets the task the event concerns.
    #[must_use]
    pub const fn with_task(mut self, task_id: TaskId) -> Self {
        self.task_id = Some(task_id);
        self
    }

    /// Sets the project the event concerns.
    #[must_use]
    pub const fn with_project(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }
}

/// Uniform result of one action dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    /// Whether the side effect happened.
    pub success: bool,
    /// Human-readable summary or failure reason.
    pub message: String,
}

impl ExecutionOutcome {
    /// Creates a successful outcome.
    #[must_use]
    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// Creates a handled failure.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
