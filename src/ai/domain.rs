//! Progress record for AI-driven operations.

use crate::{error::ErrorKind, user::domain::UserId, workspace::domain::WorkspaceId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Highest progress value.
pub const PROGRESS_COMPLETE: u8 = 100;

/// Unique identifier for an AI task record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AiTaskId(Uuid);

impl AiTaskId {
    /// Creates a new random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AiTaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AiTaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Operation an AI task record tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AiTaskKind {
    /// Bulk assignment of unassigned `todo` tasks.
    AutoAssign,
}

impl AiTaskKind {
    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AutoAssign => "auto-assign",
        }
    }
}

/// Lifecycle state of an AI task record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AiTaskStatus {
    /// Recorded, not started.
    Pending,
    /// Running.
    InProgress,
    /// Finished with a result.
    Completed,
    /// Finished with an error.
    Failed,
    /// Stopped by an admin.
    Cancelled,
}

impl AiTaskStatus {
    /// Returns the stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns `true` once no further change is allowed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

impl fmt::Display for AiTaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by AI task transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AiTaskDomainError {
    /// The requested change is not allowed from the current status.
    #[error("AI task {ai_task_id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Record identifier.
        ai_task_id: AiTaskId,
        /// Current status.
        from: AiTaskStatus,
        /// Requested status.
        to: AiTaskStatus,
    },
    /// The operation cannot be cancelled.
    #[error("AI task {0} is not cancellable")]
    NotCancellable(AiTaskId),
}

impl AiTaskDomainError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidTransition { .. } | Self::NotCancellable(_) => ErrorKind::Validation,
        }
    }
}

/// Progress record for one AI-driven operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiTask {
    id: AiTaskId,
    workspace_id: WorkspaceId,
    kind: AiTaskKind,
    status: AiTaskStatus,
    progress: u8,
    result: Option<Value>,
    error: Option<String>,
    cancellable: bool,
    created_by: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AiTask {
    /// Records a pending operation.
    #[must_use]
    pub fn new(
        workspace_id: WorkspaceId,
        kind: AiTaskKind,
        created_by: UserId,
        cancellable: bool,
        clock: &impl Clock,
    ) -> Self {
        let now = clock.utc();
        Self {
            id: AiTaskId::new(),
            workspace_id,
            kind,
            status: AiTaskStatus::Pending,
            progress: 0,
            result: None,
            error: None,
            cancellable,
            created_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> AiTaskId {
        self.id
    }

    /// Returns the owning workspace.
    #[must_use]
    pub const fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the operation kind.
    #[must_use]
    pub const fn kind(&self) -> AiTaskKind {
        self.kind
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> AiTaskStatus {
        self.status
    }

    /// Returns progress in percent.
    #[must_use]
    pub const fn progress(&self) -> u8 {
        self.progress
    }

    /// Returns the result payload of a completed operation.
    #[must_use]
    pub const fn result(&self) -> Option<&Value> {
        self.result.as_ref()
    }

    /// Returns the error message of a failed operation.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns whether admins may cancel the operation.
    #[must_use]
    pub const fn is_cancellable(&self) -> bool {
        self.cancellable
    }

    /// Returns the user who started the operation.
    #[must_use]
    pub const fn created_by(&self) -> &UserId {
        &self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves a pending record to `in-progress`.
    ///
    /// # Errors
    ///
    /// Returns [`AiTaskDomainError::InvalidTransition`] unless pending.
    pub fn start(&mut self, clock: &impl Clock) -> Result<(), AiTaskDomainError> {
        self.require(AiTaskStatus::Pending, AiTaskStatus::InProgress)?;
        self.status = AiTaskStatus::InProgress;
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Raises progress to `percent`, clamped to 100. Lower values are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AiTaskDomainError::InvalidTransition`] unless in progress.
    pub fn report_progress(
        &mut self,
        percent: u8,
        clock: &impl Clock,
    ) -> Result<(), AiTaskDomainError> {
        self.require(AiTaskStatus::InProgress, AiTaskStatus::InProgress)?;
        self.progress = self.progress.max(percent.min(PROGRESS_COMPLETE));
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Finishes the operation with a result.
    ///
    /// # Errors
    ///
    /// Returns [`AiTaskDomainError::InvalidTransition`] unless in progress.
    pub fn complete(
        &mut self,
        result: Value,
        clock: &impl Clock,
    ) -> Result<(), AiTaskDomainError> {
        self.require(AiTaskStatus::InProgress, AiTaskStatus::Completed)?;
        self.status = AiTaskStatus::Completed;
        self.progress = PROGRESS_COMPLETE;
        self.result = Some(result);
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Finishes the operation with an error message.
    ///
    /// # Errors
    ///
    /// Returns [`AiTaskDomainError::InvalidTransition`] unless in progress.
    pub fn fail(
        &mut self,
        error: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), AiTaskDomainError> {
        self.require(AiTaskStatus::InProgress, AiTaskStatus::Failed)?;
        self.status = AiTaskStatus::Failed;
        self.error = Some(error.into());
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Stops a pending or running operation.
    ///
    /// # Errors
    ///
    /// Returns [`AiTaskDomainError::NotCancellable`] for non-cancellable
    /// operations and [`AiTaskDomainError::InvalidTransition`] once terminal.
    pub fn cancel(&mut self, clock: &impl Clock) -> Result<(), AiTaskDomainError> {
        if !self.cancellable {
            return Err(AiTaskDomainError::NotCancellable(self.id));
        }
        if self.status.is_terminal() {
            return Err(self.invalid(AiTaskStatus::Cancelled));
        }
        self.status = AiTaskStatus::Cancelled;
        self.updated_at = clock.utc();
        Ok(())
    }

    fn require(&self, current: AiTaskStatus, to: AiTaskStatus) -> Result<(), AiTaskDomainError> {
        if self.status == current {
            Ok(())
        } else {
            Err(self.invalid(to))
        }
    }

    const fn invalid(&self, to: AiTaskStatus) -> AiTaskDomainError {
        AiTaskDomainError::InvalidTransition {
            ai_task_id: self.id,
            from: self.status,
            to,
        }
    }
}
