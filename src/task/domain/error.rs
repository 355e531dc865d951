//! Error types for task domain validation, authorisation and parsing.

use super::{TaskId, TaskStatus};
use crate::{error::ErrorKind, user::domain::UserId};
use thiserror::Error;

/// Errors returned by task domain operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The remark message is empty after trimming.
    #[error("remark message must not be empty")]
    EmptyRemark,

    /// The requested status change is not part of the lifecycle.
    #[error("task {task_id} cannot move from {from} to {to}")]
    InvalidTransition {
        /// Task identifier.
        task_id: TaskId,
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },

    /// The acting user is not a member of the task's workspace.
    #[error("user {user_id} is not a member of the workspace owning task {task_id}")]
    NotAMember {
        /// Task identifier.
        task_id: TaskId,
        /// Acting user.
        user_id: UserId,
    },

    /// Only the claimant may mark the task complete.
    #[error("user {user_id} does not hold the claim on task {task_id}")]
    NotClaimant {
        /// Task identifier.
        task_id: TaskId,
        /// Acting user.
        user_id: UserId,
    },

    /// The operation requires a workspace admin or owner.
    #[error("user {user_id} must be a workspace admin to change task {task_id}")]
    AdminRequired {
        /// Task identifier.
        task_id: TaskId,
        /// Acting user.
        user_id: UserId,
    },

    /// Another member holds the claim on the task.
    #[error("task {task_id} is claimed by {claimed_by}")]
    ClaimedByOther {
        /// Task identifier.
        task_id: TaskId,
        /// Current claimant.
        claimed_by: UserId,
    },

    /// Only the creator or an admin may delete the task.
    #[error("user {user_id} may not delete task {task_id}")]
    DeleteNotAllowed {
        /// Task identifier.
        task_id: TaskId,
        /// Acting user.
        user_id: UserId,
    },
}

impl TaskDomainError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyTitle | Self::EmptyRemark | Self::InvalidTransition { .. } => {
                ErrorKind::Validation
            }
            Self::NotAMember { .. }
            | Self::NotClaimant { .. }
            | Self::AdminRequired { .. }
            | Self::ClaimedByOther { .. }
            | Self::DeleteNotAllowed { .. } => ErrorKind::Forbidden,
        }
    }
}

/// Error returned while parsing task statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priorities.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParsePriorityError(pub String);

/// Error returned while parsing an attributed actor.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid actor: '{0}'")]
pub struct ParseActorError(pub String);
