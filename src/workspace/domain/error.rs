//! Error types for workspace domain validation.

use super::{Role, WorkspaceId};
use crate::{error::ErrorKind, user::domain::UserId};
use thiserror::Error;

/// Errors returned by workspace domain operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkspaceDomainError {
    /// The workspace name is empty after trimming.
    #[error("workspace name must not be empty")]
    EmptyName,

    /// The invite code is not six alphanumeric characters.
    #[error("invalid invite code '{0}', expected 6 alphanumeric characters")]
    InvalidInviteCode(String),

    /// The user already belongs to the workspace.
    #[error("user {user_id} is already a member of workspace {workspace_id}")]
    AlreadyMember {
        /// Workspace identifier.
        workspace_id: WorkspaceId,
        /// User identifier.
        user_id: UserId,
    },

    /// The acting user does not belong to the workspace.
    #[error("user {user_id} is not a member of workspace {workspace_id}")]
    NotAMember {
        /// Workspace identifier.
        workspace_id: WorkspaceId,
        /// User identifier.
        user_id: UserId,
    },

    /// The acting user holds a role below the one required.
    #[error("user {user_id} needs the {required} role in workspace {workspace_id}")]
    InsufficientRole {
        /// Workspace identifier.
        workspace_id: WorkspaceId,
        /// User identifier.
        user_id: UserId,
        /// Minimum role required by the operation.
        required: Role,
    },

    /// Ownership can neither be granted, revoked nor removed.
    #[error("the owner of workspace {0} cannot be reassigned or removed")]
    OwnerImmutable(WorkspaceId),

    /// The target member does not exist in the workspace.
    #[error("user {user_id} is not a member of workspace {workspace_id}")]
    MemberNotFound {
        /// Workspace identifier.
        workspace_id: WorkspaceId,
        /// User identifier.
        user_id: UserId,
    },
}

impl WorkspaceDomainError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyName | Self::InvalidInviteCode(_) => ErrorKind::Validation,
            Self::AlreadyMember { .. } => ErrorKind::Conflict,
            Self::NotAMember { .. } | Self::InsufficientRole { .. } | Self::OwnerImmutable(_) => {
                ErrorKind::Forbidden
            }
            Self::MemberNotFound { .. } => ErrorKind::NotFound,
        }
    }
}

/// Error returned while parsing member roles from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown member role: {0}")]
pub struct ParseRoleError(pub String);
