//! Service layer for workspace creation and membership management.

use crate::{
    error::ErrorKind,
    user::domain::UserId,
    workspace::{
        domain::{InviteCode, Role, Workspace, WorkspaceDomainError, WorkspaceId},
        ports::{WorkspaceRepository, WorkspaceRepositoryError},
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Number of invite codes tried before workspace creation gives up.
const MAX_INVITE_CODE_ATTEMPTS: usize = 8;

/// Service-level errors for workspace operations.
#[derive(Debug, Error)]
pub enum WorkspaceServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] WorkspaceDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] WorkspaceRepositoryError),
    /// No workspace exists with the given identifier.
    #[error("workspace {0} not found")]
    NotFound(WorkspaceId),
    /// No workspace uses the given invite code.
    #[error("no workspace uses invite code {0}")]
    UnknownInviteCode(InviteCode),
    /// Every generated invite code collided with an existing one.
    #[error("could not allocate a unique invite code")]
    InviteCodesExhausted,
}

impl WorkspaceServiceError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Repository(err) => err.kind(),
            Self::NotFound(_) | Self::UnknownInviteCode(_) => ErrorKind::NotFound,
            Self::InviteCodesExhausted => ErrorKind::Conflict,
        }
    }
}

/// Result type for workspace service operations.
pub type WorkspaceServiceResult<T> = Result<T, WorkspaceServiceError>;

/// Workspace membership orchestration service.
#[derive(Clone)]
pub struct WorkspaceService<C>
where
    C: Clock + Send + Sync,
{
    workspaces: Arc<dyn WorkspaceRepository>,
    clock: Arc<C>,
}

impl<C> WorkspaceService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a new workspace service.
    #[must_use]
    pub fn new(workspaces: Arc<dyn WorkspaceRepository>, clock: Arc<C>) -> Self {
        Self { workspaces, clock }
    }

    /// Creates a workspace owned by `owner` with a globally unique invite
    /// code.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::InviteCodesExhausted`] when no unique
    /// code could be allocated, domain errors for an invalid name, or
    /// persistence errors.
    pub async fn create(
        &self,
        name: impl Into<String>,
        owner: UserId,
    ) -> WorkspaceServiceResult<Workspace> {
        let workspace_name: String = name.into();
        for _ in 0..MAX_INVITE_CODE_ATTEMPTS {
            let code = InviteCode::generate(&mut rand::thread_rng());
            if self.workspaces.find_by_invite_code(&code).await?.is_some() {
                continue;
            }

            let workspace =
                Workspace::new(workspace_name.as_str(), owner.clone(), code, &*self.clock)?;
            match self.workspaces.store(&workspace).await {
                Ok(()) => return Ok(workspace),
                Err(WorkspaceRepositoryError::DuplicateInviteCode(_)) => {}
                Err(err) => return Err(err.into()),
            }
        }
        Err(WorkspaceServiceError::InviteCodesExhausted)
    }

    /// Finds a workspace by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::NotFound`] when the workspace does not
    /// exist, or persistence errors.
    pub async fn find(&self, workspace_id: WorkspaceId) -> WorkspaceServiceResult<Workspace> {
        self.workspaces
            .find_by_id(workspace_id)
            .await?
            .ok_or(WorkspaceServiceError::NotFound(workspace_id))
    }

    /// Joins the workspace that owns `code` as a regular member.
    ///
    /// # Errors
    ///
    /// Returns domain errors for malformed codes or existing membership,
    /// [`WorkspaceServiceError::UnknownInviteCode`], or persistence errors.
    pub async fn join_by_code(
        &self,
        code: &str,
        user: UserId,
    ) -> WorkspaceServiceResult<Workspace> {
        let invite_code = InviteCode::new(code)?;
        let mut workspace = self
            .workspaces
            .find_by_invite_code(&invite_code)
            .await?
            .ok_or(WorkspaceServiceError::UnknownInviteCode(invite_code))?;
        workspace.add_member(user, &*self.clock)?;
        self.workspaces.update(&workspace).await?;
        Ok(workspace)
    }

    /// Returns the role `user` holds in the workspace, or `None`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::NotFound`] when the workspace does not
    /// exist, or persistence errors.
    pub async fn role_of(
        &self,
        workspace_id: WorkspaceId,
        user: &UserId,
    ) -> WorkspaceServiceResult<Option<Role>> {
        Ok(self.find(workspace_id).await?.role_of(user))
    }

    /// Changes a member's role on behalf of the owner.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::NotFound`], domain authorisation
    /// errors, or persistence errors.
    pub async fn change_role(
        &self,
        workspace_id: WorkspaceId,
        acting: &UserId,
        target: &UserId,
        role: Role,
    ) -> WorkspaceServiceResult<Workspace> {
        let mut workspace = self.find(workspace_id).await?;
        workspace.change_role(acting, target, role, &*self.clock)?;
        self.workspaces.update(&workspace).await?;
        Ok(workspace)
    }

    /// Removes a member on behalf of an admin or the owner.
    ///
    /// # Errors
    ///
    /// Returns [`WorkspaceServiceError::NotFound`], domain authorisation
    /// errors, or persistence errors.
    pub async fn remove_member(
        &self,
        workspace_id: WorkspaceId,
        acting: &UserId,
        target: &UserId,
    ) -> WorkspaceServiceResult<Workspace> {
        let mut workspace = self.find(workspace_id).await?;
        workspace.remove_member(acting, target, &*self.clock)?;
        self.workspaces.update(&workspace).await?;
        Ok(workspace)
    }
}
