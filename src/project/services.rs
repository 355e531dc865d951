//! Service layer for project creation and listing.

use crate::{
    error::ErrorKind,
    project::{
        domain::{Project, ProjectDomainError},
        ports::{ProjectRepository, ProjectRepositoryError},
    },
    user::domain::UserId,
    workspace::{
        domain::{WorkspaceDomainError, WorkspaceId},
        ports::{WorkspaceRepository, WorkspaceRepositoryError},
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for project operations.
#[derive(Debug, Error)]
pub enum ProjectServiceError {
    /// Project validation failed.
    #[error(transparent)]
    Domain(#[from] ProjectDomainError),
    /// Workspace authorisation failed.
    #[error(transparent)]
    Workspace(#[from] WorkspaceDomainError),
    /// Project repository operation failed.
    #[error(transparent)]
    Repository(#[from] ProjectRepositoryError),
    /// Workspace repository operation failed.
    #[error(transparent)]
    WorkspaceRepository(#[from] WorkspaceRepositoryError),
    /// No workspace exists with the given identifier.
    #[error("workspace {0} not found")]
    WorkspaceNotFound(WorkspaceId),
}

impl ProjectServiceError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Workspace(err) => err.kind(),
            Self::Repository(err) => err.kind(),
            Self::WorkspaceRepository(err) => err.kind(),
            Self::WorkspaceNotFound(_) => ErrorKind::NotFound,
        }
    }
}

/// Result type for project service operations.
pub type ProjectServiceResult<T> = Result<T, ProjectServiceError>;

/// Project orchestration service.
#[derive(Clone)]
pub struct ProjectService<C>
where
    C: Clock + Send + Sync,
{
    projects: Arc<dyn ProjectRepository>,
    workspaces: Arc<dyn WorkspaceRepository>,
    clock: Arc<C>,
}

impl<C> ProjectService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a new project service.
    #[must_use]
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        workspaces: Arc<dyn WorkspaceRepository>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            projects,
            workspaces,
            clock,
        }
    }

    /// Creates a project in a workspace on behalf of an admin or the owner.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectServiceError::WorkspaceNotFound`], workspace role
    /// errors, project validation errors, or persistence errors.
    pub async fn create(
        &self,
        workspace_id: WorkspaceId,
        acting: &UserId,
        name: impl Into<String>,
        description: Option<String>,
    ) -> ProjectServiceResult<Project> {
        let mut workspace = self
            .workspaces
            .find_by_id(workspace_id)
            .await?
            .ok_or(ProjectServiceError::WorkspaceNotFound(workspace_id))?;
        workspace.require_admin(acting)?;

        let mut project = Project::new(workspace_id, name, acting.clone(), &*self.clock)?;
        if let Some(text) = description {
            project = project.with_description(text);
        }
        self.projects.store(&project).await?;

        workspace.record_project_created(&*self.clock);
        self.workspaces.update(&workspace).await?;
        Ok(project)
    }

    /// Lists the projects of a workspace in creation order.
    ///
    /// # Errors
    ///
    /// Returns persistence errors from the repository.
    pub async fn list(&self, workspace_id: WorkspaceId) -> ProjectServiceResult<Vec<Project>> {
        Ok(self.projects.list_by_workspace(workspace_id).await?)
    }
}
