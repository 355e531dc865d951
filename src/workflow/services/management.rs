//! Workflow definition management.

use crate::{
    error::ErrorKind,
    user::domain::UserId,
    workflow::{
        domain::{Action, Trigger, Workflow, WorkflowDomainError, WorkflowId},
        ports::{WorkflowRepository, WorkflowRepositoryError},
    },
    workspace::{
        domain::{Workspace, WorkspaceDomainError, WorkspaceId},
        ports::{WorkspaceRepository, WorkspaceRepositoryError},
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Changes applied by [`WorkflowService::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowUpdate {
    name: Option<String>,
    trigger: Option<Trigger>,
    action: Option<Action>,
}

impl WorkflowUpdate {
    /// Creates an empty update.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Renames the workflow.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Replaces the trigger.
    #[must_use]
    pub fn trigger(mut self, trigger: Trigger) -> Self {
        self.trigger = Some(trigger);
        self
    }

    /// Replaces the action.
    #[must_use]
    pub fn action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }
}

/// Service-level errors for workflow management.
#[derive(Debug, Error)]
pub enum WorkflowServiceError {
    /// Workflow validation failed.
    #[error(transparent)]
    Domain(#[from] WorkflowDomainError),
    /// Workspace role check failed.
    #[error(transparent)]
    Workspace(#[from] WorkspaceDomainError),
    /// Workflow repository operation failed.
    #[error(transparent)]
    Repository(#[from] WorkflowRepositoryError),
    /// Workspace repository operation failed.
    #[error(transparent)]
    WorkspaceRepository(#[from] WorkspaceRepositoryError),
    /// No workflow exists with the given identifier.
    #[error("workflow {0} not found")]
    NotFound(WorkflowId),
    /// No workspace exists with the given identifier.
    #[error("workspace {0} not found")]
    WorkspaceNotFound(WorkspaceId),
}

impl WorkflowServiceError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Workspace(err) => err.kind(),
            Self::Repository(err) => err.kind(),
            Self::WorkspaceRepository(err) => err.kind(),
            Self::NotFound(_) | Self::WorkspaceNotFound(_) => ErrorKind::NotFound,
        }
    }
}

/// Result type for workflow management operations.
pub type WorkflowServiceResult<T> = Result<T, WorkflowServiceError>;

/// Workflow CRUD restricted to workspace admins and the owner.
#[derive(Clone)]
pub struct WorkflowService<C>
where
    C: Clock + Send + Sync,
{
    workflows: Arc<dyn WorkflowRepository>,
    workspaces: Arc<dyn WorkspaceRepository>,
    clock: Arc<C>,
}

impl<C> WorkflowService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a new workflow service.
    #[must_use]
    pub fn new(
        workflows: Arc<dyn WorkflowRepository>,
        workspaces: Arc<dyn WorkspaceRepository>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            workflows,
            workspaces,
            clock,
        }
    }

    /// Creates an active workflow.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError::WorkspaceNotFound`], role errors when
    /// `acting` is not an admin, name validation errors, or persistence
    /// errors.
    pub async fn create(
        &self,
        workspace_id: WorkspaceId,
        acting: &UserId,
        name: &str,
        trigger: Trigger,
        action: Action,
    ) -> WorkflowServiceResult<Workflow> {
        self.workspace(workspace_id).await?.require_admin(acting)?;
        let workflow = Workflow::new(
            workspace_id,
            name,
            trigger,
            action,
            acting.clone(),
            &*self.clock,
        )?;
        self.workflows.store(&workflow).await?;
        tracing::info!(
            workflow_id = %workflow.id(),
            %workspace_id,
            "workflow created"
        );
        Ok(workflow)
    }

    /// Retrieves a workflow.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError::NotFound`] or persistence errors.
    pub async fn find(&self, workflow_id: WorkflowId) -> WorkflowServiceResult<Workflow> {
        self.workflows
            .find_by_id(workflow_id)
            .await?
            .ok_or(WorkflowServiceError::NotFound(workflow_id))
    }

    /// Lists a workspace's workflows for one of its members.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError::WorkspaceNotFound`], membership errors,
    /// or persistence errors.
    pub async fn list(
        &self,
        workspace_id: WorkspaceId,
        acting: &UserId,
    ) -> WorkflowServiceResult<Vec<Workflow>> {
        self.workspace(workspace_id).await?.require_member(acting)?;
        Ok(self.workflows.list_by_workspace(workspace_id).await?)
    }

    /// Applies name, trigger and action changes.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError::NotFound`], role errors, name
    /// validation errors, or persistence errors.
    pub async fn update(
        &self,
        workflow_id: WorkflowId,
        acting: &UserId,
        changes: WorkflowUpdate,
    ) -> WorkflowServiceResult<Workflow> {
        let mut workflow = self.find_for_admin(workflow_id, acting).await?;
        if let Some(name) = changes.name {
            workflow.rename(&name, &*self.clock)?;
        }
        if let Some(trigger) = changes.trigger {
            workflow.set_trigger(trigger, &*self.clock);
        }
        if let Some(action) = changes.action {
            workflow.set_action(action, &*self.clock);
        }
        self.workflows.update(&workflow).await?;
        Ok(workflow)
    }

    /// Enables or disables a workflow.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError::NotFound`], role errors, or persistence
    /// errors.
    pub async fn set_active(
        &self,
        workflow_id: WorkflowId,
        acting: &UserId,
        is_active: bool,
    ) -> WorkflowServiceResult<Workflow> {
        let mut workflow = self.find_for_admin(workflow_id, acting).await?;
        workflow.set_active(is_active, &*self.clock);
        self.workflows.update(&workflow).await?;
        tracing::info!(%workflow_id, is_active, "workflow toggled");
        Ok(workflow)
    }

    /// Deletes a workflow.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowServiceError::NotFound`], role errors, or persistence
    /// errors.
    pub async fn delete(&self, workflow_id: WorkflowId, acting: &UserId) -> WorkflowServiceResult<()> {
        self.find_for_admin(workflow_id, acting).await?;
        self.workflows.delete(workflow_id).await?;
        Ok(())
    }

    async fn find_for_admin(
        &self,
        workflow_id: WorkflowId,
        acting: &UserId,
    ) -> WorkflowServiceResult<Workflow> {
        let workflow = self.find(workflow_id).await?;
        self.workspace(workflow.workspace_id())
            .await?
            .require_admin(acting)?;
        Ok(workflow)
    }

    async fn workspace(&self, workspace_id: WorkspaceId) -> WorkflowServiceResult<Workspace> {
        self.workspaces
            .find_by_id(workspace_id)
            .await?
            .ok_or(WorkflowServiceError::WorkspaceNotFound(workspace_id))
    }
}
