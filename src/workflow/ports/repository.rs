//! Repository port for workflow definitions.

use crate::error::ErrorKind;
use crate::workflow::domain::{Workflow, WorkflowId};
use crate::workspace::domain::WorkspaceId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for workflow repository operations.
pub type WorkflowRepositoryResult<T> = Result<T, WorkflowRepositoryError>;

/// Workflow persistence contract.
#[async_trait]
pub trait WorkflowRepository: Send + Sync {
    /// Stores a new workflow.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::DuplicateWorkflow`] when the ID
    /// already exists.
    async fn store(&self, workflow: &Workflow) -> WorkflowRepositoryResult<()>;

    /// Replaces a stored workflow's definition.
    ///
    /// The stored run counter and last run time are kept, so a definition
    /// edit never loses runs recorded in the meantime.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::NotFound`] when the workflow does not
    /// exist.
    async fn update(&self, workflow: &Workflow) -> WorkflowRepositoryResult<()>;

    /// Finds a workflow by identifier.
    async fn find_by_id(&self, id: WorkflowId) -> WorkflowRepositoryResult<Option<Workflow>>;

    /// Lists the workflows of a workspace in creation order.
    async fn list_by_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> WorkflowRepositoryResult<Vec<Workflow>>;

    /// Lists the active workflows of a workspace in creation order.
    async fn list_active_by_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> WorkflowRepositoryResult<Vec<Workflow>>;

    /// Deletes a workflow.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::NotFound`] when the workflow does not
    /// exist.
    async fn delete(&self, id: WorkflowId) -> WorkflowRepositoryResult<()>;

    /// Atomically adds one run and records its time.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowRepositoryError::NotFound`] when the workflow does not
    /// exist.
    async fn increment_runs(
        &self,
        id: WorkflowId,
        ran_at: DateTime<Utc>,
    ) -> WorkflowRepositoryResult<()>;
}

/// Errors returned by workflow repository implementations.
#[derive(Debug, Clone, Error)]
pub enum WorkflowRepositoryError {
    /// A workflow with the same identifier already exists.
    #[error("duplicate workflow identifier: {0}")]
    DuplicateWorkflow(WorkflowId),

    /// The workflow was not found.
    #[error("workflow not found: {0}")]
    NotFound(WorkflowId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl WorkflowRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateWorkflow(_) => ErrorKind::Conflict,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Persistence(_) => ErrorKind::Unavailable,
        }
    }
}
