//! Repository port for AI task records.

use super::domain::{AiTask, AiTaskId, AiTaskStatus};
use crate::{error::ErrorKind, workspace::domain::WorkspaceId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for AI task repository operations.
pub type AiTaskRepositoryResult<T> = Result<T, AiTaskRepositoryError>;

/// AI task persistence contract.
#[async_trait]
pub trait AiTaskRepository: Send + Sync {
    /// Stores a new record.
    async fn store(&self, ai_task: &AiTask) -> AiTaskRepositoryResult<()>;

    /// Replaces a record if its stored status still equals `expected_status`.
    ///
    /// # Errors
    ///
    /// Returns [`AiTaskRepositoryError::StatusConflict`] when another write
    /// changed the status first, for example an admin cancellation.
    async fn update(
        &self,
        ai_task: &AiTask,
        expected_status: AiTaskStatus,
    ) -> AiTaskRepositoryResult<()>;

    /// Finds a record by identifier.
    async fn find_by_id(&self, id: AiTaskId) -> AiTaskRepositoryResult<Option<AiTask>>;

    /// Lists the records of a workspace in creation order.
    async fn list_by_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> AiTaskRepositoryResult<Vec<AiTask>>;
}

/// Errors returned by AI task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum AiTaskRepositoryError {
    /// A record with the same identifier already exists.
    #[error("duplicate AI task identifier: {0}")]
    DuplicateAiTask(AiTaskId),

    /// The record does not exist.
    #[error("AI task not found: {0}")]
    NotFound(AiTaskId),

    /// The stored status differs from the one the caller read.
    #[error("AI task {ai_task_id} is {actual}, expected {expected}")]
    StatusConflict {
        /// Record identifier.
        ai_task_id: AiTaskId,
        /// Status the caller read before mutating.
        expected: AiTaskStatus,
        /// Status currently stored.
        actual: AiTaskStatus,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl AiTaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::DuplicateAiTask(_) | Self::StatusConflict { .. } => ErrorKind::Conflict,
            Self::Persistence(_) => ErrorKind::Unavailable,
        }
    }
}
