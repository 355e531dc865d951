//! In-memory repository for AI task records.

use crate::{
    ai::{
        domain::{AiTask, AiTaskId, AiTaskStatus},
        ports::{AiTaskRepository, AiTaskRepositoryError, AiTaskRepositoryResult},
    },
    workspace::domain::WorkspaceId,
};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory AI task repository.
///
/// Records are kept in insertion order; the conditional update runs under
/// the write lock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAiTaskRepository {
    records: Arc<RwLock<Vec<AiTask>>>,
}

impl InMemoryAiTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> AiTaskRepositoryError {
    AiTaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl AiTaskRepository for InMemoryAiTaskRepository {
    async fn store(&self, ai_task: &AiTask) -> AiTaskRepositoryResult<()> {
        let mut records = self.records.write().map_err(lock_error)?;
        if records.iter().any(|stored| stored.id() == ai_task.id()) {
            return Err(AiTaskRepositoryError::DuplicateAiTask(ai_task.id()));
        }
        records.push(ai_task.clone());
        Ok(())
    }

    async fn update(
        &self,
        ai_task: &AiTask,
        expected_status: AiTaskStatus,
    ) -> AiTaskRepositoryResult<()> {
        let mut records = self.records.write().map_err(lock_error)?;
        let stored = records
            .iter_mut()
            .find(|stored| stored.id() == ai_task.id())
            .ok_or(AiTaskRepositoryError::NotFound(ai_task.id()))?;
        if stored.status() != expected_status {
            return Err(AiTaskRepositoryError::StatusConflict {
                ai_task_id: ai_task.id(),
                expected: expected_status,
                actual: stored.status(),
            });
        }
        *stored = ai_task.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: AiTaskId) -> AiTaskRepositoryResult<Option<AiTask>> {
        let records = self.records.read().map_err(lock_error)?;
        Ok(records.iter().find(|stored| stored.id() == id).cloned())
    }

    async fn list_by_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> AiTaskRepositoryResult<Vec<AiTask>> {
        let records = self.records.read().map_err(lock_error)?;
        Ok(records
            .iter()
            .filter(|stored| stored.workspace_id() == workspace_id)
            .cloned()
            .collect())
    }
}
