//! In-memory repository for workflow definitions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::{
    workflow::{
        domain::{Workflow, WorkflowId},
        ports::{WorkflowRepository, WorkflowRepositoryError, WorkflowRepositoryResult},
    },
    workspace::domain::WorkspaceId,
};

/// Thread-safe in-memory workflow repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkflowRepository {
    state: Arc<RwLock<InMemoryWorkflowState>>,
}

#[derive(Debug, Default)]
struct InMemoryWorkflowState {
    workflows: HashMap<WorkflowId, Workflow>,
    insertion_order: Vec<WorkflowId>,
}

impl InMemoryWorkflowRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn list_where(
        &self,
        filter: impl Fn(&Workflow) -> bool,
    ) -> WorkflowRepositoryResult<Vec<Workflow>> {
        let state = self.state.read().map_err(|err| {
            WorkflowRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state
            .insertion_order
            .iter()
            .filter_map(|id| state.workflows.get(id))
            .filter(|workflow| filter(workflow))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl WorkflowRepository for InMemoryWorkflowRepository {
    async fn store(&self, workflow: &Workflow) -> WorkflowRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            WorkflowRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.workflows.contains_key(&workflow.id()) {
            return Err(WorkflowRepositoryError::DuplicateWorkflow(workflow.id()));
        }
        state.insertion_order.push(workflow.id());
        state.workflows.insert(workflow.id(), workflow.clone());
        Ok(())
    }

    async fn update(&self, workflow: &Workflow) -> WorkflowRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            WorkflowRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let stored = state
            .workflows
            .get_mut(&workflow.id())
            .ok_or(WorkflowRepositoryError::NotFound(workflow.id()))?;
        let mut replacement = workflow.clone();
        replacement.restore_runs(stored.runs(), stored.last_run_at());
        *stored = replacement;
        Ok(())
    }

    async fn find_by_id(&self, id: WorkflowId) -> WorkflowRepositoryResult<Option<Workflow>> {
        let state = self.state.read().map_err(|err| {
            WorkflowRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.workflows.get(&id).cloned())
    }

    async fn list_by_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> WorkflowRepositoryResult<Vec<Workflow>> {
        self.list_where(|workflow| workflow.workspace_id() == workspace_id)
    }

    async fn list_active_by_workspace(
        &self,
        workspace_id: WorkspaceId,
    ) -> WorkflowRepositoryResult<Vec<Workflow>> {
        self.list_where(|workflow| workflow.workspace_id() == workspace_id && workflow.is_active())
    }

    async fn delete(&self, id: WorkflowId) -> WorkflowRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            WorkflowRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.workflows.remove(&id).is_none() {
            return Err(WorkflowRepositoryError::NotFound(id));
        }
        state.insertion_order.retain(|stored| *stored != id);
        Ok(())
    }

    async fn increment_runs(
        &self,
        id: WorkflowId,
        ran_at: DateTime<Utc>,
    ) -> WorkflowRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            WorkflowRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        state
            .workflows
            .get_mut(&id)
            .ok_or(WorkflowRepositoryError::NotFound(id))?
            .record_run(ran_at);
        Ok(())
    }
}
