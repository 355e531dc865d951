//! Event fan-out to matching workflows.

use super::WorkflowExecutor;
use crate::{
    error::ErrorKind,
    store::Stores,
    task::ports::{TaskRepository, TaskRepositoryError},
    workflow::{
        domain::{ExecutionContext, ExecutionOutcome, WorkflowEvent, WorkflowId},
        ports::{WorkflowRepository, WorkflowRepositoryError},
    },
    workspace::domain::WorkspaceId,
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Outcome of one workflow run during a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    /// Workflow that ran.
    pub workflow_id: WorkflowId,
    /// Workflow name at the time of the run.
    pub workflow_name: String,
    /// Action outcome.
    pub outcome: ExecutionOutcome,
}

/// Errors that prevent a dispatch from starting.
#[derive(Debug, Error)]
pub enum WorkflowDispatchError {
    /// Listing workflows failed.
    #[error(transparent)]
    Workflows(#[from] WorkflowRepositoryError),
    /// Listing tasks failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
}

impl WorkflowDispatchError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Workflows(err) => err.kind(),
            Self::Tasks(err) => err.kind(),
        }
    }
}

/// Result type for dispatch operations.
pub type WorkflowDispatchResult<T> = Result<T, WorkflowDispatchError>;

/// Runs every active workflow of a workspace whose trigger matches an event.
#[derive(Clone)]
pub struct WorkflowDispatcher<C>
where
    C: Clock + Send + Sync,
{
    executor: WorkflowExecutor<C>,
    workflows: Arc<dyn WorkflowRepository>,
    tasks: Arc<dyn TaskRepository>,
    clock: Arc<C>,
}

impl<C> WorkflowDispatcher<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a dispatcher over the given executor and stores.
    #[must_use]
    pub fn new(executor: WorkflowExecutor<C>, stores: &Stores, clock: Arc<C>) -> Self {
        Self {
            executor,
            workflows: Arc::clone(&stores.workflows),
            tasks: Arc::clone(&stores.tasks),
            clock,
        }
    }

    /// Runs the matching workflows in stored order.
    ///
    /// A failing workflow is reported and never stops later ones.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDispatchError::Workflows`] when the workflow list
    /// cannot be loaded.
    pub async fn dispatch(
        &self,
        event: WorkflowEvent,
        context: &ExecutionContext,
    ) -> WorkflowDispatchResult<Vec<DispatchReport>> {
        let candidates = self
            .workflows
            .list_active_by_workspace(context.workspace_id)
            .await?;
        let mut reports = Vec::new();
        for workflow in candidates
            .iter()
            .filter(|workflow| workflow.trigger().matches(event))
        {
            let outcome = match self.executor.execute_workflow(workflow, context).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    tracing::warn!(
                        workflow_id = %workflow.id(),
                        workspace_id = %context.workspace_id,
                        %event,
                        error = %err,
                        "workflow skipped"
                    );
                    ExecutionOutcome::failed(err.to_string())
                }
            };
            reports.push(DispatchReport {
                workflow_id: workflow.id(),
                workflow_name: workflow.name().to_owned(),
                outcome,
            });
        }
        tracing::debug!(
            workspace_id = %context.workspace_id,
            %event,
            ran = reports.len(),
            "event dispatched"
        );
        Ok(reports)
    }

    /// Dispatches an event given by name. Unknown names match nothing.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::dispatch`].
    pub async fn dispatch_named(
        &self,
        event_type: &str,
        context: &ExecutionContext,
    ) -> WorkflowDispatchResult<Vec<DispatchReport>> {
        let Ok(event) = WorkflowEvent::try_from(event_type) else {
            tracing::debug!(event_type, "ignoring unknown workflow event");
            return Ok(Vec::new());
        };
        self.dispatch(event, context).await
    }

    /// Raises `task-overdue` for every open task of the workspace whose due
    /// date has passed.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDispatchError::Tasks`] when the task list cannot be
    /// loaded, or the errors of [`Self::dispatch`].
    pub async fn dispatch_overdue(
        &self,
        workspace_id: WorkspaceId,
    ) -> WorkflowDispatchResult<Vec<DispatchReport>> {
        let now = self.clock.utc();
        let open_tasks = self.tasks.list_open_by_workspace(workspace_id).await?;
        let mut reports = Vec::new();
        for task in open_tasks.iter().filter(|task| task.is_overdue(now)) {
            let context = ExecutionContext::new(workspace_id)
                .with_task(task.id())
                .with_project(task.project_id());
            reports.extend(self.dispatch(WorkflowEvent::TaskOverdue, &context).await?);
        }
        Ok(reports)
    }
}
