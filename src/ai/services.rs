//! Bulk auto-assignment tracked through an AI task record.

use crate::{
    ai::{
        domain::{AiTask, AiTaskDomainError, AiTaskId, AiTaskKind, AiTaskStatus, PROGRESS_COMPLETE},
        ports::AiTaskRepositoryError,
    },
    assignment::{AssignmentError, LeastBusyAssigner, WorkloadMap},
    config::AssignmentConfig,
    error::ErrorKind,
    store::Stores,
    task::{
        domain::{Actor, Task, TaskStatus},
        ports::TaskRepositoryError,
    },
    user::domain::UserId,
    workspace::{
        domain::{Workspace, WorkspaceDomainError, WorkspaceId},
        ports::WorkspaceRepositoryError,
    },
};
use mockable::Clock;
use serde_json::{Value, json};
use std::sync::Arc;
use thiserror::Error;

/// Message stored on the record when a workspace has nobody to assign to.
pub const NO_MEMBERS_MESSAGE: &str = "Workspace has no members";

/// Service-level errors for AI actions.
#[derive(Debug, Error)]
pub enum AiActionError {
    /// An AI task transition was rejected.
    #[error(transparent)]
    Domain(#[from] AiTaskDomainError),
    /// Workspace authorisation failed.
    #[error(transparent)]
    Workspace(#[from] WorkspaceDomainError),
    /// Assignee selection failed.
    #[error(transparent)]
    Assignment(#[from] AssignmentError),
    /// AI task repository operation failed.
    #[error(transparent)]
    Repository(#[from] AiTaskRepositoryError),
    /// Task repository operation failed.
    #[error(transparent)]
    TaskRepository(#[from] TaskRepositoryError),
    /// Workspace repository operation failed.
    #[error(transparent)]
    WorkspaceRepository(#[from] WorkspaceRepositoryError),
    /// No AI task exists with the given identifier.
    #[error("AI task {0} not found")]
    NotFound(AiTaskId),
    /// No workspace exists with the given identifier.
    #[error("workspace {0} not found")]
    WorkspaceNotFound(WorkspaceId),
}

impl AiActionError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Workspace(err) => err.kind(),
            Self::Assignment(err) => err.kind(),
            Self::Repository(err) => err.kind(),
            Self::TaskRepository(err) => err.kind(),
            Self::WorkspaceRepository(err) => err.kind(),
            Self::NotFound(_) | Self::WorkspaceNotFound(_) => ErrorKind::NotFound,
        }
    }
}

/// Result type for AI action operations.
pub type AiActionResult<T> = Result<T, AiActionError>;

/// Outcome of a conditional record write.
enum Saved {
    Stored,
    Cancelled(AiTask),
}

/// Runs AI-driven actions and keeps their progress records current.
#[derive(Clone)]
pub struct AiActionService<C>
where
    C: Clock + Send + Sync,
{
    stores: Stores,
    batch_cap: usize,
    clock: Arc<C>,
}

impl<C> AiActionService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a new AI action service.
    #[must_use]
    pub fn new(stores: &Stores, config: &AssignmentConfig, clock: Arc<C>) -> Self {
        Self {
            stores: stores.clone(),
            batch_cap: config.batch_cap,
            clock,
        }
    }

    /// Assigns up to the configured cap of unassigned `todo` tasks, oldest
    /// first, to the least busy members.
    ///
    /// Returns the final record: completed with a summary, failed when the
    /// workspace has no members, or cancelled when an admin stopped it
    /// between assignments.
    ///
    /// # Errors
    ///
    /// Returns [`AiActionError::WorkspaceNotFound`], role errors when
    /// `acting` is not an admin, or store errors. A store error after the
    /// record was started also marks the record failed.
    pub async fn auto_assign(
        &self,
        workspace_id: WorkspaceId,
        acting: &UserId,
    ) -> AiActionResult<AiTask> {
        let workspace = self.workspace(workspace_id).await?;
        workspace.require_admin(acting)?;

        let mut record = AiTask::new(
            workspace_id,
            AiTaskKind::AutoAssign,
            acting.clone(),
            true,
            &*self.clock,
        );
        self.stores.ai_tasks.store(&record).await?;
        record.start(&*self.clock)?;
        if let Saved::Cancelled(stored) = self.save(&record, AiTaskStatus::Pending).await? {
            return Ok(stored);
        }
        tracing::info!(
            ai_task_id = %record.id(),
            %workspace_id,
            action = record.kind().as_str(),
            "auto-assign started"
        );

        if let Err(err) = self.run_batch(&workspace, &mut record).await {
            tracing::error!(
                ai_task_id = %record.id(),
                %workspace_id,
                error = %err,
                "auto-assign faulted"
            );
            self.mark_failed(&mut record, &err).await;
            return Err(err);
        }
        Ok(record)
    }

    /// Cancels a pending or running AI task.
    ///
    /// # Errors
    ///
    /// Returns [`AiActionError::NotFound`], role errors when `acting` is not
    /// an admin, transition errors once the record is terminal, or a
    /// conflict when the record changed concurrently.
    pub async fn cancel(&self, ai_task_id: AiTaskId, acting: &UserId) -> AiActionResult<AiTask> {
        let mut record = self.find(ai_task_id).await?;
        self.workspace(record.workspace_id())
            .await?
            .require_admin(acting)?;
        let expected = record.status();
        record.cancel(&*self.clock)?;
        self.stores.ai_tasks.update(&record, expected).await?;
        tracing::info!(
            %ai_task_id,
            workspace_id = %record.workspace_id(),
            cancelled_by = %acting,
            "AI task cancelled"
        );
        Ok(record)
    }

    /// Retrieves an AI task record.
    ///
    /// # Errors
    ///
    /// Returns [`AiActionError::NotFound`] or store errors.
    pub async fn find(&self, ai_task_id: AiTaskId) -> AiActionResult<AiTask> {
        self.stores
            .ai_tasks
            .find_by_id(ai_task_id)
            .await?
            .ok_or(AiActionError::NotFound(ai_task_id))
    }

    /// Lists a workspace's AI task records for one of its members.
    ///
    /// # Errors
    ///
    /// Returns [`AiActionError::WorkspaceNotFound`], membership errors, or
    /// store errors.
    pub async fn list(
        &self,
        workspace_id: WorkspaceId,
        acting: &UserId,
    ) -> AiActionResult<Vec<AiTask>> {
        self.workspace(workspace_id).await?.require_member(acting)?;
        Ok(self.stores.ai_tasks.list_by_workspace(workspace_id).await?)
    }

    async fn run_batch(&self, workspace: &Workspace, record: &mut AiTask) -> AiActionResult<()> {
        let candidates: Vec<UserId> = workspace.member_ids().cloned().collect();
        let open_tasks = self
            .stores
            .tasks
            .list_open_by_workspace(workspace.id())
            .await?;
        let workload = WorkloadMap::from_open_tasks(&open_tasks);
        let Ok(mut assigner) = LeastBusyAssigner::new(candidates, workload) else {
            record.fail(NO_MEMBERS_MESSAGE, &*self.clock)?;
            return self.finish(record).await;
        };

        let mut batch: Vec<Task> = open_tasks
            .into_iter()
            .filter(|task| task.status() == TaskStatus::Todo && task.assigned_to().is_none())
            .collect();
        batch.sort_by_key(Task::created_at);
        batch.truncate(self.batch_cap);

        let total = batch.len();
        let mut assignments: Vec<Value> = Vec::with_capacity(total);
        let mut skipped = 0_usize;
        for (index, mut task) in batch.into_iter().enumerate() {
            if let Some(stored) = self.cancelled(record.id()).await? {
                *record = stored;
                return Ok(());
            }

            let assignee = assigner.assign_next()?;
            task.assign_to(assignee.clone(), Actor::Ai, &*self.clock);
            match self.stores.tasks.update(&task).await {
                Ok(()) => {
                    tracing::debug!(task_id = %task.id(), %assignee, "AI assigned task");
                    assignments.push(json!({
                        "taskId": task.id(),
                        "title": task.title(),
                        "assignee": assignee,
                    }));
                }
                Err(TaskRepositoryError::RevisionConflict { .. }) => {
                    tracing::warn!(task_id = %task.id(), "task changed during auto-assign, skipped");
                    skipped = skipped.saturating_add(1);
                }
                Err(err) => return Err(err.into()),
            }

            record.report_progress(percent(index.saturating_add(1), total), &*self.clock)?;
            if let Saved::Cancelled(stored) = self.save(record, AiTaskStatus::InProgress).await? {
                *record = stored;
                return Ok(());
            }
        }

        let assigned = assignments.len();
        record.complete(
            json!({
                "assigned": assigned,
                "skipped": skipped,
                "assignments": assignments,
            }),
            &*self.clock,
        )?;
        self.finish(record).await?;
        tracing::info!(
            ai_task_id = %record.id(),
            workspace_id = %workspace.id(),
            assigned,
            skipped,
            "auto-assign finished"
        );
        Ok(())
    }

    /// Stores a terminal record, adopting the stored copy if a cancellation
    /// won the race.
    async fn finish(&self, record: &mut AiTask) -> AiActionResult<()> {
        if let Saved::Cancelled(stored) = self.save(record, AiTaskStatus::InProgress).await? {
            *record = stored;
        }
        Ok(())
    }

    async fn save(&self, record: &AiTask, expected: AiTaskStatus) -> AiActionResult<Saved> {
        match self.stores.ai_tasks.update(record, expected).await {
            Ok(()) => Ok(Saved::Stored),
            Err(AiTaskRepositoryError::StatusConflict {
                actual: AiTaskStatus::Cancelled,
                ..
            }) => {
                let stored = self.find(record.id()).await?;
                Ok(Saved::Cancelled(stored))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn cancelled(&self, ai_task_id: AiTaskId) -> AiActionResult<Option<AiTask>> {
        let stored = self.find(ai_task_id).await?;
        if stored.status() == AiTaskStatus::Cancelled {
            tracing::info!(%ai_task_id, "auto-assign stopped by cancellation");
            return Ok(Some(stored));
        }
        Ok(None)
    }

    async fn mark_failed(&self, record: &mut AiTask, err: &AiActionError) {
        if record.status().is_terminal() || record.fail(err.to_string(), &*self.clock).is_err() {
            return;
        }
        if let Err(save_err) = self.save(record, AiTaskStatus::InProgress).await {
            tracing::warn!(
                ai_task_id = %record.id(),
                error = %save_err,
                "failed to record auto-assign failure"
            );
        }
    }

    async fn workspace(&self, workspace_id: WorkspaceId) -> AiActionResult<Workspace> {
        self.stores
            .workspaces
            .find_by_id(workspace_id)
            .await?
            .ok_or(AiActionError::WorkspaceNotFound(workspace_id))
    }
}

/// Integer percentage of `done` out of `total`; an empty batch is complete.
fn percent(done: usize, total: usize) -> u8 {
    done.saturating_mul(usize::from(PROGRESS_COMPLETE))
        .checked_div(total)
        .and_then(|value| u8::try_from(value).ok())
        .unwrap_or(PROGRESS_COMPLETE)
}
