//! Action dispatch for matched workflows.

use crate::{
    assignment::{WorkloadMap, select_assignee},
    error::ErrorKind,
    project::ports::ProjectRepositoryError,
    store::Stores,
    task::{
        domain::{Actor, NewTask, Task, TaskDomainError, TaskId},
        ports::TaskRepositoryError,
    },
    user::ports::UserDirectoryError,
    workflow::{
        domain::{ActionType, ExecutionContext, ExecutionOutcome, HttpMethod, Workflow, WorkflowId},
        ports::{ReminderMailer, WebhookClient, WebhookRequest, WorkflowRepositoryError},
    },
    workspace::{domain::WorkspaceId, ports::WorkspaceRepositoryError},
};
use mockable::Clock;
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use super::{ReminderError, ReminderRenderer};

/// Message reported when an action hits an unexpected fault.
pub const GENERIC_FAILURE_MESSAGE: &str = "Workflow execution failed";

/// Errors that stop a workflow before any action handler runs.
#[derive(Debug, Error)]
pub enum WorkflowExecutionError {
    /// No workflow exists with the given identifier.
    #[error("workflow {0} not found")]
    NotFound(WorkflowId),
    /// The workflow is disabled.
    #[error("workflow {0} is not active")]
    Inactive(WorkflowId),
    /// The context names a different workspace than the workflow.
    #[error("workflow {workflow_id} does not belong to workspace {workspace_id}")]
    WorkspaceMismatch {
        /// Workflow identifier.
        workflow_id: WorkflowId,
        /// Workspace named by the execution context.
        workspace_id: WorkspaceId,
    },
    /// Loading the workflow failed.
    #[error(transparent)]
    Repository(#[from] WorkflowRepositoryError),
}

impl WorkflowExecutionError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Inactive(_) | Self::WorkspaceMismatch { .. } => ErrorKind::Validation,
            Self::Repository(err) => err.kind(),
        }
    }
}

/// Result type for workflow execution.
pub type WorkflowExecutionResult<T> = Result<T, WorkflowExecutionError>;

/// Lower-level error raised inside an action handler.
///
/// Faults classified as [`ErrorKind::Unavailable`] become the generic
/// failure; anything else is reported with its own message.
#[derive(Debug, Error)]
enum ActionFault {
    #[error(transparent)]
    Task(#[from] TaskRepositoryError),
    #[error(transparent)]
    TaskDomain(#[from] TaskDomainError),
    #[error(transparent)]
    Workspace(#[from] WorkspaceRepositoryError),
    #[error(transparent)]
    Project(#[from] ProjectRepositoryError),
    #[error(transparent)]
    Users(#[from] UserDirectoryError),
    #[error(transparent)]
    Reminder(#[from] ReminderError),
}

impl ActionFault {
    const fn kind(&self) -> ErrorKind {
        match self {
            Self::Task(err) => err.kind(),
            Self::TaskDomain(err) => err.kind(),
            Self::Workspace(err) => err.kind(),
            Self::Project(err) => err.kind(),
            Self::Users(err) => err.kind(),
            Self::Reminder(err) => err.kind(),
        }
    }
}

type ActionResult = Result<ExecutionOutcome, ActionFault>;

/// Runs a workflow's configured action once and reports the outcome.
///
/// Expected business failures come back as unsuccessful
/// [`ExecutionOutcome`]s. Only problems found before dispatch are returned as
/// errors.
#[derive(Clone)]
pub struct WorkflowExecutor<C>
where
    C: Clock + Send + Sync,
{
    stores: Stores,
    mailer: Arc<dyn ReminderMailer>,
    webhooks: Arc<dyn WebhookClient>,
    reminders: ReminderRenderer,
    clock: Arc<C>,
}

impl<C> WorkflowExecutor<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a new executor.
    #[must_use]
    pub fn new(
        stores: Stores,
        mailer: Arc<dyn ReminderMailer>,
        webhooks: Arc<dyn WebhookClient>,
        reminders: ReminderRenderer,
        clock: Arc<C>,
    ) -> Self {
        Self {
            stores,
            mailer,
            webhooks,
            reminders,
            clock,
        }
    }

    /// Loads a workflow and executes it.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowExecutionError::NotFound`] for unknown workflows,
    /// [`WorkflowExecutionError::Repository`] when the lookup fails, and the
    /// validation errors of [`Self::execute_workflow`].
    pub async fn execute(
        &self,
        workflow_id: WorkflowId,
        context: &ExecutionContext,
    ) -> WorkflowExecutionResult<ExecutionOutcome> {
        let workflow = self
            .stores
            .workflows
            .find_by_id(workflow_id)
            .await?
            .ok_or(WorkflowExecutionError::NotFound(workflow_id))?;
        self.execute_workflow(&workflow, context).await
    }

    /// Executes an already loaded workflow.
    ///
    /// The run counter is incremented when a handler produced an outcome,
    /// successful or not. Unexpected faults are logged and reported as a
    /// generic failure without counting a run.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowExecutionError::Inactive`] for disabled workflows and
    /// [`WorkflowExecutionError::WorkspaceMismatch`] when the context belongs
    /// to another workspace.
    pub async fn execute_workflow(
        &self,
        workflow: &Workflow,
        context: &ExecutionContext,
    ) -> WorkflowExecutionResult<ExecutionOutcome> {
        if !workflow.is_active() {
            return Err(WorkflowExecutionError::Inactive(workflow.id()));
        }
        if workflow.workspace_id() != context.workspace_id {
            return Err(WorkflowExecutionError::WorkspaceMismatch {
                workflow_id: workflow.id(),
                workspace_id: context.workspace_id,
            });
        }

        let action = workflow.action().action_type.as_str();
        let outcome = match self.dispatch(workflow, context).await {
            Ok(outcome) => outcome,
            Err(fault) if fault.kind() == ErrorKind::Unavailable => {
                tracing::error!(
                    workflow_id = %workflow.id(),
                    workspace_id = %context.workspace_id,
                    action,
                    error = %fault,
                    "workflow action faulted"
                );
                return Ok(ExecutionOutcome::failed(GENERIC_FAILURE_MESSAGE));
            }
            Err(fault) => ExecutionOutcome::failed(fault.to_string()),
        };

        if outcome.success {
            tracing::info!(
                workflow_id = %workflow.id(),
                workspace_id = %context.workspace_id,
                action,
                message = %outcome.message,
                "workflow action succeeded"
            );
        } else {
            tracing::warn!(
                workflow_id = %workflow.id(),
                workspace_id = %context.workspace_id,
                action,
                message = %outcome.message,
                "workflow action reported failure"
            );
        }
        self.record_run(workflow).await;
        Ok(outcome)
    }

    async fn record_run(&self, workflow: &Workflow) {
        if let Err(err) = self
            .stores
            .workflows
            .increment_runs(workflow.id(), self.clock.utc())
            .await
        {
            tracing::warn!(
                workflow_id = %workflow.id(),
                error = %err,
                "failed to record workflow run"
            );
        }
    }

    async fn dispatch(&self, workflow: &Workflow, context: &ExecutionContext) -> ActionResult {
        match &workflow.action().action_type {
            ActionType::SendEmail => self.send_email(workflow, context).await,
            ActionType::AssignTask => self.assign_task(context).await,
            ActionType::CreateTask => self.create_task(workflow, context.workspace_id).await,
            ActionType::Webhook => Ok(self.call_webhook(workflow, context).await),
            ActionType::SendSlack => Ok(ExecutionOutcome::failed(
                "Slack integration not yet implemented",
            )),
            ActionType::Unknown(raw) => Ok(ExecutionOutcome::failed(format!(
                "Unknown action type: {raw}"
            ))),
        }
    }

    async fn send_email(&self, workflow: &Workflow, context: &ExecutionContext) -> ActionResult {
        let Some(task_id) = context.task_id else {
            return self.count_broadcast_recipients(context.workspace_id).await;
        };
        self.send_task_reminder(workflow, task_id, context.workspace_id)
            .await
    }

    /// Loads a task only when it belongs to `workspace_id`.
    async fn find_workspace_task(
        &self,
        task_id: TaskId,
        workspace_id: WorkspaceId,
    ) -> Result<Option<Task>, ActionFault> {
        let task = self.stores.tasks.find_by_id(task_id).await?;
        Ok(task.filter(|found| found.workspace_id() == workspace_id))
    }

    async fn send_task_reminder(
        &self,
        workflow: &Workflow,
        task_id: TaskId,
        workspace_id: WorkspaceId,
    ) -> ActionResult {
        let Some(task) = self.find_workspace_task(task_id, workspace_id).await? else {
            return Ok(ExecutionOutcome::failed(format!("Task {task_id} not found")));
        };
        let Some(assignee) = task.assigned_to() else {
            return Ok(ExecutionOutcome::failed("Task has no assignee"));
        };
        let profile = self.stores.users.find_by_id(assignee).await?;
        let Some((email, name)) = profile
            .as_ref()
            .and_then(|user| user.email().map(|email| (email, user.display_name())))
        else {
            return Ok(ExecutionOutcome::failed(format!(
                "Assignee {assignee} has no email on file"
            )));
        };

        let reminder = self.reminders.render(&task, workflow.name(), email, name)?;
        match self.mailer.send_reminder(&reminder).await {
            Ok(()) => Ok(ExecutionOutcome::succeeded(format!("Reminder sent to {email}"))),
            Err(err) => Ok(ExecutionOutcome::failed(format!(
                "Failed to send reminder to {email}: {err}"
            ))),
        }
    }

    async fn count_broadcast_recipients(&self, workspace_id: WorkspaceId) -> ActionResult {
        let Some(workspace) = self.stores.workspaces.find_by_id(workspace_id).await? else {
            return Ok(ExecutionOutcome::failed(format!(
                "Workspace {workspace_id} not found"
            )));
        };
        let mut reachable = 0_usize;
        for member in workspace.member_ids() {
            let has_email = self
                .stores
                .users
                .find_by_id(member)
                .await?
                .is_some_and(|profile| profile.email().is_some());
            if has_email {
                reachable = reachable.saturating_add(1);
            }
        }
        // TODO: deliver broadcast content once a broadcast template collaborator exists.
        tracing::debug!(%workspace_id, reachable, "broadcast email counted, not delivered");
        Ok(ExecutionOutcome::succeeded(format!(
            "Email queued for {reachable} workspace members"
        )))
    }

    async fn assign_task(&self, context: &ExecutionContext) -> ActionResult {
        let Some(task_id) = context.task_id else {
            return Ok(ExecutionOutcome::failed("assign-task requires a task"));
        };
        let Some(mut task) = self
            .find_workspace_task(task_id, context.workspace_id)
            .await?
        else {
            return Ok(ExecutionOutcome::failed(format!("Task {task_id} not found")));
        };
        let Some(workspace) = self
            .stores
            .workspaces
            .find_by_id(context.workspace_id)
            .await?
        else {
            return Ok(ExecutionOutcome::failed(format!(
                "Workspace {} not found",
                context.workspace_id
            )));
        };

        let candidates: Vec<_> = workspace.member_ids().cloned().collect();
        let open_tasks = self
            .stores
            .tasks
            .list_open_by_workspace(context.workspace_id)
            .await?;
        let workload = WorkloadMap::from_open_tasks(&open_tasks);
        let Ok(assignee) = select_assignee(&candidates, &workload) else {
            return Ok(ExecutionOutcome::failed("Workspace has no members"));
        };

        task.assign_to(assignee.clone(), Actor::Workflow, &*self.clock);
        self.stores.tasks.update(&task).await?;
        tracing::debug!(%task_id, %assignee, "workflow assigned task");
        Ok(ExecutionOutcome::succeeded(format!(
            "Task assigned to {assignee}"
        )))
    }

    async fn create_task(&self, workflow: &Workflow, workspace_id: WorkspaceId) -> ActionResult {
        let projects = self.stores.projects.list_by_workspace(workspace_id).await?;
        let Some(project) = projects.first() else {
            return Ok(ExecutionOutcome::failed("No project found in workspace"));
        };

        let params = NewTask::new(
            project.id(),
            workspace_id,
            format!("Task from workflow: {}", workflow.name()),
            Actor::Workflow,
        )
        .with_description(format!(
            "Automatically created by the \"{}\" workflow.",
            workflow.name()
        ));
        let task = Task::create(params, &*self.clock)?;
        self.stores.tasks.store(&task).await?;
        Ok(ExecutionOutcome::succeeded(format!(
            "Task {} created in project {}",
            task.id(),
            project.name()
        )))
    }

    async fn call_webhook(
        &self,
        workflow: &Workflow,
        context: &ExecutionContext,
    ) -> ExecutionOutcome {
        let config = &workflow.action().config;
        let Some(url) = config
            .webhook_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
        else {
            return ExecutionOutcome::failed("No webhook URL configured");
        };
        let method = match config
            .webhook_method
            .as_deref()
            .map(HttpMethod::try_from)
            .transpose()
        {
            Ok(method) => method.unwrap_or_default(),
            Err(err) => return ExecutionOutcome::failed(err.to_string()),
        };

        let request = WebhookRequest {
            url: url.to_owned(),
            method,
            body: json!({
                "workflow": workflow.name(),
                "workflowId": workflow.id(),
                "workspaceId": context.workspace_id,
                "timestamp": self.clock.utc().to_rfc3339(),
                "context": context,
            }),
        };
        match self.webhooks.send(&request).await {
            Ok(response) if response.is_success() => ExecutionOutcome::succeeded(format!(
                "Webhook responded with status {}",
                response.status
            )),
            Ok(response) => ExecutionOutcome::failed(format!(
                "Webhook returned status {}",
                response.status
            )),
            Err(err) => ExecutionOutcome::failed(format!("Webhook request failed: {err}")),
        }
    }
}
