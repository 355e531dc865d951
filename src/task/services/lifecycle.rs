//! Service layer for task creation and status transitions.

use crate::{
    error::ErrorKind,
    project::{
        domain::ProjectId,
        ports::{ProjectRepository, ProjectRepositoryError},
    },
    task::{
        domain::{Actor, NewTask, Priority, RemarkId, Task, TaskDomainError, TaskId, TaskPatch},
        ports::{TaskRepository, TaskRepositoryError},
    },
    user::domain::UserId,
    workspace::{
        domain::{Role, Workspace, WorkspaceDomainError, WorkspaceId},
        ports::{WorkspaceRepository, WorkspaceRepositoryError},
    },
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task inside a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    project_id: ProjectId,
    acting: UserId,
    title: String,
    description: String,
    priority: Priority,
    due_date: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(project_id: ProjectId, acting: UserId, title: impl Into<String>) -> Self {
        Self {
            project_id,
            acting,
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            due_date: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Request payload for appending a remark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddRemarkRequest {
    task_id: TaskId,
    acting: UserId,
    user_name: String,
    message: String,
    link: Option<String>,
}

impl AddRemarkRequest {
    /// Creates a remark request.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        acting: UserId,
        user_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            task_id,
            acting,
            user_name: user_name.into(),
            message: message.into(),
            link: None,
        }
    }

    /// Attaches a link to the remark.
    #[must_use]
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Task validation or authorisation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Workspace membership check failed.
    #[error(transparent)]
    Workspace(#[from] WorkspaceDomainError),
    /// Task repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Workspace repository operation failed.
    #[error(transparent)]
    WorkspaceRepository(#[from] WorkspaceRepositoryError),
    /// Project repository operation failed.
    #[error(transparent)]
    ProjectRepository(#[from] ProjectRepositoryError),
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    NotFound(TaskId),
    /// No project exists with the given identifier.
    #[error("project {0} not found")]
    ProjectNotFound(ProjectId),
    /// The task's workspace no longer exists.
    #[error("workspace {0} not found")]
    WorkspaceNotFound(WorkspaceId),
}

impl TaskLifecycleError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(err) => err.kind(),
            Self::Workspace(err) => err.kind(),
            Self::Repository(err) => err.kind(),
            Self::WorkspaceRepository(err) => err.kind(),
            Self::ProjectRepository(err) => err.kind(),
            Self::NotFound(_) | Self::ProjectNotFound(_) | Self::WorkspaceNotFound(_) => {
                ErrorKind::NotFound
            }
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Each write re-reads the task, applies one domain transition and persists
/// it conditionally on the revision it read, so concurrent writes never
/// overwrite each other.
#[derive(Clone)]
pub struct TaskLifecycleService<C>
where
    C: Clock + Send + Sync,
{
    tasks: Arc<dyn TaskRepository>,
    workspaces: Arc<dyn WorkspaceRepository>,
    projects: Arc<dyn ProjectRepository>,
    clock: Arc<C>,
}

impl<C> TaskLifecycleService<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        workspaces: Arc<dyn WorkspaceRepository>,
        projects: Arc<dyn ProjectRepository>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            tasks,
            workspaces,
            projects,
            clock,
        }
    }

    /// Creates a `todo` task in a project on behalf of a workspace member.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::ProjectNotFound`], membership errors,
    /// title validation errors, or persistence errors.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let project = self
            .projects
            .find_by_id(request.project_id)
            .await?
            .ok_or(TaskLifecycleError::ProjectNotFound(request.project_id))?;
        let workspace = self.workspace(project.workspace_id()).await?;
        workspace.require_member(&request.acting)?;

        let mut params = NewTask::new(
            project.id(),
            workspace.id(),
            request.title,
            Actor::Member(request.acting),
        )
        .with_description(request.description)
        .with_priority(request.priority);
        if let Some(due_date) = request.due_date {
            params = params.with_due_date(due_date);
        }

        let task = Task::create(params, &*self.clock)?;
        self.tasks.store(&task).await?;
        Ok(task)
    }

    /// Retrieves a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] or persistence errors.
    pub async fn find(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::NotFound(task_id))
    }

    /// Lists every task in a workspace in creation order.
    ///
    /// # Errors
    ///
    /// Returns persistence errors from the repository.
    pub async fn list(&self, workspace_id: WorkspaceId) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.tasks.list_by_workspace(workspace_id).await?)
    }

    /// Claims a `todo` task (`todo → in-progress`).
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`], domain transition errors, or
    /// persistence errors.
    pub async fn claim(&self, task_id: TaskId, acting: &UserId) -> TaskLifecycleResult<Task> {
        let clock = &*self.clock;
        self.apply(task_id, acting, |task, role| task.claim(acting, role, clock))
            .await
    }

    /// Submits claimed work for verification
    /// (`in-progress → pending-verification`).
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`], domain transition errors, or
    /// persistence errors.
    pub async fn mark_complete(
        &self,
        task_id: TaskId,
        acting: &UserId,
    ) -> TaskLifecycleResult<Task> {
        let clock = &*self.clock;
        self.apply(task_id, acting, |task, role| {
            task.mark_complete(acting, role, clock)
        })
        .await
    }

    /// Approves work awaiting verification
    /// (`pending-verification → completed`).
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`], domain transition errors, or
    /// persistence errors.
    pub async fn approve(&self, task_id: TaskId, acting: &UserId) -> TaskLifecycleResult<Task> {
        let clock = &*self.clock;
        self.apply(task_id, acting, |task, role| task.approve(acting, role, clock))
            .await
    }

    /// Rejects work awaiting verification
    /// (`pending-verification → in-progress`).
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`], domain transition errors, or
    /// persistence errors.
    pub async fn reject(&self, task_id: TaskId, acting: &UserId) -> TaskLifecycleResult<Task> {
        let clock = &*self.clock;
        self.apply(task_id, acting, |task, role| task.reject(acting, role, clock))
            .await
    }

    /// Releases a task back to `todo`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`], domain transition errors, or
    /// persistence errors.
    pub async fn release(&self, task_id: TaskId, acting: &UserId) -> TaskLifecycleResult<Task> {
        let clock = &*self.clock;
        self.apply(task_id, acting, |task, role| task.release(acting, role, clock))
            .await
    }

    /// Edits title, description, priority or due date.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`], domain authorisation errors,
    /// or persistence errors.
    pub async fn update_details(
        &self,
        task_id: TaskId,
        acting: &UserId,
        patch: TaskPatch,
    ) -> TaskLifecycleResult<Task> {
        let clock = &*self.clock;
        self.apply(task_id, acting, |task, role| {
            task.update_details(acting, role, patch, clock)
        })
        .await
    }

    /// Assigns a task to a member on behalf of an admin or the owner.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`], workspace role errors when
    /// `acting` is not an admin or `assignee` is not a member, or persistence
    /// errors.
    pub async fn assign(
        &self,
        task_id: TaskId,
        acting: &UserId,
        assignee: &UserId,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.find(task_id).await?;
        let workspace = self.workspace(task.workspace_id()).await?;
        workspace.require_admin(acting)?;
        if workspace.role_of(assignee).is_none() {
            return Err(WorkspaceDomainError::MemberNotFound {
                workspace_id: workspace.id(),
                user_id: assignee.clone(),
            }
            .into());
        }

        task.assign_to(assignee.clone(), Actor::Member(acting.clone()), &*self.clock);
        self.save(&mut task).await?;
        Ok(task)
    }

    /// Appends a remark to a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`], domain validation errors, or
    /// persistence errors.
    pub async fn add_remark(&self, request: AddRemarkRequest) -> TaskLifecycleResult<RemarkId> {
        let (mut task, role) = self.load_with_role(request.task_id, &request.acting).await?;
        let remark_id = task.add_remark(
            &request.acting,
            role,
            request.user_name,
            request.message,
            request.link,
            &*self.clock,
        )?;
        self.save(&mut task).await?;
        Ok(remark_id)
    }

    /// Deletes a task on behalf of its creator or an admin.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`], domain authorisation errors,
    /// or persistence errors.
    pub async fn delete(&self, task_id: TaskId, acting: &UserId) -> TaskLifecycleResult<()> {
        let (task, role) = self.load_with_role(task_id, acting).await?;
        task.ensure_can_delete(acting, role)?;
        self.tasks.delete(task_id).await?;
        Ok(())
    }

    async fn apply<F>(
        &self,
        task_id: TaskId,
        acting: &UserId,
        mutate: F,
    ) -> TaskLifecycleResult<Task>
    where
        F: FnOnce(&mut Task, Option<Role>) -> Result<(), TaskDomainError> + Send,
    {
        let (mut task, role) = self.load_with_role(task_id, acting).await?;
        mutate(&mut task, role)?;
        self.save(&mut task).await?;
        Ok(task)
    }

    /// Writes `task` against the revision it was read at and moves the
    /// caller's copy to the stored revision.
    async fn save(&self, task: &mut Task) -> TaskLifecycleResult<()> {
        self.tasks.update(task).await?;
        task.advance_revision();
        Ok(())
    }

    async fn load_with_role(
        &self,
        task_id: TaskId,
        acting: &UserId,
    ) -> TaskLifecycleResult<(Task, Option<Role>)> {
        let task = self.find(task_id).await?;
        let role = self.workspace(task.workspace_id()).await?.role_of(acting);
        Ok((task, role))
    }

    async fn workspace(&self, workspace_id: WorkspaceId) -> TaskLifecycleResult<Workspace> {
        self.workspaces
            .find_by_id(workspace_id)
            .await?
            .ok_or(TaskLifecycleError::WorkspaceNotFound(workspace_id))
    }
}
