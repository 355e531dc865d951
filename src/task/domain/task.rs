//! Task aggregate root and its status state machine.
//!
//! Status changes only happen through the transition methods on [`Task`],
//! each of which checks the acting user's workspace role and the claim before
//! touching any field. A failed check leaves the task untouched.
//!
//! ```text
//! todo ──claim──▶ in-progress ──mark_complete──▶ pending-verification ──approve──▶ completed
//!                      ▲                                  │
//!                      └──────────────reject──────────────┘
//! any ──release──▶ todo
//! ```

use super::{Actor, Priority, Remark, RemarkId, TaskDomainError, TaskId, TaskStatus};
use crate::{
    project::domain::ProjectId,
    user::domain::UserId,
    workspace::domain::{Role, WorkspaceId},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    workspace_id: WorkspaceId,
    title: String,
    description: String,
    status: TaskStatus,
    priority: Priority,
    assigned_to: Option<UserId>,
    assigned_by: Option<Actor>,
    created_by: Actor,
    claimed_by: Option<UserId>,
    claimed_at: Option<DateTime<Utc>>,
    pending_verification_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    verified_by: Option<UserId>,
    verified_at: Option<DateTime<Utc>>,
    due_date: Option<DateTime<Utc>>,
    remarks: Vec<Remark>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    revision: u64,
}

/// Parameter object for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    project_id: ProjectId,
    workspace_id: WorkspaceId,
    title: String,
    description: String,
    priority: Priority,
    due_date: Option<DateTime<Utc>>,
    created_by: Actor,
}

impl NewTask {
    /// Creates task parameters with required fields.
    #[must_use]
    pub fn new(
        project_id: ProjectId,
        workspace_id: WorkspaceId,
        title: impl Into<String>,
        created_by: Actor,
    ) -> Self {
        Self {
            project_id,
            workspace_id,
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            due_date: None,
            created_by,
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

/// Field edits that never affect status or claim ownership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    title: Option<String>,
    description: Option<String>,
    priority: Option<Priority>,
    due_date: Option<Option<DateTime<Utc>>>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the priority.
    #[must_use]
    pub const fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Replaces or clears the due date.
    #[must_use]
    pub const fn due_date(mut self, due_date: Option<DateTime<Utc>>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

impl Task {
    /// Creates a task in [`TaskStatus::Todo`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn create(params: NewTask, clock: &impl Clock) -> Result<Self, TaskDomainError> {
        let title = normalized_title(&params.title)?;
        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            project_id: params.project_id,
            workspace_id: params.workspace_id,
            title,
            description: params.description,
            status: TaskStatus::Todo,
            priority: params.priority,
            assigned_to: None,
            assigned_by: None,
            created_by: params.created_by,
            claimed_by: None,
            claimed_at: None,
            pending_verification_at: None,
            completed_at: None,
            verified_by: None,
            verified_at: None,
            due_date: params.due_date,
            remarks: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
            revision: 0,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the owning workspace.
    #[must_use]
    pub const fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the current status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<&UserId> {
        self.assigned_to.as_ref()
    }

    /// Returns who made the current assignment, if any.
    #[must_use]
    pub const fn assigned_by(&self) -> Option<&Actor> {
        self.assigned_by.as_ref()
    }

    /// Returns the creator.
    #[must_use]
    pub const fn created_by(&self) -> &Actor {
        &self.created_by
    }

    /// Returns the member holding the claim, if any.
    #[must_use]
    pub const fn claimed_by(&self) -> Option<&UserId> {
        self.claimed_by.as_ref()
    }

    /// Returns when the current claim was taken.
    #[must_use]
    pub const fn claimed_at(&self) -> Option<DateTime<Utc>> {
        self.claimed_at
    }

    /// Returns when the claimant marked the task complete.
    #[must_use]
    pub const fn pending_verification_at(&self) -> Option<DateTime<Utc>> {
        self.pending_verification_at
    }

    /// Returns when the task was verified complete.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the verifying admin, if any.
    #[must_use]
    pub const fn verified_by(&self) -> Option<&UserId> {
        self.verified_by.as_ref()
    }

    /// Returns when the task was verified.
    #[must_use]
    pub const fn verified_at(&self) -> Option<DateTime<Utc>> {
        self.verified_at
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns remarks in the order they were appended.
    #[must_use]
    pub fn remarks(&self) -> &[Remark] {
        &self.remarks
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the stored revision this copy was read at.
    ///
    /// Stores compare it on every write and advance it on success, so a copy
    /// read before another write can no longer be saved.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Moves the copy to the next revision. Stores call this when a write
    /// succeeds.
    pub const fn advance_revision(&mut self) {
        self.revision = self.revision.saturating_add(1);
    }

    /// Returns `true` when the task is open and its due date has passed.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status.is_open() && self.due_date.is_some_and(|due| due < now)
    }

    /// Claims a `todo` task for `user`, moving it to in-progress.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAMember`] when `role` is `None` and
    /// [`TaskDomainError::InvalidTransition`] unless the task is `todo`.
    pub fn claim(
        &mut self,
        user: &UserId,
        role: Option<Role>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.require_member(user, role)?;
        self.ensure_status(TaskStatus::Todo, TaskStatus::InProgress)?;

        let timestamp = clock.utc();
        self.status = TaskStatus::InProgress;
        self.claimed_by = Some(user.clone());
        self.claimed_at = Some(timestamp);
        self.updated_at = timestamp;
        Ok(())
    }

    /// Submits in-progress work for verification. Only the claimant may do
    /// this, whatever their role.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] unless the task is
    /// in-progress and [`TaskDomainError::NotClaimant`] when `user` does not
    /// hold the claim.
    pub fn mark_complete(
        &mut self,
        user: &UserId,
        role: Option<Role>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.require_member(user, role)?;
        self.ensure_status(TaskStatus::InProgress, TaskStatus::PendingVerification)?;
        if self.claimed_by.as_ref() != Some(user) {
            return Err(TaskDomainError::NotClaimant {
                task_id: self.id,
                user_id: user.clone(),
            });
        }

        let timestamp = clock.utc();
        self.status = TaskStatus::PendingVerification;
        self.pending_verification_at = Some(timestamp);
        self.updated_at = timestamp;
        Ok(())
    }

    /// Approves work awaiting verification, completing the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AdminRequired`] for non-admins and
    /// [`TaskDomainError::InvalidTransition`] unless the task is pending
    /// verification.
    pub fn approve(
        &mut self,
        user: &UserId,
        role: Option<Role>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.require_admin(user, role)?;
        self.ensure_status(TaskStatus::PendingVerification, TaskStatus::Completed)?;

        let timestamp = clock.utc();
        self.status = TaskStatus::Completed;
        self.completed_at = Some(timestamp);
        self.verified_by = Some(user.clone());
        self.verified_at = Some(timestamp);
        self.updated_at = timestamp;
        Ok(())
    }

    /// Rejects work awaiting verification, returning it to the claimant.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::AdminRequired`] for non-admins and
    /// [`TaskDomainError::InvalidTransition`] unless the task is pending
    /// verification.
    pub fn reject(
        &mut self,
        user: &UserId,
        role: Option<Role>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.require_admin(user, role)?;
        self.ensure_status(TaskStatus::PendingVerification, TaskStatus::InProgress)?;

        self.status = TaskStatus::InProgress;
        self.pending_verification_at = None;
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Returns the task to `todo`, dropping the claim and every completion
    /// marker together.
    ///
    /// The claimant or an admin may release a claimed task; reopening a
    /// completed task needs an admin. Releasing a `todo` task is a no-op any
    /// member may perform.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAMember`],
    /// [`TaskDomainError::ClaimedByOther`] or
    /// [`TaskDomainError::AdminRequired`] when `user` may not release it.
    pub fn release(
        &mut self,
        user: &UserId,
        role: Option<Role>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let acting_role = self.require_member(user, role)?;
        if self.status == TaskStatus::Todo {
            return Ok(());
        }
        if self.status == TaskStatus::Completed {
            self.require_admin(user, role)?;
        } else {
            self.ensure_not_claimed_by_other(user, acting_role)?;
        }

        self.status = TaskStatus::Todo;
        self.claimed_by = None;
        self.claimed_at = None;
        self.completed_at = None;
        self.pending_verification_at = None;
        self.verified_by = None;
        self.verified_at = None;
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Applies field edits. Work claimed by someone else may only be edited
    /// by an admin.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAMember`],
    /// [`TaskDomainError::ClaimedByOther`], or
    /// [`TaskDomainError::EmptyTitle`] for a blank replacement title.
    pub fn update_details(
        &mut self,
        user: &UserId,
        role: Option<Role>,
        patch: TaskPatch,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        let acting_role = self.require_member(user, role)?;
        self.ensure_not_claimed_by_other(user, acting_role)?;
        let new_title = patch.title.as_deref().map(normalized_title).transpose()?;

        if let Some(title) = new_title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Records an assignment. Callers decide who may assign; this never
    /// changes status or the claim.
    pub fn assign_to(&mut self, assignee: UserId, assigned_by: Actor, clock: &impl Clock) {
        self.assigned_to = Some(assignee);
        self.assigned_by = Some(assigned_by);
        self.updated_at = clock.utc();
    }

    /// Appends a remark written by a workspace member.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAMember`] or
    /// [`TaskDomainError::EmptyRemark`].
    pub fn add_remark(
        &mut self,
        user: &UserId,
        role: Option<Role>,
        user_name: impl Into<String>,
        message: impl Into<String>,
        link: Option<String>,
        clock: &impl Clock,
    ) -> Result<RemarkId, TaskDomainError> {
        self.require_member(user, role)?;
        let body: String = message.into();
        if body.trim().is_empty() {
            return Err(TaskDomainError::EmptyRemark);
        }

        let timestamp = clock.utc();
        let remark_id = RemarkId::new();
        self.remarks.push(Remark {
            id: remark_id,
            user_id: user.clone(),
            user_name: user_name.into(),
            message: body,
            link: link.filter(|value| !value.trim().is_empty()),
            created_at: timestamp,
        });
        self.updated_at = timestamp;
        Ok(remark_id)
    }

    /// Checks that `user` may delete the task: its creator or an admin.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::NotAMember`] or
    /// [`TaskDomainError::DeleteNotAllowed`].
    pub fn ensure_can_delete(
        &self,
        user: &UserId,
        role: Option<Role>,
    ) -> Result<(), TaskDomainError> {
        let acting_role = self.require_member(user, role)?;
        if acting_role.is_admin() || self.created_by.is_member(user) {
            return Ok(());
        }
        Err(TaskDomainError::DeleteNotAllowed {
            task_id: self.id,
            user_id: user.clone(),
        })
    }

    fn require_member(&self, user: &UserId, role: Option<Role>) -> Result<Role, TaskDomainError> {
        role.ok_or_else(|| TaskDomainError::NotAMember {
            task_id: self.id,
            user_id: user.clone(),
        })
    }

    fn require_admin(&self, user: &UserId, role: Option<Role>) -> Result<(), TaskDomainError> {
        if self.require_member(user, role)?.is_admin() {
            return Ok(());
        }
        Err(TaskDomainError::AdminRequired {
            task_id: self.id,
            user_id: user.clone(),
        })
    }

    fn ensure_not_claimed_by_other(
        &self,
        user: &UserId,
        role: Role,
    ) -> Result<(), TaskDomainError> {
        match &self.claimed_by {
            Some(claimant) if claimant != user && !role.is_admin() => {
                Err(TaskDomainError::ClaimedByOther {
                    task_id: self.id,
                    claimed_by: claimant.clone(),
                })
            }
            _ => Ok(()),
        }
    }

    fn ensure_status(&self, expected: TaskStatus, to: TaskStatus) -> Result<(), TaskDomainError> {
        if self.status == expected {
            return Ok(());
        }
        Err(self.invalid_transition(to))
    }

    const fn invalid_transition(&self, to: TaskStatus) -> TaskDomainError {
        TaskDomainError::InvalidTransition {
            task_id: self.id,
            from: self.status,
            to,
        }
    }
}

fn normalized_title(raw: &str) -> Result<String, TaskDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}
