//! Workflow aggregate root.

use super::{Action, Trigger, WorkflowDomainError, WorkflowId};
use crate::{user::domain::UserId, workspace::domain::WorkspaceId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Stored automation rule scoped to a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    id: WorkflowId,
    workspace_id: WorkspaceId,
    name: String,
    trigger: Trigger,
    action: Action,
    is_active: bool,
    runs: u64,
    created_by: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_run_at: Option<DateTime<Utc>>,
}

impl Workflow {
    /// Creates an active workflow with no runs.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::EmptyName`] when the name is blank.
    pub fn new(
        workspace_id: WorkspaceId,
        name: impl AsRef<str>,
        trigger: Trigger,
        action: Action,
        created_by: UserId,
        clock: &impl Clock,
    ) -> Result<Self, WorkflowDomainError> {
        let timestamp = clock.utc();
        Ok(Self {
            id: WorkflowId::new(),
            workspace_id,
            name: normalized_name(name.as_ref())?,
            trigger,
            action,
            is_active: true,
            runs: 0,
            created_by,
            created_at: timestamp,
            updated_at: timestamp,
            last_run_at: None,
        })
    }

    /// Returns the workflow identifier.
    #[must_use]
    pub const fn id(&self) -> WorkflowId {
        self.id
    }

    /// Returns the owning workspace.
    #[must_use]
    pub const fn workspace_id(&self) -> WorkspaceId {
        self.workspace_id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the trigger.
    #[must_use]
    pub const fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    /// Returns the action.
    #[must_use]
    pub const fn action(&self) -> &Action {
        &self.action
    }

    /// Returns `true` when the workflow may be dispatched.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    /// Returns the number of dispatches that reached an action handler.
    #[must_use]
    pub const fn runs(&self) -> u64 {
        self.runs
    }

    /// Returns the creating member.
    #[must_use]
    pub const fn created_by(&self) -> &UserId {
        &self.created_by
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

    /// Returns when the workflow last ran.
    #[must_use]
    pub const fn last_run_at(&self) -> Option<DateTime<Utc>> {
        self.last_run_at
    }

    /// Renames the workflow.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowDomainError::EmptyName`] when the name is blank.
    pub fn rename(&mut self, name: &str, clock: &impl Clock) -> Result<(), WorkflowDomainError> {
        self.name = normalized_name(name)?;
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Replaces the trigger.
    pub fn set_trigger(&mut self, trigger: Trigger, clock: &impl Clock) {
        self.trigger = trigger;
        self.updated_at = clock.utc();
    }

    /// Replaces the action.
    pub fn set_action(&mut self, action: Action, clock: &impl Clock) {
        self.action = action;
        self.updated_at = clock.utc();
    }

    /// Enables or disables dispatch.
    pub fn set_active(&mut self, is_active: bool, clock: &impl Clock) {
        self.is_active = is_active;
        self.updated_at = clock.utc();
    }

    /// Counts one dispatch. Stores call this inside their atomic increment.
    pub const fn record_run(&mut self, ran_at: DateTime<Utc>) {
        self.runs = self.runs.saturating_add(1);
        self.last_run_at = Some(ran_at);
    }

    /// Overwrites run statistics with values read from a store.
    pub const fn restore_runs(&mut self, runs: u64, last_run_at: Option<DateTime<Utc>>) {
        self.runs = runs;
        self.last_run_at = last_run_at;
    }
}

fn normalized_name(raw: &str) -> Result<String, WorkflowDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(WorkflowDomainError::EmptyName);
    }
    Ok(trimmed.to_owned())
}
