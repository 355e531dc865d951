//! Open-task counts per member.

use crate::{task::domain::Task, user::domain::UserId};
use std::collections::HashMap;

/// Number of open tasks currently assigned to each member.
///
/// Members absent from the map have no open tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkloadMap {
    counts: HashMap<UserId, u32>,
}

impl WorkloadMap {
    /// Creates an empty workload map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts open tasks by assignee. Completed and unassigned tasks are
    /// ignored.
    pub fn from_open_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut workload = Self::new();
        for assignee in tasks
            .into_iter()
            .filter(|task| task.status().is_open())
            .filter_map(Task::assigned_to)
        {
            workload.record_assignment(assignee);
        }
        workload
    }

    /// Returns the open-task count for `member`.
    #[must_use]
    pub fn count(&self, member: &UserId) -> u32 {
        self.counts.get(member).copied().unwrap_or_default()
    }

    /// Counts one more open task for `member`.
    pub fn record_assignment(&mut self, member: &UserId) {
        let entry = self.counts.entry(member.clone()).or_default();
        *entry = entry.saturating_add(1);
    }
}

impl FromIterator<(UserId, u32)> for WorkloadMap {
    fn from_iter<I: IntoIterator<Item = (UserId, u32)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}
