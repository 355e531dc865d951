//! Assignee selection.

use super::WorkloadMap;
use crate::{error::ErrorKind, user::domain::UserId};
use thiserror::Error;

/// Errors raised while selecting an assignee.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum AssignmentError {
    /// The candidate list is empty.
    #[error("no candidates available for assignment")]
    NoCandidates,
}

impl AssignmentError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(self) -> ErrorKind {
        match self {
            Self::NoCandidates => ErrorKind::Validation,
        }
    }
}

/// Returns the candidate with the fewest open tasks.
///
/// The first candidate holding the minimum count wins.
///
/// # Errors
///
/// Returns [`AssignmentError::NoCandidates`] when `candidates` is empty.
pub fn select_assignee<'a>(
    candidates: &'a [UserId],
    workload: &WorkloadMap,
) -> Result<&'a UserId, AssignmentError> {
    candidates
        .iter()
        .min_by_key(|candidate| workload.count(candidate))
        .ok_or(AssignmentError::NoCandidates)
}

/// Stateful selector for a batch of assignments.
///
/// Every pick is recorded in the working map before the next one, so a batch
/// spreads across members instead of piling onto the initial minimum.
#[derive(Debug, Clone)]
pub struct LeastBusyAssigner {
    candidates: Vec<UserId>,
    workload: WorkloadMap,
}

impl LeastBusyAssigner {
    /// Creates an assigner over `candidates` in their given order.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentError::NoCandidates`] when `candidates` is empty.
    pub fn new(candidates: Vec<UserId>, workload: WorkloadMap) -> Result<Self, AssignmentError> {
        if candidates.is_empty() {
            return Err(AssignmentError::NoCandidates);
        }
        Ok(Self {
            candidates,
            workload,
        })
    }

    /// Picks the next assignee and records the assignment.
    ///
    /// # Errors
    ///
    /// Returns [`AssignmentError::NoCandidates`] when the candidate list is
    /// empty, which construction already rules out.
    pub fn assign_next(&mut self) -> Result<UserId, AssignmentError> {
        let chosen = select_assignee(&self.candidates, &self.workload)?.clone();
        self.workload.record_assignment(&chosen);
        Ok(chosen)
    }

    /// Returns the working map including assignments made so far.
    #[must_use]
    pub const fn workload(&self) -> &WorkloadMap {
        &self.workload
    }
}
