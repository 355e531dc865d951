//! Least-busy assignment.
//!
//! Picks the member with the fewest open tasks from a candidate list. Ties go
//! to the earliest candidate, so the outcome depends only on candidate order
//! and the workload map. Both the workflow `assign-task` action and the AI
//! bulk auto-assign go through [`LeastBusyAssigner`].

mod selector;
mod workload;

pub use selector::{AssignmentError, LeastBusyAssigner, select_assignee};
pub use workload::WorkloadMap;
