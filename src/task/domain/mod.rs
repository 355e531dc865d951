//! Domain model for tasks.
//!
//! The task aggregate owns the status state machine and the claim rules that
//! protect in-flight work. Workspace roles are passed in by callers, so the
//! domain never reaches for a store.

mod actor;
mod error;
mod ids;
mod remark;
mod status;
mod task;

pub use actor::{AI_ACTOR, Actor, WORKFLOW_ACTOR};
pub use error::{ParseActorError, ParsePriorityError, ParseTaskStatusError, TaskDomainError};
pub use ids::{RemarkId, TaskId};
pub use remark::Remark;
pub use status::{Priority, TaskStatus};
pub use task::{NewTask, Task, TaskPatch};
