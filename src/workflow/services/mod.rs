//! Application services for workflow automation.

mod dispatcher;
mod executor;
mod management;
mod reminder;

pub use dispatcher::{
    DispatchReport, WorkflowDispatchError, WorkflowDispatchResult, WorkflowDispatcher,
};
pub use executor::{
    GENERIC_FAILURE_MESSAGE, WorkflowExecutionError, WorkflowExecutionResult, WorkflowExecutor,
};
pub use management::{WorkflowService, WorkflowServiceError, WorkflowServiceResult, WorkflowUpdate};
pub use reminder::{ReminderError, ReminderRenderer};
