//! Application services for task lifecycle orchestration.

mod lifecycle;

pub use lifecycle::{
    AddRemarkRequest, CreateTaskRequest, TaskLifecycleError, TaskLifecycleResult,
    TaskLifecycleService,
};
