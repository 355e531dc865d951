//! Domain model for workflow automation.
//!
//! A workflow pairs a trigger with an action inside one workspace. Trigger
//! matching is a closed two-level equality check over [`WorkflowEvent`];
//! stored trigger and action types outside the known sets survive as
//! `Unknown` values so old data never fails to load.

mod action;
mod error;
mod execution;
mod ids;
mod trigger;
mod workflow;

pub use action::{Action, ActionConfig, ActionType, HttpMethod};
pub use error::{ParseHttpMethodError, ParseWorkflowEventError, WorkflowDomainError};
pub use execution::{ExecutionContext, ExecutionOutcome};
pub use ids::WorkflowId;
pub use trigger::{Trigger, TriggerConfig, TriggerType, WorkflowEvent, matches};
pub use workflow::Workflow;
