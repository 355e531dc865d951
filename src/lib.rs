//! Workdeck: workflow automation and task assignment for shared workspaces.
//!
//! The crate holds the rules behind a multi-tenant project board: the task
//! claim and verification lifecycle, least-busy assignment, and the workflow
//! engine that reacts to task events by sending reminders, assigning or
//! creating tasks, and calling webhooks.
//!
//! # Architecture
//!
//! Each bounded context follows a hexagonal split:
//!
//! - **Domain**: Pure types and rules with no infrastructure dependencies
//! - **Ports**: Async trait interfaces for persistence and outbound calls
//! - **Adapters**: In-memory stores plus SMTP and HTTP clients
//! - **Services**: Orchestration over injected [`store::Stores`]
//!
//! # Modules
//!
//! - [`task`]: Task lifecycle, claims, verification and remarks
//! - [`workflow`]: Workflow definitions, trigger matching and execution
//! - [`assignment`]: Least-busy assignee selection
//! - [`ai`]: AI task records and bulk auto-assignment
//! - [`workspace`]: Workspaces, members and roles
//! - [`project`]: Projects that group tasks
//! - [`user`]: User profiles from the auth provider

pub mod ai;
pub mod assignment;
pub mod config;
pub mod error;
pub mod project;
pub mod store;
pub mod task;
pub mod telemetry;
pub mod user;
pub mod workflow;
pub mod workspace;

#[cfg(test)]
mod test_support;
