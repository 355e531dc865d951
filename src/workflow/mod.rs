//! Workflow automation.
//!
//! Workflows are (trigger, action) rules stored per workspace. Task events are
//! matched against active workflows by the dispatcher, and each match runs its
//! action exactly once through the executor, which reports a uniform
//! `{success, message}` outcome instead of failing the caller.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
