//! Workspace tenancy and membership.
//!
//! A workspace is the tenant boundary: it owns projects, tasks and workflows
//! and carries the member list from which every authorisation decision in the
//! crate is derived through [`domain::Workspace::role_of`].
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
