//! Task lifecycle management.
//!
//! Tasks move through `todo → in-progress → pending-verification →
//! completed` under claim and verification rules enforced by the domain
//! aggregate, whichever caller drives the change. The module follows
//! hexagonal architecture:
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
