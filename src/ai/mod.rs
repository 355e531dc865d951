//! AI action records and the bulk auto-assign action.
//!
//! An [`domain::AiTask`] tracks the progress of one AI-driven operation so
//! that clients can watch it and admins can cancel it. The only action the
//! engine runs itself is bulk auto-assignment, which spreads unassigned
//! `todo` tasks across workspace members with the least-busy algorithm.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
