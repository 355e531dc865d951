//! Step definitions for task verification scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
