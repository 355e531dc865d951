//! Projects group tasks inside a workspace.
//!
//! The workflow engine only needs to know which projects exist in a
//! workspace (the `create-task` action files its task under one), so the
//! module stays deliberately small.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
