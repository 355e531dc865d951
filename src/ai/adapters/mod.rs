//! Adapter implementations for AI task ports.

pub mod memory;
