//! Unit tests for the workflow module.

mod support;
