//! Unit tests for AI task records and auto-assignment.
