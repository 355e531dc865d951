//! Error types for workflow domain validation and parsing.

use crate::error::ErrorKind;
use thiserror::Error;

/// Errors returned by workflow domain operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkflowDomainError {
    /// The workflow name is empty after trimming.
    #[error("workflow name must not be empty")]
    EmptyName,
}

impl WorkflowDomainError {
    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyName => ErrorKind::Validation,
        }
    }
}

/// Error returned for event names outside the known set.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown workflow event: {0}")]
pub struct ParseWorkflowEventError(pub String);

/// Error returned for unsupported webhook methods.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unsupported webhook method: {0}")]
pub struct ParseHttpMethodError(pub String);
