//! Caller-facing error taxonomy shared by every bounded context.
//!
//! Each service error maps onto an [`ErrorKind`] through its `kind()`
//! accessor, so transport layers can translate failures without matching on
//! every context-specific variant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A referenced task, workflow, project, workspace or user is absent.
    NotFound,
    /// The acting user lacks the role or ownership the operation requires.
    Forbidden,
    /// Required input is missing or a requested transition is illegal.
    Validation,
    /// A conditional write lost against a concurrent modification.
    Conflict,
    /// A collaborator or store faulted.
    Unavailable,
}

impl ErrorKind {
    /// Returns the canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::Validation => "validation",
            Self::Conflict => "conflict",
            Self::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
