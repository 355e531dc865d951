//! Port contracts for workspace persistence.

pub mod repository;

pub use repository::{WorkspaceRepository, WorkspaceRepositoryError, WorkspaceRepositoryResult};
