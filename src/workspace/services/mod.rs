//! Application services for workspace membership.

mod membership;

pub use membership::{WorkspaceService, WorkspaceServiceError, WorkspaceServiceResult};
