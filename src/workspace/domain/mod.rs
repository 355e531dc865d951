//! Domain model for workspaces and their members.

mod error;
mod ids;
mod member;
mod workspace;

pub use error::{ParseRoleError, WorkspaceDomainError};
pub use ids::{INVITE_CODE_LENGTH, InviteCode, WorkspaceId};
pub use member::{Member, Role};
pub use workspace::Workspace;
