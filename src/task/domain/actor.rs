//! Attribution of task writes to members or automation.

use super::ParseActorError;
use crate::user::domain::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel stored for writes made by the AI auto-assign action.
pub const AI_ACTOR: &str = "ai";
/// Sentinel stored for writes made by a workflow action.
pub const WORKFLOW_ACTOR: &str = "workflow";

/// Who performed an attributed write (`createdBy`, `assignedBy`).
///
/// Serialised as a bare string: a member id, or one of the `ai` and
/// `workflow` sentinels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Actor {
    /// A workspace member.
    Member(UserId),
    /// The AI action orchestrator.
    Ai,
    /// A workflow action.
    Workflow,
}

impl Actor {
    /// Returns the member identifier when the actor is a person.
    #[must_use]
    pub const fn member(&self) -> Option<&UserId> {
        match self {
            Self::Member(user_id) => Some(user_id),
            Self::Ai | Self::Workflow => None,
        }
    }

    /// Returns `true` when the actor is the given member.
    #[must_use]
    pub fn is_member(&self, user_id: &UserId) -> bool {
        self.member() == Some(user_id)
    }
}

impl From<UserId> for Actor {
    fn from(value: UserId) -> Self {
        Self::Member(value)
    }
}

impl TryFrom<String> for Actor {
    type Error = ParseActorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            AI_ACTOR => Ok(Self::Ai),
            WORKFLOW_ACTOR => Ok(Self::Workflow),
            _ => UserId::new(value.as_str())
                .map(Self::Member)
                .map_err(|_| ParseActorError(value)),
        }
    }
}

impl From<Actor> for String {
    fn from(value: Actor) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Member(user_id) => f.write_str(user_id.as_str()),
            Self::Ai => f.write_str(AI_ACTOR),
            Self::Workflow => f.write_str(WORKFLOW_ACTOR),
        }
    }
}
