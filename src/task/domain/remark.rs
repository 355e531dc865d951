//! Append-only remarks left on a task.

use super::RemarkId;
use crate::user::domain::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment appended to a task's remark log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remark {
    /// Remark identifier.
    pub id: RemarkId,
    /// Author.
    pub user_id: UserId,
    /// Author display name at the time of writing.
    pub user_name: String,
    /// Remark body.
    pub message: String,
    /// Optional link attached to the remark.
    pub link: Option<String>,
    /// Time the remark was appended.
    pub created_at: DateTime<Utc>,
}
