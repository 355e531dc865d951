//! Port contract for user profile lookup.

use super::domain::{UserId, UserProfile};
use crate::error::ErrorKind;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for user directory operations.
pub type UserDirectoryResult<T> = Result<T, UserDirectoryError>;

/// Read access to user profiles plus the session-sync write path.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Finds a user profile by identifier.
    ///
    /// Returns `None` when the user is unknown.
    async fn find_by_id(&self, id: &UserId) -> UserDirectoryResult<Option<UserProfile>>;

    /// Inserts or replaces a user profile.
    async fn upsert(&self, profile: &UserProfile) -> UserDirectoryResult<()>;
}

/// Errors returned by user directory implementations.
#[derive(Debug, Clone, Error)]
pub enum UserDirectoryError {
    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserDirectoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Persistence(_) => ErrorKind::Unavailable,
        }
    }
}
