//! Helpers shared by unit tests across contexts.

use async_trait::async_trait;

use crate::{
    task::{
        domain::{Task, TaskId},
        ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
    },
    user::domain::UserId,
    workspace::domain::WorkspaceId,
};

pub fn user(id: &str) -> UserId {
    UserId::new(id).expect("valid user id")
}

/// Task store whose every operation fails.
pub struct UnavailableTasks;

fn offline() -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other("task store offline"))
}

#[async_trait]
impl TaskRepository for UnavailableTasks {
    async fn store(&self, _task: &Task) -> TaskRepositoryResult<()> {
        Err(offline())
    }

    async fn update(&self, _task: &Task) -> TaskRepositoryResult<()> {
        Err(offline())
    }

    async fn find_by_id(&self, _id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        Err(offline())
    }

    async fn list_by_workspace(
        &self,
        _workspace_id: WorkspaceId,
    ) -> TaskRepositoryResult<Vec<Task>> {
        Err(offline())
    }

    async fn list_open_by_workspace(
        &self,
        _workspace_id: WorkspaceId,
    ) -> TaskRepositoryResult<Vec<Task>> {
        Err(offline())
    }

    async fn delete(&self, _id: TaskId) -> TaskRepositoryResult<()> {
        Err(offline())
    }
}
