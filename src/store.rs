//! Bundle of repository handles shared by the engine's services.

use crate::{
    ai::{adapters::memory::InMemoryAiTaskRepository, ports::AiTaskRepository},
    project::{adapters::memory::InMemoryProjectRepository, ports::ProjectRepository},
    task::{adapters::memory::InMemoryTaskRepository, ports::TaskRepository},
    user::{adapters::memory::InMemoryUserDirectory, ports::UserDirectory},
    workflow::{adapters::memory::InMemoryWorkflowRepository, ports::WorkflowRepository},
    workspace::{adapters::memory::InMemoryWorkspaceRepository, ports::WorkspaceRepository},
};
use std::sync::Arc;

/// Repository handles for every persisted collection.
///
/// Cloning shares the underlying stores.
#[derive(Clone)]
pub struct Stores {
    /// User profiles.
    pub users: Arc<dyn UserDirectory>,
    /// Workspaces and their member lists.
    pub workspaces: Arc<dyn WorkspaceRepository>,
    /// Projects.
    pub projects: Arc<dyn ProjectRepository>,
    /// Tasks.
    pub tasks: Arc<dyn TaskRepository>,
    /// Workflow definitions.
    pub workflows: Arc<dyn WorkflowRepository>,
    /// AI action records.
    pub ai_tasks: Arc<dyn AiTaskRepository>,
}

impl Stores {
    /// Creates a bundle backed by fresh in-memory adapters.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserDirectory::new()),
            workspaces: Arc::new(InMemoryWorkspaceRepository::new()),
            projects: Arc::new(InMemoryProjectRepository::new()),
            tasks: Arc::new(InMemoryTaskRepository::new()),
            workflows: Arc::new(InMemoryWorkflowRepository::new()),
            ai_tasks: Arc::new(InMemoryAiTaskRepository::new()),
        }
    }
}
