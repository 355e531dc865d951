//! Shared world state for task verification BDD scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use workdeck::{
    project::{domain::Project, services::ProjectService},
    store::Stores,
    task::{
        domain::Task,
        services::{TaskLifecycleError, TaskLifecycleService},
    },
    user::domain::UserId,
    workspace::{domain::Role, services::WorkspaceService},
};

/// Owner of every scenario workspace.
pub const OWNER: &str = "olga";

/// Scenario world for task verification behaviour tests.
pub struct TaskVerificationWorld {
    /// Shared in-memory stores.
    pub stores: Stores,
    /// Clock shared by the services.
    pub clock: Arc<DefaultClock>,
    /// Task lifecycle service under test.
    pub service: TaskLifecycleService<DefaultClock>,
    /// Project created by the background step.
    pub project: Option<Project>,
    /// Latest known state of the scenario task.
    pub task: Option<Task>,
    /// Result of the last lifecycle action.
    pub last_result: Option<Result<Task, TaskLifecycleError>>,
}

impl TaskVerificationWorld {
    /// Creates a world over empty stores.
    #[must_use]
    pub fn new() -> Self {
        let stores = Stores::in_memory();
        let clock = Arc::new(DefaultClock);
        let service = TaskLifecycleService::new(
            Arc::clone(&stores.tasks),
            Arc::clone(&stores.workspaces),
            Arc::clone(&stores.projects),
            Arc::clone(&clock),
        );
        Self {
            stores,
            clock,
            service,
            project: None,
            task: None,
            last_result: None,
        }
    }

    /// Creates a workspace owned by [`OWNER`] with one admin and two
    /// members, plus a project to file tasks under.
    ///
    /// # Errors
    ///
    /// Returns an error when any setup call fails.
    pub async fn seed_crew(
        &mut self,
        admin: &str,
        members: [&str; 2],
    ) -> Result<(), eyre::Report> {
        let workspaces =
            WorkspaceService::new(Arc::clone(&self.stores.workspaces), Arc::clone(&self.clock));
        let workspace = workspaces.create("Crew", user(OWNER)?).await?;
        for member in std::iter::once(admin).chain(members) {
            workspaces
                .join_by_code(workspace.invite_code().as_str(), user(member)?)
                .await?;
        }
        workspaces
            .change_role(workspace.id(), &user(OWNER)?, &user(admin)?, Role::Admin)
            .await?;
        let project = ProjectService::new(
            Arc::clone(&self.stores.projects),
            Arc::clone(&self.stores.workspaces),
            Arc::clone(&self.clock),
        )
        .create(workspace.id(), &user(OWNER)?, "Pad", None)
        .await?;
        self.project = Some(project);
        Ok(())
    }

    /// Returns the scenario task.
    ///
    /// # Errors
    ///
    /// Returns an error when no task was created yet.
    pub fn current_task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }
}

impl Default for TaskVerificationWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a user identifier.
///
/// # Errors
///
/// Returns an error when `id` is blank.
pub fn user(id: &str) -> Result<UserId, eyre::Report> {
    UserId::new(id).map_err(|err| eyre::eyre!("invalid user id in scenario: {err}"))
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskVerificationWorld {
    TaskVerificationWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
