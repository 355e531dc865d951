//! Shared world state for workflow dispatch BDD scenarios.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::fixture;
use workdeck::{
    project::{domain::Project, services::ProjectService},
    store::Stores,
    task::{domain::Task, services::TaskLifecycleService},
    user::domain::{UserId, UserProfile},
    workflow::{
        adapters::memory::RecordingMailer,
        domain::{ExecutionContext, Workflow},
        ports::{WebhookClient, WebhookRequest, WebhookResponse, WebhookResult},
        services::{
            DispatchReport, ReminderRenderer, WorkflowDispatcher, WorkflowExecutor,
            WorkflowService,
        },
    },
    workspace::{domain::WorkspaceId, services::WorkspaceService},
};

/// Owner and acting admin of every scenario workspace.
pub const OWNER: &str = "olga";

/// Webhook client that accepts every call.
#[derive(Debug, Clone, Copy)]
pub struct AcceptingWebhooks;

#[async_trait]
impl WebhookClient for AcceptingWebhooks {
    async fn send(&self, _request: &WebhookRequest) -> WebhookResult<WebhookResponse> {
        Ok(WebhookResponse { status: 200 })
    }
}

/// Scenario world for workflow dispatch behaviour tests.
pub struct DispatchWorld {
    /// Shared in-memory stores.
    pub stores: Stores,
    /// Clock shared by the services.
    pub clock: Arc<DefaultClock>,
    /// Reminder outbox.
    pub mailer: RecordingMailer,
    /// Task lifecycle service.
    pub tasks: TaskLifecycleService<DefaultClock>,
    /// Workflow management service.
    pub workflows: WorkflowService<DefaultClock>,
    /// Dispatcher under test.
    pub dispatcher: WorkflowDispatcher<DefaultClock>,
    /// Workspace created by the background step.
    pub workspace_id: Option<WorkspaceId>,
    /// Project tasks are filed under.
    pub project: Option<Project>,
    /// Workflows by name.
    pub named: HashMap<String, Workflow>,
    /// Scenario task.
    pub task: Option<Task>,
    /// Reports from the last dispatch.
    pub reports: Vec<DispatchReport>,
}

impl DispatchWorld {
    /// Creates a world over empty stores.
    #[must_use]
    pub fn new() -> Self {
        let stores = Stores::in_memory();
        let clock = Arc::new(DefaultClock);
        let mailer = RecordingMailer::new();
        let executor = WorkflowExecutor::new(
            stores.clone(),
            Arc::new(mailer.clone()),
            Arc::new(AcceptingWebhooks),
            ReminderRenderer::new("https://deck.test"),
            Arc::clone(&clock),
        );
        Self {
            tasks: TaskLifecycleService::new(
                Arc::clone(&stores.tasks),
                Arc::clone(&stores.workspaces),
                Arc::clone(&stores.projects),
                Arc::clone(&clock),
            ),
            workflows: WorkflowService::new(
                Arc::clone(&stores.workflows),
                Arc::clone(&stores.workspaces),
                Arc::clone(&clock),
            ),
            dispatcher: WorkflowDispatcher::new(executor, &stores, Arc::clone(&clock)),
            stores,
            clock,
            mailer,
            workspace_id: None,
            project: None,
            named: HashMap::new(),
            task: None,
            reports: Vec::new(),
        }
    }

    /// Creates a workspace owned by [`OWNER`] with the given members, their
    /// profiles, and one project.
    ///
    /// # Errors
    ///
    /// Returns an error when any setup call fails.
    pub async fn seed(&mut self, members: [&str; 2]) -> Result<(), eyre::Report> {
        let workspaces =
            WorkspaceService::new(Arc::clone(&self.stores.workspaces), Arc::clone(&self.clock));
        let workspace = workspaces.create("Pad crew", user(OWNER)?).await?;
        for member in members {
            workspaces
                .join_by_code(workspace.invite_code().as_str(), user(member)?)
                .await?;
        }
        for id in std::iter::once(OWNER).chain(members) {
            let profile =
                UserProfile::new(user(id)?, id.to_owned()).with_email(format!("{id}@deck.test"));
            self.stores.users.upsert(&profile).await?;
        }
        let project = ProjectService::new(
            Arc::clone(&self.stores.projects),
            Arc::clone(&self.stores.workspaces),
            Arc::clone(&self.clock),
        )
        .create(workspace.id(), &user(OWNER)?, "Launch", None)
        .await?;
        self.workspace_id = Some(workspace.id());
        self.project = Some(project);
        Ok(())
    }

    /// Returns the scenario workspace.
    ///
    /// # Errors
    ///
    /// Returns an error before the workspace step ran.
    pub fn workspace(&self) -> Result<WorkspaceId, eyre::Report> {
        self.workspace_id
            .ok_or_else(|| eyre::eyre!("missing workspace in scenario world"))
    }

    /// Returns the scenario task.
    ///
    /// # Errors
    ///
    /// Returns an error before a task was created.
    pub fn current_task(&self) -> Result<&Task, eyre::Report> {
        self.task
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Returns the named workflow.
    ///
    /// # Errors
    ///
    /// Returns an error when no workflow has that name.
    pub fn workflow(&self, name: &str) -> Result<&Workflow, eyre::Report> {
        self.named
            .get(name)
            .ok_or_else(|| eyre::eyre!("unknown workflow {name} in scenario world"))
    }

    /// Builds the execution context for the scenario task.
    ///
    /// # Errors
    ///
    /// Returns an error before the workspace or task exists.
    pub fn context(&self) -> Result<ExecutionContext, eyre::Report> {
        let task = self.current_task()?;
        Ok(ExecutionContext::new(self.workspace()?)
            .triggered_by(user(OWNER)?)
            .with_task(task.id())
            .with_project(task.project_id()))
    }
}

impl Default for DispatchWorld {
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
pub fn world() -> DispatchWorld {
    DispatchWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
