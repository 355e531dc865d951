//! Shared test helpers for in-memory integration tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mockable::DefaultClock;
use rstest::fixture;
use workdeck::{
    ai::services::AiActionService,
    config::EngineConfig,
    project::{domain::Project, services::ProjectService},
    store::Stores,
    task::services::TaskLifecycleService,
    user::domain::{UserId, UserProfile},
    workflow::{
        adapters::memory::RecordingMailer,
        ports::{WebhookClient, WebhookRequest, WebhookResponse, WebhookResult},
        services::{ReminderRenderer, WorkflowDispatcher, WorkflowExecutor, WorkflowService},
    },
    workspace::{
        domain::{Role, Workspace},
        services::WorkspaceService,
    },
};

/// Owner of the fixture workspace.
pub const OWNER: &str = "olga";
/// Admin of the fixture workspace.
pub const ADMIN: &str = "adam";
/// Plain members of the fixture workspace, in join order.
pub const MEMBERS: [&str; 2] = ["mia", "max"];

/// Builds a user identifier.
///
/// # Panics
///
/// Panics when `id` is blank.
pub fn user(id: &str) -> UserId {
    UserId::new(id).expect("valid user id")
}

/// Webhook client that records requests and answers with a fixed status.
#[derive(Debug, Clone)]
pub struct RecordingWebhooks {
    status: u16,
    requests: Arc<Mutex<Vec<WebhookRequest>>>,
}

impl RecordingWebhooks {
    /// Creates a client answering every call with `status`.
    pub fn answering(status: u16) -> Self {
        Self {
            status,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns the requests received so far.
    ///
    /// # Panics
    ///
    /// Panics when the request log is poisoned.
    pub fn requests(&self) -> Vec<WebhookRequest> {
        self.requests.lock().expect("request log").clone()
    }
}

#[async_trait]
impl WebhookClient for RecordingWebhooks {
    async fn send(&self, request: &WebhookRequest) -> WebhookResult<WebhookResponse> {
        self.requests
            .lock()
            .expect("request log")
            .push(request.clone());
        Ok(WebhookResponse {
            status: self.status,
        })
    }
}

/// A workspace with an admin, two members, one project and every service
/// wired to shared in-memory stores.
pub struct Deck {
    /// Shared stores.
    pub stores: Stores,
    /// Workspace under test.
    pub workspace: Workspace,
    /// Project tasks are filed under.
    pub project: Project,
    /// Task lifecycle service.
    pub tasks: TaskLifecycleService<DefaultClock>,
    /// Workflow management service.
    pub workflows: WorkflowService<DefaultClock>,
    /// Event dispatcher.
    pub dispatcher: WorkflowDispatcher<DefaultClock>,
    /// AI action service.
    pub ai: AiActionService<DefaultClock>,
    /// Outbox of reminder emails.
    pub mailer: RecordingMailer,
    /// Log of webhook calls.
    pub webhooks: RecordingWebhooks,
}

/// Provides a fully wired deck.
///
/// # Panics
///
/// Panics when fixture setup fails.
#[fixture]
pub async fn deck() -> Deck {
    let config = EngineConfig::from_toml_str(
        "[assignment]\nbatch_cap = 4\n\n[notifications]\napp_base_url = \"https://deck.example/\"\n",
    )
    .expect("fixture configuration parses");
    let stores = Stores::in_memory();
    let clock = Arc::new(DefaultClock);

    let workspace_service =
        WorkspaceService::new(Arc::clone(&stores.workspaces), Arc::clone(&clock));
    let created = workspace_service
        .create("Launch crew", user(OWNER))
        .await
        .expect("workspace creation should succeed");
    for member in std::iter::once(ADMIN).chain(MEMBERS) {
        workspace_service
            .join_by_code(created.invite_code().as_str(), user(member))
            .await
            .expect("join should succeed");
    }
    workspace_service
        .change_role(created.id(), &user(OWNER), &user(ADMIN), Role::Admin)
        .await
        .expect("owner may promote");
    let workspace = workspace_service
        .find(created.id())
        .await
        .expect("workspace should exist");

    for id in [OWNER, ADMIN].into_iter().chain(MEMBERS) {
        let profile = UserProfile::new(user(id), id.to_uppercase())
            .with_email(format!("{id}@deck.example"));
        stores
            .users
            .upsert(&profile)
            .await
            .expect("profile upsert should succeed");
    }

    let project = ProjectService::new(
        Arc::clone(&stores.projects),
        Arc::clone(&stores.workspaces),
        Arc::clone(&clock),
    )
    .create(workspace.id(), &user(ADMIN), "Rocket", None)
    .await
    .expect("project creation should succeed");

    let mailer = RecordingMailer::new();
    let webhooks = RecordingWebhooks::answering(202);
    let executor = WorkflowExecutor::new(
        stores.clone(),
        Arc::new(mailer.clone()),
        Arc::new(webhooks.clone()),
        ReminderRenderer::from_config(&config.notifications),
        Arc::clone(&clock),
    );

    Deck {
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
        ai: AiActionService::new(&stores, &config.assignment, clock),
        stores,
        workspace,
        project,
        mailer,
        webhooks,
    }
}
