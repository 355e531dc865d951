//! Shared fixtures for workflow tests.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::DefaultClock;
use mockall::mock;

use crate::{
    project::{domain::Project, services::ProjectService},
    store::Stores,
    task::domain::{Actor, NewTask, Task},
    test_support::user,
    user::domain::UserProfile,
    workflow::{
        adapters::memory::RecordingMailer,
        domain::{Action, Trigger, Workflow},
        ports::{
            MailerResult, ReminderEmail, ReminderMailer, WebhookClient, WebhookRequest,
            WebhookResponse, WebhookResult,
        },
        services::{ReminderRenderer, WorkflowExecutor},
    },
    workspace::{
        domain::{Role, Workspace, WorkspaceId},
        services::WorkspaceService,
    },
};

mock! {
    pub Webhooks {}

    #[async_trait]
    impl WebhookClient for Webhooks {
        async fn send(&self, request: &WebhookRequest) -> WebhookResult<WebhookResponse>;
    }
}

mock! {
    pub Mailer {}

    #[async_trait]
    impl ReminderMailer for Mailer {
        async fn send_reminder(&self, email: &ReminderEmail) -> MailerResult<()>;
    }
}

pub const APP_BASE_URL: &str = "https://deck.test";

/// Workspace owned by `owner` with `admin` promoted and `members` joined.
pub struct Fixture {
    pub stores: Stores,
    pub clock: Arc<DefaultClock>,
    pub workspace: Workspace,
}

impl Fixture {
    pub async fn new(owner: &str, admin: Option<&str>, members: &[&str]) -> Self {
        let stores = Stores::in_memory();
        let clock = Arc::new(DefaultClock);
        let service = WorkspaceService::new(Arc::clone(&stores.workspaces), Arc::clone(&clock));
        let created = service
            .create("Automation", user(owner))
            .await
            .expect("workspace creation should succeed");
        for member in admin.iter().chain(members) {
            service
                .join_by_code(created.invite_code().as_str(), user(member))
                .await
                .expect("join should succeed");
        }
        if let Some(admin_id) = admin {
            service
                .change_role(created.id(), &user(owner), &user(admin_id), Role::Admin)
                .await
                .expect("owner may promote");
        }
        let workspace = service
            .find(created.id())
            .await
            .expect("workspace should exist");
        Self {
            stores,
            clock,
            workspace,
        }
    }

    pub fn workspace_id(&self) -> WorkspaceId {
        self.workspace.id()
    }

    pub async fn with_email(&self, id: &str, email: &str) {
        self.stores
            .users
            .upsert(&UserProfile::new(user(id), id.to_uppercase()).with_email(email))
            .await
            .expect("profile upsert should succeed");
    }

    pub async fn project(&self) -> Project {
        ProjectService::new(
            Arc::clone(&self.stores.projects),
            Arc::clone(&self.stores.workspaces),
            Arc::clone(&self.clock),
        )
        .create(
            self.workspace_id(),
            self.workspace.owner_id(),
            "Operations",
            None,
        )
        .await
        .expect("project creation should succeed")
    }

    pub async fn task(&self, project: &Project, title: &str, assignee: Option<&str>) -> Task {
        self.stored_task(NewTask::new(
            project.id(),
            self.workspace_id(),
            title,
            Actor::Member(self.workspace.owner_id().clone()),
        ), assignee)
        .await
    }

    pub async fn stored_task(&self, params: NewTask, assignee: Option<&str>) -> Task {
        let mut task = Task::create(params, &*self.clock).expect("valid task");
        if let Some(id) = assignee {
            task.assign_to(user(id), Actor::Workflow, &*self.clock);
        }
        self.stores
            .tasks
            .store(&task)
            .await
            .expect("task store should succeed");
        task
    }

    pub async fn workflow(&self, name: &str, trigger: Trigger, action: Action) -> Workflow {
        let workflow = Workflow::new(
            self.workspace_id(),
            name,
            trigger,
            action,
            self.workspace.owner_id().clone(),
            &*self.clock,
        )
        .expect("valid workflow");
        self.stores
            .workflows
            .store(&workflow)
            .await
            .expect("workflow store should succeed");
        workflow
    }

    pub async fn runs(&self, workflow: &Workflow) -> u64 {
        self.stores
            .workflows
            .find_by_id(workflow.id())
            .await
            .expect("workflow lookup should succeed")
            .expect("workflow should exist")
            .runs()
    }

    pub fn executor_with(
        &self,
        mailer: Arc<dyn ReminderMailer>,
        webhooks: Arc<dyn WebhookClient>,
    ) -> WorkflowExecutor<DefaultClock> {
        WorkflowExecutor::new(
            self.stores.clone(),
            mailer,
            webhooks,
            ReminderRenderer::new(APP_BASE_URL),
            Arc::clone(&self.clock),
        )
    }

    /// Executor whose webhook client panics if called.
    pub fn executor(&self, mailer: &RecordingMailer) -> WorkflowExecutor<DefaultClock> {
        self.executor_with(Arc::new(mailer.clone()), Arc::new(MockWebhooks::new()))
    }
}
