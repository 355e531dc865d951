//! In-memory integration tests for workflow management and dispatch.

use eyre::{bail, ensure};
use rstest::rstest;
use workdeck::{
    task::{domain::Actor, services::CreateTaskRequest},
    workflow::{
        domain::{Action, ActionType, ExecutionContext, HttpMethod, Trigger, WorkflowEvent},
        services::WorkflowUpdate,
    },
};

use super::helpers::{ADMIN, Deck, OWNER, deck, user};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn completion_reminds_the_assignee(#[future] deck: Deck) -> eyre::Result<()> {
    let deck = deck.await;
    let workflow = deck
        .workflows
        .create(
            deck.workspace.id(),
            &user(ADMIN),
            "Thank the finisher",
            Trigger::task_event("completed"),
            Action::new(ActionType::SendEmail),
        )
        .await?;
    let task = deck
        .tasks
        .create(CreateTaskRequest::new(deck.project.id(), user(ADMIN), "Seal hatch"))
        .await?;
    deck.tasks.assign(task.id(), &user(ADMIN), &user("max")).await?;
    deck.tasks.claim(task.id(), &user("max")).await?;
    deck.tasks.mark_complete(task.id(), &user("max")).await?;
    deck.tasks.approve(task.id(), &user(ADMIN)).await?;

    let context = ExecutionContext::new(deck.workspace.id())
        .triggered_by(user(ADMIN))
        .with_task(task.id())
        .with_project(deck.project.id());
    let reports = deck
        .dispatcher
        .dispatch_named("task-completed", &context)
        .await?;

    let [report] = reports.as_slice() else {
        bail!("expected one report, got {reports:?}");
    };
    ensure!(report.outcome.success, "outcome: {}", report.outcome.message);
    let sent = deck.mailer.sent()?;
    let [email] = sent.as_slice() else {
        bail!("expected one reminder, got {}", sent.len());
    };
    ensure!(email.to == "max@deck.example", "sent to the assignee");
    ensure!(
        email.body.contains(&format!("https://deck.example/tasks/{}", task.id())),
        "configured base url used"
    );
    ensure!(deck.workflows.find(workflow.id()).await?.runs() == 1, "run counted");

    let unrelated = deck.dispatcher.dispatch_named("task-created", &context).await?;
    ensure!(unrelated.is_empty(), "other events do not fire");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn new_tasks_are_balanced_by_workflow(#[future] deck: Deck) -> eyre::Result<()> {
    let deck = deck.await;
    deck.workflows
        .create(
            deck.workspace.id(),
            &user(OWNER),
            "Auto-route",
            Trigger::task_event("created"),
            Action::new(ActionType::AssignTask),
        )
        .await?;

    let mut assignees = Vec::new();
    for title in ["Check valves", "Check seals", "Check wiring", "Check cameras"] {
        let task = deck
            .tasks
            .create(CreateTaskRequest::new(deck.project.id(), user("mia"), title))
            .await?;
        let context = ExecutionContext::new(deck.workspace.id()).with_task(task.id());
        deck.dispatcher
            .dispatch(WorkflowEvent::TaskCreated, &context)
            .await?;
        let stored = deck.tasks.find(task.id()).await?;
        ensure!(stored.assigned_by() == Some(&Actor::Workflow), "workflow attribution");
        assignees.push(stored.assigned_to().cloned());
    }

    let expected: Vec<_> = ["olga", "adam", "mia", "max"]
        .into_iter()
        .map(|id| Some(user(id)))
        .collect();
    ensure!(assignees == expected, "round-robin by workload, got {assignees:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn paused_workflows_stay_quiet_until_resumed(#[future] deck: Deck) -> eyre::Result<()> {
    let deck = deck.await;
    let workflow = deck
        .workflows
        .create(
            deck.workspace.id(),
            &user(ADMIN),
            "Notify CI",
            Trigger::task_event("created"),
            Action::webhook("https://ci.deck.example/hooks/tasks", None),
        )
        .await?;
    deck.workflows
        .set_active(workflow.id(), &user(ADMIN), false)
        .await?;
    let context = ExecutionContext::new(deck.workspace.id());

    let quiet = deck
        .dispatcher
        .dispatch(WorkflowEvent::TaskCreated, &context)
        .await?;
    ensure!(quiet.is_empty(), "paused workflow skipped");
    ensure!(deck.webhooks.requests().is_empty(), "no call made");

    deck.workflows
        .set_active(workflow.id(), &user(OWNER), true)
        .await?;
    deck.workflows
        .update(
            workflow.id(),
            &user(OWNER),
            WorkflowUpdate::new().action(Action::webhook(
                "https://ci.deck.example/hooks/tasks",
                Some(HttpMethod::Patch),
            )),
        )
        .await?;
    let reports = deck
        .dispatcher
        .dispatch(WorkflowEvent::TaskCreated, &context)
        .await?;

    ensure!(
        reports.iter().all(|report| report.outcome.success),
        "webhook accepted: {reports:?}"
    );
    let requests = deck.webhooks.requests();
    let [request] = requests.as_slice() else {
        bail!("expected one webhook call, got {}", requests.len());
    };
    ensure!(request.method == HttpMethod::Patch, "configured method used");
    ensure!(request.body["workflow"] == "Notify CI", "payload names workflow");
    ensure!(
        request.body["workspaceId"] == deck.workspace.id().to_string(),
        "payload names workspace"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn create_task_action_files_under_first_project(#[future] deck: Deck) -> eyre::Result<()> {
    let deck = deck.await;
    deck.workflows
        .create(
            deck.workspace.id(),
            &user(ADMIN),
            "Follow-up",
            Trigger::task_event("completed"),
            Action::new(ActionType::CreateTask),
        )
        .await?;

    let reports = deck
        .dispatcher
        .dispatch(
            WorkflowEvent::TaskCompleted,
            &ExecutionContext::new(deck.workspace.id()),
        )
        .await?;

    ensure!(
        reports.first().is_some_and(|report| report.outcome.success),
        "task created: {reports:?}"
    );
    let tasks = deck.tasks.list(deck.workspace.id()).await?;
    let [task] = tasks.as_slice() else {
        bail!("expected one task, got {}", tasks.len());
    };
    ensure!(task.project_id() == deck.project.id(), "filed under the project");
    ensure!(task.title().contains("Follow-up"), "title names the workflow");
    Ok(())
}
