//! Behaviour tests for dispatching task events to workflows.

mod workflow_dispatch_steps;

use rstest_bdd_macros::scenario;
use workflow_dispatch_steps::world::{DispatchWorld, world};

#[scenario(
    path = "tests/features/workflow_dispatch.feature",
    name = "A matching workflow assigns a new task"
)]
#[tokio::test(flavor = "multi_thread")]
async fn matching_workflow_assigns_task(world: DispatchWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/workflow_dispatch.feature",
    name = "Workflows for other events stay idle"
)]
#[tokio::test(flavor = "multi_thread")]
async fn other_events_stay_idle(world: DispatchWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/workflow_dispatch.feature",
    name = "Paused workflows are skipped"
)]
#[tokio::test(flavor = "multi_thread")]
async fn paused_workflows_skipped(world: DispatchWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/workflow_dispatch.feature",
    name = "A reminder without an assignee is a counted failure"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reminder_without_assignee_fails(world: DispatchWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/workflow_dispatch.feature",
    name = "Unknown events run nothing"
)]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_events_run_nothing(world: DispatchWorld) {
    let _ = world;
}
