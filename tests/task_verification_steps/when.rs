//! When steps for task verification BDD scenarios.

use super::world::{TaskVerificationWorld, run_async, user};
use rstest_bdd_macros::when;
use workdeck::task::{domain::Task, services::TaskLifecycleError};

/// Lifecycle action named by a step.
#[derive(Debug, Clone, Copy)]
enum Step {
    Claim,
    MarkComplete,
    Approve,
    Reject,
    Release,
}

fn perform(
    world: &mut TaskVerificationWorld,
    actor: &str,
    step: Step,
) -> Result<(), eyre::Report> {
    let task_id = world.current_task()?.id();
    let acting = user(actor)?;
    let service = &world.service;
    let result: Result<Task, TaskLifecycleError> = run_async(async {
        match step {
            Step::Claim => service.claim(task_id, &acting).await,
            Step::MarkComplete => service.mark_complete(task_id, &acting).await,
            Step::Approve => service.approve(task_id, &acting).await,
            Step::Reject => service.reject(task_id, &acting).await,
            Step::Release => service.release(task_id, &acting).await,
        }
    });
    if let Ok(ref updated) = result {
        world.task = Some(updated.clone());
    }
    world.last_result = Some(result);
    Ok(())
}

#[when(r#""{actor}" claims the task"#)]
fn claims(world: &mut TaskVerificationWorld, actor: String) -> Result<(), eyre::Report> {
    perform(world, &actor, Step::Claim)
}

#[when(r#""{actor}" marks the task complete"#)]
fn marks_complete(world: &mut TaskVerificationWorld, actor: String) -> Result<(), eyre::Report> {
    perform(world, &actor, Step::MarkComplete)
}

#[when(r#""{actor}" approves the task"#)]
fn approves(world: &mut TaskVerificationWorld, actor: String) -> Result<(), eyre::Report> {
    perform(world, &actor, Step::Approve)
}

#[when(r#""{actor}" rejects the task"#)]
fn rejects(world: &mut TaskVerificationWorld, actor: String) -> Result<(), eyre::Report> {
    perform(world, &actor, Step::Reject)
}

#[when(r#""{actor}" releases the task"#)]
fn releases(world: &mut TaskVerificationWorld, actor: String) -> Result<(), eyre::Report> {
    perform(world, &actor, Step::Release)
}
