//! Then steps for workflow dispatch BDD scenarios.

use super::world::{DispatchWorld, run_async};
use rstest_bdd_macros::then;
use workdeck::workflow::services::DispatchReport;

fn report_for<'a>(
    world: &'a DispatchWorld,
    name: &str,
) -> Result<&'a DispatchReport, eyre::Report> {
    let workflow_id = world.workflow(name)?.id();
    world
        .reports
        .iter()
        .find(|report| report.workflow_id == workflow_id)
        .ok_or_else(|| eyre::eyre!("workflow {name} did not run: {:?}", world.reports))
}

#[then(r#"workflow "{name}" reports success"#)]
fn reports_success(world: &DispatchWorld, name: String) -> Result<(), eyre::Report> {
    let report = report_for(world, &name)?;
    eyre::ensure!(report.outcome.success, "outcome: {}", report.outcome.message);
    Ok(())
}

#[then(r#"workflow "{name}" reports failure "{message}""#)]
fn reports_failure(
    world: &DispatchWorld,
    name: String,
    message: String,
) -> Result<(), eyre::Report> {
    let report = report_for(world, &name)?;
    eyre::ensure!(!report.outcome.success, "expected a failure");
    eyre::ensure!(
        report.outcome.message == message,
        "expected message {message}, found {}",
        report.outcome.message
    );
    Ok(())
}

#[then(r#"workflow "{name}" has a run count of {runs:u64}"#)]
fn run_count(world: &DispatchWorld, name: String, runs: u64) -> Result<(), eyre::Report> {
    let workflow_id = world.workflow(&name)?.id();
    let stored = run_async(world.workflows.find(workflow_id))?;
    eyre::ensure!(
        stored.runs() == runs,
        "expected {runs} runs, found {}",
        stored.runs()
    );
    Ok(())
}

#[then("no workflow ran")]
fn no_workflow_ran(world: &DispatchWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(world.reports.is_empty(), "unexpected runs: {:?}", world.reports);
    Ok(())
}

#[then("the task has an assignee")]
fn task_has_assignee(world: &DispatchWorld) -> Result<(), eyre::Report> {
    let task_id = world.current_task()?.id();
    let stored = run_async(world.tasks.find(task_id))?;
    eyre::ensure!(stored.assigned_to().is_some(), "task left unassigned");
    Ok(())
}

#[then("the task has no assignee")]
fn task_has_no_assignee(world: &DispatchWorld) -> Result<(), eyre::Report> {
    let task_id = world.current_task()?.id();
    let stored = run_async(world.tasks.find(task_id))?;
    eyre::ensure!(
        stored.assigned_to().is_none(),
        "task assigned to {:?}",
        stored.assigned_to()
    );
    Ok(())
}

#[then("no email was sent")]
fn no_email_sent(world: &DispatchWorld) -> Result<(), eyre::Report> {
    let sent = world.mailer.sent()?;
    eyre::ensure!(sent.is_empty(), "unexpected emails: {}", sent.len());
    Ok(())
}
