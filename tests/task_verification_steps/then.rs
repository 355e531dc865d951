//! Then steps for task verification BDD scenarios.

use super::world::{TaskVerificationWorld, run_async, user};
use rstest_bdd_macros::then;
use workdeck::task::domain::TaskStatus;

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &TaskVerificationWorld, status: String) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task_id = world.current_task()?.id();
    let stored = run_async(world.service.find(task_id))?;
    eyre::ensure!(
        stored.status() == expected,
        "expected status {expected}, found {}",
        stored.status()
    );
    Ok(())
}

#[then(r#"the task was verified by "{verifier}""#)]
fn task_verified_by(world: &TaskVerificationWorld, verifier: String) -> Result<(), eyre::Report> {
    let task = world.current_task()?;
    eyre::ensure!(
        task.verified_by() == Some(&user(&verifier)?),
        "expected verifier {verifier}, found {:?}",
        task.verified_by()
    );
    eyre::ensure!(task.completed_at().is_some(), "completion time recorded");
    Ok(())
}

#[then(r#"the task is claimed by "{claimant}""#)]
fn task_claimed_by(world: &TaskVerificationWorld, claimant: String) -> Result<(), eyre::Report> {
    let task = world.current_task()?;
    eyre::ensure!(
        task.claimed_by() == Some(&user(&claimant)?),
        "expected claimant {claimant}, found {:?}",
        task.claimed_by()
    );
    Ok(())
}

#[then("the task is unclaimed")]
fn task_unclaimed(world: &TaskVerificationWorld) -> Result<(), eyre::Report> {
    let task = world.current_task()?;
    eyre::ensure!(
        task.claimed_by().is_none() && task.claimed_at().is_none() && task.completed_at().is_none(),
        "claim markers remain: {task:?}"
    );
    Ok(())
}

#[then(r#"the last action is rejected as "{kind}""#)]
fn last_action_rejected(world: &TaskVerificationWorld, kind: String) -> Result<(), eyre::Report> {
    let result = world
        .last_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing action result"))?;
    match result {
        Err(err) if err.kind().as_str() == kind => Ok(()),
        other => Err(eyre::eyre!("expected {kind} rejection, got {other:?}")),
    }
}
