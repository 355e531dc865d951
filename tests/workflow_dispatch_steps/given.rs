//! Given steps for workflow dispatch BDD scenarios.

use super::world::{DispatchWorld, OWNER, run_async, user};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use workdeck::{
    task::services::CreateTaskRequest,
    workflow::domain::{Action, ActionType, Trigger},
};

#[given(r#"a workspace with members "{first}" and "{second}""#)]
fn workspace_with_members(
    world: &mut DispatchWorld,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    run_async(world.seed([first.as_str(), second.as_str()])).wrap_err("seed scenario workspace")
}

#[given(r#"a workflow "{name}" that runs "{action}" on "{status}""#)]
fn workflow_triggered_by(
    world: &mut DispatchWorld,
    name: String,
    action: String,
    status: String,
) -> Result<(), eyre::Report> {
    let workspace_id = world.workspace()?;
    let acting = user(OWNER)?;
    let workflow = run_async(world.workflows.create(
        workspace_id,
        &acting,
        &name,
        Trigger::task_event(status),
        Action::new(ActionType::from(action)),
    ))
    .wrap_err("create scenario workflow")?;
    world.named.insert(name, workflow);
    Ok(())
}

#[given(r#"workflow "{name}" is paused"#)]
fn workflow_paused(world: &mut DispatchWorld, name: String) -> Result<(), eyre::Report> {
    let workflow_id = world.workflow(&name)?.id();
    let acting = user(OWNER)?;
    let paused = run_async(world.workflows.set_active(workflow_id, &acting, false))?;
    world.named.insert(name, paused);
    Ok(())
}

#[given(r#"a new task "{title}""#)]
fn new_task(world: &mut DispatchWorld, title: String) -> Result<(), eyre::Report> {
    let project_id = world
        .project
        .as_ref()
        .map(workdeck::project::domain::Project::id)
        .ok_or_else(|| eyre::eyre!("missing project in scenario world"))?;
    let request = CreateTaskRequest::new(project_id, user(OWNER)?, title);
    let created = run_async(world.tasks.create(request)).wrap_err("create scenario task")?;
    world.task = Some(created);
    Ok(())
}
