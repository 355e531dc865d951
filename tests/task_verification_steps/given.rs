//! Given steps for task verification BDD scenarios.

use super::world::{TaskVerificationWorld, run_async, user};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use workdeck::task::services::CreateTaskRequest;

#[given(r#"a crew workspace with admin "{admin}" and members "{first}" and "{second}""#)]
fn crew_workspace(
    world: &mut TaskVerificationWorld,
    admin: String,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    run_async(world.seed_crew(&admin, [first.as_str(), second.as_str()]))
        .wrap_err("seed scenario workspace")
}

#[given(r#"a task "{title}" created by "{creator}""#)]
fn task_created_by(
    world: &mut TaskVerificationWorld,
    title: String,
    creator: String,
) -> Result<(), eyre::Report> {
    let project_id = world
        .project
        .as_ref()
        .map(workdeck::project::domain::Project::id)
        .ok_or_else(|| eyre::eyre!("missing project in scenario world"))?;
    let request = CreateTaskRequest::new(project_id, user(&creator)?, title);
    let created = run_async(world.service.create(request)).wrap_err("create scenario task")?;
    world.task = Some(created);
    Ok(())
}
