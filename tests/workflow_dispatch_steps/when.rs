//! When steps for workflow dispatch BDD scenarios.

use super::world::{DispatchWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when(r#"the "{event}" event is dispatched"#)]
fn event_dispatched(world: &mut DispatchWorld, event: String) -> Result<(), eyre::Report> {
    let context = world.context()?;
    let reports = run_async(world.dispatcher.dispatch_named(&event, &context))
        .wrap_err("dispatch scenario event")?;
    world.reports = reports;
    Ok(())
}
