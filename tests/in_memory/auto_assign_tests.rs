//! In-memory integration tests for AI bulk auto-assignment.

use eyre::ensure;
use rstest::rstest;
use workdeck::{
    ai::domain::AiTaskStatus,
    error::ErrorKind,
    task::{domain::Actor, services::CreateTaskRequest},
};

use super::helpers::{ADMIN, Deck, OWNER, deck, user};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn auto_assign_respects_the_configured_cap(#[future] deck: Deck) -> eyre::Result<()> {
    let deck = deck.await;
    for index in 0..6 {
        deck.tasks
            .create(CreateTaskRequest::new(
                deck.project.id(),
                user("mia"),
                format!("Inspect panel {index}"),
            ))
            .await?;
    }

    let record = deck.ai.auto_assign(deck.workspace.id(), &user(ADMIN)).await?;

    ensure!(record.status() == AiTaskStatus::Completed, "status {}", record.status());
    ensure!(
        record.result().is_some_and(|summary| summary["assigned"] == 4),
        "cap of four applied: {:?}",
        record.result()
    );
    let tasks = deck.tasks.list(deck.workspace.id()).await?;
    let by_ai = tasks
        .iter()
        .filter(|task| task.assigned_by() == Some(&Actor::Ai))
        .count();
    ensure!(by_ai == 4, "four tasks assigned by AI, got {by_ai}");
    ensure!(
        tasks.iter().skip(4).all(|task| task.assigned_to().is_none()),
        "newest tasks left for the next run"
    );

    let history = deck.ai.list(deck.workspace.id(), &user("max")).await?;
    ensure!(history.len() == 1, "members can see AI activity");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn members_cannot_run_or_cancel_ai_actions(#[future] deck: Deck) -> eyre::Result<()> {
    let deck = deck.await;
    let denied = deck.ai.auto_assign(deck.workspace.id(), &user("mia")).await;
    ensure!(
        denied.map_err(|err| err.kind()).err() == Some(ErrorKind::Forbidden),
        "members cannot auto-assign"
    );

    let record = deck.ai.auto_assign(deck.workspace.id(), &user(OWNER)).await?;
    let cancel = deck.ai.cancel(record.id(), &user("mia")).await;
    ensure!(
        cancel.map_err(|err| err.kind()).err() == Some(ErrorKind::Forbidden),
        "members cannot cancel"
    );
    Ok(())
}
