//! In-memory integration tests for the task claim and verification flow.

use eyre::ensure;
use rstest::rstest;
use workdeck::{
    error::ErrorKind,
    task::{
        domain::{Actor, TaskPatch, TaskStatus},
        services::CreateTaskRequest,
    },
};

use super::helpers::{ADMIN, Deck, OWNER, deck, user};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn claim_submit_reject_and_approve(#[future] deck: Deck) -> eyre::Result<()> {
    let deck = deck.await;
    let task = deck
        .tasks
        .create(CreateTaskRequest::new(deck.project.id(), user("mia"), "Fuel check"))
        .await?;
    ensure!(task.created_by() == &Actor::Member(user("mia")), "creator recorded");

    let claimed = deck.tasks.claim(task.id(), &user("mia")).await?;
    ensure!(claimed.claimed_at().is_some(), "claim timestamp set");

    let intruder = deck.tasks.mark_complete(task.id(), &user("max")).await;
    ensure!(
        intruder.map_err(|err| err.kind()).err() == Some(ErrorKind::Forbidden),
        "only the claimant may submit"
    );
    let admin_submit = deck.tasks.mark_complete(task.id(), &user(ADMIN)).await;
    ensure!(
        admin_submit.map_err(|err| err.kind()).err() == Some(ErrorKind::Forbidden),
        "admins cannot submit someone else's claim"
    );

    let submitted = deck.tasks.mark_complete(task.id(), &user("mia")).await?;
    ensure!(
        submitted.status() == TaskStatus::PendingVerification,
        "awaiting verification"
    );
    ensure!(submitted.pending_verification_at().is_some(), "submission time set");

    let self_approval = deck.tasks.approve(task.id(), &user("mia")).await;
    ensure!(
        self_approval.map_err(|err| err.kind()).err() == Some(ErrorKind::Forbidden),
        "members cannot verify"
    );

    let rejected = deck.tasks.reject(task.id(), &user(ADMIN)).await?;
    ensure!(rejected.status() == TaskStatus::InProgress, "back to work");
    ensure!(rejected.pending_verification_at().is_none(), "submission cleared");
    ensure!(rejected.claimed_by() == Some(&user("mia")), "claim kept");

    deck.tasks.mark_complete(task.id(), &user("mia")).await?;
    let approved = deck.tasks.approve(task.id(), &user(OWNER)).await?;
    ensure!(approved.status() == TaskStatus::Completed, "completed");
    ensure!(approved.completed_at().is_some(), "completion time set");
    ensure!(approved.verified_by() == Some(&user(OWNER)), "verifier recorded");

    let stored = deck.tasks.find(task.id()).await?;
    ensure!(stored == approved, "final state persisted");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn release_returns_task_to_the_pool(#[future] deck: Deck) -> eyre::Result<()> {
    let deck = deck.await;
    let task = deck
        .tasks
        .create(CreateTaskRequest::new(deck.project.id(), user(ADMIN), "Paint fins"))
        .await?;
    deck.tasks.claim(task.id(), &user("max")).await?;
    deck.tasks.mark_complete(task.id(), &user("max")).await?;

    let by_other = deck.tasks.release(task.id(), &user("mia")).await;
    ensure!(
        by_other.map_err(|err| err.kind()).err() == Some(ErrorKind::Forbidden),
        "other members cannot release a claim"
    );

    let released = deck.tasks.release(task.id(), &user(ADMIN)).await?;
    ensure!(released.status() == TaskStatus::Todo, "back to todo");
    ensure!(
        released.claimed_by().is_none()
            && released.claimed_at().is_none()
            && released.completed_at().is_none()
            && released.pending_verification_at().is_none(),
        "claim markers cleared together"
    );

    let reclaimed = deck.tasks.claim(task.id(), &user("mia")).await?;
    ensure!(reclaimed.claimed_by() == Some(&user("mia")), "free to claim again");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn claimed_work_is_protected_from_edits(#[future] deck: Deck) -> eyre::Result<()> {
    let deck = deck.await;
    let task = deck
        .tasks
        .create(CreateTaskRequest::new(deck.project.id(), user("mia"), "Count bolts"))
        .await?;
    deck.tasks.claim(task.id(), &user("mia")).await?;

    let by_member = deck
        .tasks
        .update_details(task.id(), &user("max"), TaskPatch::new().title("Count nuts"))
        .await;
    ensure!(
        by_member.map_err(|err| err.kind()).err() == Some(ErrorKind::Forbidden),
        "claimed task is protected"
    );

    let by_admin = deck
        .tasks
        .update_details(task.id(), &user(ADMIN), TaskPatch::new().title("Count nuts"))
        .await?;
    ensure!(by_admin.title() == "Count nuts", "admins may edit");
    ensure!(by_admin.status() == TaskStatus::InProgress, "status untouched");
    ensure!(by_admin.claimed_by() == Some(&user("mia")), "claim untouched");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn outsiders_and_missing_tasks_are_rejected(#[future] deck: Deck) -> eyre::Result<()> {
    let deck = deck.await;
    let task = deck
        .tasks
        .create(CreateTaskRequest::new(deck.project.id(), user("mia"), "Sweep pad"))
        .await?;

    let outsider = deck.tasks.claim(task.id(), &user("eve")).await;
    ensure!(
        outsider.map_err(|err| err.kind()).err() == Some(ErrorKind::Forbidden),
        "non-members cannot claim"
    );

    deck.tasks.delete(task.id(), &user("mia")).await?;
    let gone = deck.tasks.claim(task.id(), &user("mia")).await;
    ensure!(
        gone.map_err(|err| err.kind()).err() == Some(ErrorKind::NotFound),
        "deleted task is not found"
    );
    Ok(())
}
