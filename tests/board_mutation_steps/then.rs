//! Then steps for board mutation BDD scenarios.

use super::world::BoardWorld;
use rstest_bdd_macros::then;
use trellis::board::{
    domain::{BoardDomainError, TaskStatus},
    services::BoardStoreError,
};

fn parse_column(raw: &str) -> Result<TaskStatus, eyre::Report> {
    TaskStatus::try_from(raw).map_err(|err| eyre::eyre!("invalid column in scenario: {err}"))
}

#[then("the move succeeds")]
fn move_succeeds(world: &BoardWorld) -> Result<(), eyre::Report> {
    match world.last_move_result.as_ref() {
        Some(Ok(())) => Ok(()),
        Some(Err(err)) => Err(eyre::eyre!("expected successful move, got {err}")),
        None => Err(eyre::eyre!("missing move result in scenario world")),
    }
}

#[then("the move fails with an invalid button move error")]
fn move_fails_with_invalid_button_move(world: &BoardWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_move_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing move result in scenario world"))?;

    if !matches!(
        result,
        Err(BoardStoreError::Validation(
            BoardDomainError::InvalidButtonMove { .. }
        ))
    ) {
        return Err(eyre::eyre!("expected InvalidButtonMove error, got {result:?}"));
    }
    Ok(())
}

#[then(r#"column "{column}" contains task "{title}""#)]
fn column_contains_task(
    world: &BoardWorld,
    column: String,
    title: String,
) -> Result<(), eyre::Report> {
    let status = parse_column(&column)?;
    let snapshot = world.store.snapshot()?;
    let found = snapshot
        .board()
        .column(status)
        .tasks()
        .iter()
        .any(|task| task.title().as_str() == title);

    if !found {
        return Err(eyre::eyre!("column {column} does not contain task {title}"));
    }
    Ok(())
}

#[then(r#"column "{column}" is empty"#)]
fn column_is_empty(world: &BoardWorld, column: String) -> Result<(), eyre::Report> {
    let status = parse_column(&column)?;
    let snapshot = world.store.snapshot()?;
    if !snapshot.board().column(status).is_empty() {
        return Err(eyre::eyre!("column {column} is not empty"));
    }
    Ok(())
}
