//! Given steps for board mutation BDD scenarios.

use super::world::{BoardWorld, run_async};
use chrono::Utc;
use eyre::WrapErr;
use rstest_bdd_macros::given;
use trellis::board::domain::{PersistedTaskData, Task, TaskId, TaskStatus, TaskTitle};

#[given(r#"a loaded board with task "{title}" in column "{column}""#)]
fn board_with_task(
    world: &mut BoardWorld,
    title: String,
    column: String,
) -> Result<(), eyre::Report> {
    let status = TaskStatus::try_from(column.as_str())
        .map_err(|err| eyre::eyre!("invalid column in scenario: {err}"))?;
    let timestamp = Utc::now();
    let task = Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        project_id: world.project_id,
        title: TaskTitle::new(title.clone())
            .map_err(|err| eyre::eyre!("invalid title in scenario: {err}"))?,
        description: None,
        assignee_ref: None,
        due_date: None,
        status,
        created_at: timestamp,
        updated_at: timestamp,
    });
    world.task_ids.insert(title, task.id());
    world
        .repository
        .seed(task)
        .wrap_err("seed scenario task")?;
    run_async(world.store.load()).wrap_err("load scenario board")?;
    Ok(())
}

#[given("an empty loaded board")]
fn empty_board(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    run_async(world.store.load()).wrap_err("load empty scenario board")?;
    Ok(())
}
