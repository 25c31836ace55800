//! When steps for board mutation BDD scenarios.

use super::world::{BoardWorld, run_async};
use rstest_bdd_macros::when;
use trellis::board::{
    domain::{TaskId, TaskStatus},
    services::{CreateTaskRequest, MoveTrigger},
};

fn lookup_task(world: &BoardWorld, title: &str) -> Result<TaskId, eyre::Report> {
    world
        .task_ids
        .get(title)
        .copied()
        .ok_or_else(|| eyre::eyre!("unknown task in scenario world: {title}"))
}

fn parse_column(raw: &str) -> Result<TaskStatus, eyre::Report> {
    TaskStatus::try_from(raw).map_err(|err| eyre::eyre!("invalid column in scenario: {err}"))
}

fn move_task(
    world: &mut BoardWorld,
    title: &str,
    from: &str,
    to: &str,
    trigger: MoveTrigger,
) -> Result<(), eyre::Report> {
    let id = lookup_task(world, title)?;
    let result = run_async(
        world
            .store
            .move_task(id, parse_column(from)?, parse_column(to)?, trigger),
    );
    world.last_move_result = Some(result);
    Ok(())
}

#[when(r#"task "{title}" is moved by button from "{from}" to "{to}""#)]
fn move_by_button(
    world: &mut BoardWorld,
    title: String,
    from: String,
    to: String,
) -> Result<(), eyre::Report> {
    move_task(world, &title, &from, &to, MoveTrigger::Button)
}

#[when(r#"task "{title}" is dragged from "{from}" to "{to}""#)]
fn move_by_drag(
    world: &mut BoardWorld,
    title: String,
    from: String,
    to: String,
) -> Result<(), eyre::Report> {
    move_task(world, &title, &from, &to, MoveTrigger::Drag)
}

#[when(r#"a task titled "{title}" is added"#)]
fn add_task(world: &mut BoardWorld, title: String) -> Result<(), eyre::Report> {
    let result = run_async(world.store.add_task(CreateTaskRequest::new(title.clone())));
    if let Ok(ref task) = result {
        world.task_ids.insert(title, task.id());
    }
    world.last_add_result = Some(result);
    Ok(())
}
