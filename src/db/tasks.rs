//! Statements over the `tasks` table.
//!
//! Listings are always scoped to one user and ordered newest first, with the
//! id breaking ties between tasks created in the same instant.

use super::db::Scope;
use crate::libs::error::{StoreError, StoreResult};
use crate::libs::messages::Message;
use crate::libs::task::{Task, TaskFilter};
use rusqlite::{params, Row};

const SELECT_TASKS: &str = "SELECT id, user_id, title, description, priority, deadline, completed, created_at, updated_at
    FROM tasks WHERE user_id = ?1 ORDER BY created_at DESC, id DESC";

const SELECT_TASKS_BY_COMPLETED: &str = "SELECT id, user_id, title, description, priority, deadline, completed, created_at, updated_at
    FROM tasks WHERE user_id = ?1 AND completed = ?2 ORDER BY created_at DESC, id DESC";

const SELECT_TASKS_BY_PRIORITY: &str = "SELECT id, user_id, title, description, priority, deadline, completed, created_at, updated_at
    FROM tasks WHERE user_id = ?1 AND priority = ?2 ORDER BY created_at DESC, id DESC";

const INSERT_TASK: &str = "INSERT INTO tasks (user_id, title, description, priority, deadline, completed, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

/// Re-creates a row that was deleted underneath a caller still holding it.
const INSERT_TASK_WITH_ID: &str = "INSERT INTO tasks (id, user_id, title, description, priority, deadline, completed, created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";

const UPDATE_TASK: &str = "UPDATE tasks SET user_id = ?2, title = ?3, description = ?4, priority = ?5, deadline = ?6, completed = ?7, created_at = ?8, updated_at = ?9
    WHERE id = ?1";

const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";

const DELETE_COMPLETED_TASKS: &str = "DELETE FROM tasks WHERE user_id = ?1 AND completed = 1";

fn map_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        user_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        priority: row.get(4)?,
        deadline: row.get(5)?,
        completed: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

pub fn for_user(scope: &Scope<'_>, user_id: i64, filter: TaskFilter) -> StoreResult<Vec<Task>> {
    let tasks = match filter {
        TaskFilter::All => scope
            .prepare(SELECT_TASKS)?
            .query_map(params![user_id], map_task)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        TaskFilter::Completed(completed) => scope
            .prepare(SELECT_TASKS_BY_COMPLETED)?
            .query_map(params![user_id, completed], map_task)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        TaskFilter::Priority(priority) => scope
            .prepare(SELECT_TASKS_BY_PRIORITY)?
            .query_map(params![user_id, priority], map_task)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
    };

    Ok(tasks)
}

/// Upsert. A task without an id is inserted and returned with the assigned
/// id; a task with an id updates its row, or is inserted under that id when
/// the row no longer exists.
pub fn save(scope: &Scope<'_>, task: &Task) -> StoreResult<Task> {
    if task.title.trim().is_empty() {
        return Err(StoreError::validation(Message::TaskTitleRequired.to_string()));
    }

    let mut saved = task.clone();
    match task.id {
        None => {
            scope.execute(
                INSERT_TASK,
                params![
                    task.user_id,
                    task.title,
                    task.description,
                    task.priority,
                    task.deadline,
                    task.completed,
                    task.created_at,
                    task.updated_at
                ],
            )?;
            saved.id = Some(scope.last_insert_rowid());
        }
        Some(id) => {
            let updated = scope.execute(
                UPDATE_TASK,
                params![
                    id,
                    task.user_id,
                    task.title,
                    task.description,
                    task.priority,
                    task.deadline,
                    task.completed,
                    task.created_at,
                    task.updated_at
                ],
            )?;
            if updated == 0 {
                tracing::debug!(task_id = id, "task row missing, inserting under its id");
                scope.execute(
                    INSERT_TASK_WITH_ID,
                    params![
                        id,
                        task.user_id,
                        task.title,
                        task.description,
                        task.priority,
                        task.deadline,
                        task.completed,
                        task.created_at,
                        task.updated_at
                    ],
                )?;
            }
        }
    }

    Ok(saved)
}

pub fn delete(scope: &Scope<'_>, task_id: i64) -> StoreResult<usize> {
    Ok(scope.execute(DELETE_TASK, params![task_id])?)
}

pub fn delete_completed(scope: &Scope<'_>, user_id: i64) -> StoreResult<usize> {
    Ok(scope.execute(DELETE_COMPLETED_TASKS, params![user_id])?)
}
