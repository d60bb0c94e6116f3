//! Task CRUD and tree operations.
//!
//! Each mutating method authorizes through the ownership guard, loads the
//! affected list's flat records, asks `crate::tree` what must change and
//! applies it inside a single transaction. Any early return drops the
//! transaction uncommitted, which rolls it back.

use super::guard::{authorize_list, authorize_task};
use super::{Database, id_set, now_ms};
use crate::error::{ErrorCode, TodoError, TodoResult};
use crate::tree::{self, Placement};
use crate::types::{
    DeleteSummary, ListId, NewTask, Task, TaskId, TaskNode, TaskUpdate, UserId, normalize_text,
};
use rusqlite::{Connection, OptionalExtension, Row, params};
use tracing::{debug, info};

pub fn parse_task_row(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get("id")?,
        list_id: row.get("list_id")?,
        parent_id: row.get("parent_id")?,
        text: row.get("text")?,
        completed: row.get("completed")?,
        level: row.get("level")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

/// Internal helper to get a task using an existing connection (avoids deadlock).
fn get_task_internal(conn: &Connection, task_id: TaskId) -> TodoResult<Option<Task>> {
    let task = conn
        .query_row(
            "SELECT * FROM tasks WHERE id = ?1",
            params![task_id],
            parse_task_row,
        )
        .optional()?;
    Ok(task)
}

/// All task records of a list, flat, in insertion order.
pub(crate) fn list_tasks_internal(conn: &Connection, list_id: ListId) -> TodoResult<Vec<Task>> {
    let mut stmt = conn.prepare("SELECT * FROM tasks WHERE list_id = ?1 ORDER BY id")?;
    let tasks = stmt
        .query_map(params![list_id], parse_task_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(tasks)
}

fn set_completed(conn: &Connection, task_id: TaskId, completed: bool, now: i64) -> TodoResult<()> {
    conn.execute(
        "UPDATE tasks SET completed = ?1, updated_at = ?2 WHERE id = ?3",
        params![completed, now, task_id],
    )?;
    Ok(())
}

/// Recompute a parent from its direct children. Childless parents are left alone.
fn reconcile_parent(
    conn: &Connection,
    tasks: &[Task],
    parent_id: TaskId,
    now: i64,
) -> TodoResult<()> {
    if let Some(state) = tree::reconciled_parent_state(tasks, parent_id) {
        set_completed(conn, parent_id, state, now)?;
        debug!(parent_id, completed = state, "Parent reconciled");
    }
    Ok(())
}

/// Set `completed` on the task and its whole subtree, then reconcile the
/// immediate parent. Returns the number of records in the subtree.
fn apply_completion(conn: &Connection, task: &Task, completed: bool) -> TodoResult<usize> {
    let now = now_ms();
    let mut tasks = list_tasks_internal(conn, task.list_id)?;
    let ids = tree::subtree_ids(&tasks, task.id);

    conn.execute(
        "UPDATE tasks SET completed = ?1, updated_at = ?2
         WHERE id IN (SELECT value FROM json_each(?3))",
        params![completed, now, id_set(&ids)?],
    )?;

    for t in tasks.iter_mut().filter(|t| ids.contains(&t.id)) {
        t.completed = completed;
    }

    if let Some(parent_id) = task.parent_id {
        reconcile_parent(conn, &tasks, parent_id, now)?;
    }

    Ok(ids.len())
}

/// Relocate a task and its subtree to another list.
///
/// A nested task is detached from its parent and becomes top-level; the
/// subtree's levels are rebased so the moved task sits at level 1. The former
/// parent is reconciled from its remaining children.
fn move_subtree(
    conn: &Connection,
    user_id: UserId,
    task: &Task,
    new_list_id: ListId,
) -> TodoResult<()> {
    authorize_list(conn, user_id, new_list_id)?;
    if task.list_id == new_list_id {
        return Ok(());
    }

    let now = now_ms();
    let tasks = list_tasks_internal(conn, task.list_id)?;
    let ids = tree::subtree_ids(&tasks, task.id);

    {
        let mut stmt = conn.prepare(
            "UPDATE tasks SET list_id = ?1, level = ?2, updated_at = ?3 WHERE id = ?4",
        )?;
        for t in tasks.iter().filter(|t| ids.contains(&t.id)) {
            stmt.execute(params![
                new_list_id,
                tree::rebased_level(t.level, task.level),
                now,
                t.id
            ])?;
        }
    }
    conn.execute(
        "UPDATE tasks SET parent_id = NULL WHERE id = ?1",
        params![task.id],
    )?;

    if let Some(parent_id) = task.parent_id {
        let remaining: Vec<Task> = tasks.into_iter().filter(|t| !ids.contains(&t.id)).collect();
        reconcile_parent(conn, &remaining, parent_id, now)?;
    }

    info!(
        task_id = task.id,
        from_list = task.list_id,
        to_list = new_list_id,
        moved = ids.len(),
        "Task moved"
    );
    Ok(())
}

impl Database {
    /// Flat, unordered task records of a list owned by the user.
    pub fn fetch_tasks_for_list(&self, user_id: UserId, list_id: ListId) -> TodoResult<Vec<Task>> {
        self.with_conn(|conn| {
            authorize_list(conn, user_id, list_id)?;
            list_tasks_internal(conn, list_id)
        })
    }

    /// Task forest of a list owned by the user.
    pub fn get_task_tree(&self, user_id: UserId, list_id: ListId) -> TodoResult<Vec<TaskNode>> {
        let tasks = self.fetch_tasks_for_list(user_id, list_id)?;
        Ok(tree::build_forest(&tasks))
    }

    /// A single task owned by the user.
    pub fn fetch_task(&self, user_id: UserId, task_id: TaskId) -> TodoResult<Task> {
        self.authorize_task(user_id, task_id)
    }

    /// Insert a task.
    ///
    /// With `parent_id` the task is nested under that parent, in the parent's
    /// list, one level deeper; a parent at the maximum level rejects it.
    /// Without, `list_id` is required and the task is top-level.
    pub fn insert_task(&self, user_id: UserId, input: NewTask) -> TodoResult<Task> {
        let text = normalize_text("text", &input.text)?;
        let now = now_ms();

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let placement: Placement = match (input.parent_id, input.list_id) {
                (Some(parent_id), _) => {
                    let parent = authorize_task(&tx, user_id, parent_id).map_err(|e| {
                        if e.code == ErrorCode::NotFoundOrUnauthorized {
                            TodoError::parent_not_found()
                        } else {
                            e
                        }
                    })?;
                    tree::place_under(&parent)?
                }
                (None, Some(list_id)) => {
                    authorize_list(&tx, user_id, list_id)?;
                    tree::place_top_level(list_id)
                }
                (None, None) => return Err(TodoError::missing_field("list_id")),
            };

            tx.execute(
                "INSERT INTO tasks (list_id, parent_id, text, completed, level, created_at, updated_at)
                 VALUES (?1, ?2, ?3, 0, ?4, ?5, ?5)",
                params![
                    placement.list_id,
                    placement.parent_id,
                    &text,
                    placement.level,
                    now
                ],
            )?;
            let id = tx.last_insert_rowid();
            tx.commit()?;

            info!(
                task_id = id,
                list_id = placement.list_id,
                level = placement.level,
                "Task inserted"
            );

            Ok(Task {
                id,
                list_id: placement.list_id,
                parent_id: placement.parent_id,
                text,
                completed: false,
                level: placement.level,
                created_at: now,
                updated_at: now,
            })
        })
    }

    /// Partially update a task. Only supplied fields change.
    ///
    /// `completed` propagates like a toggle with an explicit target.
    /// `list_id` relocates the task with its subtree, like `move_task`.
    pub fn update_task(
        &self,
        user_id: UserId,
        task_id: TaskId,
        update: TaskUpdate,
    ) -> TodoResult<Task> {
        let text = update
            .text
            .as_deref()
            .map(|t| normalize_text("text", t))
            .transpose()?;

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let mut task = authorize_task(&tx, user_id, task_id)?;

            if let Some(text) = text {
                tx.execute(
                    "UPDATE tasks SET text = ?1, updated_at = ?2 WHERE id = ?3",
                    params![text, now_ms(), task_id],
                )?;
            }

            if let Some(list_id) = update.list_id {
                move_subtree(&tx, user_id, &task, list_id)?;
                task = get_task_internal(&tx, task_id)?.ok_or_else(TodoError::task_not_found)?;
            }

            if let Some(completed) = update.completed {
                apply_completion(&tx, &task, completed)?;
            }

            let task = get_task_internal(&tx, task_id)?.ok_or_else(TodoError::task_not_found)?;
            tx.commit()?;
            info!(task_id, "Task updated");
            Ok(task)
        })
    }

    /// Flip a task's completion and cascade the new state to its subtree,
    /// then reconcile its immediate parent.
    pub fn toggle_task(&self, user_id: UserId, task_id: TaskId) -> TodoResult<Task> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let task = authorize_task(&tx, user_id, task_id)?;

            let target = !task.completed;
            let affected = apply_completion(&tx, &task, target)?;

            let task = get_task_internal(&tx, task_id)?.ok_or_else(TodoError::task_not_found)?;
            tx.commit()?;
            info!(task_id, completed = target, affected, "Task toggled");
            Ok(task)
        })
    }

    /// Move a task and every descendant to another list owned by the user.
    pub fn move_task(&self, user_id: UserId, task_id: TaskId, new_list_id: ListId) -> TodoResult<Task> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let task = authorize_task(&tx, user_id, task_id)?;

            move_subtree(&tx, user_id, &task, new_list_id)?;

            let task = get_task_internal(&tx, task_id)?.ok_or_else(TodoError::task_not_found)?;
            tx.commit()?;
            Ok(task)
        })
    }

    /// Delete a task and its whole subtree.
    ///
    /// Descendant ids are collected first, then removed with one bulk delete.
    pub fn delete_task(&self, user_id: UserId, task_id: TaskId) -> TodoResult<DeleteSummary> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let task = authorize_task(&tx, user_id, task_id)?;

            let tasks = list_tasks_internal(&tx, task.list_id)?;
            let ids = tree::subtree_ids(&tasks, task.id);

            tx.execute(
                "DELETE FROM tasks WHERE id IN (SELECT value FROM json_each(?1))",
                params![id_set(&ids)?],
            )?;

            tx.commit()?;
            info!(task_id, removed = ids.len(), "Task deleted");
            Ok(DeleteSummary {
                task_id,
                removed: ids.len(),
            })
        })
    }
}
