//! Ownership guard.
//!
//! Every task and list operation resolves its target through these helpers
//! first. A target that does not exist and a target owned by someone else
//! produce the same `NotFoundOrUnauthorized` error.

use super::Database;
use super::lists::parse_list_row;
use super::tasks::parse_task_row;
use crate::error::{TodoError, TodoResult};
use crate::types::{ListId, Task, TaskId, TodoList, UserId};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::debug;

/// Resolve a list owned by `user_id`.
pub(crate) fn authorize_list(
    conn: &Connection,
    user_id: UserId,
    list_id: ListId,
) -> TodoResult<TodoList> {
    let list = conn
        .query_row(
            "SELECT * FROM lists WHERE id = ?1 AND user_id = ?2",
            params![list_id, user_id],
            parse_list_row,
        )
        .optional()?;

    list.ok_or_else(|| {
        debug!(user_id, list_id, "List access denied");
        TodoError::list_not_found()
    })
}

/// Resolve a task whose owning list belongs to `user_id`.
pub(crate) fn authorize_task(
    conn: &Connection,
    user_id: UserId,
    task_id: TaskId,
) -> TodoResult<Task> {
    let task = conn
        .query_row(
            "SELECT t.* FROM tasks t
             INNER JOIN lists l ON l.id = t.list_id
             WHERE t.id = ?1 AND l.user_id = ?2",
            params![task_id, user_id],
            parse_task_row,
        )
        .optional()?;

    task.ok_or_else(|| {
        debug!(user_id, task_id, "Task access denied");
        TodoError::task_not_found()
    })
}

impl Database {
    /// Check that `user_id` owns the list.
    pub fn authorize_list(&self, user_id: UserId, list_id: ListId) -> TodoResult<TodoList> {
        self.with_conn(|conn| authorize_list(conn, user_id, list_id))
    }

    /// Check that `user_id` owns the list holding the task.
    pub fn authorize_task(&self, user_id: UserId, task_id: TaskId) -> TodoResult<Task> {
        self.with_conn(|conn| authorize_task(conn, user_id, task_id))
    }
}
