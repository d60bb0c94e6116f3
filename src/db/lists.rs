//! List CRUD, list-wide completion toggle and list-scoped cascades.

use super::guard::authorize_list;
use super::tasks::list_tasks_internal;
use super::{Database, now_ms};
use crate::error::TodoResult;
use crate::tree;
use crate::types::{ListBoard, ListId, TodoList, UserId, normalize_text};
use rusqlite::{Connection, Row, params};
use tracing::{debug, info};

pub fn parse_list_row(row: &Row) -> rusqlite::Result<TodoList> {
    Ok(TodoList {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        name: row.get("name")?,
        created_at: row.get("created_at")?,
    })
}

fn lists_for_user_internal(conn: &Connection, user_id: UserId) -> TodoResult<Vec<TodoList>> {
    let mut stmt = conn.prepare("SELECT * FROM lists WHERE user_id = ?1 ORDER BY id")?;
    let lists = stmt
        .query_map(params![user_id], parse_list_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(lists)
}

/// Remove the tasks of every list matched by `list_filter`, then the lists.
/// Returns (lists removed, tasks removed).
fn delete_lists_where(
    conn: &Connection,
    list_filter: &str,
    param: i64,
) -> TodoResult<(usize, usize)> {
    let task_filter = format!("list_id IN (SELECT id FROM lists WHERE {})", list_filter);
    // Counted up front: rows removed through ON DELETE CASCADE do not show up in changes().
    let tasks: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM tasks WHERE {}", task_filter),
        params![param],
        |row| row.get(0),
    )?;
    conn.execute(
        &format!("DELETE FROM tasks WHERE {}", task_filter),
        params![param],
    )?;
    let lists = conn.execute(
        &format!("DELETE FROM lists WHERE {}", list_filter),
        params![param],
    )?;
    Ok((lists, tasks as usize))
}

impl Database {
    /// Create a list for a user.
    pub fn create_list(&self, user_id: UserId, name: &str) -> TodoResult<TodoList> {
        let name = normalize_text("name", name)?;
        let now = now_ms();

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO lists (user_id, name, created_at) VALUES (?1, ?2, ?3)",
                params![user_id, &name, now],
            )?;
            let id = conn.last_insert_rowid();
            info!(list_id = id, user_id, "List created");

            Ok(TodoList {
                id,
                user_id,
                name,
                created_at: now,
            })
        })
    }

    /// Rename a list owned by the user.
    pub fn rename_list(&self, user_id: UserId, list_id: ListId, name: &str) -> TodoResult<TodoList> {
        let name = normalize_text("name", name)?;

        self.with_conn(|conn| {
            let mut list = authorize_list(conn, user_id, list_id)?;
            conn.execute(
                "UPDATE lists SET name = ?1 WHERE id = ?2",
                params![&name, list_id],
            )?;
            list.name = name;
            info!(list_id, "List renamed");
            Ok(list)
        })
    }

    /// All lists owned by the user, oldest first.
    pub fn get_lists_for_user(&self, user_id: UserId) -> TodoResult<Vec<TodoList>> {
        self.with_conn(|conn| lists_for_user_internal(conn, user_id))
    }

    /// Every list of the user with its task forest.
    pub fn get_board(&self, user_id: UserId) -> TodoResult<Vec<ListBoard>> {
        self.with_conn(|conn| {
            let lists = lists_for_user_internal(conn, user_id)?;
            debug!(user_id, lists = lists.len(), "Building board");

            lists
                .into_iter()
                .map(|list| -> TodoResult<ListBoard> {
                    let tasks = list_tasks_internal(conn, list.id)?;
                    Ok(ListBoard {
                        id: list.id,
                        name: list.name,
                        tasks: tree::build_forest(&tasks),
                    })
                })
                .collect()
        })
    }

    /// Toggle every task of a list.
    ///
    /// The target is `true` unless every top-level task is already completed.
    /// All tasks of the list, at every depth, take the target state. Returns
    /// the applied state, or `None` for a list without tasks.
    pub fn toggle_list(&self, user_id: UserId, list_id: ListId) -> TodoResult<Option<bool>> {
        let now = now_ms();

        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            authorize_list(&tx, user_id, list_id)?;

            let tasks = list_tasks_internal(&tx, list_id)?;
            if tasks.is_empty() {
                return Ok(None);
            }

            let target = tree::list_toggle_target(&tasks);
            let changed = tx.execute(
                "UPDATE tasks SET completed = ?1, updated_at = ?2 WHERE list_id = ?3",
                params![target, now, list_id],
            )?;

            tx.commit()?;
            info!(list_id, completed = target, changed, "List toggled");
            Ok(Some(target))
        })
    }

    /// Delete a list and all of its tasks. Returns the number of tasks removed.
    pub fn delete_list(&self, user_id: UserId, list_id: ListId) -> TodoResult<usize> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            authorize_list(&tx, user_id, list_id)?;

            let (_, tasks) = delete_lists_where(&tx, "id = ?1", list_id)?;

            tx.commit()?;
            info!(list_id, tasks_removed = tasks, "List deleted");
            Ok(tasks)
        })
    }

    /// Delete every list of the user and their tasks. Returns the number of lists removed.
    pub fn delete_all_lists_for_user(&self, user_id: UserId) -> TodoResult<usize> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let (lists, tasks) = delete_lists_where(&tx, "user_id = ?1", user_id)?;
            tx.commit()?;
            info!(user_id, lists, tasks, "All lists deleted");
            Ok(lists)
        })
    }
}
