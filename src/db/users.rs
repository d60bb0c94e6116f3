//! Account records.
//!
//! The store only ever sees password hashes; hashing lives in `crate::auth`.

use super::{Database, now_ms};
use crate::error::{ErrorCode, TodoError, TodoResult};
use crate::types::{User, UserId};
use rusqlite::{OptionalExtension, Row, params};
use tracing::info;

pub fn parse_user_row(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        username: row.get("username")?,
        email: row.get("email")?,
        password_hash: row.get("password_hash")?,
        created_at: row.get("created_at")?,
    })
}

fn required(field: &str, value: &str) -> TodoResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(TodoError::missing_field(field));
    }
    Ok(value.to_string())
}

impl Database {
    /// Register an account. Duplicate usernames or emails are a conflict.
    pub fn create_user(&self, username: &str, email: &str, password_hash: &str) -> TodoResult<User> {
        let username = required("username", username)?;
        let email = required("email", email)?;
        if !email.contains('@') {
            return Err(TodoError::invalid_value("email", "email must contain '@'"));
        }
        if password_hash.is_empty() {
            return Err(TodoError::missing_field("password"));
        }
        let now = now_ms();

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, email, password_hash, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![&username, &email, password_hash, now],
            )?;
            let id = conn.last_insert_rowid();
            info!(user_id = id, username = %username, "User created");

            Ok(User {
                id,
                username,
                email,
                password_hash: password_hash.to_string(),
                created_at: now,
            })
        })
    }

    /// Get a user by id.
    pub fn get_user(&self, user_id: UserId) -> TodoResult<Option<User>> {
        self.with_conn(|conn| {
            let user = conn
                .query_row(
                    "SELECT * FROM users WHERE id = ?1",
                    params![user_id],
                    parse_user_row,
                )
                .optional()?;
            Ok(user)
        })
    }

    /// Get a user by email, for login.
    pub fn find_user_by_email(&self, email: &str) -> TodoResult<Option<User>> {
        self.with_conn(|conn| {
            let user = conn
                .query_row(
                    "SELECT * FROM users WHERE email = ?1",
                    params![email.trim()],
                    parse_user_row,
                )
                .optional()?;
            Ok(user)
        })
    }

    /// Delete an account with its sessions, lists and tasks.
    pub fn delete_user(&self, user_id: UserId) -> TodoResult<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            tx.execute(
                "DELETE FROM tasks WHERE list_id IN (SELECT id FROM lists WHERE user_id = ?1)",
                params![user_id],
            )?;
            tx.execute("DELETE FROM lists WHERE user_id = ?1", params![user_id])?;
            tx.execute("DELETE FROM sessions WHERE user_id = ?1", params![user_id])?;
            let removed = tx.execute("DELETE FROM users WHERE id = ?1", params![user_id])?;
            if removed == 0 {
                return Err(TodoError::new(
                    ErrorCode::NotFoundOrUnauthorized,
                    "User not found or unauthorized",
                ));
            }

            tx.commit()?;
            info!(user_id, "User deleted");
            Ok(())
        })
    }
}
