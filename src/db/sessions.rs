//! Login sessions.
//!
//! A session maps an opaque token to a user id until it expires. The HTTP
//! layer resolves the token once per request and passes the user id on.

use super::{Database, now_ms};
use crate::error::TodoResult;
use crate::types::UserId;
use chrono::Duration;
use rusqlite::{OptionalExtension, params};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub token: String,
    pub user_id: UserId,
    pub expires_at: i64,
}

impl Database {
    /// Start a session for the user, valid for `ttl`.
    pub fn create_session(&self, user_id: UserId, ttl: Duration) -> TodoResult<Session> {
        let token = Uuid::new_v4().simple().to_string();
        let now = now_ms();
        let expires_at = now + ttl.num_milliseconds();

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO sessions (token, user_id, created_at, expires_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![&token, user_id, now, expires_at],
            )?;
            info!(user_id, "Session created");
            Ok(Session {
                token,
                user_id,
                expires_at,
            })
        })
    }

    /// User id behind a live session token. Expired or unknown tokens yield `None`.
    pub fn resolve_session(&self, token: &str) -> TodoResult<Option<UserId>> {
        let now = now_ms();
        self.with_conn(|conn| {
            let user_id: Option<UserId> = conn
                .query_row(
                    "SELECT user_id FROM sessions WHERE token = ?1 AND expires_at > ?2",
                    params![token, now],
                    |row| row.get(0),
                )
                .optional()?;
            if user_id.is_none() {
                debug!("Session token rejected");
            }
            Ok(user_id)
        })
    }

    /// End a session. Returns false when the token was not active.
    pub fn delete_session(&self, token: &str) -> TodoResult<bool> {
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
            Ok(removed > 0)
        })
    }

    /// Drop expired sessions. Returns how many were removed.
    pub fn purge_expired_sessions(&self) -> TodoResult<usize> {
        let now = now_ms();
        self.with_conn(|conn| {
            let removed = conn.execute("DELETE FROM sessions WHERE expires_at <= ?1", params![now])?;
            if removed > 0 {
                info!(removed, "Expired sessions purged");
            }
            Ok(removed)
        })
    }
}
