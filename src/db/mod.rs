//! SQLite-backed record store for users, lists, tasks and sessions.

pub mod guard;
pub mod lists;
pub mod sessions;
pub mod tasks;
pub mod users;

use crate::error::{TodoError, TodoResult};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{info, warn};

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Database handle wrapping a SQLite connection.
///
/// The mutex is held for the whole of each operation, so a transaction is
/// never interleaved with another writer on the same connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create the database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path.as_ref())?;

        // Enable WAL mode for concurrent access
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA foreign_keys=ON;
             PRAGMA busy_timeout=5000;",
        )?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.run_migrations()?;
        info!(path = %path.as_ref().display(), "Database opened");

        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;

        conn.execute_batch("PRAGMA foreign_keys=ON;")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.run_migrations()?;

        Ok(db)
    }

    /// Run database migrations.
    fn run_migrations(&self) -> anyhow::Result<()> {
        let mut conn = self.lock()?;
        let report = embedded::migrations::runner().run(&mut *conn)?;
        for migration in report.applied_migrations() {
            info!(version = migration.version(), name = migration.name(), "Applied migration");
        }
        Ok(())
    }

    fn lock(&self) -> TodoResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            warn!("Database mutex poisoned: {}", e);
            TodoError::internal("database connection poisoned")
        })
    }

    /// Execute a function with exclusive access to the connection.
    pub fn with_conn<F, T>(&self, f: F) -> TodoResult<T>
    where
        F: FnOnce(&Connection) -> TodoResult<T>,
    {
        let conn = self.lock()?;
        f(&conn)
    }

    /// Execute a function with mutable access to the connection (for transactions).
    pub fn with_conn_mut<F, T>(&self, f: F) -> TodoResult<T>
    where
        F: FnOnce(&mut Connection) -> TodoResult<T>,
    {
        let mut conn = self.lock()?;
        f(&mut conn)
    }

    /// Delete every row of every table. Developer tooling only.
    pub fn reset(&self) -> TodoResult<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute_batch(
                "DELETE FROM sessions;
                 DELETE FROM tasks;
                 DELETE FROM lists;
                 DELETE FROM users;",
            )?;
            tx.commit()?;
            warn!("Database content cleared");
            Ok(())
        })
    }
}

/// Get the current timestamp in milliseconds.
pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Encode an id set as a JSON array for `json_each` bulk statements.
pub(crate) fn id_set(ids: &[i64]) -> TodoResult<String> {
    serde_json::to_string(ids).map_err(TodoError::internal)
}
