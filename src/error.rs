//! Structured error types shared by the store, the tree core and the HTTP layer.

use serde::Serialize;
use std::fmt;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (4xx-like)
    ValidationError,
    DepthExceeded,

    // Deliberately merged: a missing record and someone else's record look the same.
    NotFoundOrUnauthorized,

    // Caller has no verified identity
    Unauthenticated,

    // Conflict errors
    Conflict,

    // Internal errors
    DatabaseError,
    InternalError,
}

/// Structured error returned by every core operation.
#[derive(Debug, Serialize)]
pub struct TodoError {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl TodoError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    // Convenience constructors

    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::ValidationError,
            format!("{} is required", field),
        )
        .with_field(field)
    }

    pub fn invalid_value(field: &str, reason: &str) -> Self {
        Self::new(ErrorCode::ValidationError, reason).with_field(field)
    }

    pub fn task_not_found() -> Self {
        Self::new(
            ErrorCode::NotFoundOrUnauthorized,
            "Task not found or unauthorized",
        )
    }

    pub fn list_not_found() -> Self {
        Self::new(
            ErrorCode::NotFoundOrUnauthorized,
            "List not found or unauthorized",
        )
    }

    pub fn parent_not_found() -> Self {
        Self::new(
            ErrorCode::NotFoundOrUnauthorized,
            "Parent task not found or unauthorized",
        )
    }

    pub fn depth_exceeded(max_level: i64) -> Self {
        Self::new(
            ErrorCode::DepthExceeded,
            format!("Cannot add more than {} levels of subtasks", max_level),
        )
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    pub fn unauthenticated() -> Self {
        Self::new(ErrorCode::Unauthenticated, "Unauthorized")
    }

    pub fn database(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::DatabaseError, err.to_string())
    }

    pub fn internal(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InternalError, err.to_string())
    }
}

impl fmt::Display for TodoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TodoError {}

impl From<rusqlite::Error> for TodoError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(ref e, _)
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                TodoError::conflict("Username or email already exists")
            }
            err => TodoError::database(err),
        }
    }
}

// Allow using ? with anyhow errors by converting them
impl From<anyhow::Error> for TodoError {
    fn from(err: anyhow::Error) -> Self {
        // Try to downcast to TodoError first
        match err.downcast::<TodoError>() {
            Ok(todo_err) => todo_err,
            Err(err) => TodoError::internal(err),
        }
    }
}

/// Result type for core operations.
pub type TodoResult<T> = std::result::Result<T, TodoError>;
