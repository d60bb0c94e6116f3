//! Core data types for users, lists and tasks.

use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type ListId = i64;
pub type TaskId = i64;

/// Deepest level a task may sit at. A task at this level cannot gain children.
pub const MAX_LEVEL: i64 = 5;

/// Maximum length of task text and list names, in characters.
pub const MAX_TEXT_LEN: usize = 200;

/// An account. The password hash is never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: i64,
}

/// A named collection of top-level tasks owned by one user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoList {
    pub id: ListId,
    pub user_id: UserId,
    pub name: String,
    pub created_at: i64,
}

/// A flat task record. Nesting is expressed only through `parent_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub list_id: ListId,
    pub parent_id: Option<TaskId>,
    pub text: String,
    pub completed: bool,
    pub level: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Task {
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// A task with its subtasks resolved, ready for presentation.
///
/// `subtasks` is always present; a leaf carries an empty vector.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TaskNode {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    pub level: i64,
    pub subtasks: Vec<TaskNode>,
}

impl TaskNode {
    /// Number of tasks in this subtree, including the root.
    pub fn count(&self) -> usize {
        1 + self.subtasks.iter().map(TaskNode::count).sum::<usize>()
    }
}

impl From<&Task> for TaskNode {
    /// A freshly created or detached task, presented without its subtree.
    fn from(task: &Task) -> Self {
        TaskNode {
            id: task.id,
            text: task.text.clone(),
            completed: task.completed,
            level: task.level,
            subtasks: Vec::new(),
        }
    }
}

/// A list together with its task forest.
#[derive(Debug, Clone, Serialize)]
pub struct ListBoard {
    pub id: ListId,
    pub name: String,
    pub tasks: Vec<TaskNode>,
}

/// Input for task insertion.
///
/// When `parent_id` is set the task is nested and `list_id` is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTask {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub list_id: Option<ListId>,
    #[serde(default)]
    pub parent_id: Option<TaskId>,
}

/// Partial task update. Only supplied fields change.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskUpdate {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub list_id: Option<ListId>,
}

/// Outcome of a cascading task delete.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct DeleteSummary {
    pub task_id: TaskId,
    pub removed: usize,
}

/// Validate free text (task text or list name): trimmed, non-empty, bounded.
pub fn normalize_text(field: &str, raw: &str) -> crate::error::TodoResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(crate::error::TodoError::missing_field(field));
    }
    if trimmed.chars().count() > MAX_TEXT_LEN {
        return Err(crate::error::TodoError::invalid_value(
            field,
            &format!("{} must be at most {} characters", field, MAX_TEXT_LEN),
        ));
    }
    Ok(trimmed.to_string())
}
