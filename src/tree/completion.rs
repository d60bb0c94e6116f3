//! Completion propagation rules.
//!
//! Downward: a list or task toggle pushes one target state through the whole
//! subtree. Upward: after a task changes, its immediate parent becomes the AND
//! of its direct children. Upward reconciliation stops after one level.

use super::cascade::children_of;
use crate::types::{Task, TaskId};

pub fn all_completed<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> bool {
    tasks.into_iter().all(|t| t.completed)
}

/// Target state for a list toggle: false if every top-level task is done, else true.
pub fn list_toggle_target(tasks: &[Task]) -> bool {
    !all_completed(tasks.iter().filter(|t| t.is_top_level()))
}

/// Completion the parent should take from its direct children.
///
/// `None` when the parent has no children in `tasks`.
pub fn reconciled_parent_state(tasks: &[Task], parent_id: TaskId) -> Option<bool> {
    let children = children_of(tasks, parent_id);
    if children.is_empty() {
        return None;
    }
    Some(all_completed(children))
}
