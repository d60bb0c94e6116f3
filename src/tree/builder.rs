//! Flat records to nested presentation tree.

use crate::types::{Task, TaskId, TaskNode};
use std::collections::HashMap;

/// Build the task forest for one list.
///
/// Roots are the records with no parent. Children are discovered by matching
/// `parent_id` against the current record's id, so input order does not
/// matter; siblings keep their relative input order. Records whose parent is
/// not in the input are not reachable and are left out.
pub fn build_forest(tasks: &[Task]) -> Vec<TaskNode> {
    let mut by_parent: HashMap<Option<TaskId>, Vec<&Task>> = HashMap::new();
    for task in tasks {
        by_parent.entry(task.parent_id).or_default().push(task);
    }

    by_parent
        .get(&None)
        .map(|roots| roots.iter().map(|t| to_node(t, &by_parent)).collect())
        .unwrap_or_default()
}

fn to_node(task: &Task, by_parent: &HashMap<Option<TaskId>, Vec<&Task>>) -> TaskNode {
    let subtasks = by_parent
        .get(&Some(task.id))
        .map(|children| children.iter().map(|c| to_node(c, by_parent)).collect())
        .unwrap_or_default();

    TaskNode {
        id: task.id,
        text: task.text.clone(),
        completed: task.completed,
        level: task.level,
        subtasks,
    }
}
