//! Descendant collection over flat records.

use crate::types::{Task, TaskId};
use std::collections::VecDeque;

/// Direct children of `parent_id`, in input order.
pub fn children_of(tasks: &[Task], parent_id: TaskId) -> Vec<&Task> {
    tasks
        .iter()
        .filter(|t| t.parent_id == Some(parent_id))
        .collect()
}

/// Ids of `root` and every task reachable from it through `parent_id`, root first.
///
/// Returns an empty vector when `root` is not in `tasks`.
pub fn subtree_ids(tasks: &[Task], root: TaskId) -> Vec<TaskId> {
    if !tasks.iter().any(|t| t.id == root) {
        return Vec::new();
    }

    let mut ids = Vec::new();
    let mut queue = VecDeque::from([root]);
    while let Some(id) = queue.pop_front() {
        // Guard against malformed cycles in stored data
        if ids.contains(&id) {
            continue;
        }
        ids.push(id);
        queue.extend(children_of(tasks, id).into_iter().map(|t| t.id));
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::fixtures::task;

    fn sample() -> Vec<Task> {
        vec![
            task(1, None, 1),
            task(2, Some(1), 2),
            task(3, Some(2), 3),
            task(4, Some(1), 2),
            task(5, None, 1),
            task(6, Some(5), 2),
        ]
    }

    #[test]
    fn collects_root_and_all_descendants() {
        let mut ids = subtree_ids(&sample(), 1);
        assert_eq!(ids[0], 1);
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn leaf_subtree_is_itself() {
        assert_eq!(subtree_ids(&sample(), 3), vec![3]);
    }

    #[test]
    fn unknown_root_is_empty() {
        assert!(subtree_ids(&sample(), 99).is_empty());
    }

    #[test]
    fn children_are_direct_only() {
        let tasks = sample();
        let ids: Vec<_> = children_of(&tasks, 1).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 4]);
    }
}
