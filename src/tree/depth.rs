//! Depth policy for task insertion and relocation.

use crate::error::{TodoError, TodoResult};
use crate::types::{ListId, MAX_LEVEL, Task, TaskId};

/// Where a new task lands: its list, its parent and its level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub list_id: ListId,
    pub parent_id: Option<TaskId>,
    pub level: i64,
}

/// A top-level task lives in the caller's list at level 1.
pub fn place_top_level(list_id: ListId) -> Placement {
    Placement {
        list_id,
        parent_id: None,
        level: 1,
    }
}

/// A subtask always lives in its parent's list, one level below it.
pub fn place_under(parent: &Task) -> TodoResult<Placement> {
    if parent.level >= MAX_LEVEL {
        return Err(TodoError::depth_exceeded(MAX_LEVEL));
    }
    Ok(Placement {
        list_id: parent.list_id,
        parent_id: Some(parent.id),
        level: parent.level + 1,
    })
}

/// Level of a descendant once the subtree rooted at `root_level` is lifted to level 1.
pub fn rebased_level(level: i64, root_level: i64) -> i64 {
    level - (root_level - 1)
}
