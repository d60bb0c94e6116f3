//! Task hierarchy core.
//!
//! Everything here works on flat `Task` records and performs no I/O. The
//! store fetches a list's records, asks these functions what the tree looks
//! like or what should change, then applies the answer in one transaction.

mod builder;
mod cascade;
mod completion;
mod depth;

pub use builder::build_forest;
pub use cascade::{children_of, subtree_ids};
pub use completion::{all_completed, list_toggle_target, reconciled_parent_state};
pub use depth::{Placement, place_top_level, place_under, rebased_level};

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::types::{ListId, Task, TaskId};

    pub fn task(id: TaskId, parent_id: Option<TaskId>, level: i64) -> Task {
        task_in(1, id, parent_id, level, false)
    }

    pub fn task_in(
        list_id: ListId,
        id: TaskId,
        parent_id: Option<TaskId>,
        level: i64,
        completed: bool,
    ) -> Task {
        Task {
            id,
            list_id,
            parent_id,
            text: format!("task {}", id),
            completed,
            level,
            created_at: 0,
            updated_at: 0,
        }
    }
}
