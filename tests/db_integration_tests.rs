//! Integration tests for the database layer.
//!
//! These tests verify the store and hierarchy operations using an in-memory SQLite database.
//! Tests are organized by module and functionality.

use todo_tree::db::Database;
use todo_tree::error::ErrorCode;
use todo_tree::types::{MAX_LEVEL, NewTask, Task, TaskNode, TaskUpdate, TodoList, User};

/// Helper to create a fresh in-memory database for testing.
fn setup_db() -> Database {
    Database::open_in_memory().expect("Failed to create in-memory database")
}

fn user(db: &Database, name: &str) -> User {
    db.create_user(name, &format!("{}@example.com", name), "$argon2id$test-hash")
        .expect("Failed to create user")
}

fn list(db: &Database, owner: &User, name: &str) -> TodoList {
    db.create_list(owner.id, name).expect("Failed to create list")
}

fn add(db: &Database, owner: &User, list: &TodoList, text: &str) -> Task {
    db.insert_task(
        owner.id,
        NewTask {
            text: text.to_string(),
            list_id: Some(list.id),
            parent_id: None,
        },
    )
    .expect("Failed to insert task")
}

fn sub(db: &Database, owner: &User, parent: &Task, text: &str) -> Task {
    db.insert_task(
        owner.id,
        NewTask {
            text: text.to_string(),
            list_id: None,
            parent_id: Some(parent.id),
        },
    )
    .expect("Failed to insert subtask")
}

fn task(db: &Database, owner: &User, task: &Task) -> Task {
    db.fetch_task(owner.id, task.id).expect("Failed to fetch task")
}

fn count_tasks(db: &Database, owner: &User, list: &TodoList) -> usize {
    db.fetch_tasks_for_list(owner.id, list.id).unwrap().len()
}

/// Build a chain of nested tasks, one per level, starting at level 1.
fn chain(db: &Database, owner: &User, list: &TodoList, depth: i64) -> Vec<Task> {
    let mut tasks = vec![add(db, owner, list, "level 1")];
    for level in 2..=depth {
        let parent = tasks.last().unwrap().clone();
        tasks.push(sub(db, owner, &parent, &format!("level {}", level)));
    }
    tasks
}

mod insert_tests {
    use super::*;

    #[test]
    fn top_level_task_has_level_one() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let groceries = list(&db, &ada, "Groceries");

        let milk = add(&db, &ada, &groceries, "  Buy milk  ");

        assert_eq!(milk.level, 1);
        assert_eq!(milk.list_id, groceries.id);
        assert_eq!(milk.parent_id, None);
        assert_eq!(milk.text, "Buy milk");
        assert!(!milk.completed);
    }

    #[test]
    fn subtask_inherits_parent_list_and_ignores_supplied_list() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let groceries = list(&db, &ada, "Groceries");
        let chores = list(&db, &ada, "Chores");
        let milk = add(&db, &ada, &groceries, "Buy milk");

        let child = db
            .insert_task(
                ada.id,
                NewTask {
                    text: "2% milk".to_string(),
                    list_id: Some(chores.id),
                    parent_id: Some(milk.id),
                },
            )
            .unwrap();

        assert_eq!(child.list_id, groceries.id);
        assert_eq!(child.parent_id, Some(milk.id));
        assert_eq!(child.level, 2);
    }

    #[test]
    fn five_levels_succeed_and_sixth_is_rejected() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let deep = list(&db, &ada, "Deep");

        let tasks = chain(&db, &ada, &deep, MAX_LEVEL);
        for (i, t) in tasks.iter().enumerate() {
            assert_eq!(t.level, i as i64 + 1);
        }

        let result = db.insert_task(
            ada.id,
            NewTask {
                text: "level 6".to_string(),
                list_id: None,
                parent_id: Some(tasks[4].id),
            },
        );

        assert_eq!(result.unwrap_err().code, ErrorCode::DepthExceeded);
        assert_eq!(count_tasks(&db, &ada, &deep), 5);
    }

    #[test]
    fn empty_text_is_rejected() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let groceries = list(&db, &ada, "Groceries");

        let result = db.insert_task(
            ada.id,
            NewTask {
                text: "   ".to_string(),
                list_id: Some(groceries.id),
                parent_id: None,
            },
        );

        let err = result.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.field.as_deref(), Some("text"));
        assert_eq!(count_tasks(&db, &ada, &groceries), 0);
    }

    #[test]
    fn missing_list_and_parent_is_rejected() {
        let db = setup_db();
        let ada = user(&db, "ada");

        let err = db
            .insert_task(
                ada.id,
                NewTask {
                    text: "floating".to_string(),
                    ..Default::default()
                },
            )
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.field.as_deref(), Some("list_id"));
    }

    #[test]
    fn unknown_parent_is_not_found() {
        let db = setup_db();
        let ada = user(&db, "ada");

        let err = db
            .insert_task(
                ada.id,
                NewTask {
                    text: "orphan".to_string(),
                    list_id: None,
                    parent_id: Some(999),
                },
            )
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFoundOrUnauthorized);
    }
}

mod hierarchy_tests {
    use super::*;

    fn ids(nodes: &[TaskNode], out: &mut Vec<i64>) {
        for node in nodes {
            out.push(node.id);
            ids(&node.subtasks, out);
        }
    }

    #[test]
    fn empty_list_has_empty_tree() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let empty = list(&db, &ada, "Empty");

        assert!(db.get_task_tree(ada.id, empty.id).unwrap().is_empty());
    }

    #[test]
    fn tree_mirrors_parent_chain() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let groceries = list(&db, &ada, "Groceries");
        let milk = add(&db, &ada, &groceries, "Buy milk");
        let two_percent = sub(&db, &ada, &milk, "2% milk");
        let brand = sub(&db, &ada, &two_percent, "Any brand");
        let bread = add(&db, &ada, &groceries, "Buy bread");

        let tree = db.get_task_tree(ada.id, groceries.id).unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].id, milk.id);
        assert_eq!(tree[0].subtasks[0].id, two_percent.id);
        assert_eq!(tree[0].subtasks[0].subtasks[0].id, brand.id);
        assert_eq!(tree[0].subtasks[0].subtasks[0].level, 3);
        assert_eq!(tree[1].id, bread.id);
        assert!(tree[1].subtasks.is_empty());

        let mut all = Vec::new();
        ids(&tree, &mut all);
        all.sort();
        assert_eq!(all.len(), 4);
        all.dedup();
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn board_lists_every_list_with_its_tree() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let groceries = list(&db, &ada, "Groceries");
        list(&db, &ada, "Empty");
        let milk = add(&db, &ada, &groceries, "Buy milk");
        sub(&db, &ada, &milk, "2% milk");

        let board = db.get_board(ada.id).unwrap();

        assert_eq!(board.len(), 2);
        assert_eq!(board[0].name, "Groceries");
        assert_eq!(board[0].tasks[0].count(), 2);
        assert!(board[1].tasks.is_empty());
    }
}

mod completion_tests {
    use super::*;

    #[test]
    fn completing_only_child_completes_parent() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let groceries = list(&db, &ada, "Groceries");
        let milk = add(&db, &ada, &groceries, "Buy milk");
        let two_percent = sub(&db, &ada, &milk, "2% milk");

        let toggled = db.toggle_task(ada.id, two_percent.id).unwrap();

        assert!(toggled.completed);
        assert!(task(&db, &ada, &milk).completed);
    }

    #[test]
    fn parent_stays_open_while_a_sibling_is_open() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let groceries = list(&db, &ada, "Groceries");
        let milk = add(&db, &ada, &groceries, "Buy milk");
        let a = sub(&db, &ada, &milk, "2% milk");
        let b = sub(&db, &ada, &milk, "Oat milk");

        db.toggle_task(ada.id, a.id).unwrap();
        assert!(!task(&db, &ada, &milk).completed);

        db.toggle_task(ada.id, b.id).unwrap();
        assert!(task(&db, &ada, &milk).completed);

        // Reopening one child reopens the parent.
        db.toggle_task(ada.id, a.id).unwrap();
        assert!(!task(&db, &ada, &milk).completed);
    }

    #[test]
    fn upward_reconciliation_stops_at_immediate_parent() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let work = list(&db, &ada, "Work");
        let tasks = chain(&db, &ada, &work, 3);

        db.toggle_task(ada.id, tasks[2].id).unwrap();

        assert!(task(&db, &ada, &tasks[2]).completed);
        assert!(task(&db, &ada, &tasks[1]).completed);
        assert!(!task(&db, &ada, &tasks[0]).completed);
    }

    #[test]
    fn toggling_task_cascades_to_whole_subtree() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let work = list(&db, &ada, "Work");
        let tasks = chain(&db, &ada, &work, 4);
        let other = add(&db, &ada, &work, "Unrelated");

        db.toggle_task(ada.id, tasks[0].id).unwrap();
        assert!(tasks.iter().all(|t| task(&db, &ada, t).completed));
        assert!(!task(&db, &ada, &other).completed);

        db.toggle_task(ada.id, tasks[0].id).unwrap();
        assert!(tasks.iter().all(|t| !task(&db, &ada, t).completed));
    }

    #[test]
    fn toggling_list_sets_everything_then_clears_everything() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let groceries = list(&db, &ada, "Groceries");
        let milk = add(&db, &ada, &groceries, "Buy milk");
        let two_percent = sub(&db, &ada, &milk, "2% milk");
        let brand = sub(&db, &ada, &two_percent, "Any brand");
        let bread = add(&db, &ada, &groceries, "Buy bread");
        db.toggle_task(ada.id, bread.id).unwrap();

        assert_eq!(db.toggle_list(ada.id, groceries.id).unwrap(), Some(true));
        let all = db.fetch_tasks_for_list(ada.id, groceries.id).unwrap();
        assert_eq!(all.len(), 4);
        assert!(all.iter().all(|t| t.completed));

        assert_eq!(db.toggle_list(ada.id, groceries.id).unwrap(), Some(false));
        for t in [&milk, &two_percent, &brand, &bread] {
            assert!(!task(&db, &ada, t).completed);
        }
    }

    #[test]
    fn toggling_empty_list_is_noop() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let empty = list(&db, &ada, "Empty");

        assert_eq!(db.toggle_list(ada.id, empty.id).unwrap(), None);
    }

    #[test]
    fn update_with_completed_propagates_like_toggle() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let groceries = list(&db, &ada, "Groceries");
        let milk = add(&db, &ada, &groceries, "Buy milk");
        let two_percent = sub(&db, &ada, &milk, "2% milk");

        let updated = db
            .update_task(
                ada.id,
                two_percent.id,
                TaskUpdate {
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(updated.completed);
        assert_eq!(updated.text, "2% milk");
        assert!(task(&db, &ada, &milk).completed);
    }
}

mod cascade_delete_tests {
    use super::*;

    #[test]
    fn deleting_task_removes_it_and_all_descendants() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let work = list(&db, &ada, "Work");
        let root = add(&db, &ada, &work, "Root");
        let a = sub(&db, &ada, &root, "A");
        let b = sub(&db, &ada, &root, "B");
        let a1 = sub(&db, &ada, &a, "A1");
        sub(&db, &ada, &a1, "A1x");
        let sibling = add(&db, &ada, &work, "Sibling");
        let sibling_child = sub(&db, &ada, &sibling, "Sibling child");

        let summary = db.delete_task(ada.id, root.id).unwrap();

        assert_eq!(summary.removed, 5);
        let remaining = db.fetch_tasks_for_list(ada.id, work.id).unwrap();
        let remaining_ids: Vec<_> = remaining.iter().map(|t| t.id).collect();
        assert_eq!(remaining_ids, vec![sibling.id, sibling_child.id]);
        assert!(remaining.iter().all(|t| t.parent_id != Some(root.id)));
        assert!(remaining.iter().all(|t| t.parent_id != Some(a.id)));
        assert!(remaining.iter().all(|t| t.parent_id != Some(b.id)));
    }

    #[test]
    fn deleting_leaf_removes_one() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let work = list(&db, &ada, "Work");
        let root = add(&db, &ada, &work, "Root");
        let leaf = sub(&db, &ada, &root, "Leaf");

        assert_eq!(db.delete_task(ada.id, leaf.id).unwrap().removed, 1);
        assert_eq!(count_tasks(&db, &ada, &work), 1);
    }

    #[test]
    fn deleting_list_removes_all_its_tasks() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let groceries = list(&db, &ada, "Groceries");
        let chores = list(&db, &ada, "Chores");
        let tasks = chain(&db, &ada, &groceries, 3);
        add(&db, &ada, &chores, "Vacuum");

        assert_eq!(db.delete_list(ada.id, groceries.id).unwrap(), 3);

        let err = db.fetch_task(ada.id, tasks[2].id).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFoundOrUnauthorized);
        assert_eq!(count_tasks(&db, &ada, &chores), 1);
        assert_eq!(db.get_lists_for_user(ada.id).unwrap().len(), 1);
    }

    #[test]
    fn deleting_all_lists_only_touches_callers_lists() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let bob = user(&db, "bob");
        let a1 = list(&db, &ada, "A1");
        list(&db, &ada, "A2");
        let b1 = list(&db, &bob, "B1");
        add(&db, &ada, &a1, "ada task");
        add(&db, &bob, &b1, "bob task");

        assert_eq!(db.delete_all_lists_for_user(ada.id).unwrap(), 2);

        assert!(db.get_lists_for_user(ada.id).unwrap().is_empty());
        assert_eq!(count_tasks(&db, &bob, &b1), 1);
    }

    #[test]
    fn deleting_user_removes_lists_and_tasks() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let groceries = list(&db, &ada, "Groceries");
        let milk = add(&db, &ada, &groceries, "Buy milk");

        db.delete_user(ada.id).unwrap();

        assert!(db.get_user(ada.id).unwrap().is_none());
        assert!(db.get_lists_for_user(ada.id).unwrap().is_empty());
        assert!(db.fetch_task(ada.id, milk.id).is_err());
    }
}

mod move_tests {
    use super::*;

    #[test]
    fn moving_top_level_task_moves_subtree_only() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let groceries = list(&db, &ada, "Groceries");
        let chores = list(&db, &ada, "Chores");
        let tasks = chain(&db, &ada, &groceries, 3);
        let sibling = add(&db, &ada, &groceries, "Sibling");

        let moved = db.move_task(ada.id, tasks[0].id, chores.id).unwrap();

        assert_eq!(moved.list_id, chores.id);
        for t in &tasks {
            let t = task(&db, &ada, t);
            assert_eq!(t.list_id, chores.id);
        }
        assert_eq!(task(&db, &ada, &tasks[2]).level, 3);
        assert_eq!(task(&db, &ada, &sibling).list_id, groceries.id);
        assert_eq!(count_tasks(&db, &ada, &chores), 3);
    }

    #[test]
    fn moving_nested_task_detaches_and_rebases_levels() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let groceries = list(&db, &ada, "Groceries");
        let chores = list(&db, &ada, "Chores");
        let tasks = chain(&db, &ada, &groceries, 4);

        let moved = db.move_task(ada.id, tasks[1].id, chores.id).unwrap();

        assert_eq!(moved.parent_id, None);
        assert_eq!(moved.level, 1);
        assert_eq!(task(&db, &ada, &tasks[2]).level, 2);
        assert_eq!(task(&db, &ada, &tasks[3]).level, 3);
        assert_eq!(task(&db, &ada, &tasks[3]).parent_id, Some(tasks[2].id));

        let tree = db.get_task_tree(ada.id, chores.id).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].count(), 3);
        assert_eq!(count_tasks(&db, &ada, &groceries), 1);
    }

    #[test]
    fn moving_to_foreign_list_is_rejected_and_nothing_changes() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let bob = user(&db, "bob");
        let groceries = list(&db, &ada, "Groceries");
        let bobs = list(&db, &bob, "Bob's");
        let milk = add(&db, &ada, &groceries, "Buy milk");

        let err = db.move_task(ada.id, milk.id, bobs.id).unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFoundOrUnauthorized);
        assert_eq!(task(&db, &ada, &milk).list_id, groceries.id);
    }

    #[test]
    fn update_with_list_id_moves_task() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let groceries = list(&db, &ada, "Groceries");
        let chores = list(&db, &ada, "Chores");
        let milk = add(&db, &ada, &groceries, "Buy milk");
        let child = sub(&db, &ada, &milk, "2% milk");

        let updated = db
            .update_task(
                ada.id,
                milk.id,
                TaskUpdate {
                    list_id: Some(chores.id),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.list_id, chores.id);
        assert_eq!(task(&db, &ada, &child).list_id, chores.id);
    }
}

mod update_tests {
    use super::*;

    #[test]
    fn only_supplied_fields_change() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let groceries = list(&db, &ada, "Groceries");
        let milk = add(&db, &ada, &groceries, "Buy milk");

        let updated = db
            .update_task(
                ada.id,
                milk.id,
                TaskUpdate {
                    text: Some(" Buy oat milk ".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.text, "Buy oat milk");
        assert!(!updated.completed);
        assert_eq!(updated.list_id, groceries.id);
    }

    #[test]
    fn failed_update_rolls_back_earlier_changes() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let groceries = list(&db, &ada, "Groceries");
        let milk = add(&db, &ada, &groceries, "Buy milk");

        let result = db.update_task(
            ada.id,
            milk.id,
            TaskUpdate {
                text: Some("Renamed".to_string()),
                list_id: Some(12345),
                ..Default::default()
            },
        );

        assert_eq!(result.unwrap_err().code, ErrorCode::NotFoundOrUnauthorized);
        assert_eq!(task(&db, &ada, &milk).text, "Buy milk");
    }

    #[test]
    fn blank_text_is_rejected() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let groceries = list(&db, &ada, "Groceries");
        let milk = add(&db, &ada, &groceries, "Buy milk");

        let err = db
            .update_task(
                ada.id,
                milk.id,
                TaskUpdate {
                    text: Some("  ".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(task(&db, &ada, &milk).text, "Buy milk");
    }
}

mod ownership_tests {
    use super::*;

    #[test]
    fn other_user_cannot_delete_task() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let bob = user(&db, "bob");
        let groceries = list(&db, &ada, "Groceries");
        let milk = add(&db, &ada, &groceries, "Buy milk");

        let err = db.delete_task(bob.id, milk.id).unwrap_err();

        assert_eq!(err.code, ErrorCode::NotFoundOrUnauthorized);
        assert_eq!(task(&db, &ada, &milk).id, milk.id);
    }

    #[test]
    fn foreign_and_missing_targets_look_the_same() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let bob = user(&db, "bob");
        let groceries = list(&db, &ada, "Groceries");
        let milk = add(&db, &ada, &groceries, "Buy milk");

        let foreign = db.fetch_task(bob.id, milk.id).unwrap_err();
        let missing = db.fetch_task(bob.id, 9999).unwrap_err();

        assert_eq!(foreign.code, missing.code);
        assert_eq!(foreign.message, missing.message);
    }

    #[test]
    fn other_user_cannot_touch_list() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let bob = user(&db, "bob");
        let groceries = list(&db, &ada, "Groceries");
        let milk = add(&db, &ada, &groceries, "Buy milk");

        assert!(db.fetch_tasks_for_list(bob.id, groceries.id).is_err());
        assert!(db.toggle_list(bob.id, groceries.id).is_err());
        assert!(db.rename_list(bob.id, groceries.id, "Mine").is_err());
        assert!(db.delete_list(bob.id, groceries.id).is_err());
        assert!(db.toggle_task(bob.id, milk.id).is_err());
        assert!(
            db.insert_task(
                bob.id,
                NewTask {
                    text: "sneaky".to_string(),
                    list_id: Some(groceries.id),
                    parent_id: None,
                },
            )
            .is_err()
        );
        assert!(
            db.insert_task(
                bob.id,
                NewTask {
                    text: "sneaky".to_string(),
                    list_id: None,
                    parent_id: Some(milk.id),
                },
            )
            .is_err()
        );

        assert_eq!(count_tasks(&db, &ada, &groceries), 1);
        assert!(!task(&db, &ada, &milk).completed);
        assert_eq!(db.get_lists_for_user(ada.id).unwrap()[0].name, "Groceries");
    }
}

mod list_tests {
    use super::*;

    #[test]
    fn create_and_rename_list() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let groceries = list(&db, &ada, "  Groceries ");
        assert_eq!(groceries.name, "Groceries");

        let renamed = db.rename_list(ada.id, groceries.id, "Shopping").unwrap();
        assert_eq!(renamed.name, "Shopping");
        assert_eq!(db.get_lists_for_user(ada.id).unwrap()[0].name, "Shopping");
    }

    #[test]
    fn blank_list_name_is_rejected() {
        let db = setup_db();
        let ada = user(&db, "ada");

        let err = db.create_list(ada.id, "").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.field.as_deref(), Some("name"));
    }
}

mod user_tests {
    use super::*;

    #[test]
    fn duplicate_username_or_email_conflicts() {
        let db = setup_db();
        user(&db, "ada");

        let same_name = db
            .create_user("ada", "other@example.com", "hash")
            .unwrap_err();
        let same_email = db
            .create_user("other", "ada@example.com", "hash")
            .unwrap_err();

        assert_eq!(same_name.code, ErrorCode::Conflict);
        assert_eq!(same_email.code, ErrorCode::Conflict);
    }

    #[test]
    fn find_user_by_email() {
        let db = setup_db();
        let ada = user(&db, "ada");

        let found = db.find_user_by_email("ada@example.com").unwrap().unwrap();
        assert_eq!(found.id, ada.id);
        assert_eq!(found.password_hash, "$argon2id$test-hash");
        assert!(db.find_user_by_email("nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn invalid_email_is_rejected() {
        let db = setup_db();
        let err = db.create_user("ada", "not-an-email", "hash").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}

mod session_tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn session_resolves_until_deleted() {
        let db = setup_db();
        let ada = user(&db, "ada");

        let session = db.create_session(ada.id, Duration::days(1)).unwrap();
        assert_eq!(db.resolve_session(&session.token).unwrap(), Some(ada.id));

        assert!(db.delete_session(&session.token).unwrap());
        assert_eq!(db.resolve_session(&session.token).unwrap(), None);
        assert!(!db.delete_session(&session.token).unwrap());
    }

    #[test]
    fn expired_session_does_not_resolve_and_is_purged() {
        let db = setup_db();
        let ada = user(&db, "ada");

        let session = db.create_session(ada.id, Duration::seconds(-1)).unwrap();

        assert_eq!(db.resolve_session(&session.token).unwrap(), None);
        assert_eq!(db.purge_expired_sessions().unwrap(), 1);
    }
}

mod persistence_tests {
    use super::*;

    #[test]
    fn data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("todo.db");

        let (ada_id, list_id) = {
            let db = Database::open(&path).unwrap();
            let ada = user(&db, "ada");
            let groceries = list(&db, &ada, "Groceries");
            let milk = add(&db, &ada, &groceries, "Buy milk");
            sub(&db, &ada, &milk, "2% milk");
            (ada.id, groceries.id)
        };

        let db = Database::open(&path).unwrap();
        let tree = db.get_task_tree(ada_id, list_id).unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].subtasks.len(), 1);
    }

    #[test]
    fn reset_clears_everything() {
        let db = setup_db();
        let ada = user(&db, "ada");
        let groceries = list(&db, &ada, "Groceries");
        add(&db, &ada, &groceries, "Buy milk");

        db.reset().unwrap();

        assert!(db.get_user(ada.id).unwrap().is_none());
        assert!(db.get_lists_for_user(ada.id).unwrap().is_empty());
    }
}
