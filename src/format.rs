//! Output formatting utilities for markdown and JSON.

use crate::types::{ListBoard, TaskNode};

/// Output format for CLI views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    Json,
    #[default]
    Markdown,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => Err(format!("unknown format '{}', expected json or markdown", other)),
        }
    }
}

fn push_task_markdown(md: &mut String, node: &TaskNode, depth: usize) {
    let mark = if node.completed { "x" } else { " " };
    md.push_str(&format!(
        "{}- [{}] {} (`{}`)\n",
        "  ".repeat(depth),
        mark,
        node.text,
        node.id
    ));
    for child in &node.subtasks {
        push_task_markdown(md, child, depth + 1);
    }
}

/// Format a task forest as a nested markdown checklist.
pub fn format_tasks_markdown(tasks: &[TaskNode]) -> String {
    let mut md = String::new();
    for node in tasks {
        push_task_markdown(&mut md, node, 0);
    }
    md
}

/// Format every list of a board as markdown.
pub fn format_board_markdown(board: &[ListBoard]) -> String {
    if board.is_empty() {
        return "No lists.\n".to_string();
    }

    let mut md = String::new();
    for list in board {
        let total: usize = list.tasks.iter().map(TaskNode::count).sum();
        md.push_str(&format!("## {} (`{}`, {} tasks)\n\n", list.name, list.id, total));
        if list.tasks.is_empty() {
            md.push_str("_empty_\n");
        } else {
            md.push_str(&format_tasks_markdown(&list.tasks));
        }
        md.push('\n');
    }
    md
}

/// Render a board in the requested format.
pub fn format_board(board: &[ListBoard], format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(&serde_json::json!({ "lists": board })),
        OutputFormat::Markdown => Ok(format_board_markdown(board)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: i64, text: &str, completed: bool, subtasks: Vec<TaskNode>) -> TaskNode {
        TaskNode {
            id,
            text: text.to_string(),
            completed,
            level: 1,
            subtasks,
        }
    }

    #[test]
    fn markdown_indents_subtasks() {
        let forest = vec![node(
            10,
            "Buy milk",
            false,
            vec![node(11, "2% milk", true, vec![])],
        )];
        let md = format_tasks_markdown(&forest);
        assert_eq!(md, "- [ ] Buy milk (`10`)\n  - [x] 2% milk (`11`)\n");
    }

    #[test]
    fn json_board_wraps_lists() {
        let board = vec![ListBoard {
            id: 1,
            name: "Groceries".into(),
            tasks: vec![node(10, "Buy milk", false, vec![])],
        }];
        let json = format_board(&board, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["lists"][0]["name"], "Groceries");
        assert!(value["lists"][0]["tasks"][0]["subtasks"].as_array().unwrap().is_empty());
    }

    #[test]
    fn parses_format_names() {
        assert_eq!("MD".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
