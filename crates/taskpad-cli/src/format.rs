//! Formatting helpers for terminal output.

use taskpad_core::Task;

/// Longest title shown in `list` before it is cut off
pub const MAX_TITLE_WIDTH: usize = 60;

/// Truncate a string to a maximum number of characters, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// One line per task: status marker, id, title
pub fn task_line(task: &Task, id_width: usize) -> String {
    format!(
        "{} {:<width$}  {}",
        task.status_marker(),
        task.id,
        truncate_string(&task.title, MAX_TITLE_WIDTH),
        width = id_width
    )
}

pub fn task_table(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks yet".to_string();
    }
    let id_width = tasks.iter().map(|t| t.id.chars().count()).max().unwrap_or(0);
    let done = tasks.iter().filter(|t| t.is_completed).count();

    let mut lines: Vec<String> = tasks.iter().map(|t| task_line(t, id_width)).collect();
    lines.push(format!("{} of {} done", done, tasks.len()));
    lines.join("\n")
}
