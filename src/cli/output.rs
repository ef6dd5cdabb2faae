use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::model::task::Task;
use crate::model::user::User;
use crate::ops::query::TaskStats;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct SessionJson<'a> {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<&'a User>,
}

#[derive(Serialize)]
pub struct TaskListJson<'a> {
    pub count: usize,
    pub tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
pub struct SearchHitJson {
    pub id: String,
    pub title: String,
    pub field: &'static str,
}

#[derive(Serialize)]
pub struct StatsJson {
    #[serde(flatten)]
    pub totals: TaskStats,
    pub categories: IndexMap<String, usize>,
}

#[derive(Serialize)]
pub struct CompletedJson<'a> {
    pub today: usize,
    pub this_week: usize,
    pub tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
pub struct CalendarDayJson<'a> {
    pub date: String,
    pub tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
pub struct CalendarJson<'a> {
    pub year: i32,
    pub month: u32,
    pub days: Vec<CalendarDayJson<'a>>,
}

// ---------------------------------------------------------------------------
// Human rendering
// ---------------------------------------------------------------------------

/// First segment of a task id, enough to name it in a list
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

pub fn checkbox(task: &Task) -> &'static str {
    if task.completed { "[x]" } else { "[ ]" }
}

pub fn format_day(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d").to_string()
}

pub fn format_minute(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

/// One-line task rendering for list views
pub fn task_line(task: &Task, now: DateTime<Utc>) -> String {
    let mut line = format!(
        "{} {}  {:<6}  {}  ({})",
        checkbox(task),
        short_id(&task.id),
        task.priority.label(),
        task.title,
        task.category
    );
    if let Some(due) = task.due_date {
        line.push_str(&format!("  due {}", format_day(due)));
        if task.is_overdue(now) {
            line.push_str(" (overdue)");
        }
    }
    line
}

/// Multi-line task rendering for `td show`
pub fn task_detail(task: &Task, now: DateTime<Utc>) -> String {
    let mut out = format!("{} {}\n", checkbox(task), task.title);
    out.push_str(&format!("id:        {}\n", task.id));
    out.push_str(&format!("priority:  {}\n", task.priority.label()));
    out.push_str(&format!("category:  {}\n", task.category));
    out.push_str(&format!("created:   {}\n", format_minute(task.created_at)));
    if let Some(due) = task.due_date {
        out.push_str(&format!("due:       {}", format_day(due)));
        if task.is_overdue(now) {
            out.push_str(" (overdue)");
        }
        out.push('\n');
    }
    if let Some(at) = task.completed_at {
        out.push_str(&format!("completed: {}\n", format_minute(at)));
    }
    if !task.description.is_empty() {
        out.push('\n');
        out.push_str(&task.description);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::task::Priority;

    fn sample_task() -> Task {
        Task {
            id: "3b1f2a4c-0000-4000-8000-000000000000".into(),
            title: "Buy milk".into(),
            description: String::new(),
            priority: Priority::Low,
            category: "Shopping".into(),
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
            due_date: None,
        }
    }

    #[test]
    fn short_id_takes_the_first_segment() {
        assert_eq!(short_id("3b1f2a4c-0000-4000-8000-000000000000"), "3b1f2a4c");
        assert_eq!(short_id("abc"), "abc");
    }

    #[test]
    fn task_line_without_due_date() {
        let line = task_line(&sample_task(), Utc::now());
        assert!(line.starts_with("[ ] 3b1f2a4c"));
        assert!(line.contains("Buy milk"));
        assert!(line.contains("(Shopping)"));
        assert!(!line.contains("due"));
    }

    #[test]
    fn task_line_marks_overdue() {
        let now = Utc::now();
        let mut task = sample_task();
        task.due_date = Some(now - chrono::Duration::days(1));
        let line = task_line(&task, now);
        assert!(line.contains("due "));
        assert!(line.contains("(overdue)"));

        task.completed = true;
        task.completed_at = Some(now);
        let line = task_line(&task, now);
        assert!(line.starts_with("[x]"));
        assert!(!line.contains("(overdue)"));
    }

    #[test]
    fn task_detail_includes_description_block() {
        let mut task = sample_task();
        task.description = "Semi-skimmed, two pints".into();
        let detail = task_detail(&task, Utc::now());
        assert!(detail.contains("id:        3b1f2a4c-"));
        assert!(detail.contains("\nSemi-skimmed, two pints\n"));
    }
}
