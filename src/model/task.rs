use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Task priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    /// Parse a priority name into a priority
    pub fn parse(s: &str) -> Option<Priority> {
        match s {
            "low" => Some(Priority::Low),
            "medium" | "med" => Some(Priority::Medium),
            "high" => Some(Priority::High),
            _ => None,
        }
    }

    /// Display name, as shown in lists and task details
    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

/// A single unit of work.
///
/// Field names follow the persisted document layout (camelCase keys,
/// ISO-8601 date strings).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique id, generated at creation and never reused
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: Priority,
    /// Free-form category label
    pub category: String,
    #[serde(default)]
    pub completed: bool,
    /// Set once at creation, immutable afterwards
    pub created_at: DateTime<Utc>,
    /// Present iff `completed`; set/cleared on every completion toggle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl Task {
    /// Whether the task is past due and still open at `now`
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < now)
    }

    /// Merge a patch into this task. Absent patch fields are left untouched.
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(completed_at) = patch.completed_at {
            self.completed_at = completed_at;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
    }
}

/// The caller-supplied fields of a new task (id and creation time are
/// assigned by the store).
#[derive(Debug, Clone)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: String,
    pub completed: bool,
    pub due_date: Option<DateTime<Utc>>,
}

/// A partial task update.
///
/// Clearable fields use a double `Option`: `Some(None)` clears the field,
/// `None` leaves it untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub completed: Option<bool>,
    pub completed_at: Option<Option<DateTime<Utc>>>,
    pub due_date: Option<Option<DateTime<Utc>>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> Task {
        Task {
            id: "t-1".into(),
            title: "Write report".into(),
            description: "Quarterly numbers".into(),
            priority: Priority::Medium,
            category: "Work".into(),
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
            due_date: None,
        }
    }

    #[test]
    fn priority_parse_and_label() {
        assert_eq!(Priority::parse("low"), Some(Priority::Low));
        assert_eq!(Priority::parse("med"), Some(Priority::Medium));
        assert_eq!(Priority::parse("high"), Some(Priority::High));
        assert_eq!(Priority::parse("urgent"), None);
        assert_eq!(Priority::High.label(), "high");
    }

    #[test]
    fn priority_orders_low_to_high() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
    }

    #[test]
    fn apply_merges_only_present_fields() {
        let mut task = sample_task();
        task.apply(TaskPatch {
            title: Some("Write Q3 report".into()),
            priority: Some(Priority::High),
            ..Default::default()
        });
        assert_eq!(task.title, "Write Q3 report");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.description, "Quarterly numbers");
        assert_eq!(task.category, "Work");
    }

    #[test]
    fn apply_clears_due_date_with_inner_none() {
        let mut task = sample_task();
        task.due_date = Some(Utc::now());
        task.apply(TaskPatch {
            due_date: Some(None),
            ..Default::default()
        });
        assert!(task.due_date.is_none());
    }

    #[test]
    fn overdue_requires_open_task_and_past_due_date() {
        let now = Utc::now();
        let mut task = sample_task();
        assert!(!task.is_overdue(now));

        task.due_date = Some(now - chrono::Duration::days(1));
        assert!(task.is_overdue(now));

        task.completed = true;
        assert!(!task.is_overdue(now));
    }

    #[test]
    fn serializes_with_camel_case_date_keys() {
        let mut task = sample_task();
        task.due_date = Some(Utc::now());
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(json.contains("\"dueDate\""));
        assert!(!json.contains("\"completedAt\""));
        assert!(json.contains("\"priority\":\"medium\""));
    }
}
