use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::model::state::{AppState, Filter, SortKey};
use crate::model::task::Task;

/// Apply the active filter, search, and sort to the task list.
///
/// Pipeline order matters and mirrors the dashboard: completion filter,
/// then case-insensitive substring search over title/description/category,
/// then sort. An empty search term matches everything.
pub fn visible_tasks(state: &AppState) -> Vec<&Task> {
    let needle = state.search_term.to_lowercase();
    let mut tasks: Vec<&Task> = state
        .tasks
        .iter()
        .filter(|t| match state.filter {
            Filter::All => true,
            Filter::Active => !t.completed,
            Filter::Completed => t.completed,
        })
        .filter(|t| {
            needle.is_empty()
                || t.title.to_lowercase().contains(&needle)
                || t.description.to_lowercase().contains(&needle)
                || t.category.to_lowercase().contains(&needle)
        })
        .collect();

    match state.sort_by {
        SortKey::Date => tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Priority => tasks.sort_by(|a, b| b.priority.cmp(&a.priority)),
        SortKey::Category => tasks.sort_by(|a, b| a.category.cmp(&b.category)),
    }
    tasks
}

/// Dashboard counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
}

pub fn task_stats(tasks: &[Task], now: DateTime<Utc>) -> TaskStats {
    TaskStats {
        total: tasks.len(),
        completed: tasks.iter().filter(|t| t.completed).count(),
        pending: tasks.iter().filter(|t| !t.completed).count(),
        overdue: tasks.iter().filter(|t| t.is_overdue(now)).count(),
    }
}

/// Completed tasks, most recently completed first
pub fn completed_tasks(tasks: &[Task]) -> Vec<&Task> {
    let mut done: Vec<&Task> = tasks.iter().filter(|t| t.completed).collect();
    done.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
    done
}

/// Count of tasks completed on the same calendar date (UTC) as `now`
pub fn completed_today(tasks: &[Task], now: DateTime<Utc>) -> usize {
    tasks
        .iter()
        .filter(|t| t.completed)
        .filter(|t| t.completed_at.is_some_and(|at| at.date_naive() == now.date_naive()))
        .count()
}

/// Count of tasks completed within the past seven days
pub fn completed_this_week(tasks: &[Task], now: DateTime<Utc>) -> usize {
    let week_ago = now - chrono::Duration::days(7);
    tasks
        .iter()
        .filter(|t| t.completed)
        .filter(|t| t.completed_at.is_some_and(|at| at >= week_ago))
        .count()
}

/// Task counts per category, in first-seen order
pub fn category_counts(tasks: &[Task]) -> IndexMap<String, usize> {
    let mut counts: IndexMap<String, usize> = IndexMap::new();
    for task in tasks {
        *counts.entry(task.category.clone()).or_insert(0) += 1;
    }
    counts
}
