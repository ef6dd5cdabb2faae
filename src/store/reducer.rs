use chrono::Utc;
use uuid::Uuid;

use crate::model::state::AppState;
use crate::model::task::Task;
use crate::store::action::Action;

/// Compute the next state for an action.
///
/// No action fails: mutations referencing an unknown task id, and user
/// updates while logged out, are silent no-ops. Persistence is the caller's
/// concern (see `Store::dispatch`).
pub fn reduce(mut state: AppState, action: Action) -> AppState {
    match action {
        Action::Login(user) => {
            state.user = Some(user);
        }
        Action::Logout => {
            state.user = None;
            state.tasks.clear();
        }
        Action::UpdateUser(patch) => {
            if let Some(user) = state.user.as_mut() {
                user.apply(patch);
            }
        }
        Action::AddTask(draft) => {
            state.tasks.push(Task {
                id: Uuid::new_v4().to_string(),
                title: draft.title,
                description: draft.description,
                priority: draft.priority,
                category: draft.category,
                completed: draft.completed,
                created_at: Utc::now(),
                completed_at: None,
                due_date: draft.due_date,
            });
        }
        Action::UpdateTask { id, patch } => {
            if let Some(task) = state.tasks.iter_mut().find(|t| t.id == id) {
                task.apply(patch);
            }
        }
        Action::DeleteTask(id) => {
            state.tasks.retain(|t| t.id != id);
        }
        Action::ToggleTask(id) => {
            if let Some(task) = state.tasks.iter_mut().find(|t| t.id == id) {
                task.completed = !task.completed;
                task.completed_at = if task.completed { Some(Utc::now()) } else { None };
            }
        }
        Action::SetFilter(filter) => {
            state.filter = filter;
        }
        Action::SetSort(sort_by) => {
            state.sort_by = sort_by;
        }
        Action::SetSearch(term) => {
            state.search_term = term;
        }
        Action::LoadData { user, tasks } => {
            state.user = user;
            state.tasks = tasks;
        }
    }
    state
}
