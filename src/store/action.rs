use crate::model::state::{Filter, SortKey};
use crate::model::task::{Task, TaskDraft, TaskPatch};
use crate::model::user::{User, UserPatch};

/// The closed set of state transitions. Everything that mutates session
/// state goes through one of these.
#[derive(Debug, Clone)]
pub enum Action {
    /// Set the session user; tasks are untouched
    Login(User),
    /// Clear the user and the task list
    Logout,
    /// Shallow-merge a patch into the current user (no-op when logged out)
    UpdateUser(UserPatch),
    /// Append a task with a fresh id and the current time as creation time
    AddTask(TaskDraft),
    /// Shallow-merge a patch into the matching task (no-op on unknown id)
    UpdateTask { id: String, patch: TaskPatch },
    /// Remove the matching task (no-op on unknown id)
    DeleteTask(String),
    /// Flip completion, stamping or clearing the completion time
    ToggleTask(String),
    SetFilter(Filter),
    SetSort(SortKey),
    SetSearch(String),
    /// Replace user and tasks wholesale; used only at startup hydration
    LoadData {
        user: Option<User>,
        tasks: Vec<Task>,
    },
}
