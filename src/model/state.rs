use serde::{Deserialize, Serialize};

use crate::model::task::Task;
use crate::model::user::User;

/// Which completion slice of the task list is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub fn parse(s: &str) -> Option<Filter> {
        match s {
            "all" => Some(Filter::All),
            "active" => Some(Filter::Active),
            "completed" | "done" => Some(Filter::Completed),
            _ => None,
        }
    }
}

/// Sort key for the visible task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Newest first by creation time
    #[default]
    Date,
    /// High to low
    Priority,
    /// Alphabetical
    Category,
}

impl SortKey {
    pub fn parse(s: &str) -> Option<SortKey> {
        match s {
            "date" => Some(SortKey::Date),
            "priority" => Some(SortKey::Priority),
            "category" => Some(SortKey::Category),
            _ => None,
        }
    }
}

/// The whole session state: one of these exists per process, hydrated from
/// storage at startup and mutated only through the reducer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub user: Option<User>,
    /// Insertion-ordered; ids are unique within the collection
    pub tasks: Vec<Task>,
    pub filter: Filter,
    pub sort_by: SortKey,
    pub search_term: String,
}

impl AppState {
    /// Authentication is derived: a session is authenticated iff a user
    /// is present.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }
}
