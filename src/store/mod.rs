//! Session state transitions and the store that ties the reducer to
//! durable storage.

pub mod action;
pub mod reducer;

pub use action::Action;

use log::debug;

use crate::io::persist;
use crate::io::storage::{KeyValueStore, StorageError};
use crate::model::state::AppState;
use crate::store::reducer::reduce;

/// The session store: in-memory state plus its write-through storage.
///
/// The in-memory state is the single source of truth; storage is a cache of
/// the `user` and `tasks` slices, rewritten after every dispatch. Everything
/// is single-threaded and synchronous, so each write observes exactly the
/// state produced by the transition before it.
pub struct Store<S: KeyValueStore> {
    state: AppState,
    storage: S,
}

impl<S: KeyValueStore> Store<S> {
    /// Open a store, hydrating state from whatever the storage holds.
    /// Malformed or missing persisted data hydrates as an empty session.
    pub fn open(mut storage: S) -> Result<Store<S>, StorageError> {
        let (user, tasks) = persist::load_session(&mut storage);
        let mut store = Store {
            state: AppState::default(),
            storage,
        };
        store.dispatch(Action::LoadData { user, tasks })?;
        Ok(store)
    }

    /// Apply an action and mirror the affected slices to storage.
    pub fn dispatch(&mut self, action: Action) -> Result<&AppState, StorageError> {
        debug!("dispatch {}", action_name(&action));
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
        persist::save_session(&mut self.storage, &self.state)?;
        Ok(&self.state)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

fn action_name(action: &Action) -> &'static str {
    match action {
        Action::Login(_) => "login",
        Action::Logout => "logout",
        Action::UpdateUser(_) => "update_user",
        Action::AddTask(_) => "add_task",
        Action::UpdateTask { .. } => "update_task",
        Action::DeleteTask(_) => "delete_task",
        Action::ToggleTask(_) => "toggle_task",
        Action::SetFilter(_) => "set_filter",
        Action::SetSort(_) => "set_sort",
        Action::SetSearch(_) => "set_search",
        Action::LoadData { .. } => "load_data",
    }
}
