use log::{debug, warn};

use crate::io::storage::{KeyValueStore, StorageError};
use crate::model::state::AppState;
use crate::model::task::Task;
use crate::model::user::User;

/// Storage key for the current user document
pub const USER_KEY: &str = "user";
/// Storage key for the task list document
pub const TASKS_KEY: &str = "tasks";

/// Mirror the persisted slices of `state` into storage.
///
/// The user document is deleted when no user is present; the task list is
/// always rewritten. View settings (filter, sort, search) are session-only
/// and never persisted.
pub fn save_session<S: KeyValueStore>(
    storage: &mut S,
    state: &AppState,
) -> Result<(), StorageError> {
    match &state.user {
        Some(user) => {
            let json = serde_json::to_string(user).map_err(|e| StorageError::Serialize {
                key: USER_KEY.to_string(),
                source: e,
            })?;
            storage.set(USER_KEY, &json)?;
        }
        None => storage.remove(USER_KEY)?,
    }

    let json = serde_json::to_string(&state.tasks).map_err(|e| StorageError::Serialize {
        key: TASKS_KEY.to_string(),
        source: e,
    })?;
    storage.set(TASKS_KEY, &json)
}

/// Read the persisted session slices back out of storage.
///
/// Never fails: a missing key is an empty slice, and a document that no
/// longer parses is quarantined and treated as absent. Date fields come
/// back from their ISO-8601 form via serde.
pub fn load_session<S: KeyValueStore>(storage: &mut S) -> (Option<User>, Vec<Task>) {
    let user = match storage.get(USER_KEY) {
        Some(raw) => match serde_json::from_str::<User>(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                quarantine(storage, USER_KEY, &raw, &e);
                None
            }
        },
        None => None,
    };

    let tasks = match storage.get(TASKS_KEY) {
        Some(raw) => match serde_json::from_str::<Vec<Task>>(&raw) {
            Ok(tasks) => tasks,
            Err(e) => {
                quarantine(storage, TASKS_KEY, &raw, &e);
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    debug!(
        "hydrated session: user={} tasks={}",
        user.is_some(),
        tasks.len()
    );
    (user, tasks)
}

/// Corrupt document: keep a copy under `<key>.bak` and treat it as absent
fn quarantine<S: KeyValueStore>(storage: &mut S, key: &str, raw: &str, err: &serde_json::Error) {
    warn!("could not parse persisted \"{key}\" (keeping a copy under {key}.bak): {err}");
    let _ = storage.set(&format!("{key}.bak"), raw);
}
