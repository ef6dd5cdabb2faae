//! Store-level round-trips against the real file-backed storage: what one
//! session persists, the next session must hydrate unchanged.

use std::collections::HashSet;
use std::fs;

use chrono::Utc;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use taskdeck::io::storage::FileStore;
use taskdeck::model::task::{Priority, TaskDraft};
use taskdeck::model::user::{Preferences, Theme, User, UserPatch};
use taskdeck::store::{Action, Store};

fn open_store(dir: &TempDir) -> Store<FileStore> {
    Store::open(FileStore::open(dir.path()).unwrap()).unwrap()
}

fn draft(title: &str) -> TaskDraft {
    TaskDraft {
        title: title.to_string(),
        description: String::new(),
        priority: Priority::Medium,
        category: "Personal".to_string(),
        completed: false,
        due_date: None,
    }
}

fn user() -> User {
    User {
        id: "u-1".into(),
        name: "Ada".into(),
        email: "ada@example.com".into(),
        avatar: None,
        preferences: Preferences::default(),
    }
}

#[test]
fn session_round_trips_across_reopen() {
    let tmp = TempDir::new().unwrap();
    {
        let mut store = open_store(&tmp);
        store.dispatch(Action::Login(user())).unwrap();

        let mut with_due = draft("Buy milk");
        with_due.priority = Priority::Low;
        with_due.category = "Shopping".into();
        with_due.due_date = Some(Utc::now() + chrono::Duration::days(2));
        store.dispatch(Action::AddTask(with_due)).unwrap();
        store.dispatch(Action::AddTask(draft("Write report"))).unwrap();

        let id = store.state().tasks[0].id.clone();
        store.dispatch(Action::ToggleTask(id)).unwrap();
    }

    let reopened = open_store(&tmp);
    let state = reopened.state();
    assert_eq!(state.user.as_ref().map(|u| u.name.as_str()), Some("Ada"));
    assert_eq!(state.tasks.len(), 2);

    // Every field survives, date fields included, to the same instant
    let milk = &state.tasks[0];
    assert_eq!(milk.title, "Buy milk");
    assert_eq!(milk.priority, Priority::Low);
    assert_eq!(milk.category, "Shopping");
    assert!(milk.completed);
    assert!(milk.completed_at.is_some());
    assert!(milk.due_date.is_some());
}

#[test]
fn preferences_round_trip() {
    let tmp = TempDir::new().unwrap();
    {
        let mut store = open_store(&tmp);
        store.dispatch(Action::Login(user())).unwrap();
        store
            .dispatch(Action::UpdateUser(UserPatch {
                preferences: Some(Preferences {
                    theme: Theme::Dark,
                    default_category: "Work".into(),
                    notifications: false,
                }),
                ..Default::default()
            }))
            .unwrap();
    }

    let reopened = open_store(&tmp);
    let prefs = &reopened.state().user.as_ref().unwrap().preferences;
    assert_eq!(prefs.theme, Theme::Dark);
    assert_eq!(prefs.default_category, "Work");
    assert!(!prefs.notifications);
}

#[test]
fn ids_stay_distinct_across_sessions() {
    let tmp = TempDir::new().unwrap();
    {
        let mut store = open_store(&tmp);
        for i in 0..5 {
            store.dispatch(Action::AddTask(draft(&format!("first {i}")))).unwrap();
        }
    }
    {
        let mut store = open_store(&tmp);
        for i in 0..5 {
            store.dispatch(Action::AddTask(draft(&format!("second {i}")))).unwrap();
        }
    }

    let store = open_store(&tmp);
    let ids: HashSet<String> = store.state().tasks.iter().map(|t| t.id.clone()).collect();
    assert_eq!(ids.len(), 10);
}

#[test]
fn logout_empties_the_persisted_session() {
    let tmp = TempDir::new().unwrap();
    {
        let mut store = open_store(&tmp);
        store.dispatch(Action::Login(user())).unwrap();
        store.dispatch(Action::AddTask(draft("gone soon"))).unwrap();
        store.dispatch(Action::Logout).unwrap();
    }

    assert!(!tmp.path().join("user.json").exists());
    assert_eq!(
        fs::read_to_string(tmp.path().join("tasks.json")).unwrap(),
        "[]"
    );

    let reopened = open_store(&tmp);
    assert!(!reopened.state().is_authenticated());
    assert!(reopened.state().tasks.is_empty());
}

#[test]
fn toggle_twice_round_trips_as_open() {
    let tmp = TempDir::new().unwrap();
    {
        let mut store = open_store(&tmp);
        store.dispatch(Action::AddTask(draft("flip flop"))).unwrap();
        let id = store.state().tasks[0].id.clone();
        store.dispatch(Action::ToggleTask(id.clone())).unwrap();
        store.dispatch(Action::ToggleTask(id)).unwrap();
    }

    let reopened = open_store(&tmp);
    let task = &reopened.state().tasks[0];
    assert!(!task.completed);
    assert!(task.completed_at.is_none());

    // The open task must not carry a completedAt key on disk either
    let raw = fs::read_to_string(tmp.path().join("tasks.json")).unwrap();
    assert!(!raw.contains("completedAt"));
}

#[test]
fn corrupt_documents_hydrate_as_an_empty_session() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("user.json"), "{\"broken\":").unwrap();
    fs::write(tmp.path().join("tasks.json"), "not a list").unwrap();

    let store = open_store(&tmp);
    assert!(store.state().user.is_none());
    assert!(store.state().tasks.is_empty());

    // Both corrupt documents are kept for inspection
    assert!(tmp.path().join("user.bak.json").exists());
    assert!(tmp.path().join("tasks.bak.json").exists());
}
