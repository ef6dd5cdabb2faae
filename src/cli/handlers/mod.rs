use std::error::Error;
use std::path::PathBuf;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use regex::Regex;
use uuid::Uuid;

use crate::cli::commands::*;
use crate::cli::output::{
    self, CalendarDayJson, CalendarJson, CompletedJson, SearchHitJson, SessionJson, StatsJson,
    TaskListJson,
};
use crate::io::config_io;
use crate::io::storage::{self, FileStore, KeyValueStore};
use crate::logging;
use crate::model::config::AppConfig;
use crate::model::state::{AppState, Filter, SortKey};
use crate::model::task::{Priority, Task, TaskDraft, TaskPatch};
use crate::model::user::{Preferences, Theme, User, UserPatch};
use crate::ops::{calendar, query, search};
use crate::store::{Action, Store};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn Error>> {
    let json = cli.json;
    let config = config_io::read_config();
    let data_dir = resolve_data_dir(cli.data_dir.as_deref(), &config);

    // File logging is best-effort; the command still runs without it
    let _logger = match logging::init(&config.log.level, &data_dir.join("logs")) {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("warning: {e}");
            None
        }
    };

    let storage = FileStore::open(&data_dir)?;
    let mut store = Store::open(storage)?;

    match cli.command {
        Commands::Login(args) => cmd_login(&mut store, args, json),
        Commands::Logout => cmd_logout(&mut store, json),
        Commands::Whoami => cmd_whoami(&store, json),
        Commands::Profile(args) => cmd_profile(&mut store, args, json),
        Commands::Add(args) => cmd_add(&mut store, &config, args, json),
        Commands::List(args) => cmd_list(&mut store, args, json),
        Commands::Show(args) => cmd_show(&store, args, json),
        Commands::Edit(args) => cmd_edit(&mut store, args, json),
        Commands::Toggle(args) => cmd_toggle(&mut store, args, json),
        Commands::Done(args) => cmd_done(&mut store, args, json),
        Commands::Reopen(args) => cmd_reopen(&mut store, args, json),
        Commands::Delete(args) => cmd_delete(&mut store, args),
        Commands::Search(args) => cmd_search(&store, args, json),
        Commands::Completed(args) => cmd_completed(&store, args, json),
        Commands::Calendar(args) => cmd_calendar(&store, args, json),
        Commands::Stats => cmd_stats(&store, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn resolve_data_dir(flag: Option<&str>, config: &AppConfig) -> PathBuf {
    if let Some(dir) = flag {
        return PathBuf::from(dir);
    }
    if let Some(dir) = &config.storage.dir {
        return dir.clone();
    }
    storage::default_data_dir()
}

/// Resolve a task id or unique id prefix against the current task list.
/// The store itself treats unknown ids as no-ops; resolving up front is what
/// lets the CLI report them instead.
fn resolve_task_id(state: &AppState, input: &str) -> Result<String, Box<dyn Error>> {
    if state.task(input).is_some() {
        return Ok(input.to_string());
    }
    let matches: Vec<&Task> = state
        .tasks
        .iter()
        .filter(|t| t.id.starts_with(input))
        .collect();
    match matches.len() {
        0 => Err(format!("no task with id {input}").into()),
        1 => Ok(matches[0].id.clone()),
        n => Err(format!("ambiguous id prefix {input} ({n} matches)").into()),
    }
}

fn require_login<S: KeyValueStore>(store: &Store<S>) -> Result<(), Box<dyn Error>> {
    if store.state().is_authenticated() {
        Ok(())
    } else {
        Err("not logged in (try `td login <name> --email <email>`)".into())
    }
}

fn parse_priority(s: &str) -> Result<Priority, Box<dyn Error>> {
    Priority::parse(s)
        .ok_or_else(|| format!("invalid priority \"{s}\" (expected low, medium, or high)").into())
}

fn parse_filter(s: &str) -> Result<Filter, Box<dyn Error>> {
    Filter::parse(s)
        .ok_or_else(|| format!("invalid filter \"{s}\" (expected all, active, or completed)").into())
}

fn parse_sort(s: &str) -> Result<SortKey, Box<dyn Error>> {
    SortKey::parse(s)
        .ok_or_else(|| format!("invalid sort key \"{s}\" (expected date, priority, or category)").into())
}

fn parse_theme(s: &str) -> Result<Theme, Box<dyn Error>> {
    Theme::parse(s).ok_or_else(|| format!("invalid theme \"{s}\" (expected light or dark)").into())
}

fn parse_switch(s: &str) -> Result<bool, Box<dyn Error>> {
    match s {
        "on" | "true" => Ok(true),
        "off" | "false" => Ok(false),
        _ => Err(format!("invalid value \"{s}\" (expected on or off)").into()),
    }
}

/// Parse a YYYY-MM-DD due date as midnight UTC
fn parse_due(s: &str) -> Result<DateTime<Utc>, Box<dyn Error>> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid date \"{s}\" (expected YYYY-MM-DD)"))?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

// ---------------------------------------------------------------------------
// Session commands
// ---------------------------------------------------------------------------

fn cmd_login<S: KeyValueStore>(
    store: &mut Store<S>,
    args: LoginArgs,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let user = User {
        id: Uuid::new_v4().to_string(),
        name: args.name,
        email: args.email,
        avatar: args.avatar,
        preferences: Preferences::default(),
    };
    let state = store.dispatch(Action::Login(user))?;

    if json {
        let session = SessionJson {
            authenticated: true,
            user: state.user.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else if let Some(user) = &state.user {
        println!("Logged in as {} <{}>", user.name, user.email);
    }
    Ok(())
}

fn cmd_logout<S: KeyValueStore>(store: &mut Store<S>, json: bool) -> Result<(), Box<dyn Error>> {
    store.dispatch(Action::Logout)?;
    if json {
        let session = SessionJson {
            authenticated: false,
            user: None,
        };
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else {
        println!("Logged out. Local tasks cleared.");
    }
    Ok(())
}

fn cmd_whoami<S: KeyValueStore>(store: &Store<S>, json: bool) -> Result<(), Box<dyn Error>> {
    let state = store.state();
    if json {
        let session = SessionJson {
            authenticated: state.is_authenticated(),
            user: state.user.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&session)?);
        return Ok(());
    }

    match &state.user {
        Some(user) => {
            println!("{} <{}>", user.name, user.email);
            if let Some(avatar) = &user.avatar {
                println!("  avatar: {avatar}");
            }
            let prefs = &user.preferences;
            println!("  theme: {}", prefs.theme.label());
            println!("  default category: {}", prefs.default_category);
            println!(
                "  notifications: {}",
                if prefs.notifications { "on" } else { "off" }
            );
        }
        None => println!("not logged in"),
    }
    Ok(())
}

fn cmd_profile<S: KeyValueStore>(
    store: &mut Store<S>,
    args: ProfileArgs,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    require_login(store)?;
    if args.name.is_none()
        && args.email.is_none()
        && args.avatar.is_none()
        && !args.clear_avatar
        && args.theme.is_none()
        && args.default_category.is_none()
        && args.notifications.is_none()
    {
        return Err("nothing to change (see `td profile --help`)".into());
    }

    // Preferences are merged here and replaced wholesale in the patch
    let mut preferences = store
        .state()
        .user
        .as_ref()
        .map(|u| u.preferences.clone())
        .unwrap_or_default();
    let mut prefs_changed = false;
    if let Some(theme) = &args.theme {
        preferences.theme = parse_theme(theme)?;
        prefs_changed = true;
    }
    if let Some(category) = args.default_category {
        preferences.default_category = category;
        prefs_changed = true;
    }
    if let Some(notifications) = &args.notifications {
        preferences.notifications = parse_switch(notifications)?;
        prefs_changed = true;
    }

    let patch = UserPatch {
        name: args.name,
        email: args.email,
        avatar: if args.clear_avatar {
            Some(None)
        } else {
            args.avatar.map(Some)
        },
        preferences: prefs_changed.then_some(preferences),
    };
    let state = store.dispatch(Action::UpdateUser(patch))?;

    if json {
        let session = SessionJson {
            authenticated: true,
            user: state.user.as_ref(),
        };
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else {
        println!("Profile updated.");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Task commands
// ---------------------------------------------------------------------------

fn cmd_add<S: KeyValueStore>(
    store: &mut Store<S>,
    config: &AppConfig,
    args: AddArgs,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    require_login(store)?;
    if args.title.trim().is_empty() {
        return Err("title cannot be empty".into());
    }

    let priority = match &args.priority {
        Some(p) => parse_priority(p)?,
        None => config.defaults.priority,
    };
    let category = args
        .category
        .or_else(|| {
            store
                .state()
                .user
                .as_ref()
                .map(|u| u.preferences.default_category.clone())
        })
        .unwrap_or_else(|| config.defaults.category.clone());
    let due_date = args.due.as_deref().map(parse_due).transpose()?;

    let state = store.dispatch(Action::AddTask(TaskDraft {
        title: args.title,
        description: args.description.unwrap_or_default(),
        priority,
        category,
        completed: false,
        due_date,
    }))?;

    // New tasks are appended
    let Some(task) = state.tasks.last() else {
        return Err("task was not added".into());
    };
    if json {
        println!("{}", serde_json::to_string_pretty(task)?);
    } else {
        println!("Added {}  {}", output::short_id(&task.id), task.title);
    }
    Ok(())
}

fn cmd_list<S: KeyValueStore>(
    store: &mut Store<S>,
    args: ListArgs,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    if let Some(filter) = &args.filter {
        let filter = parse_filter(filter)?;
        store.dispatch(Action::SetFilter(filter))?;
    }
    if let Some(sort) = &args.sort {
        let sort = parse_sort(sort)?;
        store.dispatch(Action::SetSort(sort))?;
    }
    if let Some(term) = args.search {
        store.dispatch(Action::SetSearch(term))?;
    }

    let state = store.state();
    let tasks = query::visible_tasks(state);
    if json {
        let list = TaskListJson {
            count: tasks.len(),
            tasks,
        };
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("No tasks found.");
    } else {
        let now = Utc::now();
        for task in tasks {
            println!("{}", output::task_line(task, now));
        }
    }
    Ok(())
}

fn cmd_show<S: KeyValueStore>(
    store: &Store<S>,
    args: IdArg,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let state = store.state();
    let id = resolve_task_id(state, &args.id)?;
    let Some(task) = state.task(&id) else {
        return Err(format!("no task with id {id}").into());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(task)?);
    } else {
        print!("{}", output::task_detail(task, Utc::now()));
    }
    Ok(())
}

fn cmd_edit<S: KeyValueStore>(
    store: &mut Store<S>,
    args: EditArgs,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    require_login(store)?;
    let id = resolve_task_id(store.state(), &args.id)?;

    if args.title.is_none()
        && args.description.is_none()
        && args.priority.is_none()
        && args.category.is_none()
        && args.due.is_none()
        && !args.clear_due
    {
        return Err("nothing to change (see `td edit --help`)".into());
    }
    if args.title.as_ref().is_some_and(|t| t.trim().is_empty()) {
        return Err("title cannot be empty".into());
    }

    let patch = TaskPatch {
        title: args.title,
        description: args.description,
        priority: args.priority.as_deref().map(parse_priority).transpose()?,
        category: args.category,
        completed: None,
        completed_at: None,
        due_date: if args.clear_due {
            Some(None)
        } else {
            args.due.as_deref().map(parse_due).transpose()?.map(Some)
        },
    };
    let state = store.dispatch(Action::UpdateTask {
        id: id.clone(),
        patch,
    })?;

    let Some(task) = state.task(&id) else {
        return Err(format!("no task with id {id}").into());
    };
    if json {
        println!("{}", serde_json::to_string_pretty(task)?);
    } else {
        println!("{}", output::task_line(task, Utc::now()));
    }
    Ok(())
}

fn cmd_toggle<S: KeyValueStore>(
    store: &mut Store<S>,
    args: IdArg,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    require_login(store)?;
    let id = resolve_task_id(store.state(), &args.id)?;
    let state = store.dispatch(Action::ToggleTask(id.clone()))?;
    report_task(state, &id, json)
}

fn cmd_done<S: KeyValueStore>(
    store: &mut Store<S>,
    args: IdArg,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    require_login(store)?;
    let id = resolve_task_id(store.state(), &args.id)?;
    let Some(task) = store.state().task(&id) else {
        return Err(format!("no task with id {id}").into());
    };
    if task.completed {
        println!("{} is already done", output::short_id(&id));
        return Ok(());
    }
    let state = store.dispatch(Action::ToggleTask(id.clone()))?;
    report_task(state, &id, json)
}

fn cmd_reopen<S: KeyValueStore>(
    store: &mut Store<S>,
    args: IdArg,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    require_login(store)?;
    let id = resolve_task_id(store.state(), &args.id)?;
    let Some(task) = store.state().task(&id) else {
        return Err(format!("no task with id {id}").into());
    };
    if !task.completed {
        return Err(format!("task {} is not completed", output::short_id(&id)).into());
    }

    // Reopening clears the completion timestamp together with the flag
    let state = store.dispatch(Action::UpdateTask {
        id: id.clone(),
        patch: TaskPatch {
            completed: Some(false),
            completed_at: Some(None),
            ..Default::default()
        },
    })?;
    report_task(state, &id, json)
}

fn report_task(state: &AppState, id: &str, json: bool) -> Result<(), Box<dyn Error>> {
    let Some(task) = state.task(id) else {
        return Err(format!("no task with id {id}").into());
    };
    if json {
        println!("{}", serde_json::to_string_pretty(task)?);
    } else {
        println!("{}", output::task_line(task, Utc::now()));
    }
    Ok(())
}

fn cmd_delete<S: KeyValueStore>(
    store: &mut Store<S>,
    args: DeleteArgs,
) -> Result<(), Box<dyn Error>> {
    require_login(store)?;

    // Resolve everything first so a bad id aborts before any deletion
    let mut ids = Vec::new();
    for input in &args.ids {
        let id = resolve_task_id(store.state(), input)?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    let count = ids.len();
    for id in ids {
        store.dispatch(Action::DeleteTask(id))?;
    }
    println!("Deleted {count} task(s)");
    Ok(())
}

fn cmd_search<S: KeyValueStore>(
    store: &Store<S>,
    args: SearchArgs,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let re = Regex::new(&args.pattern)?;
    let state = store.state();
    let hits = search::search_tasks(&state.tasks, &re);

    if json {
        let hits: Vec<SearchHitJson> = hits
            .iter()
            .map(|h| SearchHitJson {
                id: h.task.id.clone(),
                title: h.task.title.clone(),
                field: h.field.label(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    if hits.is_empty() {
        println!("No matches.");
    } else {
        for hit in hits {
            println!(
                "{}  {:<11}  {}",
                output::short_id(&hit.task.id),
                hit.field.label(),
                hit.task.title
            );
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Review commands
// ---------------------------------------------------------------------------

fn cmd_completed<S: KeyValueStore>(
    store: &Store<S>,
    args: CompletedArgs,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let state = store.state();
    let now = Utc::now();
    let done = query::completed_tasks(&state.tasks);
    let today = query::completed_today(&state.tasks, now);
    let this_week = query::completed_this_week(&state.tasks, now);

    if json {
        let report = CompletedJson {
            today,
            this_week,
            tasks: done.into_iter().take(args.limit).collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Completed: {} today, {} this week, {} total",
        today,
        this_week,
        done.len()
    );
    for task in done.iter().take(args.limit) {
        if let Some(at) = task.completed_at {
            println!(
                "[x] {}  {}  completed {}",
                output::short_id(&task.id),
                task.title,
                output::format_minute(at)
            );
        }
    }
    Ok(())
}

fn cmd_calendar<S: KeyValueStore>(
    store: &Store<S>,
    args: CalendarArgs,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let now = Utc::now();
    let year = args.year.unwrap_or_else(|| now.year());
    let month = args.month.unwrap_or_else(|| now.month());

    let Some(cells) = calendar::month_cells(year, month) else {
        return Err(format!("invalid month {month} (expected 1-12)").into());
    };
    let state = store.state();
    let by_day = calendar::tasks_due_in_month(&state.tasks, year, month);

    if json {
        let days: Vec<CalendarDayJson> = by_day
            .iter()
            .map(|(day, tasks)| CalendarDayJson {
                date: day.format("%Y-%m-%d").to_string(),
                tasks: tasks.clone(),
            })
            .collect();
        let cal = CalendarJson { year, month, days };
        println!("{}", serde_json::to_string_pretty(&cal)?);
        return Ok(());
    }

    println!(
        "     {} {}",
        calendar::MONTH_NAMES[(month - 1) as usize],
        year
    );
    println!(" Su  Mo  Tu  We  Th  Fr  Sa");
    for week in cells.chunks(7) {
        let row: String = week
            .iter()
            .map(|cell| match cell {
                Some(day) => {
                    let marker = if calendar::tasks_due_on(&state.tasks, *day).is_empty() {
                        ' '
                    } else {
                        '*'
                    };
                    format!("{:>3}{}", day.day(), marker)
                }
                None => "    ".to_string(),
            })
            .collect();
        println!("{}", row.trim_end());
    }

    if !by_day.is_empty() {
        println!();
        for (day, tasks) in by_day {
            for task in tasks {
                println!(
                    "{}  {} {}  {}",
                    day.format("%Y-%m-%d"),
                    output::checkbox(task),
                    output::short_id(&task.id),
                    task.title
                );
            }
        }
    }
    Ok(())
}

fn cmd_stats<S: KeyValueStore>(store: &Store<S>, json: bool) -> Result<(), Box<dyn Error>> {
    let state = store.state();
    let totals = query::task_stats(&state.tasks, Utc::now());
    let categories = query::category_counts(&state.tasks);

    if json {
        let stats = StatsJson { totals, categories };
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!(
        "{} task(s): {} completed, {} pending, {} overdue",
        totals.total, totals.completed, totals.pending, totals.overdue
    );
    if !categories.is_empty() {
        println!("By category:");
        for (category, count) in &categories {
            println!("  {category:<16} {count}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::io::storage::MemoryStore;

    fn logged_in_store() -> Store<MemoryStore> {
        let mut store = Store::open(MemoryStore::new()).unwrap();
        store
            .dispatch(Action::Login(User {
                id: "u-1".into(),
                name: "Ada".into(),
                email: "ada@example.com".into(),
                avatar: None,
                preferences: Preferences::default(),
            }))
            .unwrap();
        store
    }

    fn add(store: &mut Store<MemoryStore>, title: &str) -> String {
        store
            .dispatch(Action::AddTask(TaskDraft {
                title: title.into(),
                description: String::new(),
                priority: Priority::Medium,
                category: "Personal".into(),
                completed: false,
                due_date: None,
            }))
            .unwrap();
        store.state().tasks.last().unwrap().id.clone()
    }

    #[test]
    fn resolve_accepts_exact_id_and_unique_prefix() {
        let mut store = logged_in_store();
        let id = add(&mut store, "one");

        assert_eq!(resolve_task_id(store.state(), &id).unwrap(), id);
        assert_eq!(resolve_task_id(store.state(), &id[..8]).unwrap(), id);
    }

    #[test]
    fn resolve_rejects_unknown_and_ambiguous_prefixes() {
        let mut store = logged_in_store();
        add(&mut store, "one");
        add(&mut store, "two");

        let err = resolve_task_id(store.state(), "zzzz-not-an-id").unwrap_err();
        assert!(err.to_string().contains("no task with id"));

        // Every UUID string shares the empty prefix
        let err = resolve_task_id(store.state(), "").unwrap_err();
        assert!(err.to_string().contains("ambiguous"));
    }

    #[test]
    fn require_login_gates_logged_out_stores() {
        let store = Store::open(MemoryStore::new()).unwrap();
        assert!(require_login(&store).is_err());
        assert!(require_login(&logged_in_store()).is_ok());
    }

    #[test]
    fn parse_due_is_midnight_utc() {
        let due = parse_due("2026-03-01").unwrap();
        assert_eq!(due.to_rfc3339(), "2026-03-01T00:00:00+00:00");
        assert!(parse_due("01/03/2026").is_err());
    }

    #[test]
    fn parse_switch_accepts_on_off() {
        assert!(parse_switch("on").unwrap());
        assert!(!parse_switch("off").unwrap());
        assert!(parse_switch("maybe").is_err());
    }

    #[test]
    fn resolve_data_dir_precedence() {
        let mut config = AppConfig::default();
        config.storage.dir = Some(PathBuf::from("/tmp/from-config"));

        assert_eq!(
            resolve_data_dir(Some("/tmp/from-flag"), &config),
            PathBuf::from("/tmp/from-flag")
        );
        assert_eq!(
            resolve_data_dir(None, &config),
            PathBuf::from("/tmp/from-config")
        );
        let empty = AppConfig::default();
        assert!(resolve_data_dir(None, &empty).ends_with("taskdeck"));
    }
}
