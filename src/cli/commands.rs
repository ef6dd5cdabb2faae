use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "td", about = concat!("[/] taskdeck v", env!("CARGO_PKG_VERSION"), " - your tasks, kept local"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different data directory
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start a local session
    Login(LoginArgs),
    /// End the session and clear local tasks
    Logout,
    /// Show the current session user
    Whoami,
    /// Update the user profile and preferences
    Profile(ProfileArgs),
    /// Add a task
    Add(AddArgs),
    /// List tasks
    List(ListArgs),
    /// Show task details
    Show(IdArg),
    /// Edit a task's fields
    Edit(EditArgs),
    /// Flip a task's completion state
    Toggle(IdArg),
    /// Mark a task done
    Done(IdArg),
    /// Reopen a completed task
    Reopen(IdArg),
    /// Delete tasks
    Delete(DeleteArgs),
    /// Search tasks by regex
    Search(SearchArgs),
    /// Review completed work
    Completed(CompletedArgs),
    /// Show tasks on a monthly calendar
    Calendar(CalendarArgs),
    /// Show task statistics
    Stats,
}

// ---------------------------------------------------------------------------
// Session commands
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct LoginArgs {
    /// Display name
    pub name: String,
    /// Email address
    #[arg(long)]
    pub email: String,
    /// Avatar URL
    #[arg(long)]
    pub avatar: Option<String>,
}

#[derive(Args)]
pub struct ProfileArgs {
    /// New display name
    #[arg(long)]
    pub name: Option<String>,
    /// New email address
    #[arg(long)]
    pub email: Option<String>,
    /// New avatar URL
    #[arg(long)]
    pub avatar: Option<String>,
    /// Remove the avatar
    #[arg(long, conflicts_with = "avatar")]
    pub clear_avatar: bool,
    /// Theme (light, dark)
    #[arg(long)]
    pub theme: Option<String>,
    /// Category given to new tasks when none is specified
    #[arg(long)]
    pub default_category: Option<String>,
    /// Notifications (on, off)
    #[arg(long)]
    pub notifications: Option<String>,
}

// ---------------------------------------------------------------------------
// Task commands
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task title
    pub title: String,
    /// Longer description
    #[arg(short, long)]
    pub description: Option<String>,
    /// Priority (low, medium, high)
    #[arg(short, long)]
    pub priority: Option<String>,
    /// Category label
    #[arg(short, long)]
    pub category: Option<String>,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    /// Filter by completion (all, active, completed)
    #[arg(long)]
    pub filter: Option<String>,
    /// Sort key (date, priority, category)
    #[arg(long)]
    pub sort: Option<String>,
    /// Substring to search titles, descriptions, and categories for
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct IdArg {
    /// Task id (a unique prefix is enough)
    pub id: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task id (a unique prefix is enough)
    pub id: String,
    /// New title
    #[arg(long)]
    pub title: Option<String>,
    /// New description
    #[arg(short, long)]
    pub description: Option<String>,
    /// New priority (low, medium, high)
    #[arg(short, long)]
    pub priority: Option<String>,
    /// New category
    #[arg(short, long)]
    pub category: Option<String>,
    /// New due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
    /// Remove the due date
    #[arg(long, conflicts_with = "due")]
    pub clear_due: bool,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Task ids to delete
    #[arg(required = true)]
    pub ids: Vec<String>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Regex pattern to search for
    pub pattern: String,
}

// ---------------------------------------------------------------------------
// Review commands
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct CompletedArgs {
    /// Maximum number of completed tasks to show
    #[arg(long, default_value = "20")]
    pub limit: usize,
}

#[derive(Args)]
pub struct CalendarArgs {
    /// Year to show (default: current)
    #[arg(long)]
    pub year: Option<i32>,
    /// Month to show, 1-12 (default: current)
    #[arg(long)]
    pub month: Option<u32>,
}
