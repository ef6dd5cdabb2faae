use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::model::task::Priority;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory override (default: $XDG_DATA_HOME/taskdeck)
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

/// Fallbacks for task fields the user leaves out. The logged-in user's
/// preferred category takes precedence over `category`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_priority")]
    pub priority: Priority,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            category: default_category(),
            priority: default_priority(),
        }
    }
}

fn default_category() -> String {
    "Personal".to_string()
}

fn default_priority() -> Priority {
    Priority::Medium
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
