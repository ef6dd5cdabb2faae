use std::fs;
use std::path::{Path, PathBuf};

use log::warn;

use crate::model::config::AppConfig;

/// Get the config file path, respecting XDG_CONFIG_HOME
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".config"));
    config_dir.join("taskdeck").join("config.toml")
}

/// Get the user's home directory
fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Read the config from a specific path.
/// A missing file yields the defaults; a file that no longer parses is
/// reported once and also yields the defaults.
pub fn read_config_from(path: &Path) -> AppConfig {
    let Ok(content) = fs::read_to_string(path) else {
        return AppConfig::default();
    };
    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("could not parse {}: {}", path.display(), e);
            eprintln!("warning: could not parse {} (using defaults): {}", path.display(), e);
            AppConfig::default()
        }
    }
}

/// Read the config from the default location.
pub fn read_config() -> AppConfig {
    read_config_from(&config_path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::model::task::Priority;

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = read_config_from(&tmp.path().join("config.toml"));
        assert_eq!(config.defaults.category, "Personal");
    }

    #[test]
    fn file_contents_are_applied() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            r#"
[defaults]
category = "Work"
priority = "high"
"#,
        )
        .unwrap();

        let config = read_config_from(&path);
        assert_eq!(config.defaults.category, "Work");
        assert_eq!(config.defaults.priority, Priority::High);
    }

    #[test]
    fn unparseable_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "not toml [[[").unwrap();

        let config = read_config_from(&path);
        assert_eq!(config.defaults.category, "Personal");
    }
}
