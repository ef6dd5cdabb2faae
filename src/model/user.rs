use serde::{Deserialize, Serialize};

/// UI color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn parse(s: &str) -> Option<Theme> {
        match s {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Per-user settings, editable from the profile command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub theme: Theme,
    /// Seeds the category of new tasks when none is given
    pub default_category: String,
    pub notifications: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            theme: Theme::Light,
            default_category: "Personal".to_string(),
            notifications: true,
        }
    }
}

/// The local session user. There is no real authentication behind this;
/// it exists so tasks and preferences have an owner to clear on logout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub preferences: Preferences,
}

impl User {
    /// Merge a patch into this user. Absent patch fields are left untouched;
    /// preferences are replaced wholesale (callers merge them first).
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(avatar) = patch.avatar {
            self.avatar = avatar;
        }
        if let Some(preferences) = patch.preferences {
            self.preferences = preferences;
        }
    }
}

/// A partial user update. `avatar` is clearable (`Some(None)` clears).
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<Option<String>>,
    pub preferences: Option<Preferences>,
}
