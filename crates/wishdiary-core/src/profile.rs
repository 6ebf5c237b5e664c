//! User profile and preferences.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display theme.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Light
    }
}

/// Display language.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Zh,
    En,
}

impl Default for Language {
    fn default() -> Self {
        Language::En
    }
}

/// Per-user display preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct UserPreferences {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub language: Language,
}

/// A user's profile.
///
/// `last_login_at` doubles as a last-touched marker: every update path
/// refreshes it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserProfile {
    pub id: String,
    pub nickname: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub preferences: UserPreferences,
    pub created_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

impl UserProfile {
    /// Create a profile with default preferences.
    pub fn new(id: impl Into<String>, nickname: impl Into<String>) -> Self {
        let now = Utc::now();
        UserProfile {
            id: id.into(),
            nickname: nickname.into(),
            description: String::new(),
            preferences: UserPreferences::default(),
            created_at: now,
            last_login_at: now,
        }
    }

    pub fn set_nickname(&mut self, nickname: impl Into<String>) {
        self.nickname = nickname.into();
        self.touch();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
        self.touch();
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.preferences.theme = theme;
        self.touch();
    }

    pub fn set_language(&mut self, language: Language) {
        self.preferences.language = language;
        self.touch();
    }

    fn touch(&mut self) {
        self.last_login_at = Utc::now();
    }
}
