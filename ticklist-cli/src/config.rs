//! User configuration, loaded through confy
//!
//! Missing keys fall back to their defaults so older config files keep working.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use ticklist_core::ReminderPolicy;

pub const APP_NAME: &str = "ticklist";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the todo and theme files
    pub data_directory: String,
    pub reminders: ReminderSettings,
    pub display: DisplaySettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_directory: default_data_directory().to_string_lossy().into_owned(),
            reminders: ReminderSettings::default(),
            display: DisplaySettings::default(),
        }
    }
}

impl Config {
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_directory)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderSettings {
    /// Seconds between reminder passes
    pub interval_secs: u64,
    /// Fire on every pass instead of once per reminder
    pub repeat: bool,
    /// Allow desktop notifications
    pub notifications: bool,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            interval_secs: 60,
            repeat: false,
            notifications: true,
        }
    }
}

impl ReminderSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    pub fn policy(&self) -> ReminderPolicy {
        if self.repeat {
            ReminderPolicy::EveryPass
        } else {
            ReminderPolicy::Once
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub color: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self { color: true }
    }
}

fn default_data_directory() -> PathBuf {
    match ProjectDirs::from("", "", APP_NAME) {
        Some(dirs) => dirs.data_dir().to_path_buf(),
        None => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(format!(".{}", APP_NAME)),
    }
}
