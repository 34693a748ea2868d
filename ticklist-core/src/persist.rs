//! Persistence adapter
//!
//! Reads and writes the task collection and the theme preference through a
//! string key-value store. The store itself is a collaborator: consuming crates
//! provide a durable implementation, `MemoryStore` covers tests and previews.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::error::Result;
use crate::task::Task;
use crate::theme::Theme;

/// Key holding the serialized task collection
pub const TASKS_KEY: &str = "todos";

/// Key holding the theme string
pub const THEME_KEY: &str = "theme";

/// Durable string-keyed storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory key-value store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to seed an entry
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|s| s.as_str())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Serialize tasks as a JSON array with RFC 3339 timestamps
pub fn encode_tasks(tasks: &[Task]) -> Result<String> {
    Ok(serde_json::to_string(tasks)?)
}

/// Deserialize tasks, restoring every timestamp field
pub fn decode_tasks(raw: &str) -> Result<Vec<Task>> {
    Ok(serde_json::from_str(raw)?)
}

/// Task and theme persistence over a key-value store
#[derive(Debug)]
pub struct Persistence<S> {
    store: S,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the saved collection
    ///
    /// Missing, unreadable or unparsable data yields an empty collection.
    /// Records with blank text or a repeated id are dropped.
    pub fn load_tasks(&self) -> Vec<Task> {
        let raw = match self.store.get(TASKS_KEY) {
            Ok(Some(raw)) if !raw.trim().is_empty() => raw,
            Ok(_) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "failed to read saved tasks, starting empty");
                return Vec::new();
            }
        };

        let tasks = match decode_tasks(&raw) {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!(error = %e, "saved tasks are malformed, starting empty");
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        let total = tasks.len();
        let tasks: Vec<Task> = tasks
            .into_iter()
            .filter(|t| !t.text.trim().is_empty() && seen.insert(t.id().clone()))
            .collect();

        if tasks.len() != total {
            warn!(
                dropped = total - tasks.len(),
                "skipped saved tasks with blank text or duplicate ids"
            );
        }
        debug!(count = tasks.len(), "loaded tasks");
        tasks
    }

    /// Rewrite the whole collection
    pub fn save_tasks(&mut self, tasks: &[Task]) -> Result<()> {
        let encoded = encode_tasks(tasks)?;
        self.store.set(TASKS_KEY, &encoded)?;
        debug!(count = tasks.len(), "saved tasks");
        Ok(())
    }

    /// Load the theme, defaulting to light
    pub fn load_theme(&self) -> Theme {
        match self.store.get(THEME_KEY) {
            Ok(Some(raw)) => raw.parse().unwrap_or_else(|e| {
                warn!(error = %e, "unrecognised saved theme, using light");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                warn!(error = %e, "failed to read saved theme, using light");
                Theme::default()
            }
        }
    }

    pub fn save_theme(&mut self, theme: Theme) -> Result<()> {
        self.store.set(THEME_KEY, theme.as_str())
    }
}
