//! Task domain model
//!
//! Pure domain logic for task management with no I/O operations.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::CoreError;

/// Opaque, unique task identifier
///
/// Freshly generated ids are UUID v4 text, but any string loaded from storage
/// is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generate a new random identifier
    pub fn generate() -> Self {
        TaskId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, used for display and prefix lookup
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(8) {
            Some((idx, _)) => &self.0[..idx],
            None => &self.0,
        }
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        TaskId(id)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        TaskId(id.to_string())
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Fixed sort rank: high sorts before medium before low
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    /// Cycle in menu order (high, medium, low)
    pub fn next(&self) -> Self {
        match self {
            Priority::High => Priority::Medium,
            Priority::Medium => Priority::Low,
            Priority::Low => Priority::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl FromStr for Priority {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "l" => Ok(Priority::Low),
            "medium" | "med" | "m" => Ok(Priority::Medium),
            "high" | "h" => Ok(Priority::High),
            other => Err(CoreError::parse(format!("Unknown priority '{}'", other))),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single task
///
/// `id` and `created_at` are fixed at construction and only readable through
/// accessors.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,
    pub text: String,
    pub completed: bool,
    created_at: DateTime<Local>,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Local>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder: Option<DateTime<Local>>,
}

impl Task {
    /// Create a new task created now with a fresh id
    pub fn new(text: impl Into<String>) -> Self {
        Self::created_at(text, Local::now())
    }

    /// Create a new task with a fresh id and an explicit creation time
    pub fn created_at(text: impl Into<String>, created_at: DateTime<Local>) -> Self {
        Self {
            id: TaskId::generate(),
            text: text.into(),
            completed: false,
            created_at,
            priority: Priority::default(),
            due_date: None,
            reminder: None,
        }
    }

    /// Builder method to set priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Builder method to set due date
    pub fn with_due(mut self, due: Option<DateTime<Local>>) -> Self {
        self.due_date = due;
        self
    }

    /// Builder method to set reminder
    pub fn with_reminder(mut self, reminder: Option<DateTime<Local>>) -> Self {
        self.reminder = reminder;
        self
    }

    /// Builder method to set completion status
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn creation_time(&self) -> DateTime<Local> {
        self.created_at
    }

    /// Toggle completion status
    pub fn toggle_complete(&mut self) {
        self.completed = !self.completed;
    }

    /// Due in the past and not completed
    pub fn is_overdue(&self, now: DateTime<Local>) -> bool {
        match self.due_date {
            Some(due) => due < now && !self.completed,
            None => false,
        }
    }

    /// Reminder at or before `now` and not completed
    pub fn reminder_due(&self, now: DateTime<Local>) -> bool {
        match self.reminder {
            Some(at) => at <= now && !self.completed,
            None => false,
        }
    }
}

/// A creation request emitted by the entry form
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub text: String,
    pub priority: Priority,
    pub due: Option<DateTime<Local>>,
    pub reminder: Option<DateTime<Local>>,
}

impl NewTask {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            priority: Priority::default(),
            due: None,
            reminder: None,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_due(mut self, due: Option<DateTime<Local>>) -> Self {
        self.due = due;
        self
    }

    pub fn with_reminder(mut self, reminder: Option<DateTime<Local>>) -> Self {
        self.reminder = reminder;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(h: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 10, h, 0, 0).unwrap()
    }

    #[test]
    fn test_task_creation() {
        let task = Task::created_at("Buy milk", at(9)).with_priority(Priority::High);

        assert_eq!(task.text, "Buy milk");
        assert!(!task.completed);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.creation_time(), at(9));
        assert!(task.due_date.is_none());
        assert!(task.reminder.is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Task::new("a");
        let b = Task::new("b");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_task_toggle() {
        let mut task = Task::new("Test");
        task.toggle_complete();
        assert!(task.completed);
        task.toggle_complete();
        assert!(!task.completed);
    }

    #[test]
    fn test_overdue() {
        let now = at(12);
        let task = Task::created_at("late", at(8)).with_due(Some(at(10)));
        assert!(task.is_overdue(now));
        assert!(!task.clone().with_completed(true).is_overdue(now));
        assert!(!task.with_due(Some(now + Duration::hours(1))).is_overdue(now));
    }

    #[test]
    fn test_reminder_due_is_inclusive() {
        let task = Task::created_at("ping", at(8)).with_reminder(Some(at(10)));
        assert!(task.reminder_due(at(10)));
        assert!(!task.reminder_due(at(9)));
    }

    #[test]
    fn test_priority_rank_and_parse() {
        assert!(Priority::High.rank() < Priority::Medium.rank());
        assert!(Priority::Medium.rank() < Priority::Low.rank());
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_short_id() {
        let id = TaskId::from("0123456789abcdef");
        assert_eq!(id.short(), "01234567");
        assert_eq!(TaskId::from("abc").short(), "abc");
    }

    #[test]
    fn test_serialized_field_names() {
        let task = Task::created_at("x", at(9)).with_due(Some(at(10)));
        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("dueDate").is_some());
        assert!(json.get("reminder").is_none());
        assert_eq!(json["priority"], "medium");
    }
}
