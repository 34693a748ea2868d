//! Reminder scan
//!
//! A recurring pass over the collection that notifies for every incomplete
//! task whose reminder time has arrived. The scan only reads tasks.

use std::collections::HashSet;

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::error::Result;
use crate::task::{Task, TaskId};

pub const REMINDER_TITLE: &str = "Todo Reminder";

/// Notification permission state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Permission {
    Granted,
    Denied,
    /// Not asked yet
    #[default]
    Default,
}

/// Permission-gated notification surface
pub trait Notifier {
    fn permission(&self) -> Permission;

    /// Ask for permission. Called once at startup, never from a scan.
    fn request_permission(&mut self) -> Permission;

    fn notify(&mut self, title: &str, body: &str) -> Result<()>;
}

/// How often a reminder fires while its condition holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReminderPolicy {
    /// Fire on every pass
    EveryPass,
    /// Fire once per task and reminder time
    #[default]
    Once,
}

/// Tasks whose reminder is due at `now`
pub fn due_reminders(tasks: &[Task], now: DateTime<Local>) -> Vec<&Task> {
    tasks.iter().filter(|t| t.reminder_due(now)).collect()
}

pub fn reminder_body(task: &Task) -> String {
    format!("Reminder for task: {}", task.text)
}

/// Runs reminder passes and remembers what has fired
#[derive(Debug, Clone, Default)]
pub struct ReminderTracker {
    policy: ReminderPolicy,
    fired: HashSet<(TaskId, DateTime<Local>)>,
}

impl ReminderTracker {
    pub fn new(policy: ReminderPolicy) -> Self {
        Self {
            policy,
            fired: HashSet::new(),
        }
    }

    pub fn policy(&self) -> ReminderPolicy {
        self.policy
    }

    /// Run one pass, returning the number of notifications shown
    ///
    /// Without granted permission nothing fires and permission is not requested.
    pub fn scan(
        &mut self,
        tasks: &[Task],
        now: DateTime<Local>,
        notifier: &mut dyn Notifier,
    ) -> usize {
        if notifier.permission() != Permission::Granted {
            return 0;
        }

        // Forget reminders that were deleted, rescheduled or cleared
        self.fired.retain(|(id, at)| {
            tasks
                .iter()
                .any(|t| t.id() == id && t.reminder == Some(*at))
        });

        let mut shown = 0;
        for task in due_reminders(tasks, now) {
            let Some(at) = task.reminder else {
                continue;
            };
            let key = (task.id().clone(), at);

            if self.policy == ReminderPolicy::Once && self.fired.contains(&key) {
                continue;
            }

            match notifier.notify(REMINDER_TITLE, &reminder_body(task)) {
                Ok(()) => {
                    info!(task = %task.id().short(), "reminder fired");
                    self.fired.insert(key);
                    shown += 1;
                }
                Err(e) => {
                    warn!(task = %task.id().short(), error = %e, "failed to show reminder");
                }
            }
        }
        shown
    }
}
