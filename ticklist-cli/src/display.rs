//! Todo display formatting module
//!
//! Handles colored output and the compact and default list layouts

use chrono::{DateTime, Local};
use colored::*;

use ticklist_core::date::format_relative;
use ticklist_core::{Priority, Stats, Task};

/// Display mode for the todo list
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayMode {
    /// Minimal one-line format
    Compact,
    /// One line per todo plus date details
    Default,
}

/// Check if terminal supports colors
pub fn supports_color() -> bool {
    atty::is(atty::Stream::Stdout)
}

fn priority_tag(priority: Priority, use_color: bool) -> String {
    let tag = format!("{:<6}", priority.label());
    if !use_color {
        return tag;
    }
    match priority {
        Priority::High => tag.red().bold().to_string(),
        Priority::Medium => tag.yellow().to_string(),
        Priority::Low => tag.green().to_string(),
    }
}

fn when(label: &str, at: DateTime<Local>, now: DateTime<Local>) -> String {
    format!(
        "{} {} {}",
        label,
        format_relative(at.date_naive(), now.date_naive()),
        at.format("%-I:%M %p")
    )
}

/// Format a todo for display
pub fn format_task(task: &Task, mode: DisplayMode, use_color: bool, now: DateTime<Local>) -> String {
    let checkbox = if task.completed { "[✓]" } else { "[ ]" };

    let id_str = if use_color {
        task.id().short().cyan().to_string()
    } else {
        task.id().short().to_string()
    };

    let text = if !use_color {
        task.text.clone()
    } else if task.completed {
        task.text.dimmed().strikethrough().to_string()
    } else {
        task.text.clone()
    };

    let due_info = task.due_date.map(|due| {
        let label = when("due", due, now);
        if !use_color {
            label
        } else if task.completed {
            label.green().to_string()
        } else if task.is_overdue(now) {
            format!("{} (overdue)", label).red().bold().to_string()
        } else {
            label.normal().to_string()
        }
    });

    match mode {
        DisplayMode::Compact => {
            let mut line = format!(
                "{} {} {} {}",
                checkbox,
                id_str,
                priority_tag(task.priority, use_color),
                text
            );
            if let Some(due) = due_info {
                line.push_str(&format!(" ({})", due));
            }
            line
        }
        DisplayMode::Default => {
            let mut parts = vec![format!(
                "{} {} {} {}",
                checkbox,
                id_str,
                priority_tag(task.priority, use_color),
                text
            )];

            let mut details = Vec::new();
            if let Some(due) = due_info {
                details.push(due);
            }
            if let Some(reminder) = task.reminder {
                let label = when("remind", reminder, now);
                details.push(if use_color {
                    label.magenta().to_string()
                } else {
                    label
                });
            }
            details.push(format!(
                "created {}",
                ticklist_core::date::format_stamp(task.creation_time())
            ));

            parts.push(details.join(" · "));
            parts.join("\n      ")
        }
    }
}

/// Format a summary line for the todo list
pub fn format_summary(stats: &Stats, use_color: bool) -> String {
    let parts = [
        format!("{} items left", stats.active),
        if use_color {
            format!("{} done", stats.completed).green().to_string()
        } else {
            format!("{} done", stats.completed)
        },
        if stats.overdue > 0 {
            if use_color {
                format!("{} overdue", stats.overdue).red().to_string()
            } else {
                format!("{} overdue", stats.overdue)
            }
        } else {
            String::new()
        },
    ];

    let summary: Vec<&str> = parts
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| s.as_str())
        .collect();

    format!("[{}]", summary.join(" | "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 5, 20, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_format_task_compact() {
        let task = Task::created_at("Test task", now()).with_priority(Priority::High);

        let output = format_task(&task, DisplayMode::Compact, false, now());
        assert!(output.contains("[ ]"));
        assert!(output.contains(task.id().short()));
        assert!(output.contains("High"));
        assert!(output.contains("Test task"));
    }

    #[test]
    fn test_format_task_completed() {
        let task = Task::created_at("Done task", now()).with_completed(true);

        let output = format_task(&task, DisplayMode::Default, false, now());
        assert!(output.contains("[✓]"));
        assert!(output.contains("created"));
    }

    #[test]
    fn test_overdue_is_marked() {
        let task = Task::created_at("Late", now() - Duration::days(3))
            .with_due(Some(now() - Duration::days(1)));

        let output = format_task(&task, DisplayMode::Compact, true, now());
        assert!(output.contains("overdue"));
    }

    #[test]
    fn test_format_summary() {
        let stats = Stats {
            total: 10,
            active: 5,
            completed: 5,
            overdue: 2,
        };
        let summary = format_summary(&stats, false);
        assert!(summary.contains("5 items left"));
        assert!(summary.contains("5 done"));
        assert!(summary.contains("2 overdue"));

        let quiet = format_summary(&Stats::default(), false);
        assert!(!quiet.contains("overdue"));
    }
}
