//! New-task entry form
//!
//! Holds transient input state only. A successful submission hands a
//! `NewTask` to the caller and resets the form; the collection itself is never
//! touched here.

use chrono::{DateTime, Local};
use tracing::debug;

use crate::date::parse_datetime;
use crate::task::{NewTask, Priority};

/// Which input receives typed characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Text,
    Due,
    Reminder,
}

#[derive(Debug, Clone, Default)]
pub struct EntryForm {
    text: String,
    priority: Priority,
    due: String,
    reminder: String,
    dates_open: bool,
    focus: FormField,
}

impl EntryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn due_input(&self) -> &str {
        &self.due
    }

    pub fn reminder_input(&self) -> &str {
        &self.reminder
    }

    pub fn dates_open(&self) -> bool {
        self.dates_open
    }

    pub fn focus(&self) -> FormField {
        self.focus
    }

    /// Either date field holds input
    pub fn has_dates(&self) -> bool {
        !self.due.trim().is_empty() || !self.reminder.trim().is_empty()
    }

    /// Submission is possible when the text is non-blank
    pub fn can_submit(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    pub fn cycle_priority(&mut self) {
        self.priority = self.priority.next();
    }

    pub fn set_due(&mut self, due: impl Into<String>) {
        self.due = due.into();
    }

    pub fn set_reminder(&mut self, reminder: impl Into<String>) {
        self.reminder = reminder.into();
    }

    /// Expand or collapse the date panel
    pub fn toggle_dates(&mut self) {
        self.dates_open = !self.dates_open;
        if !self.dates_open {
            self.focus = FormField::Text;
        }
    }

    /// Move focus to the next visible field
    pub fn focus_next(&mut self) {
        self.focus = match (self.focus, self.dates_open) {
            (_, false) => FormField::Text,
            (FormField::Text, true) => FormField::Due,
            (FormField::Due, true) => FormField::Reminder,
            (FormField::Reminder, true) => FormField::Text,
        };
    }

    pub fn push_char(&mut self, c: char) {
        self.focused_mut().push(c);
    }

    pub fn pop_char(&mut self) {
        self.focused_mut().pop();
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            FormField::Text => &mut self.text,
            FormField::Due => &mut self.due,
            FormField::Reminder => &mut self.reminder,
        }
    }

    /// Submit using the current time to resolve relative dates
    pub fn submit(&mut self) -> Option<NewTask> {
        self.submit_at(Local::now())
    }

    /// Submit the form
    ///
    /// Returns `None` and leaves every field untouched when the trimmed text is
    /// empty. A date field that does not parse counts as absent.
    pub fn submit_at(&mut self, now: DateTime<Local>) -> Option<NewTask> {
        let text = self.text.trim();
        if text.is_empty() {
            return None;
        }

        let new_task = NewTask::new(text)
            .with_priority(self.priority)
            .with_due(parse_optional("due", &self.due, now))
            .with_reminder(parse_optional("reminder", &self.reminder, now));

        self.reset();
        Some(new_task)
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

fn parse_optional(field: &str, input: &str, now: DateTime<Local>) -> Option<DateTime<Local>> {
    if input.trim().is_empty() {
        return None;
    }
    match parse_datetime(input, now) {
        Ok(dt) => Some(dt),
        Err(e) => {
            debug!(field, error = %e, "ignoring unparsable date input");
            None
        }
    }
}
