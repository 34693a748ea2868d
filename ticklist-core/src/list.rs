//! Task list state and row view model
//!
//! `TaskList` owns the per-item edit state machine. At most one task is under
//! edit at a time; user actions come back out as `ListEvent`s for the
//! controller to apply.

use chrono::{DateTime, Local};

use crate::date::format_stamp;
use crate::task::{Priority, Task, TaskId};

/// Placeholder shown when there is nothing to list
pub const EMPTY_PLACEHOLDER: &str = "No todos yet. Add one above!";

/// Events emitted by the list for the controller
#[derive(Debug, Clone, PartialEq)]
pub enum ListEvent {
    Toggle(TaskId),
    Delete(TaskId),
    Edit {
        id: TaskId,
        text: String,
        priority: Priority,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditBuffer {
    pub id: TaskId,
    pub text: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditState {
    #[default]
    Viewing,
    Editing(EditBuffer),
}

/// Display-ready view of one task
#[derive(Debug, Clone, PartialEq)]
pub struct TaskRow {
    pub id: TaskId,
    pub text: String,
    pub priority: Priority,
    pub completed: bool,
    pub created: String,
    pub due: Option<String>,
    pub overdue: bool,
    pub reminder: Option<String>,
    /// This row is the one under edit
    pub editing: bool,
    /// The start-edit action is offered on this row
    pub editable: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TaskList {
    state: EditState,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing(_))
    }

    pub fn editing_id(&self) -> Option<&TaskId> {
        match &self.state {
            EditState::Editing(buffer) => Some(&buffer.id),
            EditState::Viewing => None,
        }
    }

    pub fn buffer(&self) -> Option<&EditBuffer> {
        match &self.state {
            EditState::Editing(buffer) => Some(buffer),
            EditState::Viewing => None,
        }
    }

    /// Enter edit mode for a task
    ///
    /// Refused for completed tasks and while another edit is open.
    pub fn start_edit(&mut self, task: &Task) -> bool {
        if task.completed || self.is_editing() {
            return false;
        }
        self.state = EditState::Editing(EditBuffer {
            id: task.id().clone(),
            text: task.text.clone(),
            priority: task.priority,
        });
        true
    }

    pub fn set_buffer_text(&mut self, text: impl Into<String>) {
        if let EditState::Editing(buffer) = &mut self.state {
            buffer.text = text.into();
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let EditState::Editing(buffer) = &mut self.state {
            buffer.text.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let EditState::Editing(buffer) = &mut self.state {
            buffer.text.pop();
        }
    }

    pub fn set_buffer_priority(&mut self, priority: Priority) {
        if let EditState::Editing(buffer) = &mut self.state {
            buffer.priority = priority;
        }
    }

    pub fn cycle_buffer_priority(&mut self) {
        if let EditState::Editing(buffer) = &mut self.state {
            buffer.priority = buffer.priority.next();
        }
    }

    /// Save the open edit
    ///
    /// Blank buffer text keeps the edit open and emits nothing.
    pub fn save(&mut self) -> Option<ListEvent> {
        let EditState::Editing(buffer) = &self.state else {
            return None;
        };

        let text = buffer.text.trim();
        if text.is_empty() {
            return None;
        }

        let event = ListEvent::Edit {
            id: buffer.id.clone(),
            text: text.to_string(),
            priority: buffer.priority,
        };
        self.state = EditState::Viewing;
        Some(event)
    }

    /// Leave edit mode without emitting anything
    pub fn cancel(&mut self) {
        self.state = EditState::Viewing;
    }

    pub fn toggle(&self, id: &TaskId) -> ListEvent {
        ListEvent::Toggle(id.clone())
    }

    /// Delete a task, exiting edit mode if it was the one under edit
    pub fn delete(&mut self, id: &TaskId) -> ListEvent {
        if self.editing_id() == Some(id) {
            self.state = EditState::Viewing;
        }
        ListEvent::Delete(id.clone())
    }

    /// Drop the edit selection if its task is no longer in the collection
    ///
    /// Completion changes leave an open edit alone.
    pub fn reconcile(&mut self, tasks: &[Task]) {
        let Some(id) = self.editing_id() else {
            return;
        };
        if !tasks.iter().any(|task| task.id() == id) {
            self.state = EditState::Viewing;
        }
    }

    /// Build display rows for the given, already ordered tasks
    pub fn rows(&self, tasks: &[&Task], now: DateTime<Local>) -> Vec<TaskRow> {
        let editing_id = self.editing_id();
        tasks
            .iter()
            .map(|task| TaskRow {
                id: task.id().clone(),
                text: task.text.clone(),
                priority: task.priority,
                completed: task.completed,
                created: format_stamp(task.creation_time()),
                due: task.due_date.map(format_stamp),
                overdue: task.is_overdue(now),
                reminder: task.reminder.map(format_stamp),
                editing: editing_id == Some(task.id()),
                editable: editing_id.is_none() && !task.completed,
            })
            .collect()
    }

    pub fn placeholder(&self) -> &'static str {
        EMPTY_PLACEHOLDER
    }
}
