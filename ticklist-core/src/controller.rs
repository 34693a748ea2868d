//! Application controller
//!
//! Owns the canonical task collection, the theme and the view state. Every
//! successful mutation rewrites the whole collection through the persistence
//! adapter. Operations naming an unknown id are no-ops.

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use crate::error::{CoreError, Result};
use crate::filter::{CategoryFilter, PriorityFilter, SortKey, ViewState};
use crate::list::ListEvent;
use crate::persist::{KeyValueStore, Persistence};
use crate::reminder::{Notifier, ReminderPolicy, ReminderTracker};
use crate::task::{NewTask, Priority, Task, TaskId};
use crate::theme::Theme;

/// Messages consumed by the controller
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Add(NewTask),
    ToggleComplete(TaskId),
    Delete(TaskId),
    Edit {
        id: TaskId,
        text: String,
        priority: Priority,
    },
    ClearCompleted,
    ToggleTheme,
    SetFilter(CategoryFilter),
    SetPriorityFilter(PriorityFilter),
    SetSortKey(SortKey),
    ToggleSortDirection,
}

impl From<ListEvent> for Action {
    fn from(event: ListEvent) -> Self {
        match event {
            ListEvent::Toggle(id) => Action::ToggleComplete(id),
            ListEvent::Delete(id) => Action::Delete(id),
            ListEvent::Edit { id, text, priority } => Action::Edit { id, text, priority },
        }
    }
}

impl From<NewTask> for Action {
    fn from(new_task: NewTask) -> Self {
        Action::Add(new_task)
    }
}

/// Counts over the whole collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    pub overdue: usize,
}

pub struct Controller<S> {
    tasks: Vec<Task>,
    theme: Theme,
    view: ViewState,
    persistence: Persistence<S>,
    reminders: ReminderTracker,
    save_error: Option<CoreError>,
}

impl<S: KeyValueStore> Controller<S> {
    /// Load saved tasks and theme from the store
    pub fn load(store: S) -> Self {
        let persistence = Persistence::new(store);
        let tasks = persistence.load_tasks();
        let theme = persistence.load_theme();

        Self {
            tasks,
            theme,
            view: ViewState::default(),
            persistence,
            reminders: ReminderTracker::default(),
            save_error: None,
        }
    }

    /// Builder method to set the reminder policy
    pub fn with_policy(mut self, policy: ReminderPolicy) -> Self {
        self.reminders = ReminderTracker::new(policy);
        self
    }

    /// Re-read tasks and theme from the store, keeping view and reminder state
    pub fn reload(&mut self) {
        self.tasks = self.persistence.load_tasks();
        self.theme = self.persistence.load_theme();
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn store(&self) -> &S {
        self.persistence.store()
    }

    /// Take the most recent persistence failure, if any
    pub fn take_save_error(&mut self) -> Option<CoreError> {
        self.save_error.take()
    }

    /// Add a task created now
    pub fn add(&mut self, new_task: NewTask) -> Option<TaskId> {
        self.add_at(new_task, Local::now())
    }

    /// Add a task with an explicit creation time
    ///
    /// Blank text is rejected and nothing is stored.
    pub fn add_at(&mut self, new_task: NewTask, now: DateTime<Local>) -> Option<TaskId> {
        let text = new_task.text.trim();
        if text.is_empty() {
            return None;
        }

        let task = Task::created_at(text, now)
            .with_priority(new_task.priority)
            .with_due(new_task.due)
            .with_reminder(new_task.reminder);
        let id = task.id().clone();

        debug!(task = %id.short(), "adding task");
        self.tasks.push(task);
        self.persist();
        Some(id)
    }

    /// Flip completion of a task
    pub fn toggle_complete(&mut self, id: &TaskId) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id() == id) else {
            return false;
        };
        task.toggle_complete();
        debug!(task = %id.short(), completed = task.completed, "toggled task");
        self.persist();
        true
    }

    pub fn delete(&mut self, id: &TaskId) -> bool {
        let Some(pos) = self.tasks.iter().position(|t| t.id() == id) else {
            return false;
        };
        self.tasks.remove(pos);
        debug!(task = %id.short(), "deleted task");
        self.persist();
        true
    }

    /// Replace text and priority in place
    ///
    /// Completion, timestamps and id are untouched. Blank text is a no-op.
    pub fn edit(&mut self, id: &TaskId, text: &str, priority: Priority) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        let Some(task) = self.tasks.iter_mut().find(|t| t.id() == id) else {
            return false;
        };
        task.text = text.to_string();
        task.priority = priority;
        debug!(task = %id.short(), "edited task");
        self.persist();
        true
    }

    /// Remove every completed task, keeping the order of the rest
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        let removed = before - self.tasks.len();
        if removed > 0 {
            debug!(removed, "cleared completed tasks");
            self.persist();
        }
        removed
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.set_theme(self.theme.toggled());
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        if let Err(e) = self.persistence.save_theme(theme) {
            warn!(error = %e, "failed to save theme");
            self.save_error = Some(e);
        }
    }

    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.view.filter = filter;
    }

    pub fn set_priority_filter(&mut self, priority: PriorityFilter) {
        self.view.priority = priority;
    }

    pub fn set_sort_key(&mut self, sort: SortKey) {
        self.view.sort = sort;
    }

    pub fn toggle_sort_direction(&mut self) {
        self.view.direction = self.view.direction.toggled();
    }

    pub fn cycle_filter(&mut self) {
        self.view.filter = self.view.filter.next();
    }

    pub fn cycle_priority_filter(&mut self) {
        self.view.priority = self.view.priority.next();
    }

    pub fn cycle_sort_key(&mut self) {
        self.view.sort = self.view.sort.next();
    }

    /// Filtered and sorted view, derived fresh on every call
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.view.apply(self.tasks.iter())
    }

    /// Apply a message
    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Add(new_task) => {
                self.add(new_task);
            }
            Action::ToggleComplete(id) => {
                self.toggle_complete(&id);
            }
            Action::Delete(id) => {
                self.delete(&id);
            }
            Action::Edit { id, text, priority } => {
                self.edit(&id, &text, priority);
            }
            Action::ClearCompleted => {
                self.clear_completed();
            }
            Action::ToggleTheme => {
                self.toggle_theme();
            }
            Action::SetFilter(filter) => self.set_filter(filter),
            Action::SetPriorityFilter(priority) => self.set_priority_filter(priority),
            Action::SetSortKey(sort) => self.set_sort_key(sort),
            Action::ToggleSortDirection => self.toggle_sort_direction(),
        }
    }

    /// Run one reminder pass over the collection
    pub fn check_reminders(&mut self, now: DateTime<Local>, notifier: &mut dyn Notifier) -> usize {
        self.reminders.scan(&self.tasks, now, notifier)
    }

    /// Resolve a full id or a unique id prefix
    pub fn resolve(&self, prefix: &str) -> Result<TaskId> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(CoreError::validation("id", "Task id cannot be empty"));
        }

        if let Some(task) = self.tasks.iter().find(|t| t.id().as_str() == prefix) {
            return Ok(task.id().clone());
        }

        let matches: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.id().as_str().starts_with(prefix))
            .collect();

        match matches.as_slice() {
            [] => Err(CoreError::TaskNotFound(prefix.to_string())),
            [task] => Ok(task.id().clone()),
            _ => Err(CoreError::AmbiguousId {
                prefix: prefix.to_string(),
                matches: matches.len(),
            }),
        }
    }

    pub fn stats(&self, now: DateTime<Local>) -> Stats {
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        Stats {
            total: self.tasks.len(),
            active: self.tasks.len() - completed,
            completed,
            overdue: self.tasks.iter().filter(|t| t.is_overdue(now)).count(),
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.persistence.save_tasks(&self.tasks) {
            warn!(error = %e, "failed to save tasks");
            self.save_error = Some(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::{MemoryStore, TASKS_KEY, THEME_KEY, decode_tasks};
    use chrono::{Duration, TimeZone};

    fn at(minute: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 9, 1, 10, minute, 0).unwrap()
    }

    fn controller() -> Controller<MemoryStore> {
        Controller::load(MemoryStore::new())
    }

    fn saved(controller: &Controller<MemoryStore>) -> Vec<Task> {
        decode_tasks(controller.store().raw(TASKS_KEY).unwrap()).unwrap()
    }

    #[test]
    fn test_add_appends_and_persists() {
        let mut c = controller();
        let first = c.add_at(NewTask::new("first"), at(0)).unwrap();
        let second = c
            .add_at(NewTask::new(" second ").with_priority(Priority::Low), at(1))
            .unwrap();

        assert_eq!(c.tasks().len(), 2);
        assert_eq!(c.tasks()[0].id(), &first);
        assert_eq!(c.tasks()[1].id(), &second);
        assert_eq!(c.tasks()[1].text, "second");
        assert!(!c.tasks()[1].completed);
        assert_eq!(saved(&c), c.tasks());
    }

    #[test]
    fn test_add_blank_is_rejected() {
        let mut c = controller();
        assert!(c.add(NewTask::new("   ")).is_none());
        assert!(c.tasks().is_empty());
        assert!(c.store().raw(TASKS_KEY).is_none());
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let mut c = controller();
        c.add(NewTask::new("only"));
        let ghost = TaskId::from("ghost");

        assert!(!c.toggle_complete(&ghost));
        assert!(!c.delete(&ghost));
        assert!(!c.edit(&ghost, "x", Priority::High));
        assert_eq!(c.tasks().len(), 1);
        assert!(!c.tasks()[0].completed);
    }

    #[test]
    fn test_edit_keeps_identity_fields() {
        let mut c = controller();
        let id = c.add_at(NewTask::new("draft"), at(0)).unwrap();
        c.toggle_complete(&id);
        let before = c.get(&id).unwrap().clone();

        assert!(c.edit(&id, "final", Priority::High));
        let after = c.get(&id).unwrap();
        assert_eq!(after.text, "final");
        assert_eq!(after.priority, Priority::High);
        assert_eq!(after.id(), before.id());
        assert_eq!(after.creation_time(), before.creation_time());
        assert_eq!(after.completed, before.completed);

        assert!(!c.edit(&id, "  ", Priority::Low));
        assert_eq!(c.get(&id).unwrap().text, "final");
    }

    #[test]
    fn test_clear_completed_keeps_order() {
        let mut c = controller();
        let ids: Vec<TaskId> = (0..4)
            .map(|i| c.add_at(NewTask::new(format!("t{}", i)), at(i)).unwrap())
            .collect();
        c.toggle_complete(&ids[0]);
        c.toggle_complete(&ids[2]);

        assert_eq!(c.clear_completed(), 2);
        let texts: Vec<&str> = c.tasks().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["t1", "t3"]);
        assert_eq!(saved(&c).len(), 2);
    }

    #[test]
    fn test_theme_toggle_persists() {
        let mut c = controller();
        assert_eq!(c.theme(), Theme::Light);
        assert_eq!(c.toggle_theme(), Theme::Dark);
        assert_eq!(c.store().raw(THEME_KEY), Some("dark"));
    }

    #[test]
    fn test_visible_tasks_do_not_mutate_collection() {
        let mut c = controller();
        c.add_at(NewTask::new("old"), at(0));
        c.add_at(NewTask::new("new"), at(5));

        let visible: Vec<&str> = c.visible_tasks().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(visible, vec!["new", "old"]);
        assert_eq!(c.tasks()[0].text, "old");
    }

    #[test]
    fn test_dispatch_routes_list_events() {
        let mut c = controller();
        c.dispatch(NewTask::new("via form").into());
        let id = c.tasks()[0].id().clone();

        c.dispatch(ListEvent::Toggle(id.clone()).into());
        assert!(c.get(&id).unwrap().completed);

        c.dispatch(Action::SetFilter(CategoryFilter::Active));
        assert!(c.visible_tasks().is_empty());

        c.dispatch(ListEvent::Delete(id.clone()).into());
        assert!(c.get(&id).is_none());
    }

    #[test]
    fn test_resolve_prefix() {
        let store = MemoryStore::new().with_entry(
            TASKS_KEY,
            r#"[
                {"id":"abc123","text":"one","completed":false,"createdAt":"2026-01-01T10:00:00+00:00","priority":"low"},
                {"id":"abd456","text":"two","completed":false,"createdAt":"2026-01-01T10:00:00+00:00","priority":"low"}
            ]"#,
        );
        let c = Controller::load(store);

        assert_eq!(c.resolve("abc").unwrap().as_str(), "abc123");
        assert!(matches!(
            c.resolve("ab"),
            Err(CoreError::AmbiguousId { matches: 2, .. })
        ));
        assert!(matches!(c.resolve("zz"), Err(CoreError::TaskNotFound(_))));
        assert!(c.resolve(" ").is_err());
    }

    #[test]
    fn test_stats() {
        let mut c = controller();
        let now = at(30);
        let a = c
            .add_at(NewTask::new("late").with_due(Some(now - Duration::hours(1))), at(0))
            .unwrap();
        c.add_at(NewTask::new("fine"), at(1));
        let done = c.add_at(NewTask::new("done"), at(2)).unwrap();
        c.toggle_complete(&done);

        let stats = c.stats(now);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.overdue, 1);

        c.toggle_complete(&a);
        assert_eq!(c.stats(now).overdue, 0);
    }

    #[test]
    fn test_reload_picks_up_external_writes() {
        let mut c = controller();
        c.add(NewTask::new("mine"));

        let mut other = Controller::load(c.store().clone());
        other.add(NewTask::new("theirs"));
        assert_eq!(other.tasks().len(), 2);

        // Separate in-memory stores do not share state
        c.reload();
        assert_eq!(c.tasks().len(), 1);
    }
}
