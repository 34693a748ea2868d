//! Task filtering and sorting logic
//!
//! `ViewState` holds the category filter, priority filter and sort settings and
//! derives the visible list from the canonical collection without mutating it.

use std::cmp::Ordering;

use crate::task::{Priority, Task};

/// Category filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl CategoryFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Active => !task.completed,
            CategoryFilter::Completed => task.completed,
        }
    }

    pub fn next(&self) -> Self {
        match self {
            CategoryFilter::All => CategoryFilter::Active,
            CategoryFilter::Active => CategoryFilter::Completed,
            CategoryFilter::Completed => CategoryFilter::All,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => "All",
            CategoryFilter::Active => "Active",
            CategoryFilter::Completed => "Completed",
        }
    }
}

/// Priority filter, independent of the category filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriorityFilter {
    #[default]
    All,
    Only(Priority),
}

impl PriorityFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            PriorityFilter::All => true,
            PriorityFilter::Only(priority) => task.priority == *priority,
        }
    }

    /// Cycle in menu order: all, high, medium, low
    pub fn next(&self) -> Self {
        match self {
            PriorityFilter::All => PriorityFilter::Only(Priority::High),
            PriorityFilter::Only(Priority::High) => PriorityFilter::Only(Priority::Medium),
            PriorityFilter::Only(Priority::Medium) => PriorityFilter::Only(Priority::Low),
            PriorityFilter::Only(Priority::Low) => PriorityFilter::All,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PriorityFilter::All => "All Priorities",
            PriorityFilter::Only(priority) => priority.label(),
        }
    }
}

/// Sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Created,
    Due,
    Priority,
}

impl SortKey {
    pub fn next(&self) -> Self {
        match self {
            SortKey::Created => SortKey::Due,
            SortKey::Due => SortKey::Priority,
            SortKey::Priority => SortKey::Created,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SortKey::Created => "Creation Date",
            SortKey::Due => "Due Date",
            SortKey::Priority => "Priority",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn toggled(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Apply this direction to an ascending comparison
    pub fn orient(&self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    pub fn arrow(&self) -> &str {
        match self {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }
}

/// Filter and sort settings for the visible list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState {
    pub filter: CategoryFilter,
    pub priority: PriorityFilter,
    pub sort: SortKey,
    pub direction: SortDirection,
}

impl ViewState {
    /// Create a view with default settings (all tasks, newest first)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the category filter
    pub fn with_filter(mut self, filter: CategoryFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Set the priority filter
    pub fn with_priority(mut self, priority: PriorityFilter) -> Self {
        self.priority = priority;
        self
    }

    /// Sort by given key
    pub fn sort_by(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn ascending(mut self) -> Self {
        self.direction = SortDirection::Asc;
        self
    }

    pub fn descending(mut self) -> Self {
        self.direction = SortDirection::Desc;
        self
    }

    /// Check if a task passes both filters
    pub fn matches(&self, task: &Task) -> bool {
        self.filter.matches(task) && self.priority.matches(task)
    }

    /// Compare two tasks under the current sort key and direction
    ///
    /// Tasks without a due date always sort after dated ones, whatever the
    /// direction.
    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        match self.sort {
            SortKey::Created => self
                .direction
                .orient(a.creation_time().cmp(&b.creation_time())),
            SortKey::Due => match (&a.due_date, &b.due_date) {
                (Some(a_due), Some(b_due)) => self.direction.orient(a_due.cmp(b_due)),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortKey::Priority => self
                .direction
                .orient(a.priority.rank().cmp(&b.priority.rank())),
        }
    }

    /// Apply filters and a stable sort to a collection of tasks
    pub fn apply<'a>(&self, tasks: impl Iterator<Item = &'a Task>) -> Vec<&'a Task> {
        let mut visible: Vec<&Task> = tasks.filter(|t| self.matches(t)).collect();
        visible.sort_by(|a, b| self.compare(a, b));
        visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Local, TimeZone};

    fn at(day: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 4, day, 12, 0, 0).unwrap()
    }

    fn texts(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|t| t.text.clone()).collect()
    }

    #[test]
    fn test_filter_completed() {
        let tasks = vec![
            Task::created_at("Task 1", at(1)).with_completed(true),
            Task::created_at("Task 2", at(2)),
        ];

        let view = ViewState::new().with_filter(CategoryFilter::Completed);
        assert_eq!(texts(&view.apply(tasks.iter())), vec!["Task 1"]);

        let view = ViewState::new().with_filter(CategoryFilter::Active);
        assert_eq!(texts(&view.apply(tasks.iter())), vec!["Task 2"]);
    }

    #[test]
    fn test_filter_priority_combines_with_category() {
        let tasks = vec![
            Task::created_at("a", at(1)).with_priority(Priority::High),
            Task::created_at("b", at(2))
                .with_priority(Priority::High)
                .with_completed(true),
            Task::created_at("c", at(3)).with_priority(Priority::Low),
        ];

        let view = ViewState::new()
            .with_filter(CategoryFilter::Active)
            .with_priority(PriorityFilter::Only(Priority::High));
        assert_eq!(texts(&view.apply(tasks.iter())), vec!["a"]);
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let tasks = vec![
            Task::created_at("old", at(1)),
            Task::created_at("new", at(5)),
            Task::created_at("mid", at(3)),
        ];

        let visible = ViewState::new().apply(tasks.iter());
        assert_eq!(texts(&visible), vec!["new", "mid", "old"]);

        let visible = ViewState::new().ascending().apply(tasks.iter());
        assert_eq!(texts(&visible), vec!["old", "mid", "new"]);
    }

    #[test]
    fn test_sort_by_priority() {
        let tasks = vec![
            Task::created_at("low", at(1)).with_priority(Priority::Low),
            Task::created_at("high", at(2)).with_priority(Priority::High),
            Task::created_at("medium", at(3)).with_priority(Priority::Medium),
        ];

        let asc = ViewState::new().sort_by(SortKey::Priority).ascending();
        assert_eq!(texts(&asc.apply(tasks.iter())), vec!["high", "medium", "low"]);

        let desc = ViewState::new().sort_by(SortKey::Priority).descending();
        assert_eq!(texts(&desc.apply(tasks.iter())), vec!["low", "medium", "high"]);
    }

    #[test]
    fn test_undated_tasks_sort_last_in_both_directions() {
        let tasks = vec![
            Task::created_at("none", at(1)),
            Task::created_at("late", at(2)).with_due(Some(at(20))),
            Task::created_at("early", at(3)).with_due(Some(at(10))),
        ];

        let asc = ViewState::new().sort_by(SortKey::Due).ascending();
        assert_eq!(texts(&asc.apply(tasks.iter())), vec!["early", "late", "none"]);

        let desc = ViewState::new().sort_by(SortKey::Due).descending();
        assert_eq!(texts(&desc.apply(tasks.iter())), vec!["late", "early", "none"]);
    }

    #[test]
    fn test_equal_keys_keep_collection_order() {
        let tasks = vec![
            Task::created_at("first", at(1)).with_priority(Priority::High),
            Task::created_at("second", at(2)).with_priority(Priority::High),
            Task::created_at("third", at(3)).with_priority(Priority::High),
        ];

        for view in [
            ViewState::new().sort_by(SortKey::Priority).ascending(),
            ViewState::new().sort_by(SortKey::Priority).descending(),
            ViewState::new().sort_by(SortKey::Due).ascending(),
        ] {
            assert_eq!(
                texts(&view.apply(tasks.iter())),
                vec!["first", "second", "third"]
            );
        }
    }

    #[test]
    fn test_cycles() {
        assert_eq!(CategoryFilter::Completed.next(), CategoryFilter::All);
        assert_eq!(PriorityFilter::Only(Priority::Low).next(), PriorityFilter::All);
        assert_eq!(SortKey::Priority.next(), SortKey::Created);
        assert_eq!(SortDirection::Desc.toggled(), SortDirection::Asc);
    }
}
