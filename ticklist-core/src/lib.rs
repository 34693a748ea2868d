//! Ticklist Core - Domain logic for a single-user todo list
//!
//! This crate performs no file, terminal or desktop I/O. Durable storage and
//! notifications are supplied by consuming crates through the
//! [`KeyValueStore`] and [`Notifier`] traits.

pub mod controller;
pub mod date;
pub mod error;
pub mod filter;
pub mod form;
pub mod list;
pub mod persist;
pub mod reminder;
pub mod task;
pub mod theme;

pub use controller::{Action, Controller, Stats};
pub use error::{CoreError, Result};
pub use filter::{CategoryFilter, PriorityFilter, SortDirection, SortKey, ViewState};
pub use form::{EntryForm, FormField};
pub use list::{EditState, ListEvent, TaskList, TaskRow};
pub use persist::{KeyValueStore, MemoryStore, Persistence};
pub use reminder::{Notifier, Permission, ReminderPolicy, ReminderTracker};
pub use task::{NewTask, Priority, Task, TaskId};
pub use theme::Theme;
