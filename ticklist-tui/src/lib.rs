//! Ticklist TUI
//!
//! A full-screen terminal interface over the ticklist controller: entry form
//! on top, filter bar, the task list and a status line.

mod app;
mod ui;

use std::time::Duration;

use ticklist_core::{Controller, KeyValueStore, Notifier};

pub use app::{App, DialogMode, Focus};
pub use ui::Palette;

/// Default spacing between reminder passes
pub const DEFAULT_REMINDER_INTERVAL: Duration = Duration::from_secs(60);

/// Run the interface until the user quits
pub fn run<S: KeyValueStore>(
    controller: Controller<S>,
    notifier: &mut dyn Notifier,
    reminder_interval: Duration,
) -> Result<(), String> {
    let mut app = App::new(controller).with_reminder_interval(reminder_interval);
    app::run_tui(&mut app, notifier)
}
