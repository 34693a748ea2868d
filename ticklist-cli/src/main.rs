use std::fs;
use std::io::{self, Write};
use std::path::Path;

use chrono::Local;
use clap::Parser;
use tracing::debug;

use ticklist_core::date::parse_datetime;
use ticklist_core::persist::{TASKS_KEY, decode_tasks};
use ticklist_core::{Controller, KeyValueStore, NewTask, Notifier, Permission, Priority};

use crate::cli::{Cli, Commands, ThemeAction};
use crate::config::{APP_NAME, Config};
use crate::display::{DisplayMode, format_summary, format_task, supports_color};
use crate::error::{CliError, Result};
use crate::notify::DesktopNotifier;
use crate::storage::FileStore;

mod cli;
mod config;
mod display;
mod error;
mod logging;
mod notify;
mod storage;
mod watch;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cfg: Config = confy::load(APP_NAME, None)?;
    let data_dir = cfg.data_dir();
    let command = cli.command.unwrap_or(Commands::Ui);

    if matches!(command, Commands::Ui) {
        logging::init_file_tracing(cli.verbose, cli.quiet, &data_dir)?;
    } else {
        logging::init_tracing(cli.verbose, cli.quiet)?;
    }
    debug!(dir = %data_dir.display(), "using data directory");

    let mut controller =
        Controller::load(FileStore::new(&data_dir)).with_policy(cfg.reminders.policy());

    match command {
        Commands::Add {
            text,
            priority,
            due,
            remind,
        } => {
            let now = Local::now();
            let text = text.join(" ");
            let due = due.map(|d| parse_datetime(&d, now)).transpose()?;
            let reminder = remind.map(|r| parse_datetime(&r, now)).transpose()?;

            let new_task = NewTask::new(text.clone())
                .with_priority(priority.into())
                .with_due(due)
                .with_reminder(reminder);
            let id = controller
                .add(new_task)
                .ok_or_else(|| CliError::validation("text", "Todo text cannot be empty"))?;
            check_saved(&mut controller)?;

            println!("Added {}: {}", id.short(), text.trim());
            if let Some(due) = due {
                println!("  Due: {}", due.format("%Y-%m-%d %H:%M"));
            }
            if let Some(reminder) = reminder {
                println!("  Reminder: {}", reminder.format("%Y-%m-%d %H:%M"));
            }
        }

        Commands::List {
            filter,
            priority,
            sort,
            asc,
            compact,
            no_color,
        } => {
            controller.set_filter(filter.into());
            controller.set_priority_filter(priority.into());
            controller.set_sort_key(sort.into());
            if asc {
                controller.toggle_sort_direction();
            }

            let now = Local::now();
            let tasks = controller.visible_tasks();
            if tasks.is_empty() {
                println!("No todos found.");
                return Ok(());
            }

            let mode = if compact {
                DisplayMode::Compact
            } else {
                DisplayMode::Default
            };
            let use_color = !no_color && cfg.display.color && supports_color();

            for task in &tasks {
                println!("{}", format_task(task, mode, use_color, now));
            }

            println!();
            println!("{}", format_summary(&controller.stats(now), use_color));
        }

        Commands::Check { id } => {
            let id = controller.resolve(&id)?;
            controller.toggle_complete(&id);
            check_saved(&mut controller)?;

            if let Some(task) = controller.get(&id) {
                let status = if task.completed { "done" } else { "open" };
                println!("Marked {} as {}: {}", id.short(), status, task.text);
            }
        }

        Commands::Remove { id } => {
            let id = controller.resolve(&id)?;
            let text = controller
                .get(&id)
                .map(|t| t.text.clone())
                .unwrap_or_default();
            controller.delete(&id);
            check_saved(&mut controller)?;
            println!("Removed: {}", text);
        }

        Commands::Edit { id, text, priority } => {
            if text.is_none() && priority.is_none() {
                return Err(CliError::validation(
                    "edit",
                    "At least one of --text or --priority must be provided",
                ));
            }

            let id = controller.resolve(&id)?;
            let Some(current) = controller.get(&id).cloned() else {
                return Err(CliError::TaskNotFound(id.to_string()));
            };
            let new_text = text.unwrap_or(current.text);
            let new_priority: Priority = priority.map(Into::into).unwrap_or(current.priority);

            if !controller.edit(&id, &new_text, new_priority) {
                return Err(CliError::validation("text", "Todo text cannot be empty"));
            }
            check_saved(&mut controller)?;
            println!(
                "Updated {}: {} [{}]",
                id.short(),
                new_text.trim(),
                new_priority.label()
            );
        }

        Commands::Clear { force } => {
            let count = controller.stats(Local::now()).completed;
            if count == 0 {
                println!("No completed todos to remove.");
                return Ok(());
            }

            if !force && !confirm(&format!("Remove {} completed todo(s)?", count))? {
                println!("Cancelled.");
                return Ok(());
            }

            let removed = controller.clear_completed();
            check_saved(&mut controller)?;
            println!("Removed {} completed todo(s).", removed);
        }

        Commands::Theme { action } => {
            match action.unwrap_or(ThemeAction::Show) {
                ThemeAction::Show => {}
                ThemeAction::Toggle => {
                    controller.toggle_theme();
                }
                ThemeAction::Set { theme } => controller.set_theme(theme.into()),
            }
            check_saved(&mut controller)?;
            println!("Theme: {}", controller.theme());
        }

        Commands::Remind => {
            let mut notifier = notifier_for(&cfg)?;
            let fired = controller.check_reminders(Local::now(), &mut notifier);
            println!("Sent {} reminder(s).", fired);
        }

        Commands::Watch => {
            let mut notifier = notifier_for(&cfg)?;
            let interval = cfg.reminders.interval();
            println!(
                "Checking reminders every {}s, press Ctrl-C to stop.",
                interval.as_secs()
            );
            let fired = watch::watch(&mut controller, &mut notifier, interval)?;
            println!("Sent {} reminder(s).", fired);
        }

        Commands::Ui => {
            let mut notifier = DesktopNotifier::new(cfg.reminders.notifications);
            ticklist_tui::run(controller, &mut notifier, cfg.reminders.interval())
                .map_err(CliError::Tui)?;
        }

        Commands::Recover { force } => recover(&data_dir, force)?,
    }

    Ok(())
}

/// Turn a failed write during the last operation into an error
fn check_saved<S: KeyValueStore>(controller: &mut Controller<S>) -> Result<()> {
    match controller.take_save_error() {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

/// Desktop notifier with permission already resolved
fn notifier_for(cfg: &Config) -> Result<DesktopNotifier> {
    let mut notifier = DesktopNotifier::new(cfg.reminders.notifications);
    if notifier.request_permission() != Permission::Granted {
        return Err(CliError::config(
            "Notifications are disabled (set reminders.notifications = true)",
        ));
    }
    Ok(notifier)
}

fn recover(data_dir: &Path, force: bool) -> Result<()> {
    let mut store = FileStore::new(data_dir);
    if !store.backup_exists(TASKS_KEY) {
        return Err(CliError::storage("No backup file found"));
    }

    let backup = store.backup_path(TASKS_KEY);
    let raw = fs::read_to_string(&backup)
        .map_err(|e| CliError::io(format!("Failed to read {}", backup.display()), e))?;
    let count = decode_tasks(&raw)?.len();

    if !force && !confirm("Restore todos from backup? Current todos will be replaced.")? {
        println!("Cancelled.");
        return Ok(());
    }

    store.restore(TASKS_KEY)?;
    println!("Recovered {} todos from backup.", count);
    Ok(())
}

/// Ask user for confirmation
fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_lowercase() == "y")
}
