use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use ticklist_core::{CategoryFilter, Priority, PriorityFilter, SortKey, Theme};

#[derive(Parser)]
#[command(name = "ticklist")]
#[command(about = "A todo list with priorities, due dates and reminders")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_version = concat!(
    "v",
    env!("CARGO_PKG_VERSION"),
    "\nCodeName: ",
    env!("CODENAME")
))]
pub struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Less log output (-q warn, -qq error)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,

    /// Opens the full-screen interface when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PriorityArg {
    Low,
    Medium,
    High,
}

impl From<PriorityArg> for Priority {
    fn from(arg: PriorityArg) -> Self {
        match arg {
            PriorityArg::Low => Priority::Low,
            PriorityArg::Medium => Priority::Medium,
            PriorityArg::High => Priority::High,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ShowArg {
    All,
    Active,
    Completed,
}

impl From<ShowArg> for CategoryFilter {
    fn from(arg: ShowArg) -> Self {
        match arg {
            ShowArg::All => CategoryFilter::All,
            ShowArg::Active => CategoryFilter::Active,
            ShowArg::Completed => CategoryFilter::Completed,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PriorityFilterArg {
    All,
    Low,
    Medium,
    High,
}

impl From<PriorityFilterArg> for PriorityFilter {
    fn from(arg: PriorityFilterArg) -> Self {
        match arg {
            PriorityFilterArg::All => PriorityFilter::All,
            PriorityFilterArg::Low => PriorityFilter::Only(Priority::Low),
            PriorityFilterArg::Medium => PriorityFilter::Only(Priority::Medium),
            PriorityFilterArg::High => PriorityFilter::Only(Priority::High),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SortBy {
    Created,
    Due,
    Priority,
}

impl From<SortBy> for SortKey {
    fn from(arg: SortBy) -> Self {
        match arg {
            SortBy::Created => SortKey::Created,
            SortBy::Due => SortKey::Due,
            SortBy::Priority => SortKey::Priority,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Adds a todo
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
        /// Priority of the todo
        #[arg(long, short = 'p', value_enum, default_value = "medium")]
        priority: PriorityArg,
        /// Due date, e.g. "tomorrow 5pm" or "2026-01-25T09:30"
        #[arg(long, value_name = "DATE")]
        due: Option<String>,
        /// When to send a reminder
        #[arg(long, value_name = "DATE")]
        remind: Option<String>,
    },

    /// Lists todos with filtering and sorting
    List {
        /// Which todos to show
        #[arg(long, short = 'f', value_enum, default_value = "all")]
        filter: ShowArg,
        /// Show only one priority
        #[arg(long, short = 'p', value_enum, default_value = "all")]
        priority: PriorityFilterArg,
        /// Sort todos by field
        #[arg(long, short = 's', value_enum, default_value = "created")]
        sort: SortBy,
        /// Sort ascending instead of descending
        #[arg(long)]
        asc: bool,
        /// Use compact one-line format
        #[arg(long, short = 'c')]
        compact: bool,
        /// Disable colors
        #[arg(long)]
        no_color: bool,
    },

    /// Toggles completion of a todo
    Check {
        /// Todo id or unique id prefix
        id: String,
    },

    /// Removes a todo
    Remove {
        /// Todo id or unique id prefix
        id: String,
    },

    /// Changes the text and/or priority of a todo
    Edit {
        /// Todo id or unique id prefix
        id: String,
        /// New text
        #[arg(long, value_name = "TEXT")]
        text: Option<String>,
        /// New priority
        #[arg(long, short = 'p', value_enum)]
        priority: Option<PriorityArg>,
    },

    /// Removes every completed todo
    Clear {
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Shows or changes the colour theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },

    /// Sends notifications for reminders that are due now
    Remind,

    /// Keeps sending reminders until interrupted
    Watch,

    /// Restores todos from the backup file
    Recover {
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Opens the full-screen interface
    Ui,
}

#[derive(Subcommand, Clone, Copy)]
pub enum ThemeAction {
    /// Print the current theme
    Show,
    /// Switch between light and dark
    Toggle,
    /// Set a specific theme
    Set {
        #[arg(value_enum)]
        theme: ThemeArg,
    },
}
