//! TUI application state and event handling

use std::io;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use ticklist_core::{
    Action, Controller, EntryForm, KeyValueStore, ListEvent, Notifier, Permission, Task, TaskId,
    TaskList,
};
use tracing::{debug, info};

use crate::DEFAULT_REMINDER_INTERVAL;
use crate::ui;

/// Which pane receives keystrokes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    Form,
    #[default]
    List,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DialogMode {
    None,
    ClearConfirm,
    Help,
}

pub struct App<S> {
    pub controller: Controller<S>,
    pub form: EntryForm,
    pub list: TaskList,
    pub focus: Focus,
    pub selected_index: usize,
    pub dialog: DialogMode,
    pub should_quit: bool,
    pub status_message: Option<String>,
    reminder_interval: Duration,
    next_reminder: Instant,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(controller: Controller<S>) -> Self {
        Self {
            controller,
            form: EntryForm::new(),
            list: TaskList::new(),
            focus: Focus::default(),
            selected_index: 0,
            dialog: DialogMode::None,
            should_quit: false,
            status_message: None,
            reminder_interval: DEFAULT_REMINDER_INTERVAL,
            next_reminder: Instant::now() + DEFAULT_REMINDER_INTERVAL,
        }
    }

    /// Builder method to set the spacing between reminder passes
    pub fn with_reminder_interval(mut self, interval: Duration) -> Self {
        self.reminder_interval = interval;
        self.next_reminder = Instant::now() + interval;
        self
    }

    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.controller.visible_tasks()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.controller
            .visible_tasks()
            .get(self.selected_index)
            .copied()
    }

    pub fn selected_task_id(&self) -> Option<TaskId> {
        self.selected_task().map(|t| t.id().clone())
    }

    pub fn move_selection(&mut self, delta: i32) {
        let len = self.controller.visible_tasks().len();
        if len == 0 {
            return;
        }

        self.selected_index = if delta < 0 {
            self.selected_index.saturating_sub(delta.unsigned_abs() as usize)
        } else {
            (self.selected_index + delta as usize).min(len - 1)
        };
    }

    /// Send a message to the controller and resync view-side state
    pub fn apply(&mut self, action: Action) {
        debug!(?action, "dispatching");
        self.controller.dispatch(action);
        self.sync();
    }

    fn sync(&mut self) {
        self.list.reconcile(self.controller.tasks());

        let len = self.controller.visible_tasks().len();
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }

        if let Some(e) = self.controller.take_save_error() {
            self.status_message = Some(format!("Failed to save: {}", e));
        }
    }

    fn emit(&mut self, event: ListEvent) {
        self.apply(event.into());
    }

    pub fn submit_form(&mut self) {
        if let Some(new_task) = self.form.submit() {
            self.apply(Action::Add(new_task));
        }
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_task_id() {
            let event = self.list.toggle(&id);
            self.emit(event);
        }
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_task_id() {
            let event = self.list.delete(&id);
            self.emit(event);
        }
    }

    pub fn start_edit_selected(&mut self) {
        let Some(task) = self.controller.visible_tasks().get(self.selected_index).copied() else {
            return;
        };
        if !self.list.start_edit(task) && task.completed {
            self.status_message = Some("Completed todos cannot be edited".to_string());
        }
    }

    pub fn save_edit(&mut self) {
        if let Some(event) = self.list.save() {
            self.emit(event);
        }
    }

    pub fn clear_completed(&mut self) {
        let before = self.controller.tasks().len();
        self.apply(Action::ClearCompleted);
        let removed = before - self.controller.tasks().len();
        if removed > 0 && self.status_message.is_none() {
            self.status_message = Some(format!("Cleared {} completed todo(s)", removed));
        }
        self.dialog = DialogMode::None;
    }

    fn cycle_view(&mut self, action: Action) {
        self.apply(action);
        self.selected_index = 0;
    }

    /// Time left until the next reminder pass
    pub fn until_next_reminder(&self, now: Instant) -> Duration {
        self.next_reminder.saturating_duration_since(now)
    }

    /// Run a reminder pass if the interval has elapsed
    pub fn tick_reminders(&mut self, now: Instant, notifier: &mut dyn Notifier) -> usize {
        if now < self.next_reminder {
            return 0;
        }
        self.next_reminder = now + self.reminder_interval;

        let fired = self.controller.check_reminders(Local::now(), notifier);
        if fired > 0 {
            self.status_message = Some(format!("{} reminder(s) sent", fired));
        }
        fired
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        self.status_message = None;

        if self.dialog != DialogMode::None {
            self.handle_dialog_key(key.code);
        } else if self.list.is_editing() {
            self.handle_edit_key(key.code, ctrl);
        } else if self.focus == Focus::Form {
            self.handle_form_key(key.code, ctrl);
        } else {
            self.handle_list_key(key.code);
        }
    }

    fn handle_form_key(&mut self, code: KeyCode, ctrl: bool) {
        match code {
            KeyCode::Esc => self.focus = Focus::List,
            KeyCode::Tab => self.form.focus_next(),
            KeyCode::Char('p') if ctrl => self.form.cycle_priority(),
            KeyCode::Char('d') if ctrl => self.form.toggle_dates(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Backspace => self.form.pop_char(),
            KeyCode::Char(c) if !ctrl => self.form.push_char(c),
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, code: KeyCode, ctrl: bool) {
        match code {
            KeyCode::Esc => self.list.cancel(),
            KeyCode::Enter => self.save_edit(),
            KeyCode::Char('p') if ctrl => self.list.cycle_buffer_priority(),
            KeyCode::Char('t') if ctrl => {
                if let Some(id) = self.list.editing_id().cloned() {
                    let event = self.list.toggle(&id);
                    self.emit(event);
                }
            }
            KeyCode::Delete => {
                if let Some(id) = self.list.editing_id().cloned() {
                    let event = self.list.delete(&id);
                    self.emit(event);
                }
            }
            KeyCode::Backspace => self.list.pop_char(),
            KeyCode::Char(c) if !ctrl => self.list.push_char(c),
            _ => {}
        }
    }

    fn handle_list_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('a') | KeyCode::Char('i') => self.focus = Focus::Form,
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Home | KeyCode::Char('g') => self.selected_index = 0,
            KeyCode::End | KeyCode::Char('G') => {
                self.selected_index = self.controller.visible_tasks().len().saturating_sub(1);
            }
            KeyCode::Char(' ') | KeyCode::Char('x') => self.toggle_selected(),
            KeyCode::Char('e') | KeyCode::Enter => self.start_edit_selected(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Char('c') => {
                if self.controller.tasks().iter().any(|t| t.completed) {
                    self.dialog = DialogMode::ClearConfirm;
                }
            }
            KeyCode::Char('f') => {
                let filter = self.controller.view().filter.next();
                self.cycle_view(Action::SetFilter(filter));
            }
            KeyCode::Char('p') => {
                let priority = self.controller.view().priority.next();
                self.cycle_view(Action::SetPriorityFilter(priority));
            }
            KeyCode::Char('s') => {
                let sort = self.controller.view().sort.next();
                self.cycle_view(Action::SetSortKey(sort));
            }
            KeyCode::Char('r') => self.cycle_view(Action::ToggleSortDirection),
            KeyCode::Char('t') => self.apply(Action::ToggleTheme),
            KeyCode::Char('?') => self.dialog = DialogMode::Help,
            _ => {}
        }
    }

    fn handle_dialog_key(&mut self, code: KeyCode) {
        match self.dialog {
            DialogMode::ClearConfirm => match code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    self.clear_completed();
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    self.dialog = DialogMode::None;
                }
                _ => {}
            },
            DialogMode::Help => {
                if matches!(
                    code,
                    KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter | KeyCode::Char('q')
                ) {
                    self.dialog = DialogMode::None;
                }
            }
            DialogMode::None => {}
        }
    }
}

pub fn run_tui<S: KeyValueStore>(
    app: &mut App<S>,
    notifier: &mut dyn Notifier,
) -> Result<(), String> {
    // Ask once, never from inside a reminder pass
    let permission = match notifier.permission() {
        Permission::Default => notifier.request_permission(),
        other => other,
    };
    info!(?permission, "notification permission");

    enable_raw_mode().map_err(|e| format!("Failed to enable raw mode: {}", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .map_err(|e| format!("Failed to setup terminal: {}", e))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal =
        Terminal::new(backend).map_err(|e| format!("Failed to create terminal: {}", e))?;

    let result = run_app(&mut terminal, app, notifier);

    // Restore terminal
    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    result
}

fn run_app<B: ratatui::backend::Backend, S: KeyValueStore>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
    notifier: &mut dyn Notifier,
) -> Result<(), String> {
    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .map_err(|e| format!("Failed to draw: {}", e))?;

        let timeout = app.until_next_reminder(Instant::now());
        if event::poll(timeout).map_err(|e| format!("Failed to poll events: {}", e))? {
            if let Event::Key(key) =
                event::read().map_err(|e| format!("Failed to read event: {}", e))?
            {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        app.tick_reminders(Instant::now(), notifier);

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
