//! TUI rendering module

use chrono::Local;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};
use ticklist_core::{FormField, KeyValueStore, Priority, TaskRow, Theme};

use crate::app::{App, DialogMode, Focus};

/// Colours for one theme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub muted: Color,
    pub highlight: Color,
    pub done: Color,
    pub danger: Color,
    pub warn: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                bg: Color::White,
                fg: Color::Black,
                accent: Color::Blue,
                muted: Color::Gray,
                highlight: Color::Rgb(220, 230, 245),
                done: Color::Green,
                danger: Color::Red,
                warn: Color::Rgb(180, 110, 0),
            },
            Theme::Dark => Self {
                bg: Color::Black,
                fg: Color::White,
                accent: Color::Cyan,
                muted: Color::DarkGray,
                highlight: Color::Rgb(45, 50, 65),
                done: Color::LightGreen,
                danger: Color::LightRed,
                warn: Color::Yellow,
            },
        }
    }

    pub fn priority(&self, priority: Priority) -> Color {
        match priority {
            Priority::High => self.danger,
            Priority::Medium => self.warn,
            Priority::Low => self.done,
        }
    }

    fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    fn border(&self, active: bool) -> Style {
        if active {
            Style::default().fg(self.accent)
        } else {
            Style::default().fg(self.muted)
        }
    }
}

pub fn draw<S: KeyValueStore>(f: &mut Frame, app: &App<S>) {
    let palette = Palette::for_theme(app.controller.theme());
    f.render_widget(Block::default().style(palette.base()), f.area());

    let form_height = if app.form.dates_open() { 6 } else { 3 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(form_height), // Entry form
            Constraint::Length(3),           // Filter bar
            Constraint::Min(5),              // Task list
            Constraint::Length(3),           // Status bar
            Constraint::Length(3),           // Controls
        ])
        .split(f.area());

    draw_form(f, app, &palette, chunks[0]);
    draw_filter_bar(f, app, &palette, chunks[1]);
    draw_task_list(f, app, &palette, chunks[2]);
    draw_status_bar(f, app, &palette, chunks[3]);
    draw_controls(f, app, &palette, chunks[4]);

    match app.dialog {
        DialogMode::None => {}
        DialogMode::ClearConfirm => {
            let count = app.controller.tasks().iter().filter(|t| t.completed).count();
            draw_confirm_dialog(
                f,
                &palette,
                "Clear completed todos?",
                &format!("{} todo(s) will be removed", count),
            );
        }
        DialogMode::Help => draw_help_dialog(f, &palette),
    }

    if let Some(msg) = &app.status_message {
        draw_status_message(f, &palette, msg);
    }
}

fn draw_form<S: KeyValueStore>(f: &mut Frame, app: &App<S>, palette: &Palette, area: Rect) {
    let form = &app.form;
    let focused = app.focus == Focus::Form && !app.list.is_editing();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" New Todo ")
        .border_style(palette.border(focused));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = if form.dates_open() {
        vec![Constraint::Length(1), Constraint::Length(1), Constraint::Length(1)]
    } else {
        vec![Constraint::Length(1)]
    };
    let lines = Layout::default()
        .direction(Direction::Vertical)
        .constraints(rows)
        .split(inner);

    let cursor = |field: FormField| {
        if focused && form.focus() == field {
            "_"
        } else {
            ""
        }
    };
    let date_marker = if form.has_dates() { " [dates]" } else { "" };

    let text_line = Line::from(vec![
        Span::styled(
            format!("[{}] ", form.priority().label()),
            Style::default()
                .fg(palette.priority(form.priority()))
                .add_modifier(Modifier::BOLD),
        ),
        if form.text().is_empty() && !focused {
            Span::styled("What needs to be done?", Style::default().fg(palette.muted))
        } else {
            Span::raw(format!("{}{}", form.text(), cursor(FormField::Text)))
        },
        Span::styled(date_marker, Style::default().fg(palette.accent)),
    ]);
    f.render_widget(Paragraph::new(text_line), lines[0]);

    if form.dates_open() {
        let field_style = |field: FormField| {
            if focused && form.focus() == field {
                Style::default().fg(palette.accent)
            } else {
                Style::default()
            }
        };
        let due = Paragraph::new(format!(
            "Due:      {}{}",
            form.due_input(),
            cursor(FormField::Due)
        ))
        .style(field_style(FormField::Due));
        let reminder = Paragraph::new(format!(
            "Reminder: {}{}",
            form.reminder_input(),
            cursor(FormField::Reminder)
        ))
        .style(field_style(FormField::Reminder));

        f.render_widget(due, lines[1]);
        f.render_widget(reminder, lines[2]);
    }
}

fn draw_filter_bar<S: KeyValueStore>(f: &mut Frame, app: &App<S>, palette: &Palette, area: Rect) {
    let view = app.controller.view();
    let label = Style::default().fg(palette.muted);
    let value = Style::default()
        .fg(palette.accent)
        .add_modifier(Modifier::BOLD);

    let spans = vec![
        Span::styled("Show: ", label),
        Span::styled(view.filter.as_str(), value),
        Span::raw("  "),
        Span::styled("Priority: ", label),
        Span::styled(view.priority.as_str(), value),
        Span::raw("  "),
        Span::styled("Sort: ", label),
        Span::styled(
            format!("{} {}", view.sort.as_str(), view.direction.arrow()),
            value,
        ),
    ];

    let paragraph = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border(false)),
        )
        .alignment(Alignment::Center);

    f.render_widget(paragraph, area);
}

fn draw_task_list<S: KeyValueStore>(f: &mut Frame, app: &App<S>, palette: &Palette, area: Rect) {
    let visible = app.visible_tasks();
    let rows = app.list.rows(&visible, Local::now());
    let focused = app.focus == Focus::List || app.list.is_editing();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Todos ({}) ", rows.len()))
        .title_alignment(Alignment::Left)
        .border_style(palette.border(focused));

    if rows.is_empty() {
        let placeholder = Paragraph::new(app.list.placeholder())
            .style(Style::default().fg(palette.muted))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(placeholder, area);
        return;
    }

    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let selected = focused && i == app.selected_index;
            create_task_item(app, row, selected, palette)
        })
        .collect();

    f.render_widget(List::new(items).block(block), area);
}

fn create_task_item<S: KeyValueStore>(
    app: &App<S>,
    row: &TaskRow,
    is_selected: bool,
    palette: &Palette,
) -> ListItem<'static> {
    let checkbox = if row.completed { "[✓]" } else { "[ ]" };

    let (text, priority) = match app.list.buffer() {
        Some(buffer) if row.editing => (format!("{}_", buffer.text), buffer.priority),
        _ => (row.text.clone(), row.priority),
    };

    let mut spans = vec![
        Span::styled(
            format!("{} ", checkbox),
            if row.completed {
                Style::default().fg(palette.done)
            } else {
                Style::default()
            },
        ),
        Span::styled(
            format!("{:<6} ", priority.label()),
            Style::default().fg(palette.priority(priority)),
        ),
    ];

    let text_style = if row.editing {
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::UNDERLINED)
    } else if row.completed {
        Style::default()
            .fg(palette.muted)
            .add_modifier(Modifier::CROSSED_OUT)
    } else if is_selected {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    spans.push(Span::styled(text, text_style));

    if let Some(due) = &row.due {
        let style = if row.overdue {
            Style::default()
                .fg(palette.danger)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.muted)
        };
        let label = if row.overdue { "overdue" } else { "due" };
        spans.push(Span::styled(format!("  {} {}", label, due), style));
    }

    if let Some(reminder) = &row.reminder {
        spans.push(Span::styled(
            format!("  ⏰ {}", reminder),
            Style::default().fg(palette.accent),
        ));
    }

    spans.push(Span::styled(
        format!("  {}", row.created),
        Style::default().fg(palette.muted),
    ));

    let style = if is_selected {
        Style::default().bg(palette.highlight)
    } else {
        Style::default()
    };

    ListItem::new(Line::from(spans)).style(style)
}

fn draw_status_bar<S: KeyValueStore>(f: &mut Frame, app: &App<S>, palette: &Palette, area: Rect) {
    let stats = app.controller.stats(Local::now());

    let status = vec![
        Span::raw(" "),
        Span::styled(format!("{} items left", stats.active), Style::default()),
        Span::raw(" | "),
        Span::styled(
            format!("{} done", stats.completed),
            Style::default().fg(palette.done),
        ),
        Span::raw(" | "),
        if stats.overdue > 0 {
            Span::styled(
                format!("{} overdue", stats.overdue),
                Style::default().fg(palette.danger),
            )
        } else {
            Span::styled("0 overdue", Style::default().fg(palette.muted))
        },
        Span::raw(" | "),
        Span::styled(
            format!("{} theme", app.controller.theme()),
            Style::default().fg(palette.muted),
        ),
    ];

    let paragraph = Paragraph::new(Line::from(status))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border(false)),
        )
        .alignment(Alignment::Center);

    f.render_widget(paragraph, area);
}

fn key_hints(hints: &[(&'static str, &'static str)]) -> Vec<Span<'static>> {
    hints
        .iter()
        .flat_map(|(key, action)| {
            [
                Span::styled(*key, Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format!(":{} ", action)),
            ]
        })
        .collect()
}

fn draw_controls<S: KeyValueStore>(f: &mut Frame, app: &App<S>, palette: &Palette, area: Rect) {
    let controls = if app.list.is_editing() {
        key_hints(&[
            ("Enter", "Save"),
            ("Esc", "Cancel"),
            ("^P", "Priority"),
            ("^T", "Toggle"),
            ("Del", "Delete"),
        ])
    } else if app.focus == Focus::Form {
        key_hints(&[
            ("Enter", "Add"),
            ("Tab", "Field"),
            ("^P", "Priority"),
            ("^D", "Dates"),
            ("Esc", "List"),
        ])
    } else {
        key_hints(&[
            ("a", "Add"),
            ("Space", "Toggle"),
            ("e", "Edit"),
            ("d", "Del"),
            ("f", "Filter"),
            ("p", "Priority"),
            ("s", "Sort"),
            ("r", "Reverse"),
            ("t", "Theme"),
            ("?", "Help"),
            ("q", "Quit"),
        ])
    };

    let paragraph = Paragraph::new(Line::from(controls))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Controls ")
                .border_style(palette.border(false)),
        )
        .alignment(Alignment::Center);

    f.render_widget(paragraph, area);
}

fn draw_confirm_dialog(f: &mut Frame, palette: &Palette, title: &str, message: &str) {
    let area = centered_rect(40, 25, f.area());

    f.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .style(palette.base())
        .border_style(Style::default().fg(palette.danger));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Length(2), Constraint::Length(2)])
        .split(inner);

    let msg = Paragraph::new(message)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(msg, chunks[0]);

    let hint = Paragraph::new("Y to confirm, N/Esc to cancel")
        .style(Style::default().fg(palette.muted))
        .alignment(Alignment::Center);

    f.render_widget(hint, chunks[1]);
}

fn draw_help_dialog(f: &mut Frame, palette: &Palette) {
    let area = centered_rect(65, 80, f.area());

    f.render_widget(Clear, area);

    let heading = |text: &'static str| {
        Line::from(vec![Span::styled(
            text,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        heading("Entry Form"),
        Line::from("  a           Focus the form"),
        Line::from("  Tab         Next field"),
        Line::from("  Ctrl-P      Cycle priority"),
        Line::from("  Ctrl-D      Show/hide due date and reminder"),
        Line::from("  Enter       Add todo"),
        Line::from("  Esc         Back to the list"),
        Line::from(""),
        heading("Todo List"),
        Line::from("  ↑/↓ or j/k  Move selection"),
        Line::from("  Space/x     Toggle completion"),
        Line::from("  e/Enter     Edit selected todo"),
        Line::from("  d/Delete    Delete selected todo"),
        Line::from("  c           Clear completed todos"),
        Line::from(""),
        heading("While Editing"),
        Line::from("  Enter       Save"),
        Line::from("  Esc         Cancel"),
        Line::from("  Ctrl-P      Cycle priority"),
        Line::from("  Ctrl-T      Toggle completion"),
        Line::from("  Delete      Delete todo"),
        Line::from(""),
        heading("View"),
        Line::from("  f           Cycle filter"),
        Line::from("  p           Cycle priority filter"),
        Line::from("  s           Cycle sort key"),
        Line::from("  r           Reverse sort direction"),
        Line::from("  t           Toggle light/dark theme"),
        Line::from("  ?           Toggle this help"),
        Line::from("  q/Esc       Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press Esc to close",
            Style::default().fg(palette.muted),
        )]),
    ];

    let paragraph = Paragraph::new(help_text)
        .style(palette.base())
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent)),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, area);
}

fn draw_status_message(f: &mut Frame, palette: &Palette, message: &str) {
    let full = f.area();
    if full.height < 2 || full.width < 4 {
        return;
    }
    let area = Rect {
        x: 2,
        y: full.height - 2,
        width: full.width - 4,
        height: 1,
    };

    let msg = Paragraph::new(message)
        .style(Style::default().fg(palette.warn))
        .alignment(Alignment::Center);

    f.render_widget(msg, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
