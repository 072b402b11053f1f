//! Main application logic for the dashboard.
//!
//! The `App` owns the task store for the session and re-runs the
//! store-to-view pipeline (filter, derive, sort, aggregate) after every
//! mutation. Deletes park the removed task in the store's undo slot and
//! surface an undo notice until the user undoes or dismisses it.

use std::io;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};

use crate::activity::{format_activity_kind, ActivityKind, ActivityLog};
use crate::cmd::tasks_to_csv;
use crate::derive::{derive_all, sort_derived, DerivedTask};
use crate::fields::*;
use crate::filter::TaskFilter;
use crate::metrics::{compute_metrics, Metrics};
use crate::store::TaskStore;
use crate::task::{Task, TaskPatch};
use crate::tui::colors::{GRADE_AMBER, GRADE_GOLD, GRADE_GREEN, GRADE_RED};
use crate::tui::form::{
    TaskForm, FIELD_PRIORITY, FIELD_REVENUE, FIELD_STATUS, FIELD_TIME_TAKEN, FIELD_TITLE,
};

/// Current screen of the dashboard.
#[derive(Clone, Copy, PartialEq)]
enum AppState {
    TaskList,
    AddTask,
    EditTask,
    Help,
}

/// Main application state for the dashboard.
pub struct App {
    state: AppState,
    store: TaskStore,
    log: ActivityLog,
    filter: TaskFilter,
    /// Derived + sorted view of the filtered collection.
    visible: Vec<DerivedTask>,
    metrics: Metrics,
    table_state: TableState,
    form: TaskForm,
    filter_entry: bool,
    show_log: bool,
    status_message: String,
    load_error: Option<String>,
}

impl App {
    /// Create the dashboard over an already-hydrated task collection.
    pub fn new(tasks: Vec<Task>, load_error: Option<String>) -> Self {
        let mut app = App {
            state: AppState::TaskList,
            store: TaskStore::with_tasks(tasks),
            log: ActivityLog::new(),
            filter: TaskFilter::default(),
            visible: Vec::new(),
            metrics: compute_metrics(&[]),
            table_state: TableState::default(),
            form: TaskForm::new(),
            filter_entry: false,
            show_log: false,
            status_message: String::new(),
            load_error,
        };
        app.refresh_view();
        app
    }

    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }

    /// Re-run the store-to-view pipeline: filter the canonical collection,
    /// recompute aggregate metrics over the view, then derive and sort.
    /// Tries to keep the current selection.
    fn refresh_view(&mut self) {
        let old_selected_id = self
            .table_state
            .selected()
            .and_then(|idx| self.visible.get(idx))
            .map(|d| d.task.id);

        let filtered = self.filter.apply(self.store.tasks());
        self.metrics = compute_metrics(&filtered);
        self.visible = sort_derived(&derive_all(&filtered));

        if self.visible.is_empty() {
            self.table_state.select(None);
            return;
        }
        let idx = old_selected_id
            .and_then(|id| self.visible.iter().position(|d| d.task.id == id))
            .unwrap_or(0);
        self.table_state.select(Some(idx.min(self.visible.len() - 1)));
    }

    fn selected_task(&self) -> Option<&Task> {
        self.table_state
            .selected()
            .and_then(|idx| self.visible.get(idx))
            .map(|d| &d.task)
    }

    fn select_next(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let next = match self.table_state.selected() {
            Some(i) if i + 1 < self.visible.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.table_state.select(Some(next));
    }

    fn select_prev(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let prev = self.table_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.table_state.select(Some(prev));
    }

    // ---- mutations -------------------------------------------------------

    fn submit_form(&mut self) {
        let now = self.now();
        match self.form.editing_id {
            None => {
                let payload = self.form.to_payload();
                let title = payload.title.clone();
                let id = self.store.add(payload);
                self.log
                    .record(now, ActivityKind::Add, format!("Added '{title}' (#{id})"));
                self.status_message = format!("Added task {id}");
            }
            Some(id) => {
                let patch = self.form.to_patch();
                let title = patch.title.clone().unwrap_or_default();
                if self.store.update(id, patch) {
                    self.log
                        .record(now, ActivityKind::Update, format!("Updated '{title}' (#{id})"));
                    self.status_message = format!("Updated task {id}");
                }
            }
        }
        self.state = AppState::TaskList;
        self.refresh_view();
    }

    fn cycle_selected_status(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let id = task.id;
        let title = task.title.clone();
        let next = task.status.next();
        let now = self.now();
        if self.store.update(
            id,
            TaskPatch {
                status: Some(next),
                ..TaskPatch::default()
            },
        ) {
            self.log.record(
                now,
                ActivityKind::Update,
                format!("'{}' -> {}", title, format_status(next)),
            );
        }
        self.refresh_view();
    }

    fn delete_selected(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let id = task.id;
        let now = self.now();
        if let Some(title) = self.store.delete(id) {
            self.log
                .record(now, ActivityKind::Delete, format!("Deleted '{title}' (#{id})"));
            self.status_message = format!("Deleted '{title}'");
        }
        self.refresh_view();
    }

    fn undo_delete(&mut self) {
        let now = self.now();
        match self.store.undo_delete() {
            Some(id) => {
                let title = self
                    .store
                    .get(id)
                    .map(|t| t.title.clone())
                    .unwrap_or_default();
                self.log
                    .record(now, ActivityKind::Undo, format!("Restored '{title}' (#{id})"));
                self.status_message = format!("Restored '{title}'");
                self.refresh_view();
            }
            None => self.status_message = "Nothing to undo".to_string(),
        }
    }

    fn export_view(&mut self) {
        let csv = tasks_to_csv(&self.visible);
        match std::fs::write("tasks.csv", csv) {
            Ok(_) => {
                self.status_message = format!("Exported {} task(s) to tasks.csv", self.visible.len())
            }
            Err(e) => self.status_message = format!("Export failed: {e}"),
        }
    }

    // ---- input -----------------------------------------------------------

    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                let should_quit = match self.state {
                    AppState::TaskList if self.filter_entry => {
                        self.handle_filter_input(key.code);
                        false
                    }
                    AppState::TaskList => self.handle_task_list_input(key.code, key.modifiers),
                    AppState::AddTask | AppState::EditTask => {
                        self.handle_form_input(key.code);
                        false
                    }
                    AppState::Help => {
                        self.state = AppState::TaskList;
                        false
                    }
                };
                if should_quit {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    fn handle_task_list_input(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Char('a') => {
                self.form = TaskForm::new();
                self.state = AppState::AddTask;
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(task) = self.selected_task() {
                    self.form = TaskForm::from_task(task);
                    self.state = AppState::EditTask;
                }
            }
            KeyCode::Char(' ') => self.cycle_selected_status(),
            KeyCode::Char('d') => self.delete_selected(),
            KeyCode::Char('u') => self.undo_delete(),
            KeyCode::Char('x') => {
                self.store.clear_last_deleted();
                self.status_message.clear();
            }
            KeyCode::Char('/') => {
                self.filter_entry = true;
            }
            KeyCode::Char('s') => {
                self.filter.status = match self.filter.status {
                    None => Some(Status::Todo),
                    Some(Status::Todo) => Some(Status::InProgress),
                    Some(Status::InProgress) => Some(Status::Done),
                    Some(Status::Done) => None,
                };
                self.refresh_view();
            }
            KeyCode::Char('p') => {
                self.filter.priority = match self.filter.priority {
                    None => Some(Priority::High),
                    Some(p) if p == Priority::Low => None,
                    Some(p) => Some(p.next()),
                };
                self.refresh_view();
            }
            KeyCode::Char('c') => self.export_view(),
            KeyCode::Char('l') => self.show_log = !self.show_log,
            KeyCode::Char('h') | KeyCode::Char('?') => self.state = AppState::Help,
            KeyCode::Esc => {
                self.filter = TaskFilter::default();
                self.refresh_view();
            }
            _ => {}
        }
        false
    }

    fn handle_filter_input(&mut self, code: KeyCode) {
        match code {
            KeyCode::Enter | KeyCode::Esc => self.filter_entry = false,
            KeyCode::Backspace => {
                self.filter.text.pop();
                self.refresh_view();
            }
            KeyCode::Char(c) => {
                self.filter.text.push(c);
                self.refresh_view();
            }
            _ => {}
        }
    }

    fn handle_form_input(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.state = AppState::TaskList,
            KeyCode::Enter => self.submit_form(),
            KeyCode::Tab | KeyCode::Down => self.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.form.prev_field(),
            KeyCode::Backspace => self.form.handle_backspace(),
            KeyCode::Left => match self.form.active_field {
                FIELD_TITLE => self.form.title.move_cursor_left(),
                FIELD_REVENUE => self.form.revenue.move_cursor_left(),
                FIELD_TIME_TAKEN => self.form.time_taken.move_cursor_left(),
                _ => {}
            },
            KeyCode::Right => match self.form.active_field {
                FIELD_TITLE => self.form.title.move_cursor_right(),
                FIELD_REVENUE => self.form.revenue.move_cursor_right(),
                FIELD_TIME_TAKEN => self.form.time_taken.move_cursor_right(),
                _ => {}
            },
            KeyCode::Char(c) => self.form.handle_char(c),
            _ => {}
        }
    }

    // ---- rendering -------------------------------------------------------

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(8),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.render_metrics(f, chunks[0]);

        if self.show_log {
            let main = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(40), Constraint::Length(40)])
                .split(chunks[1]);
            self.render_task_list(f, main[0]);
            self.render_activity_log(f, main[1]);
        } else {
            self.render_task_list(f, chunks[1]);
        }

        self.render_status_bar(f, chunks[2]);

        match self.state {
            AppState::AddTask | AppState::EditTask => self.render_form(f),
            AppState::Help => self.render_help(f),
            AppState::TaskList => {}
        }
    }

    fn render_metrics(&self, f: &mut Frame, area: Rect) {
        let m: &Metrics = &self.metrics;
        let grade_color = match m.performance_grade {
            Grade::Excellent => GRADE_GREEN,
            Grade::Good => GRADE_GOLD,
            Grade::Fair => GRADE_AMBER,
            Grade::NeedsImprovement => GRADE_RED,
        };

        let mut lines = vec![
            Line::from(vec![
                Span::raw(format!("Total revenue: {:>12.2}    ", m.total_revenue)),
                Span::raw(format!("Total hours: {:>8.1}    ", m.total_time_taken)),
                Span::raw(format!("Revenue/hour: {:>9.2}", m.revenue_per_hour)),
            ]),
            Line::from(vec![
                Span::raw(format!("Average ROI:   {:>12.2}    ", m.average_roi)),
                Span::raw(format!("Efficiency:  {:>7.0}%    ", m.time_efficiency_pct)),
                Span::raw("Grade: "),
                Span::styled(
                    format_grade(m.performance_grade),
                    Style::default().fg(grade_color).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(Span::raw(if self.filter.is_active() {
                format!(
                    "Filter: text '{}'  status {}  priority {}",
                    self.filter.text,
                    self.filter.status.map(format_status).unwrap_or("All"),
                    self.filter.priority.map(format_priority).unwrap_or("All"),
                )
            } else {
                "Filter: none (press / s p, Esc clears)".to_string()
            })),
        ];

        if let Some(err) = &self.load_error {
            lines.push(Line::from(Span::styled(
                format!("Load: {err}"),
                Style::default().fg(Color::Red),
            )));
        }
        if let Some(deleted) = self.store.last_deleted() {
            lines.push(Line::from(Span::styled(
                format!("Deleted '{}' - press u to undo, x to dismiss", deleted.title),
                Style::default().fg(GRADE_GOLD).add_modifier(Modifier::BOLD),
            )));
        }

        let panel = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Performance"));
        f.render_widget(panel, area);
    }

    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let header = Row::new(vec![
            "ID", "Status", "Pri", "Revenue", "Hours", "ROI", "Completed", "Title",
        ])
        .style(Style::default().add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = self
            .visible
            .iter()
            .map(|d| {
                let t = &d.task;
                let style = match t.status {
                    Status::Done => Style::default().fg(Color::DarkGray),
                    Status::InProgress => {
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                    }
                    Status::Todo => Style::default().fg(Color::White),
                };
                let completed = t
                    .completed_at_utc
                    .map(|_| "yes")
                    .unwrap_or("-");
                Row::new(vec![
                    Cell::from(t.id.to_string()),
                    Cell::from(format_status(t.status)),
                    Cell::from(format_priority(t.priority)),
                    Cell::from(format!("{:.2}", t.revenue)),
                    Cell::from(format!("{:.1}", t.time_taken)),
                    Cell::from(format!("{:.2}", d.roi)),
                    Cell::from(completed),
                    Cell::from(t.title.clone()),
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Length(5),  // ID
            Constraint::Length(12), // Status
            Constraint::Length(7),  // Priority
            Constraint::Length(10), // Revenue
            Constraint::Length(7),  // Hours
            Constraint::Length(9),  // ROI
            Constraint::Length(9),  // Completed
            Constraint::Min(20),    // Title
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(format!(
                "Tasks ({}/{}) - press h for help",
                self.visible.len(),
                self.store.tasks().len()
            )))
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn render_activity_log(&self, f: &mut Frame, area: Rect) {
        let lines: Vec<Line> = self
            .log
            .entries()
            .iter()
            .map(|e| {
                let when = Utc
                    .timestamp_opt(e.timestamp_utc, 0)
                    .single()
                    .map(|dt| dt.format("%H:%M").to_string())
                    .unwrap_or_default();
                Line::from(vec![
                    Span::styled(
                        format!("{when} [{:<6}] ", format_activity_kind(e.kind)),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::raw(e.summary.clone()),
                ])
            })
            .collect();

        let panel = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Activity"));
        f.render_widget(panel, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let text = if self.filter_entry {
            format!("Filter: {}_  (Enter/Esc to finish)", self.filter.text)
        } else if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            "a add  e edit  space status  d delete  u undo  x dismiss  / filter  s status  p priority  c export  l log  q quit"
                .to_string()
        };
        f.render_widget(Paragraph::new(text), area);
    }

    fn render_form(&self, f: &mut Frame) {
        let area = centered_rect(50, 50, f.area());
        f.render_widget(Clear, area);

        let title = if self.form.editing_id.is_some() {
            "Edit task (Enter save, Esc cancel)"
        } else {
            "Add task (Enter save, Esc cancel)"
        };

        let field_line = |label: &str, value: String, field: usize| {
            let style = if self.form.active_field == field {
                Style::default().fg(Color::Black).bg(Color::Gray)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::raw(format!("{label:<12}")),
                Span::styled(value, style),
            ])
        };

        let lines = vec![
            field_line("Title", self.form.title.value.clone(), FIELD_TITLE),
            field_line("Revenue", self.form.revenue.value.clone(), FIELD_REVENUE),
            field_line("Hours", self.form.time_taken.value.clone(), FIELD_TIME_TAKEN),
            field_line(
                "Status",
                format!("{} (space cycles)", format_status(self.form.status)),
                FIELD_STATUS,
            ),
            field_line(
                "Priority",
                format!("{} (space cycles)", format_priority(self.form.priority)),
                FIELD_PRIORITY,
            ),
        ];

        let form = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(form, area);
    }

    fn render_help(&self, f: &mut Frame) {
        let area = centered_rect(60, 60, f.area());
        f.render_widget(Clear, area);

        let lines: Vec<Line> = [
            "a        add a task",
            "e/Enter  edit selected task",
            "space    cycle status of selected task",
            "d        delete selected task",
            "u        undo last delete",
            "x        dismiss undo notice",
            "/        type a title filter (Enter to finish)",
            "s        cycle status filter (All/Todo/In Progress/Done)",
            "p        cycle priority filter (All/High/Medium/Low)",
            "Esc      clear all filters",
            "c        export current view to tasks.csv",
            "l        toggle activity log panel",
            "q        quit",
        ]
        .iter()
        .map(|s| Line::from(*s))
        .collect();

        let help = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Help (any key to close)"));
        f.render_widget(help, area);
    }

    /// Main event loop for the dashboard.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

/// Centered sub-rectangle taking the given percentages of the area.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
