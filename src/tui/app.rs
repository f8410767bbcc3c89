//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which manages the TUI state,
//! handles user input, and renders the interface. Rendering is a full
//! rebuild from store state every frame; there is no incremental
//! update path to get out of sync.

use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};

use crate::store::{StoreError, TaskStore};
use crate::tui::{input::InputField, utils::centered_rect};

const EMPTY_PLACEHOLDER: &str = "No tasks yet — add something!";
const MSG_ADD_EMPTY: &str = "Please enter a task before adding.";
const MSG_EDIT_EMPTY: &str = "Task not updated — text cannot be empty.";

/// Application state for the terminal user interface.
#[derive(Clone, Copy, PartialEq)]
enum AppState {
    TaskList,
    AddTask,
    EditTask,
    ConfirmClear,
    Help,
}

/// Main application state for the terminal user interface.
///
/// Owns the task store and the transient UI state (selection, input
/// field, status line). All mutations go through the store, which
/// persists after each one.
pub struct App {
    state: AppState,
    store: TaskStore,
    list_state: TableState,
    input: InputField,
    editing_id: Option<u64>,
    status_message: String,
}

impl App {
    /// Create a new App instance, opening the store at the given path.
    pub fn new(db_path: &Path) -> Self {
        let (store, warning) = TaskStore::open(db_path);
        let mut app = App {
            state: AppState::TaskList,
            store,
            list_state: TableState::default(),
            input: InputField::new(),
            editing_id: None,
            status_message: warning.map(|w| format!("Warning: {w}")).unwrap_or_default(),
        };
        if !app.store.is_empty() {
            app.list_state.select(Some(0));
        }
        app
    }

    /// Id of the task under the cursor, if any.
    fn selected_id(&self) -> Option<u64> {
        self.list_state
            .selected()
            .and_then(|i| self.store.tasks().get(i))
            .map(|t| t.id)
    }

    /// Move the cursor to the row holding `id`.
    fn select_task(&mut self, id: u64) {
        if let Some(idx) = self.store.tasks().iter().position(|t| t.id == id) {
            self.list_state.select(Some(idx));
        }
    }

    fn select_next(&mut self) {
        let len = self.store.len();
        if len == 0 {
            return;
        }
        let next = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.list_state.select(Some(next));
    }

    fn select_prev(&mut self) {
        let len = self.store.len();
        if len == 0 {
            return;
        }
        let prev = match self.list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(prev));
    }

    /// Keep the selection on a valid row after the collection shrank.
    fn clamp_selection(&mut self) {
        let len = self.store.len();
        if len == 0 {
            self.list_state.select(None);
        } else if self.list_state.selected().map_or(true, |i| i >= len) {
            self.list_state.select(Some(len - 1));
        }
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    /// Promote a failed persistence write to the status line. The
    /// in-memory change stands either way.
    fn surface_write_warning(&mut self) {
        if let Some(w) = self.store.take_write_warning() {
            self.status_message = format!("Warning: {w}");
        }
    }

    /// Handle keyboard input when in the task list view.
    ///
    /// Returns true if the application should quit.
    fn handle_task_list_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        match key {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Char('a') => {
                self.input = InputField::new();
                self.state = AppState::AddTask;
            }
            KeyCode::Char('e') => {
                if let Some(id) = self.selected_id() {
                    if let Some(task) = self.store.get(id) {
                        self.input = InputField::with_value(&task.text);
                        self.editing_id = Some(id);
                        self.state = AppState::EditTask;
                    }
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(id) = self.selected_id() {
                    self.store.toggle(id);
                    self.surface_write_warning();
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_id() {
                    if self.store.remove(id) {
                        self.clamp_selection();
                        self.surface_write_warning();
                    }
                }
            }
            KeyCode::Char('c') => {
                if !self.store.is_empty() {
                    self.state = AppState::ConfirmClear;
                }
            }
            KeyCode::Char('h') | KeyCode::F(1) => self.state = AppState::Help,
            _ => {}
        }
        false
    }

    /// Handle keyboard input in the add-task input line.
    ///
    /// On a successful add the input clears and keeps focus, so tasks
    /// can be entered back to back.
    fn handle_add_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.state = AppState::TaskList,
            KeyCode::Enter => match self.store.add(&self.input.value) {
                Ok(id) => {
                    self.input.clear();
                    self.select_task(id);
                    self.surface_write_warning();
                }
                Err(StoreError::EmptyText) => {
                    self.set_status_message(MSG_ADD_EMPTY.to_string());
                }
            },
            key => self.handle_input_field_key(key),
        }
    }

    /// Handle keyboard input in the edit-task input line.
    ///
    /// Esc abandons the edit with no mutation and no message. An empty
    /// submission leaves the task unchanged and reports it.
    fn handle_edit_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.editing_id = None;
                self.state = AppState::TaskList;
            }
            KeyCode::Enter => {
                let Some(id) = self.editing_id.take() else {
                    self.state = AppState::TaskList;
                    return;
                };
                match self.store.edit(id, &self.input.value) {
                    Ok(_) => self.surface_write_warning(),
                    Err(StoreError::EmptyText) => {
                        self.set_status_message(MSG_EDIT_EMPTY.to_string());
                    }
                }
                self.state = AppState::TaskList;
            }
            key => self.handle_input_field_key(key),
        }
    }

    /// Editing keys shared by the add and edit input lines.
    fn handle_input_field_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char(c) => self.input.handle_char(c),
            KeyCode::Backspace => self.input.handle_backspace(),
            KeyCode::Delete => self.input.handle_delete(),
            KeyCode::Left => self.input.move_cursor_left(),
            KeyCode::Right => self.input.move_cursor_right(),
            KeyCode::Home => self.input.move_cursor_home(),
            KeyCode::End => self.input.move_cursor_end(),
            _ => {}
        }
    }

    /// Handle keyboard input in the clear-all confirmation dialog.
    fn handle_confirm_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                let n = self.store.clear();
                self.clamp_selection();
                self.surface_write_warning();
                if self.status_message.is_empty() {
                    self.set_status_message(format!("Cleared {n} task(s)"));
                }
                self.state = AppState::TaskList;
            }
            _ => self.state = AppState::TaskList,
        }
    }

    /// Poll for and dispatch one input event.
    ///
    /// Returns true if the application should quit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                self.status_message.clear();

                let should_quit = match self.state {
                    AppState::TaskList => self.handle_task_list_input(key.code, key.modifiers),
                    AppState::AddTask => {
                        self.handle_add_input(key.code);
                        false
                    }
                    AppState::EditTask => {
                        self.handle_edit_input(key.code);
                        false
                    }
                    AppState::ConfirmClear => {
                        self.handle_confirm_input(key.code);
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

    /// Render the task list view, rebuilt from store state.
    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let title = format!("Tasks ({}) - Press 'h' for help", self.store.len());
        let block = Block::default().borders(Borders::ALL).title(title);

        if self.store.is_empty() {
            let placeholder = Paragraph::new(EMPTY_PLACEHOLDER)
                .block(block)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray));
            f.render_widget(placeholder, area);
            return;
        }

        let header_cells = ["ID", "Done", "Text"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
        let header = Row::new(header_cells)
            .style(Style::default().bg(Color::Blue).fg(Color::White))
            .height(1);

        let rows: Vec<Row> = self
            .store
            .tasks()
            .iter()
            .map(|task| {
                let mark = if task.completed { "[x]" } else { "[ ]" };
                let style = if task.completed {
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default().fg(Color::White)
                };
                Row::new(vec![
                    Cell::from(task.id.to_string()),
                    Cell::from(mark),
                    Cell::from(task.text.clone()),
                ])
                .style(style)
            })
            .collect();

        let widths = [
            Constraint::Length(5), // ID
            Constraint::Length(5), // Done
            Constraint::Min(20),   // Text
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.list_state);
    }

    /// Render the one-line input box at the bottom of the screen.
    fn render_input(&mut self, f: &mut Frame, area: Rect, title: &str) {
        let block = Block::default().borders(Borders::ALL).title(title.to_string());
        let inner = block.inner(area);
        let paragraph = Paragraph::new(self.input.value.as_str()).block(block);
        f.render_widget(paragraph, area);

        let cursor_x = inner.x + (self.input.cursor as u16).min(inner.width.saturating_sub(1));
        f.set_cursor_position((cursor_x, inner.y));
    }

    /// Render the confirmation dialog for clearing all tasks.
    fn render_confirm(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Confirm Action")
            .borders(Borders::ALL)
            .style(Style::default().bg(Color::Red).fg(Color::White));

        let area = centered_rect(50, 30, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Clear ALL tasks?",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(format!("{} task(s) will be deleted.", self.store.len())),
            Line::from(""),
            Line::from("This action cannot be undone."),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    /// Render the help screen.
    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let help_text = vec![
            Line::from(vec![Span::styled(
                "To-Do List Help",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Task List:",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from("  Up/k, Down/j  Move between tasks"),
            Line::from("  Space/Enter   Toggle done"),
            Line::from("  a             Add new task"),
            Line::from("  e             Edit selected task"),
            Line::from("  d             Delete selected task"),
            Line::from("  c             Clear ALL tasks (asks first)"),
            Line::from("  h/F1          Show this help"),
            Line::from("  q/Ctrl+C/Esc  Quit"),
            Line::from(""),
            Line::from(vec![Span::styled(
                "Input Line:",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from("  Enter         Save"),
            Line::from("  Esc           Cancel and return"),
            Line::from("  Left/Right/Home/End  Move cursor"),
        ];

        let paragraph = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help - Press any key to return"),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::TaskList => {
                    "a add  e edit  d delete  Space toggle  c clear all  q quit".to_string()
                }
                AppState::AddTask => "Add Task".to_string(),
                AppState::EditTask => "Edit Task".to_string(),
                AppState::ConfirmClear => "Confirm Action".to_string(),
                AppState::Help => "Help".to_string(),
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(Color::Blue).fg(Color::White))
            .alignment(Alignment::Left);

        f.render_widget(status, area);
    }

    /// Main render function that dispatches to appropriate view renderers.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)].as_ref())
            .split(f.area());

        match self.state {
            AppState::TaskList => self.render_task_list(f, chunks[0]),
            AppState::AddTask | AppState::EditTask => {
                let inner = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
                    .split(chunks[0]);
                self.render_task_list(f, inner[0]);
                let title = if self.state == AppState::AddTask {
                    "New task (Enter to add, Esc to cancel)"
                } else {
                    "Edit task (Enter to save, Esc to cancel)"
                };
                self.render_input(f, inner[1], title);
            }
            AppState::ConfirmClear => {
                self.render_task_list(f, chunks[0]);
                self.render_confirm(f, chunks[0]);
            }
            AppState::Help => self.render_help(f, chunks[0]),
        }

        self.render_status_bar(f, chunks[1]);
    }

    /// Main event loop for the TUI application.
    ///
    /// Handles rendering and input processing until the user exits.
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
