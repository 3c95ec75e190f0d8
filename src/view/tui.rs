//! Terminal front end.
//!
//! Renders the task list with `ratatui` and maps `crossterm` key events to
//! view actions. Key handling is split from dispatch so the mapping can be
//! exercised without a terminal or a server.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::client::TaskApi;
use super::controller::TaskView;
use crate::domain::{Task, TaskId};

const POLL_INTERVAL: Duration = Duration::from_millis(250);

const NORMAL_HELP: &str = "i: new task  space: toggle  d: delete  r: reload  q: quit";
const EDITING_HELP: &str = "enter: add task  esc: stop editing";

/// Whether keys go to the list or to the title input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Keys move the selection and act on tasks.
    #[default]
    Normal,
    /// Keys edit the new-task title.
    Editing,
}

/// What a key press asks the application to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Nothing beyond the local input change already made.
    None,
    /// Leave the application.
    Quit,
    /// Fetch the list again.
    Reload,
    /// Create a task from the input text.
    Submit,
    /// Flip the completion flag of a task.
    Toggle(TaskId),
    /// Delete a task.
    Delete(TaskId),
}

/// Terminal application state: the view plus selection and input mode.
#[derive(Debug)]
pub struct App<C> {
    view: TaskView<C>,
    mode: InputMode,
    list_state: ListState,
}

impl<C: TaskApi> App<C> {
    /// Wraps a view.
    #[must_use]
    pub fn new(view: TaskView<C>) -> Self {
        let mut app = Self {
            view,
            mode: InputMode::Normal,
            list_state: ListState::default(),
        };
        app.clamp_selection();
        app
    }

    /// The wrapped view.
    #[must_use]
    pub const fn view(&self) -> &TaskView<C> {
        &self.view
    }

    /// Current input mode.
    #[must_use]
    pub const fn mode(&self) -> InputMode {
        self.mode
    }

    /// Id of the selected task, if any.
    #[must_use]
    pub fn selected_id(&self) -> Option<TaskId> {
        self.list_state
            .selected()
            .and_then(|index| self.view.state().tasks().get(index))
            .map(|task| task.id)
    }

    /// Maps a key to an action, applying input and selection changes directly.
    pub fn handle_key(&mut self, code: KeyCode) -> Action {
        match self.mode {
            InputMode::Normal => self.handle_normal_key(code),
            InputMode::Editing => self.handle_editing_key(code),
        }
    }

    fn handle_normal_key(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('r') => Action::Reload,
            KeyCode::Char('i') => {
                self.mode = InputMode::Editing;
                Action::None
            }
            KeyCode::Char(' ') => self.selected_id().map_or(Action::None, Action::Toggle),
            KeyCode::Char('d') => self.selected_id().map_or(Action::None, Action::Delete),
            KeyCode::Up => {
                self.list_state.select_previous();
                self.clamp_selection();
                Action::None
            }
            KeyCode::Down => {
                self.list_state.select_next();
                self.clamp_selection();
                Action::None
            }
            _ => Action::None,
        }
    }

    fn handle_editing_key(&mut self, code: KeyCode) -> Action {
        match code {
            KeyCode::Enter => Action::Submit,
            KeyCode::Esc => {
                self.mode = InputMode::Normal;
                Action::None
            }
            KeyCode::Backspace => {
                self.view.state_mut().pop_pending_char();
                Action::None
            }
            KeyCode::Char(character) => {
                self.view.state_mut().push_pending_char(character);
                Action::None
            }
            _ => Action::None,
        }
    }

    /// Runs an action against the endpoint. Returns `false` on quit.
    pub async fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return false,
            Action::None => {}
            Action::Reload => {
                self.view.load().await;
            }
            Action::Submit => {
                if self.view.submit().await {
                    self.list_state.select_first();
                }
            }
            Action::Toggle(id) => {
                self.view.toggle(id).await;
            }
            Action::Delete(id) => {
                self.view.delete(id).await;
            }
        }
        self.clamp_selection();
        true
    }

    fn clamp_selection(&mut self) {
        let len = self.view.state().tasks().len();
        if len == 0 {
            self.list_state.select(None);
        } else {
            let index = self.list_state.selected().unwrap_or(0).min(len - 1);
            self.list_state.select(Some(index));
        }
    }
}

fn task_item(task: &Task) -> ListItem<'_> {
    let (checkbox, title_style) = if task.completed {
        (
            "[x] ",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT),
        )
    } else {
        ("[ ] ", Style::default().fg(Color::White))
    };

    ListItem::new(Line::from(vec![
        Span::raw(checkbox),
        Span::styled(task.title_or_empty(), title_style),
    ]))
}

/// Draws the input line, the task list and the key help.
pub fn render<C: TaskApi>(frame: &mut Frame, app: &mut App<C>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let editing = app.mode == InputMode::Editing;
    let input = Paragraph::new(app.view.state().pending_title()).block(
        Block::default()
            .title("New task")
            .borders(Borders::ALL)
            .border_style(if editing {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            }),
    );
    frame.render_widget(input, chunks[0]);

    let items: Vec<ListItem> = app.view.state().tasks().iter().map(task_item).collect();
    let list = List::new(items)
        .block(Block::default().title("Tasks").borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, chunks[1], &mut app.list_state);

    let help = if editing { EDITING_HELP } else { NORMAL_HELP };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );
}

/// Loads the list once, then draws and handles keys until quit.
///
/// # Errors
///
/// Returns an error if drawing or reading terminal events fails.
pub async fn run_app<B: Backend, C: TaskApi>(
    terminal: &mut Terminal<B>,
    app: &mut App<C>,
) -> io::Result<()> {
    app.dispatch(Action::Reload).await;

    loop {
        terminal.draw(|frame| render(frame, app))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            let action = app.handle_key(key.code);
            if !app.dispatch(action).await {
                return Ok(());
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
