use chrono::NaiveDate;
use color_eyre::Result;
use std::sync::Arc;

use super::{
    event::{AppEvent, EventHandler},
    widgets::TaskForm,
};
use crate::application::{AppError, AppResult, StateManager};
use crate::domain::{
    is_overdue, Priority, Task, TaskFilter, TaskStats, TaskStatus, EMPTY_LIST_MESSAGE,
};
use ratatui::{
    backend::Backend,
    prelude::*,
    widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Tabs},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppMode {
    Main,
    Form,
    Help,
}

pub struct App {
    state_manager: Arc<StateManager>,
    clock: fn() -> NaiveDate,

    // UI State
    mode: AppMode,
    form: TaskForm,
    task_list_state: TableState,

    // Rendered copy of the board, refreshed after every action
    today: NaiveDate,
    visible_tasks: Vec<Task>,
    stats: TaskStats,
    filter: TaskFilter,
    error_message: Option<String>,
}

impl App {
    pub fn new(state_manager: Arc<StateManager>) -> Self {
        let clock: fn() -> NaiveDate = crate::domain::today;
        let mut app = Self {
            state_manager,
            clock,
            mode: AppMode::Main,
            form: TaskForm::new(),
            task_list_state: TableState::default(),
            today: clock(),
            visible_tasks: Vec::new(),
            stats: TaskStats::default(),
            filter: TaskFilter::All,
            error_message: None,
        };

        app.task_list_state.select(Some(0));
        app
    }

    #[cfg(test)]
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self.today = clock();
        self
    }

    #[cfg(test)]
    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub async fn initialize(&mut self) -> Result<()> {
        // A failed first load is shown in the banner, not fatal.
        if let Err(e) = self.state_manager.load_tasks().await {
            tracing::warn!("Initial load failed: {}", e);
        }
        self.sync_view().await;
        Ok(())
    }

    async fn sync_view(&mut self) {
        self.today = (self.clock)();
        self.visible_tasks = self.state_manager.visible_tasks(self.today).await;
        self.stats = self.state_manager.stats().await;
        self.filter = self.state_manager.filter().await;
        self.error_message = self.state_manager.error().await;

        let selected = self.task_list_state.selected().unwrap_or(0);
        if self.visible_tasks.is_empty() {
            self.task_list_state.select(Some(0));
        } else if selected >= self.visible_tasks.len() {
            self.task_list_state.select(Some(self.visible_tasks.len() - 1));
        }
    }

    async fn finish_action(&mut self, result: AppResult<()>) {
        self.sync_view().await;
        match result {
            Ok(()) => {}
            // Store failures already carry their banner message.
            Err(AppError::Repository(e)) => tracing::debug!("Action failed: {}", e),
            Err(e) => self.error_message = Some(e.to_string()),
        }
    }

    fn selected_task(&self) -> Option<&Task> {
        self.task_list_state
            .selected()
            .and_then(|i| self.visible_tasks.get(i))
    }

    /// Returns `true` when the app should exit.
    pub async fn handle_event(&mut self, event: AppEvent) -> Result<bool> {
        if event == AppEvent::Quit {
            return Ok(true);
        }

        match self.mode {
            AppMode::Main => self.handle_main_event(event).await,
            AppMode::Form => {
                self.handle_form_event(event).await;
                Ok(false)
            }
            AppMode::Help => {
                if matches!(
                    event,
                    AppEvent::CloseModal
                        | AppEvent::Enter
                        | AppEvent::ShowHelp
                        | AppEvent::Character('q')
                        | AppEvent::Character('?')
                ) {
                    self.mode = AppMode::Main;
                }
                Ok(false)
            }
        }
    }

    async fn handle_main_event(&mut self, event: AppEvent) -> Result<bool> {
        match event {
            AppEvent::Character('q') => return Ok(true),
            AppEvent::NextTask | AppEvent::Character('j') => self.next_task(),
            AppEvent::PreviousTask | AppEvent::Character('k') => self.previous_task(),
            AppEvent::Character('g') => self.task_list_state.select(Some(0)),
            AppEvent::Character('G') => {
                if !self.visible_tasks.is_empty() {
                    self.task_list_state.select(Some(self.visible_tasks.len() - 1));
                }
            }
            AppEvent::Enter | AppEvent::Character(' ') => {
                if let Some(id) = self.selected_task().map(|t| t.id) {
                    let result = self.state_manager.cycle_status(&id).await;
                    self.finish_action(result).await;
                }
            }
            AppEvent::Character('d') => {
                if let Some(id) = self.selected_task().map(|t| t.id) {
                    let result = self.state_manager.delete_task(&id).await;
                    self.finish_action(result).await;
                }
            }
            AppEvent::Character('a') => self.mode = AppMode::Form,
            AppEvent::Refresh | AppEvent::Character('r') => {
                let result = self.state_manager.load_tasks().await;
                self.finish_action(result).await;
            }
            AppEvent::Tab | AppEvent::Character('f') => {
                self.set_filter(self.filter.next()).await;
            }
            AppEvent::BackTab => {
                self.set_filter(self.filter.next().next().next()).await;
            }
            AppEvent::Character(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.set_filter(TaskFilter::ALL[index]).await;
            }
            AppEvent::ShowHelp | AppEvent::Character('?') => self.mode = AppMode::Help,
            AppEvent::CloseModal => {
                self.state_manager.clear_error().await;
                self.error_message = None;
            }
            _ => {}
        }
        Ok(false)
    }

    async fn handle_form_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::CloseModal => self.mode = AppMode::Main,
            AppEvent::Tab | AppEvent::NextTask => self.form.focus_next(),
            AppEvent::BackTab | AppEvent::PreviousTask => self.form.focus_previous(),
            AppEvent::Left => self.form.left(),
            AppEvent::Right => self.form.right(),
            AppEvent::Character(c) => self.form.insert_char(c),
            AppEvent::Backspace => self.form.delete_char(),
            AppEvent::Refresh => {
                let result = self.state_manager.load_tasks().await;
                self.finish_action(result).await;
            }
            AppEvent::Enter => self.submit_form().await,
            _ => {}
        }
    }

    async fn submit_form(&mut self) {
        // Invalid input never reaches the store; the form shows why.
        let Ok(new_task) = self.form.to_new_task() else {
            return;
        };

        let result = self.state_manager.add_task(new_task).await;
        if result.is_ok() {
            self.form.reset();
            self.mode = AppMode::Main;
        }
        self.finish_action(result).await;
    }

    async fn set_filter(&mut self, filter: TaskFilter) {
        self.state_manager.set_filter(filter).await;
        self.task_list_state.select(Some(0));
        self.sync_view().await;
    }

    fn next_task(&mut self) {
        if self.visible_tasks.is_empty() {
            return;
        }
        let i = match self.task_list_state.selected() {
            Some(i) if i + 1 < self.visible_tasks.len() => i + 1,
            _ => 0,
        };
        self.task_list_state.select(Some(i));
    }

    fn previous_task(&mut self) {
        if self.visible_tasks.is_empty() {
            return;
        }
        let i = match self.task_list_state.selected() {
            Some(0) | None => self.visible_tasks.len() - 1,
            Some(i) => i - 1,
        };
        self.task_list_state.select(Some(i));
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let banner_height = if self.error_message.is_some() { 3 } else { 0 };
        let chunks = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(banner_height),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

        self.render_header(frame, chunks[0]);
        if let Some(message) = &self.error_message {
            let banner = Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::LightRed))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Red)),
                );
            frame.render_widget(banner, chunks[1]);
        }
        self.render_filter_tabs(frame, chunks[2]);
        self.render_task_list(frame, chunks[3]);
        self.render_status_bar(frame, chunks[4]);

        match self.mode {
            AppMode::Main => {}
            AppMode::Form => {
                let area = Self::centered_rect(70, 70, frame.area());
                self.form.render(frame, area);
            }
            AppMode::Help => self.render_help(frame),
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let stats = Line::from(vec![
            Span::styled("Total ", Style::default().fg(Color::Gray)),
            Span::styled(
                self.stats.total.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled("   Completed ", Style::default().fg(Color::Gray)),
            Span::styled(
                self.stats.completed.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled("   Progress ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}%", self.stats.completion_percent),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]);

        let header = Paragraph::new(stats).block(
            Block::default()
                .title(" Task Manager ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        );
        frame.render_widget(header, area);
    }

    fn render_filter_tabs(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<String> = TaskFilter::ALL
            .iter()
            .enumerate()
            .map(|(i, f)| format!("{} {}", i + 1, f.label()))
            .collect();
        let selected = TaskFilter::ALL
            .iter()
            .position(|f| *f == self.filter)
            .unwrap_or(0);

        let tabs = Tabs::new(titles)
            .select(selected)
            .block(Block::default().title(" Tasks ").borders(Borders::ALL))
            .highlight_style(
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn render_task_list(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded);

        if self.visible_tasks.is_empty() {
            let empty = Paragraph::new(EMPTY_LIST_MESSAGE)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let rows: Vec<Row> = self
            .visible_tasks
            .iter()
            .map(|task| Self::task_row(task, self.today))
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(2),
                Constraint::Min(20),
                Constraint::Length(8),
                Constraint::Length(12),
                Constraint::Length(15),
            ],
        )
        .header(
            Row::new(vec!["", "Title", "Priority", "Status", "Due"])
                .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)),
        )
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("▶ ");

        frame.render_stateful_widget(table, area, &mut self.task_list_state);
    }

    fn task_row(task: &Task, today: NaiveDate) -> Row<'static> {
        let marker = if task.is_done() {
            Cell::from("✓").style(Style::default().fg(Color::Green))
        } else {
            Cell::from("○").style(Style::default().fg(Color::Gray))
        };

        let mut title_line = vec![Span::styled(
            task.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if is_overdue(task, today) {
            title_line.push(Span::raw(" "));
            title_line.push(Span::styled(
                "OVERDUE",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
        }

        let mut lines = vec![Line::from(title_line)];
        if let Some(description) = task.description.as_deref().filter(|d| !d.is_empty()) {
            lines.push(Line::styled(
                description.to_string(),
                Style::default().fg(Color::Gray),
            ));
        }
        let height = lines.len() as u16;

        let priority_color = match task.priority {
            Priority::High => Color::Red,
            Priority::Medium => Color::Yellow,
            Priority::Low => Color::Green,
        };
        let status_color = match task.status {
            TaskStatus::Pending => Color::Gray,
            TaskStatus::InProgress => Color::Cyan,
            TaskStatus::Done => Color::Green,
        };

        Row::new(vec![
            marker,
            Cell::from(Text::from(lines)),
            Cell::from(task.priority.label()).style(Style::default().fg(priority_color)),
            Cell::from(task.status.label()).style(Style::default().fg(status_color)),
            Cell::from(task.due_date_display()),
        ])
        .height(height)
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let hints = match self.mode {
            AppMode::Form => "Enter: add • Esc: cancel • Tab: next field",
            _ => {
                "a: add • space: cycle status • d: delete • 1-4/f: filter • r: reload • ?: help • q: quit"
            }
        };
        frame.render_widget(
            Paragraph::new(hints).style(Style::default().fg(Color::DarkGray)),
            area,
        );
    }

    fn render_help(&self, frame: &mut Frame) {
        let area = Self::centered_rect(60, 60, frame.area());
        let lines = vec![
            Line::from("j/k, ↑/↓    move selection"),
            Line::from("g/G         first/last task"),
            Line::from("space/Enter cycle status (pending → in progress → done)"),
            Line::from("d           delete task"),
            Line::from("a           create a task"),
            Line::from("1-4, f, Tab filter: All / Today / Overdue / Done"),
            Line::from("r, Ctrl-R   reload from server"),
            Line::from("Esc         dismiss error"),
            Line::from("q, Ctrl-C   quit"),
        ];

        frame.render_widget(Clear, area);
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .title(" Help ")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            ),
            area,
        );
    }

    fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
        let popup_layout = Layout::vertical([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

        Layout::horizontal([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
    }
}

pub async fn run_tui(mut app: App) -> Result<()> {
    // color-eyre is already initialized in main.rs

    // Set up terminal
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app).await;

    // Cleanup
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        crossterm::terminal::LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    app.initialize().await?;

    let mut event_handler = EventHandler::new();

    loop {
        terminal.draw(|frame| app.render(frame))?;

        let event = event_handler.next_event().await?;
        if app.handle_event(event).await? || event_handler.should_quit() {
            break;
        }
    }

    Ok(())
}
