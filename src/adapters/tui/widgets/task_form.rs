use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use super::TextInput;
use crate::domain::{DomainResult, NewTask, Priority, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    DueDate,
    Description,
    Status,
    Priority,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            FormField::Title => FormField::DueDate,
            FormField::DueDate => FormField::Description,
            FormField::Description => FormField::Status,
            FormField::Status => FormField::Priority,
            FormField::Priority => FormField::Title,
        }
    }

    fn previous(self) -> Self {
        match self {
            FormField::Title => FormField::Priority,
            FormField::DueDate => FormField::Title,
            FormField::Description => FormField::DueDate,
            FormField::Status => FormField::Description,
            FormField::Priority => FormField::Status,
        }
    }
}

/// "Create a task" popup.
pub struct TaskForm {
    title: TextInput,
    due_date: TextInput,
    description: TextInput,
    status: TaskStatus,
    priority: Priority,
    focused: FormField,
    validation_error: Option<String>,
}

impl TaskForm {
    pub fn new() -> Self {
        let mut form = Self {
            title: TextInput::new("Title", "e.g. Integrate login API"),
            due_date: TextInput::new("Due date (YYYY-MM-DD)", "optional"),
            description: TextInput::new("Description", "Optional details to remember..."),
            status: TaskStatus::default(),
            priority: Priority::default(),
            focused: FormField::Title,
            validation_error: None,
        };
        form.sync_focus();
        form
    }

    /// Back to the pristine state: empty text, pending, medium.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[cfg(test)]
    pub fn focused(&self) -> FormField {
        self.focused
    }

    #[cfg(test)]
    pub fn status(&self) -> TaskStatus {
        self.status
    }

    #[cfg(test)]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    #[cfg(test)]
    pub fn validation_error(&self) -> Option<&str> {
        self.validation_error.as_deref()
    }

    pub fn focus_next(&mut self) {
        self.focused = self.focused.next();
        self.sync_focus();
    }

    pub fn focus_previous(&mut self) {
        self.focused = self.focused.previous();
        self.sync_focus();
    }

    fn sync_focus(&mut self) {
        self.title.set_focused(self.focused == FormField::Title);
        self.due_date.set_focused(self.focused == FormField::DueDate);
        self.description
            .set_focused(self.focused == FormField::Description);
    }

    fn focused_input(&mut self) -> Option<&mut TextInput> {
        match self.focused {
            FormField::Title => Some(&mut self.title),
            FormField::DueDate => Some(&mut self.due_date),
            FormField::Description => Some(&mut self.description),
            FormField::Status | FormField::Priority => None,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        if let Some(input) = self.focused_input() {
            input.insert_char(c);
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(input) = self.focused_input() {
            input.delete_char();
        }
    }

    pub fn left(&mut self) {
        match self.focused {
            FormField::Status => self.status = self.status.previous(),
            FormField::Priority => self.priority = self.priority.previous(),
            _ => {
                if let Some(input) = self.focused_input() {
                    input.move_left();
                }
            }
        }
    }

    pub fn right(&mut self) {
        match self.focused {
            FormField::Status => self.status = self.status.next(),
            FormField::Priority => self.priority = self.priority.next(),
            _ => {
                if let Some(input) = self.focused_input() {
                    input.move_right();
                }
            }
        }
    }

    /// Validate the current input. On failure the message is kept for display.
    pub fn to_new_task(&mut self) -> DomainResult<NewTask> {
        let result = NewTask::from_form(
            self.title.value(),
            self.description.value(),
            self.status,
            self.priority,
            self.due_date.value(),
        );
        self.validation_error = result.as_ref().err().map(|e| e.to_string());
        result
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" Create a task ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Blue));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

        self.title.render(frame, rows[0]);
        self.due_date.render(frame, rows[1]);
        self.description.render(frame, rows[2]);

        frame.render_widget(
            Paragraph::new(self.selector_line(
                "Status",
                self.status.label(),
                self.focused == FormField::Status,
            )),
            rows[3],
        );
        frame.render_widget(
            Paragraph::new(self.selector_line(
                "Priority",
                self.priority.label(),
                self.focused == FormField::Priority,
            )),
            rows[4],
        );

        if let Some(message) = &self.validation_error {
            frame.render_widget(
                Paragraph::new(message.as_str()).style(Style::default().fg(Color::Red)),
                rows[5],
            );
        }

        frame.render_widget(
            Paragraph::new("Tab: next field • ←/→: change • Enter: add task • Esc: cancel")
                .style(Style::default().fg(Color::DarkGray)),
            rows[6],
        );
    }

    fn selector_line(&self, name: &str, value: &str, focused: bool) -> Line<'static> {
        let value_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::styled(format!(" {name}: "), Style::default().fg(Color::Gray)),
            Span::styled(format!("◀ {value} ▶"), value_style),
        ])
    }
}
