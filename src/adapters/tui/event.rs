use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;
use color_eyre::Result;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    // Navigation
    Quit,
    Refresh,
    ShowHelp,
    CloseModal,

    // Task list navigation
    NextTask,
    PreviousTask,

    // Input handling
    Character(char),
    Backspace,
    Enter,
    Tab,
    BackTab,
    Left,
    Right,

    // Other
    Tick,
}

pub struct EventHandler {
    should_quit: bool,
}

impl EventHandler {
    pub fn new() -> Self {
        Self { should_quit: false }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub async fn next_event(&mut self) -> Result<AppEvent> {
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key_event) => Ok(self.handle_key_event(key_event)),
                _ => Ok(AppEvent::Tick),
            }
        } else {
            Ok(AppEvent::Tick)
        }
    }

    // Letters are passed through as `Character` so the app can decide
    // between a shortcut and text input depending on the current mode.
    fn handle_key_event(&mut self, key_event: KeyEvent) -> AppEvent {
        match key_event {
            KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => {
                self.should_quit = true;
                AppEvent::Quit
            }

            KeyEvent {
                code: KeyCode::Char('r'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => AppEvent::Refresh,

            KeyEvent {
                code: KeyCode::Esc, ..
            } => AppEvent::CloseModal,

            KeyEvent {
                code: KeyCode::F(1), ..
            } => AppEvent::ShowHelp,

            KeyEvent {
                code: KeyCode::Tab,
                modifiers: KeyModifiers::NONE,
                ..
            } => AppEvent::Tab,

            KeyEvent {
                code: KeyCode::BackTab,
                ..
            } => AppEvent::BackTab,

            KeyEvent {
                code: KeyCode::Enter,
                ..
            } => AppEvent::Enter,

            KeyEvent {
                code: KeyCode::Down,
                ..
            } => AppEvent::NextTask,

            KeyEvent {
                code: KeyCode::Up, ..
            } => AppEvent::PreviousTask,

            KeyEvent {
                code: KeyCode::Left,
                ..
            } => AppEvent::Left,

            KeyEvent {
                code: KeyCode::Right,
                ..
            } => AppEvent::Right,

            KeyEvent {
                code: KeyCode::Char(c),
                modifiers: KeyModifiers::NONE,
                ..
            } => AppEvent::Character(c),

            KeyEvent {
                code: KeyCode::Char(c),
                modifiers: KeyModifiers::SHIFT,
                ..
            } => AppEvent::Character(c.to_uppercase().next().unwrap_or(c)),

            KeyEvent {
                code: KeyCode::Backspace,
                ..
            } => AppEvent::Backspace,

            _ => AppEvent::Tick,
        }
    }
}
