//! Event handling for the loghaul dashboard

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use loghaul_core::Severity;
use tokio::sync::mpsc;

use crate::app::{Action, App};

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    /// Terminal key press
    Key(KeyEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// Tick for periodic redraws
    Tick,
}

/// Event handler that polls for terminal events
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    /// Spawns the terminal poller; a tick is emitted whenever `tick_rate`
    /// elapses without input.
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            loop {
                let event = if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key)) => AppEvent::Key(key),
                        Ok(Event::Resize(w, h)) => AppEvent::Resize(w, h),
                        _ => continue,
                    }
                } else {
                    AppEvent::Tick
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
        });

        Self { rx }
    }

    /// Next event, or `None` once the poller has stopped.
    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

/// Maps a key press to an action.
pub fn action_for_key(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let action = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('0') => Action::ClearOrigin,
        KeyCode::Char(c @ '1'..='9') => Action::SelectOrigin(c as usize - '1' as usize),
        KeyCode::Char('d') => Action::SelectLevel(Severity::Debug),
        KeyCode::Char('i') => Action::SelectLevel(Severity::Info),
        KeyCode::Char('w') => Action::SelectLevel(Severity::Warn),
        KeyCode::Char('e') => Action::SelectLevel(Severity::Error),
        KeyCode::Char('f') => Action::SelectLevel(Severity::Fatal),
        KeyCode::Char('c') => Action::ClearLevel,
        KeyCode::Up | KeyCode::Char('k') => Action::Up,
        KeyCode::Down | KeyCode::Char('j') => Action::Down,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::Home | KeyCode::Char('g') => Action::First,
        KeyCode::End | KeyCode::Char('G') => Action::Last,
        _ => return None,
    };
    Some(action)
}

/// Handle keyboard input
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if let Some(action) = action_for_key(key) {
        app.apply(action);
    }
}
