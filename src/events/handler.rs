//! Event handler for processing input events.

use crate::config::KeyBindings;
use crate::error::Result;
use crate::state::{Action, View};
use crossterm::event::{
    self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind,
};
use std::time::Duration;

use super::InputEvent;

/// Handles input events and produces actions.
pub struct EventHandler {
    /// Key bindings.
    keybindings: KeyBindings,
    /// How long to wait for input before yielding for a redraw.
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(keybindings: KeyBindings, tick_rate: Duration) -> Self {
        Self {
            keybindings,
            tick_rate,
        }
    }

    /// Get the next action from terminal input.
    ///
    /// Returns `Ok(None)` when nothing arrived within the tick rate so the
    /// caller can redraw with fresh feed state.
    pub async fn next(&mut self) -> Result<Option<Action>> {
        if event::poll(self.tick_rate)? {
            return Ok(self.handle_event(event::read()?));
        }
        Ok(None)
    }

    fn handle_event(&self, event: CrosstermEvent) -> Option<Action> {
        match event {
            CrosstermEvent::Key(key) => self.handle_key(key),
            CrosstermEvent::Mouse(mouse) => self.handle_mouse(mouse),
            CrosstermEvent::FocusGained => Some(Action::FocusGained),
            CrosstermEvent::FocusLost => Some(Action::FocusLost),
            // Terminal will automatically redraw
            CrosstermEvent::Resize(_, _) | CrosstermEvent::Paste(_) => None,
        }
    }

    /// Handle a key event and return an optional action.
    fn handle_key(&self, key: KeyEvent) -> Option<Action> {
        // Only process key press events
        if key.kind != KeyEventKind::Press {
            return None;
        }

        let input = InputEvent::from(key);
        let keys = &self.keybindings;

        // Global shortcuts
        if input.matches(&keys.quit) {
            return Some(Action::Quit);
        }
        if input.matches(&keys.help) {
            return Some(Action::ToggleHelp);
        }
        if input.matches(&keys.refresh) {
            return Some(Action::Refresh);
        }
        if input.matches(&keys.debug) {
            return Some(Action::ToggleDebug);
        }

        // View switching
        let views = [
            (&keys.signals, View::Signals),
            (&keys.positions, View::Positions),
            (&keys.history, View::History),
            (&keys.about, View::About),
        ];
        if let Some((_, view)) = views.into_iter().find(|(binding, _)| input.matches(binding)) {
            return Some(Action::SetView(view));
        }
        if input.matches(&keys.right) || matches!(key.code, KeyCode::Tab | KeyCode::Right) {
            return Some(Action::NextView);
        }
        if input.matches(&keys.left) || matches!(key.code, KeyCode::BackTab | KeyCode::Left) {
            return Some(Action::PrevView);
        }

        // Navigation
        if input.matches(&keys.up) || key.code == KeyCode::Up {
            return Some(Action::ScrollUp);
        }
        if input.matches(&keys.down) || key.code == KeyCode::Down {
            return Some(Action::ScrollDown);
        }
        if input.matches(&keys.select) {
            return Some(Action::Select);
        }
        if input.matches(&keys.back) {
            return Some(Action::Back);
        }

        match key.code {
            KeyCode::PageUp => Some(Action::PageUp),
            KeyCode::PageDown => Some(Action::PageDown),
            KeyCode::Home | KeyCode::Char('g') => Some(Action::GoToTop),
            KeyCode::End | KeyCode::Char('G') => Some(Action::GoToBottom),
            _ => None,
        }
    }

    /// Handle a mouse event and return an optional action.
    fn handle_mouse(&self, mouse: MouseEvent) -> Option<Action> {
        match mouse.kind {
            MouseEventKind::ScrollUp => Some(Action::ScrollUp),
            MouseEventKind::ScrollDown => Some(Action::ScrollDown),
            _ => None,
        }
    }
}
