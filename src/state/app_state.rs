//! Application-level state.

use super::Notification;

/// The current tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum View {
    #[default]
    Signals,
    Positions,
    History,
    About,
}

impl View {
    pub const ALL: [View; 4] = [Self::Signals, Self::Positions, Self::History, Self::About];

    /// Stable index persisted as the last selected tab.
    pub fn index(&self) -> usize {
        match self {
            Self::Signals => 0,
            Self::Positions => 1,
            Self::History => 2,
            Self::About => 3,
        }
    }

    /// Tab for a persisted index; unknown indices open signals.
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_default()
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Signals => "Signals",
            Self::Positions => "Positions",
            Self::History => "History",
            Self::About => "About",
        }
    }

    pub fn next(&self) -> Self {
        Self::from_index((self.index() + 1) % Self::ALL.len())
    }

    pub fn previous(&self) -> Self {
        Self::from_index((self.index() + Self::ALL.len() - 1) % Self::ALL.len())
    }
}

/// Global application state.
#[derive(Debug, Default)]
pub struct AppState {
    /// Current view.
    pub current_view: View,
    /// Whether to show help overlay.
    pub show_help: bool,
    /// Whether the order log panel is open over the history view.
    pub show_order_log: bool,
    /// Current notification.
    pub notification: Option<Notification>,
    /// Current error message.
    pub error: Option<String>,
    /// Whether the backend answered the last connectivity check.
    pub connected: bool,
    /// Fixture data replaces the network.
    pub debug_mode: bool,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Selected row per list view.
    pub selected_signal: Option<usize>,
    pub selected_position: Option<usize>,
    pub selected_profit: Option<usize>,
}

impl AppState {
    /// Create a new application state opened on `view`.
    pub fn new(view: View, debug_mode: bool) -> Self {
        Self {
            current_view: view,
            debug_mode,
            ..Default::default()
        }
    }

    /// Selected row of the current view, if it is a list.
    pub fn selection(&self) -> Option<usize> {
        match self.current_view {
            View::Signals => self.selected_signal,
            View::Positions => self.selected_position,
            View::History => self.selected_profit,
            View::About => None,
        }
    }

    /// Mutable selection slot of the current view.
    pub fn selection_mut(&mut self) -> Option<&mut Option<usize>> {
        match self.current_view {
            View::Signals => Some(&mut self.selected_signal),
            View::Positions => Some(&mut self.selected_position),
            View::History => Some(&mut self.selected_profit),
            View::About => None,
        }
    }
}
