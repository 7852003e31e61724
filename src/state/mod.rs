//! State management for Sentio.
//!
//! UI state follows a unidirectional flow: input becomes an [`Action`],
//! the [`Store`] reduces it. Feed data does not go through actions; each
//! feed publishes its [`FeedState`] on a watch channel and the store reads
//! the latest value when rendering.

mod app_state;
mod feed_state;
mod position_state;
mod profit_state;
mod signal_state;
mod symbol;

pub use app_state::{AppState, View};
pub use feed_state::{FeedState, PageCursor};
pub use position_state::{Position, total_unrealized_pnl};
pub use profit_state::{OrderLog, ProfitLog, ProfitSummary};
pub use signal_state::{Metric, Signal, SignalType};
pub use symbol::Symbol;

use crate::error::FeedError;
use tokio::sync::watch;

/// Actions that can be dispatched to modify state.
#[derive(Debug, Clone)]
pub enum Action {
    // Navigation
    SetView(View),
    NextView,
    PrevView,

    // Lists
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    /// Open detail for the selected row.
    Select,
    /// Close the topmost overlay.
    Back,

    // Feeds
    /// Re-check the backend and retry the visible feed.
    Refresh,
    /// Request the next history page.
    LoadNextPage,
    ToggleDebug,

    // Lifecycle
    FocusGained,
    FocusLost,

    // UI
    ToggleHelp,
    ShowNotification(Notification),
    DismissNotification,

    // Error handling
    /// Show an error until dismissed with Back.
    SetError(String),

    // Connection status
    SetConnected(bool),

    Quit,
}

/// A notification to display to the user.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub duration_secs: u64,
}

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Info,
            duration_secs: 3,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Warning,
            duration_secs: 5,
        }
    }
}

/// Read side of every feed.
#[derive(Debug, Clone)]
pub struct FeedReceivers {
    pub signals: watch::Receiver<FeedState<Signal>>,
    pub positions: watch::Receiver<FeedState<Position>>,
    pub profits: watch::Receiver<FeedState<ProfitSummary>>,
    pub order_log: watch::Receiver<FeedState<OrderLog>>,
}

/// Rows moved by PageUp/PageDown.
const PAGE_STEP: isize = 10;

/// The global state store.
#[derive(Debug)]
pub struct Store {
    /// Application state.
    pub app: AppState,
    /// Latest published state of each feed.
    pub feeds: FeedReceivers,
}

impl Store {
    pub fn new(app: AppState, feeds: FeedReceivers) -> Self {
        Self { app, feeds }
    }

    /// Apply an action to update state.
    pub fn reduce(&mut self, action: Action) {
        match action {
            // Navigation
            Action::SetView(view) => self.set_view(view),
            Action::NextView => self.set_view(self.app.current_view.next()),
            Action::PrevView => self.set_view(self.app.current_view.previous()),

            // Lists
            Action::ScrollUp => self.scroll(-1),
            Action::ScrollDown => self.scroll(1),
            Action::PageUp => self.scroll(-PAGE_STEP),
            Action::PageDown => self.scroll(PAGE_STEP),
            Action::GoToTop => self.select_row(|_, _| 0),
            Action::GoToBottom => self.select_row(|len, _| len - 1),
            Action::Select => {
                if self.app.current_view == View::History && self.selected_profit().is_some() {
                    self.app.show_order_log = true;
                }
            }
            Action::Back => {
                if self.app.show_help {
                    self.app.show_help = false;
                } else if self.app.show_order_log {
                    self.app.show_order_log = false;
                } else {
                    self.app.error = None;
                }
            }

            // Feeds
            Action::ToggleDebug => self.app.debug_mode = !self.app.debug_mode,
            Action::Refresh | Action::LoadNextPage => {}

            Action::FocusGained | Action::FocusLost => {}

            // UI
            Action::ToggleHelp => self.app.show_help = !self.app.show_help,
            Action::ShowNotification(notification) => {
                self.app.notification = Some(notification);
            }
            Action::DismissNotification => {
                self.app.notification = None;
            }

            // Error handling
            Action::SetError(error) => {
                self.app.error = Some(error);
            }

            // Connection status
            Action::SetConnected(connected) => {
                self.app.connected = connected;
            }

            Action::Quit => {
                self.app.should_quit = true;
            }
        }
    }

    fn set_view(&mut self, view: View) {
        self.app.current_view = view;
        self.app.show_order_log = false;
    }

    /// Row count of the list in the current view.
    pub fn current_len(&self) -> usize {
        match self.app.current_view {
            View::Signals => self.feeds.signals.borrow().len(),
            View::Positions => self.feeds.positions.borrow().len(),
            View::History => self.feeds.profits.borrow().len(),
            View::About => 0,
        }
    }

    /// Whether the current view is loading.
    pub fn current_loading(&self) -> bool {
        match self.app.current_view {
            View::Signals => self.feeds.signals.borrow().is_loading,
            View::Positions => self.feeds.positions.borrow().is_loading,
            View::History => self.feeds.profits.borrow().is_loading,
            View::About => false,
        }
    }

    /// Error of the current view's feed, if its last cycle failed.
    pub fn current_error(&self) -> Option<FeedError> {
        match self.app.current_view {
            View::Signals => self.feeds.signals.borrow().last_error.clone(),
            View::Positions => self.feeds.positions.borrow().last_error.clone(),
            View::History => self.feeds.profits.borrow().last_error.clone(),
            View::About => None,
        }
    }

    /// The current feed has nothing to show and failed; offer a retry.
    pub fn current_needs_retry(&self) -> bool {
        match self.app.current_view {
            View::Signals => self.feeds.signals.borrow().needs_retry(),
            View::Positions => self.feeds.positions.borrow().needs_retry(),
            View::History => self.feeds.profits.borrow().needs_retry(),
            View::About => false,
        }
    }

    /// The last history row is selected and more pages exist.
    pub fn wants_next_page(&self) -> bool {
        if self.app.current_view != View::History {
            return false;
        }
        let profits = self.feeds.profits.borrow();
        profits.has_next_page()
            && !profits.is_empty()
            && self.app.selected_profit == Some(profits.len() - 1)
    }

    /// Summary under the cursor in the history view.
    pub fn selected_profit(&self) -> Option<ProfitSummary> {
        let index = self.app.selected_profit?;
        self.feeds.profits.borrow().items.get(index).cloned()
    }

    fn scroll(&mut self, delta: isize) {
        self.select_row(|len, current| match current {
            None => 0,
            Some(index) => index.saturating_add_signed(delta).min(len - 1),
        });
    }

    /// Move the selection of the current list. `pick` gets the non-zero
    /// row count and the current selection.
    fn select_row(&mut self, pick: impl FnOnce(usize, Option<usize>) -> usize) {
        let len = self.current_len();
        let Some(slot) = self.app.selection_mut() else {
            return;
        };
        *slot = (len > 0).then(|| pick(len, *slot));
    }
}
