//! Main application module.
//!
//! This module contains the main `App` struct that coordinates
//! the event loop, state management, feed lifecycle and rendering.

mod feeds;

pub use feeds::Feeds;

use crate::api::GraphQlClient;
use crate::config::{Config, Preferences};
use crate::error::{Error, Result};
use crate::events::EventHandler;
use crate::feed::{DebugFlag, Reachability};
use crate::state::{Action, AppState, Notification, Store, View};
use crate::ui::Ui;

use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// The main application.
pub struct App {
    /// Terminal.
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Application store.
    store: Store,
    /// Event handler.
    event_handler: EventHandler,
    /// Feeds and their pollers.
    feeds: Feeds,
    /// Shared debug switch read by every fetcher.
    debug: DebugFlag,
    /// Result of the last connectivity check, mirrored into the store.
    reachability: Reachability,
    /// Persisted choices and where they live.
    preferences: Preferences,
    preferences_path: Option<PathBuf>,
    /// Whether the terminal has focus.
    focused: bool,
    /// When the current notification appeared.
    notification_shown: Option<Instant>,
    /// Configuration.
    config: Config,
}

impl App {
    /// Create a new application.
    pub async fn new(config: Config) -> Result<Self> {
        let preferences_path = Preferences::default_path()
            .inspect_err(|e| tracing::warn!("Preferences disabled: {}", e))
            .ok();
        let preferences = preferences_path
            .as_deref()
            .map(Preferences::load)
            .unwrap_or_default();

        let client = GraphQlClient::new(config.api.clone())?;
        let debug = DebugFlag::new(preferences.debug_mode);
        let reachability = Reachability::default();
        let feeds = Feeds::new(
            Arc::new(client),
            &config.feeds,
            debug.clone(),
            reachability.clone(),
        );

        let app_state = AppState::new(
            View::from_index(preferences.selected_tab),
            preferences.debug_mode,
        );
        let mut store = Store::new(app_state, feeds.receivers());
        let mut notification_shown = None;
        if preferences_path.is_none() {
            store.reduce(Action::ShowNotification(Notification::warning(
                "No data directory: settings will not be saved",
            )));
            notification_shown = Some(Instant::now());
        }

        let event_handler = EventHandler::new(
            config.keybindings.clone(),
            Duration::from_millis(config.ui.tick_rate_ms),
        );

        // Set up terminal
        enable_raw_mode().map_err(|e| Error::terminal(format!("cannot enable raw mode: {e}")))?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableFocusChange
        )
        .map_err(|e| Error::terminal(format!("cannot enter alternate screen: {e}")))?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            terminal,
            store,
            event_handler,
            feeds,
            debug,
            reachability,
            preferences,
            preferences_path,
            focused: true,
            notification_shown,
            config,
        })
    }

    /// Run the application event loop.
    pub async fn run(&mut self) -> Result<()> {
        // Initial connection test
        self.feeds.check_connection().await;
        self.feeds.activate(self.store.app.current_view);

        // Main event loop
        loop {
            self.sync_connection();
            self.expire_notification();

            // Render UI
            self.terminal.draw(|frame| {
                Ui::render(frame, &self.store, &self.config);
            })?;

            // Handle terminal events; times out after a tick so feed updates get drawn
            if let Some(action) = self.event_handler.next().await? {
                self.handle_action(action);
            }

            // Check if we should quit
            if self.store.app.should_quit {
                break;
            }
        }

        self.feeds.deactivate();
        Ok(())
    }

    /// Checks run in background tasks; reflect their latest result.
    fn sync_connection(&mut self) {
        let connected = self.reachability.is_online();
        if self.store.app.connected != connected {
            self.store.reduce(Action::SetConnected(connected));
        }
    }

    /// Handle an action.
    fn handle_action(&mut self, action: Action) {
        let view_before = self.store.app.current_view;

        match &action {
            Action::Refresh => self.retry_current(),
            Action::LoadNextPage => self.feeds.load_next_page(),
            Action::FocusLost => {
                if self.focused {
                    self.focused = false;
                    self.feeds.deactivate();
                }
            }
            Action::FocusGained => {
                if !self.focused {
                    self.focused = true;
                    self.feeds.activate(self.store.app.current_view);
                }
            }
            Action::ShowNotification(_) => self.notification_shown = Some(Instant::now()),
            _ => {}
        }

        self.store.reduce(action.clone());

        match action {
            Action::SetView(_) | Action::NextView | Action::PrevView
                if self.store.app.current_view != view_before =>
            {
                self.switch_view();
            }
            Action::ScrollDown | Action::PageDown | Action::GoToBottom
                if self.store.wants_next_page() =>
            {
                self.feeds.load_next_page();
            }
            Action::Select if self.store.app.show_order_log => {
                if let Some(summary) = self.store.selected_profit() {
                    self.feeds.load_order_log(summary.start_time.date_naive());
                }
            }
            Action::ToggleDebug => self.apply_debug_mode(),
            _ => {}
        }
    }

    /// Stop the hidden view's polling and start the visible one's.
    fn switch_view(&mut self) {
        let view = self.store.app.current_view;
        self.feeds.deactivate();
        if self.focused {
            self.feeds.activate(view);
        }
        if !self.store.app.connected {
            self.retry_current();
        }

        self.preferences.selected_tab = view.index();
        self.save_preferences();
    }

    /// Check the backend, then retry the visible feed.
    fn retry_current(&self) {
        tokio::spawn(self.feeds.retry(self.store.app.current_view));
    }

    fn apply_debug_mode(&mut self) {
        let enabled = self.store.app.debug_mode;
        self.debug.set(enabled);
        tracing::info!(enabled, "Debug mode toggled");

        self.preferences.debug_mode = enabled;
        self.save_preferences();

        let message = if enabled {
            "Debug mode on: showing fixture data"
        } else {
            "Debug mode off: showing live data"
        };
        self.notify(Notification::info(message));

        tokio::spawn(self.feeds.retry(self.store.app.current_view));
    }

    fn save_preferences(&mut self) {
        let Some(path) = &self.preferences_path else {
            return;
        };
        if let Err(e) = self.preferences.save(path) {
            tracing::warn!(error = %e, "Failed to save preferences");
            self.store
                .reduce(Action::SetError(format!("Could not save preferences: {e}")));
        }
    }

    fn notify(&mut self, notification: Notification) {
        self.notification_shown = Some(Instant::now());
        self.store.reduce(Action::ShowNotification(notification));
    }

    fn expire_notification(&mut self) {
        let expired = match (&self.store.app.notification, self.notification_shown) {
            (Some(n), Some(shown)) => shown.elapsed() >= Duration::from_secs(n.duration_secs),
            _ => false,
        };
        if expired {
            self.notification_shown = None;
            self.store.reduce(Action::DismissNotification);
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        // Restore terminal state
        let _ = disable_raw_mode();
        let _ = execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableFocusChange
        );
        let _ = self.terminal.show_cursor();
    }
}
