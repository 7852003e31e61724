//! UI rendering using ratatui.
//!
//! Rendering is a pure function of the [`Store`]: feed widgets borrow the
//! latest published feed state and never trigger fetches themselves.

mod layout;
mod widgets;

pub use layout::Layout;
pub use widgets::{
    AboutPanel, HelpBar, HelpPanel, OrderLogPanel, PositionList, ProfitList, SignalList, StatusBar, TabBar,
};

use crate::config::Config;
use crate::state::{Store, View};
use ratatui::Frame;

/// Main UI renderer.
pub struct Ui;

impl Ui {
    /// Render the entire UI.
    pub fn render(frame: &mut Frame, store: &Store, config: &Config) {
        let layout = Layout::new(frame.area(), &config.ui);

        if config.ui.show_status_bar {
            StatusBar::render(frame, layout.status_area, store);
        }

        TabBar::render(frame, layout.tab_area, store);

        if config.ui.show_help_bar {
            HelpBar::render(frame, layout.help_bar_area, store, &config.keybindings);
        }

        // Render main content based on current view
        match store.app.current_view {
            View::Signals => SignalList::render(frame, layout.main_area, store),
            View::Positions => PositionList::render(frame, layout.main_area, store),
            View::History => {
                ProfitList::render(frame, layout.main_area, store);
                if store.app.show_order_log {
                    OrderLogPanel::render(frame, layout.main_area, store);
                }
            }
            View::About => AboutPanel::render(frame, layout.main_area, store, &config.api.endpoint),
        }

        // A failed feed with nothing cached gets a retry prompt
        if store.current_needs_retry()
            && let Some(error) = store.current_error()
        {
            widgets::render_feed_error(
                frame,
                layout.notification_area,
                &error,
                &config.keybindings.refresh,
            );
        }

        // Render help panel if visible
        if store.app.show_help {
            HelpPanel::render(frame, frame.area(), &config.keybindings);
        }

        // Render notification if present
        if let Some(notification) = &store.app.notification {
            widgets::render_notification(frame, layout.notification_area, notification);
        }

        // Render error if present
        if let Some(error) = &store.app.error {
            widgets::render_error(frame, layout.notification_area, error);
        }
    }
}
