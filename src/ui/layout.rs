//! Layout management for the TUI.

use crate::config::UiConfig;
use ratatui::layout::{Constraint, Direction, Layout as RatatuiLayout, Rect};

/// UI layout areas.
pub struct Layout {
    /// Status bar area (top). Zero height when hidden.
    pub status_area: Rect,
    /// Tab bar area.
    pub tab_area: Rect,
    /// Main content area.
    pub main_area: Rect,
    /// Key hint line (bottom). Zero height when hidden.
    pub help_bar_area: Rect,
    /// Notification area (overlaid).
    pub notification_area: Rect,
}

impl Layout {
    /// Split the terminal area, leaving out the bars `ui` disables.
    pub fn new(area: Rect, ui: &UiConfig) -> Self {
        let [status_area, tab_area, main_area, help_bar_area] = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(ui.show_status_bar.into()),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(ui.show_help_bar.into()),
            ])
            .areas(area);

        // Notification area is centered in the main area
        let notification_area = Rect {
            x: area.x + area.width / 4,
            y: area.y + (area.height / 2).saturating_sub(2),
            width: area.width / 2,
            height: 4.min(area.height),
        };

        Self {
            status_area,
            tab_area,
            main_area,
            help_bar_area,
            notification_area,
        }
    }
}

/// Create a centered popup area.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = RatatuiLayout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    RatatuiLayout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiny_terminal_does_not_underflow() {
        let layout = Layout::new(Rect::new(0, 0, 10, 3), &UiConfig::default());
        assert_eq!(layout.notification_area.y, 0);
        assert_eq!(layout.notification_area.height, 3);
    }

    #[test]
    fn test_hidden_bars_give_space_to_main_area() {
        let area = Rect::new(0, 0, 80, 24);
        let ui = UiConfig {
            show_status_bar: false,
            show_help_bar: false,
            ..UiConfig::default()
        };
        let layout = Layout::new(area, &ui);
        assert_eq!(layout.status_area.height, 0);
        assert_eq!(layout.help_bar_area.height, 0);
        assert_eq!(layout.tab_area.y, 0);
        assert_eq!(layout.main_area.height, 23);

        let layout = Layout::new(area, &UiConfig::default());
        assert_eq!(layout.main_area.height, 21);
    }
}
