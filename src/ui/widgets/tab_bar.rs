//! Tab bar widget.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
};

use crate::state::{Store, View};

/// One tab per view, with a badge while fixture data is shown.
pub struct TabBar;

impl TabBar {
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let [tabs_area, badge_area] = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(8)])
            .areas(area);

        let titles = View::ALL.iter().map(|view| {
            Line::from(vec![
                Span::styled(
                    format!("{} ", view.index() + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(view.title()),
            ])
        });

        let tabs = Tabs::new(titles)
            .select(store.app.current_view.index())
            .style(Style::default().fg(Color::White))
            .highlight_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )
            .divider(Span::styled("│", Style::default().fg(Color::DarkGray)));
        frame.render_widget(tabs, tabs_area);

        if store.app.debug_mode {
            let badge = Paragraph::new(Span::styled(
                " DEBUG ",
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ));
            frame.render_widget(badge, badge_area);
        }
    }
}
