//! Help panel widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::super::layout::centered_rect;
use crate::config::KeyBindings;
use crate::state::{Store, View};

/// Help panel showing keybindings.
pub struct HelpPanel;

impl HelpPanel {
    /// Render the help panel.
    pub fn render(frame: &mut Frame, area: Rect, keys: &KeyBindings) {
        let popup_area = centered_rect(60, 80, area);

        // Clear the area behind the popup
        frame.render_widget(Clear, popup_area);

        let mut help_text = section("Navigation");
        help_text.extend([
            binding(&format!("{}/↓", keys.down), "Move down"),
            binding(&format!("{}/↑", keys.up), "Move up"),
            binding("g/G", "Go to top/bottom"),
            binding("PgUp/PgDn", "Page up/down"),
            binding(&format!("Tab/{}/{}", keys.left, keys.right), "Switch tabs"),
            binding(&keys.select, "Open order log (History)"),
            binding(&keys.back, "Close panel"),
            Line::from(""),
        ]);

        help_text.extend(section("Views"));
        help_text.extend([
            binding(&keys.signals, "Signals"),
            binding(&keys.positions, "Positions"),
            binding(&keys.history, "History"),
            binding(&keys.about, "About"),
            Line::from(""),
        ]);

        help_text.extend(section("Actions"));
        help_text.extend([
            binding(&keys.refresh, "Reconnect and retry"),
            binding(&keys.debug, "Toggle fixture data (debug)"),
            binding(&keys.help, "Toggle help"),
            binding(&keys.quit, "Quit"),
        ]);

        let help = Paragraph::new(help_text)
            .block(
                Block::default()
                    .title(" Help ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().fg(Color::White));

        frame.render_widget(help, popup_area);
    }
}

/// One-line key hints for the current view.
pub struct HelpBar;

impl HelpBar {
    pub fn render(frame: &mut Frame, area: Rect, store: &Store, keys: &KeyBindings) {
        let mut hints = vec![
            (keys.quit.as_str(), "quit"),
            (keys.help.as_str(), "help"),
            (keys.refresh.as_str(), "retry"),
            (keys.debug.as_str(), "debug"),
        ];
        if store.app.current_view == View::History {
            hints.push((keys.select.as_str(), "order log"));
        }

        let spans: Vec<Span> = hints
            .into_iter()
            .flat_map(|(key, action)| {
                [
                    Span::styled(format!(" {key} "), Style::default().fg(Color::Cyan)),
                    Span::styled(format!("{action} "), Style::default().fg(Color::DarkGray)),
                ]
            })
            .collect();

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn section(title: &str) -> Vec<Line<'static>> {
    vec![
        Line::from(vec![Span::styled(
            title.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
    ]
}

fn binding(key: &str, description: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {key:<12}"), Style::default().fg(Color::Cyan)),
        Span::raw(description.to_string()),
    ])
}
