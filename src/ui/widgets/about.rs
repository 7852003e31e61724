//! About panel.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::state::Store;

/// Application information.
pub struct AboutPanel;

impl AboutPanel {
    pub fn render(frame: &mut Frame, area: Rect, store: &Store, endpoint: &str) {
        let mode = if store.app.debug_mode {
            Span::styled("fixtures (debug)", Style::default().fg(Color::Magenta))
        } else {
            Span::raw("live")
        };

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Sentio",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("Version {}", env!("CARGO_PKG_VERSION"))),
            Line::from(""),
            Line::from(Span::styled(
                "Trading signals, open positions and profit history",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Endpoint  ", Style::default().fg(Color::DarkGray)),
                Span::raw(endpoint.to_string()),
            ]),
            Line::from(vec![
                Span::styled("Data      ", Style::default().fg(Color::DarkGray)),
                mode,
            ]),
        ];

        let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .title(" About ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

        frame.render_widget(paragraph, area);
    }
}
