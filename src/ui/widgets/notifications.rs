//! Notification rendering.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::error::{FeedError, TransportError};
use crate::state::{Notification, NotificationLevel};

/// Render a notification popup.
pub fn render_notification(frame: &mut Frame, area: Rect, notification: &Notification) {
    frame.render_widget(Clear, area);

    let (border_color, icon) = match notification.level {
        NotificationLevel::Info => (Color::Cyan, "ℹ"),
        NotificationLevel::Warning => (Color::Yellow, "⚠"),
    };

    let content = Line::from(vec![
        Span::styled(format!("{} ", icon), Style::default().fg(border_color)),
        Span::raw(&notification.message),
    ]);

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color)),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, area);
}

/// Render an error popup.
pub fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    frame.render_widget(Clear, area);

    let content = Line::from(vec![
        Span::styled(
            "✗ Error: ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::raw(error),
    ]);

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, area);
}

/// Render a failed, empty feed with a retry affordance.
pub fn render_feed_error(frame: &mut Frame, area: Rect, error: &FeedError, retry_key: &str) {
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!("✗ {}: ", headline(error)),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::raw(error.to_string()),
        ]),
        Line::from(Span::styled(
            retry_hint(error, retry_key),
            Style::default().fg(Color::Yellow),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, area);
}

fn retry_hint(error: &FeedError, retry_key: &str) -> String {
    if error.is_retryable() {
        format!("Press {retry_key} to retry")
    } else {
        format!("Retrying is unlikely to help; press {retry_key} to try anyway")
    }
}

fn headline(error: &FeedError) -> &'static str {
    match error {
        FeedError::Http { .. } => "Server error",
        FeedError::Transport(TransportError::TimedOut) => "Timed out",
        FeedError::Transport(TransportError::CannotConnect(_)) => "Cannot connect",
        FeedError::Transport(TransportError::Offline) => "Offline",
        FeedError::Transport(_) => "Network error",
        FeedError::Decode(_) => "Unexpected response",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headline_distinguishes_transport_kinds() {
        assert_eq!(
            headline(&FeedError::Transport(TransportError::TimedOut)),
            "Timed out"
        );
        assert_eq!(
            headline(&FeedError::Transport(TransportError::CannotConnect("x".into()))),
            "Cannot connect"
        );
        assert_eq!(headline(&FeedError::Http { status: 500 }), "Server error");
    }

    #[test]
    fn test_retry_hint_follows_retryability() {
        assert_eq!(
            retry_hint(&FeedError::Http { status: 503 }, "r"),
            "Press r to retry"
        );
        assert!(retry_hint(&FeedError::Decode("bad".into()), "r").contains("unlikely"));
    }
}
