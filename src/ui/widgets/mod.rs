//! TUI widgets.

mod about;
mod help;
mod notifications;
mod order_log;
mod position_list;
mod profit_list;
mod signal_list;
mod status_bar;
mod tab_bar;

pub use about::AboutPanel;
pub use help::{HelpBar, HelpPanel};
pub use notifications::{render_error, render_feed_error, render_notification};
pub use order_log::OrderLogPanel;
pub use position_list::PositionList;
pub use profit_list::ProfitList;
pub use signal_list::SignalList;
pub use status_bar::StatusBar;
pub use tab_bar::TabBar;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Cell, Paragraph},
};

fn header_cell(title: &str) -> Cell<'_> {
    Cell::from(title).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
}

fn row_style(selected: bool) -> Style {
    if selected {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

/// Green for gains, red for losses.
fn pnl_style(value: f64) -> Style {
    if value >= 0.0 {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Red)
    }
}

/// "+$12.30" / "-$4.00"
fn signed_dollars(value: f64) -> String {
    if value >= 0.0 {
        format!("+${value:.2}")
    } else {
        format!("-${:.2}", value.abs())
    }
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

/// Bottom-right "Loading..." marker inside a bordered list.
fn render_loading(frame: &mut Frame, area: Rect, label: &str) {
    let loading = Line::from(vec![Span::styled(
        label.to_string(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::ITALIC),
    )]);

    let inner = Block::bordered().inner(area);
    let width = (label.chars().count() as u16 + 2).min(inner.width);
    if inner.height == 0 || width == 0 {
        return;
    }

    let loading_area = Rect {
        x: inner.x + inner.width - width,
        y: inner.y + inner.height - 1,
        width,
        height: 1,
    };

    frame.render_widget(Paragraph::new(loading), loading_area);
}
