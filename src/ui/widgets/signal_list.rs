//! Signal list widget.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
};

use super::{header_cell, render_loading, row_style, truncate_string};
use crate::state::{Signal, SignalType, Store};

/// Signal list widget.
pub struct SignalList;

impl SignalList {
    /// Render the signal list.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let feed = store.feeds.signals.borrow();

        let header = Row::new(
            ["Symbol", "Name", "Signal", "Confidence", "Price", "Metrics"].map(header_cell),
        )
        .height(1)
        .bottom_margin(1);

        let rows = feed.items.iter().enumerate().map(|(i, signal)| {
            let selected = store.app.selected_signal == Some(i);
            let price = signal
                .symbol
                .price
                .map(|p| format!("${p:.2}"))
                .unwrap_or_else(|| "—".to_string());

            Row::new(vec![
                Cell::from(signal.symbol.ticker.clone())
                    .style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from(truncate_string(&signal.symbol.name, 24)),
                Cell::from(signal.kind.label()).style(kind_style(signal.kind)),
                Cell::from(format!("{:.0}%", signal.confidence_percent())),
                Cell::from(price),
                Cell::from(metrics_summary(signal)),
            ])
            .style(row_style(selected))
            .height(1)
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(8),
                Constraint::Length(26),
                Constraint::Length(12),
                Constraint::Length(11),
                Constraint::Length(10),
                Constraint::Min(20),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .title(format!(" Signals ({}) ", feed.len()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▶ ");

        let mut state = TableState::default();
        state.select(store.app.selected_signal);

        frame.render_stateful_widget(table, area, &mut state);

        if feed.is_loading {
            render_loading(frame, area, "Loading...");
        }
    }
}

fn kind_style(kind: SignalType) -> Style {
    let style = Style::default();
    match kind {
        SignalType::StrongBuy => style.fg(Color::Green).add_modifier(Modifier::BOLD),
        SignalType::Buy => style.fg(Color::Green),
        SignalType::Hold => style.fg(Color::Yellow),
        SignalType::Sell => style.fg(Color::Red),
        SignalType::StrongSell => style.fg(Color::Red).add_modifier(Modifier::BOLD),
    }
}

/// "RSI (14) 34.20 · Volume Ratio 1.80"
fn metrics_summary(signal: &Signal) -> String {
    signal
        .metrics
        .iter()
        .map(|m| format!("{} {:.2}", m.name, m.value))
        .collect::<Vec<_>>()
        .join(" · ")
}
