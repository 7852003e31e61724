//! Profit history widget.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
};

use super::{header_cell, pnl_style, render_loading, row_style, signed_dollars};
use crate::state::Store;

/// Profit history widget.
///
/// Paging is driven by the app: selecting the last row while the feed
/// reports more pages requests the next one.
pub struct ProfitList;

impl ProfitList {
    /// Render the profit history.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let feed = store.feeds.profits.borrow();

        let header = Row::new(["Date", "Profit", "Trades", "W / L"].map(header_cell))
            .height(1)
            .bottom_margin(1);

        let rows = feed.items.iter().enumerate().map(|(i, summary)| {
            let selected = store.app.selected_profit == Some(i);
            Row::new(vec![
                Cell::from(summary.start_time.format("%a %Y-%m-%d").to_string()),
                Cell::from(signed_dollars(summary.profit)).style(pnl_style(summary.profit)),
                Cell::from(summary.trade_label()),
                Cell::from(format!(
                    "{} / {}",
                    summary.winning_trades, summary.losing_trades
                )),
            ])
            .style(row_style(selected))
            .height(1)
        });

        let total: f64 = feed.items.iter().map(|s| s.profit).sum();
        let more = if feed.has_next_page() { "+" } else { "" };
        let table = Table::new(
            rows,
            [
                Constraint::Length(16),
                Constraint::Length(12),
                Constraint::Min(24),
                Constraint::Length(10),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .title(format!(
                    " History ({}{more}) | Total: {} ",
                    feed.len(),
                    signed_dollars(total)
                ))
                .title_bottom(" Enter: order log ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▶ ");

        let mut state = TableState::default();
        state.select(store.app.selected_profit);

        frame.render_stateful_widget(table, area, &mut state);

        if feed.is_loading {
            let label = if feed.is_empty() {
                "Loading..."
            } else {
                "Loading more..."
            };
            render_loading(frame, area, label);
        }
    }
}
