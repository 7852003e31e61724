//! Position list widget.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
};

use super::{header_cell, pnl_style, render_loading, row_style, signed_dollars};
use crate::state::{Store, total_unrealized_pnl};

/// Position list widget.
pub struct PositionList;

impl PositionList {
    /// Render the position list.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let feed = store.feeds.positions.borrow();
        let positions = &feed.items;

        let header = Row::new(
            [
                "Symbol", "Qty", "Entry", "Current", "P&L", "P&L %", "Stop", "Target", "Opened",
            ]
            .map(header_cell),
        )
        .height(1)
        .bottom_margin(1);

        let rows = positions.iter().enumerate().map(|(i, position)| {
            let selected = store.app.selected_position == Some(i);
            let pnl = position.unrealized_pnl();
            let style = pnl_style(pnl.unwrap_or(0.0));

            let cells = vec![
                Cell::from(position.symbol.ticker.clone())
                    .style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from(format!("{:.2}", position.quantity)),
                Cell::from(format!("${:.2}", position.entry_price())),
                Cell::from(optional_dollars(position.current_price())),
                Cell::from(pnl.map(signed_dollars).unwrap_or_else(|| "—".to_string()))
                    .style(style),
                Cell::from(
                    position
                        .unrealized_pnl_percent()
                        .map(|p| format!("{p:+.1}%"))
                        .unwrap_or_else(|| "—".to_string()),
                )
                .style(style),
                Cell::from(optional_dollars(position.stop_loss)),
                Cell::from(optional_dollars(position.take_profit)),
                Cell::from(position.open_time().format("%m-%d %H:%M").to_string()),
            ];

            Row::new(cells).style(row_style(selected)).height(1)
        });

        let total = total_unrealized_pnl(positions);
        let table = Table::new(
            rows,
            [
                Constraint::Length(8),
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Length(12),
                Constraint::Length(8),
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Min(12),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .title(format!(
                    " Positions ({}) | Unrealized P&L: {} ",
                    positions.len(),
                    signed_dollars(total)
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▶ ");

        let mut state = TableState::default();
        state.select(store.app.selected_position);

        frame.render_stateful_widget(table, area, &mut state);

        if feed.is_loading {
            render_loading(frame, area, "Loading...");
        }
    }
}

fn optional_dollars(value: Option<f64>) -> String {
    value
        .map(|v| format!("${v:.2}"))
        .unwrap_or_else(|| "—".to_string())
}
