//! Order log detail panel for one history day.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Sparkline, Table},
};

use super::super::layout::centered_rect;
use super::{header_cell, pnl_style, signed_dollars};
use crate::state::{OrderLog, Store};

/// Order log overlay for the selected history row.
pub struct OrderLogPanel;

impl OrderLogPanel {
    /// Render the panel over `area`.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let popup_area = centered_rect(80, 80, area);
        frame.render_widget(Clear, popup_area);

        let feed = store.feeds.order_log.borrow();
        let title = store
            .selected_profit()
            .map(|p| format!(" Order Log | {} ", p.start_time.format("%Y-%m-%d")))
            .unwrap_or_else(|| " Order Log ".to_string());
        let block = Block::default()
            .title(title)
            .title_bottom(" Esc: close ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let Some(log) = feed.items.first() else {
            let message = if feed.is_loading {
                Span::styled("Loading...", Style::default().fg(Color::Yellow))
            } else if let Some(err) = &feed.last_error {
                Span::styled(format!("✗ {err}"), Style::default().fg(Color::Red))
            } else {
                Span::styled("No orders for this day", Style::default().fg(Color::DarkGray))
            };
            frame.render_widget(Paragraph::new(Line::from(message)), inner);
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Summary
                Constraint::Length(5), // Equity sparkline
                Constraint::Min(0),    // Orders
            ])
            .split(inner);

        render_summary(frame, chunks[0], log);
        render_equity(frame, chunks[1], log);
        render_orders(frame, chunks[2], log);
    }
}

fn render_summary(frame: &mut Frame, area: Rect, log: &OrderLog) {
    let profit = log.profit.profit;
    let mut lines = vec![Line::from(vec![
        Span::styled("Profit ", Style::default().fg(Color::DarkGray)),
        Span::styled(signed_dollars(profit), pnl_style(profit).add_modifier(Modifier::BOLD)),
        Span::raw("   "),
        Span::raw(log.profit.trade_label()),
    ])];

    let mut detail = Vec::new();
    if let Some((low, high)) = log.equity_range() {
        detail.push(Span::styled("Equity ", Style::default().fg(Color::DarkGray)));
        detail.push(Span::raw(format!("${low:.2} – ${high:.2}   ")));
    }
    if let Some(invested) = log.max_invested() {
        detail.push(Span::styled("Max invested ", Style::default().fg(Color::DarkGray)));
        detail.push(Span::raw(format!("${invested:.2}")));
    }
    lines.push(Line::from(detail));

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_equity(frame: &mut Frame, area: Rect, log: &OrderLog) {
    let data = equity_bars(log);
    let sparkline = Sparkline::default()
        .block(Block::default().title(" Equity ").borders(Borders::TOP))
        .data(&data)
        .style(Style::default().fg(Color::Cyan));
    frame.render_widget(sparkline, area);
}

/// Equity samples shifted so the lowest sits at 1, in cents.
fn equity_bars(log: &OrderLog) -> Vec<u64> {
    let Some((low, _)) = log.equity_range() else {
        return Vec::new();
    };
    log.log
        .iter()
        .map(|entry| ((entry.equity - low) * 100.0).round() as u64 + 1)
        .collect()
}

fn render_orders(frame: &mut Frame, area: Rect, log: &OrderLog) {
    let best = log.best_order().map(|o| o.id.as_str());
    let header = Row::new(["Symbol", "Qty", "Price", "Opened", "Held", "Profit"].map(header_cell))
        .height(1);

    let rows = log.orders.iter().map(|order| {
        let marker = if Some(order.id.as_str()) == best { " ★" } else { "" };
        Row::new(vec![
            Cell::from(format!("{}{marker}", order.symbol.ticker)),
            Cell::from(format!("{:.2}", order.quantity)),
            Cell::from(format!("${:.2}", order.price)),
            Cell::from(order.created_at.format("%H:%M").to_string()),
            Cell::from(format!("{}m", order.duration)),
            Cell::from(signed_dollars(order.profit)).style(pnl_style(order.profit)),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(10),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(format!(" Orders ({}) ", log.orders.len()))
            .borders(Borders::TOP),
    );

    frame.render_widget(table, area);
}
