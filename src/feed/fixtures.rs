//! Local data served while debug mode is on.

use super::FeedRecord;
use crate::api::Page;
use crate::state::{
    Metric, OrderLog, PageCursor, Position, ProfitLog, ProfitSummary, Signal, SignalType, Symbol,
};
use chrono::{DateTime, Utc};

/// 2025-11-10 14:30:00 UTC, market open of the first fixture day.
const FIXTURE_EPOCH: i64 = 1_762_785_000;
const DAY: i64 = 86_400;

fn at(offset_secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(FIXTURE_EPOCH + offset_secs, 0).unwrap_or_default()
}

fn oversold_metrics() -> Vec<Metric> {
    vec![
        Metric::new("RSI (14)", 34.2),
        Metric::new("BB Proximity", 0.95),
        Metric::new("Volume Ratio", 1.8),
    ]
}

fn rotation_metrics() -> Vec<Metric> {
    vec![
        Metric::new("RSI (14)", 62.1),
        Metric::new("Rotation Δ", 0.34),
        Metric::new("Volume Ratio", 0.9),
    ]
}

fn signal(id: &str, symbol: Symbol, confidence: f64, kind: SignalType, metrics: Vec<Metric>) -> Signal {
    Signal {
        id: id.to_string(),
        ..Signal::new(symbol, confidence, kind, metrics)
    }
}

impl FeedRecord for Signal {
    const FIELDS: &'static [&'static str] = &["signals"];

    fn fixtures() -> Vec<Self> {
        vec![
            signal(
                "tqqq",
                Symbol::new("TQQQ", "ProShares Ultra QQQ", Some(102.2)),
                0.87,
                SignalType::StrongBuy,
                oversold_metrics(),
            ),
            signal(
                "spy",
                Symbol::new("SPY", "SPDR S&P 500 ETF Trust", Some(603.05)),
                0.42,
                SignalType::Hold,
                rotation_metrics(),
            ),
            signal(
                "qqq",
                Symbol::new("QQQ", "Invesco QQQ Trust", None),
                0.65,
                SignalType::Buy,
                oversold_metrics(),
            ),
            signal(
                "aapl",
                Symbol::new("AAPL", "Apple Inc.", None),
                0.33,
                SignalType::Sell,
                rotation_metrics(),
            ),
        ]
    }
}

impl FeedRecord for Position {
    const FIELDS: &'static [&'static str] = &["Positions", "positions"];

    fn fixtures() -> Vec<Self> {
        let tqqq = Position {
            signal: Signal::fixtures().into_iter().next(),
            stop_loss: Some(97.5),
            take_profit: Some(110.0),
            annotation: Some("Oversold bounce off lower band".to_string()),
            created_at: at(3 * DAY + 5_400),
            duration: 95,
            ..Position::new(
                "pos-tqqq",
                Symbol::new("TQQQ", "ProShares Ultra QQQ", Some(102.2)),
                150.0,
                99.85,
            )
        };

        let spy = Position {
            stop_loss: Some(595.0),
            created_at: at(3 * DAY + 1_800),
            duration: 240,
            ..Position::new(
                "pos-spy",
                Symbol::new("SPY", "SPDR S&P 500 ETF Trust", Some(603.05)),
                20.0,
                605.4,
            )
        };

        vec![tqqq, spy]
    }
}

fn summary(day: i64, profit: f64, winning: u64, losing: u64) -> ProfitSummary {
    let trades = winning + losing;
    ProfitSummary {
        id: at(day * DAY).format("%Y-%m-%d").to_string(),
        start_time: at(day * DAY),
        end_time: at(day * DAY + 23_400),
        profit,
        trade_count: trades,
        win_rate: if trades == 0 {
            0.0
        } else {
            winning as f64 / trades as f64
        },
        winning_trades: winning,
        losing_trades: losing,
    }
}

impl FeedRecord for ProfitSummary {
    const FIELDS: &'static [&'static str] = &["Profits", "profits"];

    fn fixtures() -> Vec<Self> {
        vec![
            summary(3, 412.35, 8, 4),
            summary(2, -128.4, 2, 3),
            summary(1, 57.1, 1, 0),
            summary(0, 0.0, 0, 0),
        ]
    }

    fn fixture_page() -> Page<Self> {
        let items = Self::fixtures();
        Page {
            cursor: Some(PageCursor {
                start_cursor: items.first().map(|p| p.id.clone()),
                end_cursor: items.last().map(|p| p.id.clone()),
                has_next_page: false,
                has_previous_page: false,
            }),
            items,
        }
    }
}

impl FeedRecord for OrderLog {
    const FIELDS: &'static [&'static str] = &["OrderLog", "orderLog"];

    fn fixtures() -> Vec<Self> {
        let day = 3 * DAY;
        let log = [
            (0, 25_000.0, 0.0, 0),
            (3_600, 25_140.5, 14_977.5, 1),
            (7_200, 25_262.8, 27_085.5, 2),
            (14_400, 25_301.0, 12_108.0, 1),
            (23_400, 25_412.35, 0.0, 0),
        ]
        .into_iter()
        .map(|(offset, equity, invested, running_positions)| ProfitLog {
            time: at(day + offset),
            equity,
            invested,
            running_positions,
        })
        .collect();

        let orders = Position::fixtures()
            .into_iter()
            .zip([318.6, 93.75])
            .map(|(position, profit)| Position {
                profit,
                ..position
            })
            .collect();

        vec![OrderLog {
            profit: summary(3, 412.35, 8, 4),
            log,
            orders,
        }]
    }
}
