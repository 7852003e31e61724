//! Profit history: per-period summaries and intraday order logs.

use super::Position;
use crate::decode::{Decode, DecodeError, Fields};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Aggregated results for one period (one trading day by default).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitSummary {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub profit: f64,
    pub trade_count: u64,
    /// Fraction of winning trades, 0.0 to 1.0.
    pub win_rate: f64,
    pub winning_trades: u64,
    pub losing_trades: u64,
}

impl ProfitSummary {
    pub fn is_profitable(&self) -> bool {
        self.profit >= 0.0
    }

    /// "1 trade" / "12 trades • 67% win rate"
    pub fn trade_label(&self) -> String {
        let label = if self.trade_count == 1 {
            "1 trade".to_string()
        } else {
            format!("{} trades", self.trade_count)
        };

        if self.win_rate > 0.0 {
            format!("{label} • {:.0}% win rate", self.win_rate * 100.0)
        } else {
            label
        }
    }
}

impl Decode for ProfitSummary {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::of(value, "ProfitSummary")?;
        Ok(Self {
            id: fields.id(&["id"]),
            start_time: fields.timestamp(&["start_time"]),
            end_time: fields.timestamp(&["end_time"]),
            profit: fields.f64_or(&["profit"], 0.0),
            trade_count: fields.u64_or(&["trade_count"], 0),
            win_rate: fields.f64_or(&["win_rate"], 0.0),
            winning_trades: fields.u64_or(&["winning_trades"], 0),
            losing_trades: fields.u64_or(&["losing_trades"], 0),
        })
    }
}

/// One equity sample inside a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitLog {
    pub time: DateTime<Utc>,
    pub equity: f64,
    pub invested: f64,
    pub running_positions: u64,
}

impl Decode for ProfitLog {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::of(value, "ProfitLog")?;
        Ok(Self {
            time: fields.timestamp(&["time"]),
            equity: fields.f64_or(&["equity"], 0.0),
            invested: fields.f64_or(&["invested"], 0.0),
            running_positions: fields.u64_or(&["running_positions"], 0),
        })
    }
}

/// Detail for one day: its summary, equity samples and closed orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLog {
    pub profit: ProfitSummary,
    pub log: Vec<ProfitLog>,
    pub orders: Vec<Position>,
}

impl OrderLog {
    /// Lowest and highest equity sample.
    pub fn equity_range(&self) -> Option<(f64, f64)> {
        let mut equities = self.log.iter().map(|entry| entry.equity);
        let first = equities.next()?;
        Some(equities.fold((first, first), |(lo, hi), e| (lo.min(e), hi.max(e))))
    }

    pub fn max_invested(&self) -> Option<f64> {
        self.log.iter().map(|entry| entry.invested).reduce(f64::max)
    }

    /// Order with the largest realized profit.
    pub fn best_order(&self) -> Option<&Position> {
        self.orders
            .iter()
            .max_by(|a, b| a.profit.total_cmp(&b.profit))
    }
}

impl Decode for OrderLog {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::of(value, "OrderLog")?;
        Ok(Self {
            profit: ProfitSummary::decode(fields.require(&["profit"])?)?,
            log: fields.list(&["log"])?,
            orders: fields.list(&["orders"])?,
        })
    }
}
