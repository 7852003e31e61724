//! Open positions.

use super::{Signal, Symbol};
use crate::decode::{Decode, DecodeError, Fields};
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A position held (or closed, inside an order log) in one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub id: String,
    pub symbol: Symbol,
    /// Signal that opened the position, when the backend links one.
    pub signal: Option<Signal>,
    pub quantity: f64,
    /// Fill price.
    pub price: f64,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    pub annotation: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Realized profit for closed orders.
    pub profit: f64,
    /// Holding time in minutes.
    pub duration: u64,
}

impl Position {
    pub fn new(id: impl Into<String>, symbol: Symbol, quantity: f64, price: f64) -> Self {
        Self {
            id: id.into(),
            symbol,
            signal: None,
            quantity,
            price,
            stop_loss: None,
            take_profit: None,
            annotation: None,
            created_at: Utc::now(),
            profit: 0.0,
            duration: 0,
        }
    }

    pub fn current_price(&self) -> Option<f64> {
        self.symbol.price
    }

    /// Unrealized PnL at the symbol's current price.
    pub fn unrealized_pnl(&self) -> Option<f64> {
        self.current_price()
            .map(|current| (current - self.price) * self.quantity)
    }

    pub fn unrealized_pnl_percent(&self) -> Option<f64> {
        if self.price == 0.0 {
            return None;
        }
        self.current_price()
            .map(|current| (current - self.price) / self.price * 100.0)
    }

    /// When the position was opened, derived from the close time and duration.
    ///
    /// Falls back to `created_at` when the duration is out of range.
    pub fn open_time(&self) -> DateTime<Utc> {
        i64::try_from(self.duration)
            .ok()
            .and_then(TimeDelta::try_minutes)
            .and_then(|held| self.created_at.checked_sub_signed(held))
            .unwrap_or(self.created_at)
    }

    /// Entry price of a closed order, reconstructed from its profit.
    pub fn entry_price(&self) -> f64 {
        if self.profit == 0.0 || self.quantity == 0.0 {
            0.0
        } else {
            self.price - self.profit / self.quantity
        }
    }

    pub fn is_profitable(&self) -> bool {
        self.unrealized_pnl().is_some_and(|pnl| pnl > 0.0)
    }
}

/// Sum of unrealized PnL over positions with a known current price.
pub fn total_unrealized_pnl(positions: &[Position]) -> f64 {
    positions.iter().filter_map(Position::unrealized_pnl).sum()
}

impl Decode for Position {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::of(value, "Position")?;

        let symbol = fields
            .get(&["symbol"])
            .and_then(Symbol::decode_object_or_ticker)
            .unwrap_or_else(Symbol::placeholder);

        Ok(Self {
            id: fields.id(&["id"]),
            symbol,
            signal: fields.nested(&["signal"]),
            quantity: fields.f64_or(&["quantity"], 0.0),
            price: fields.f64_or(&["price"], 0.0),
            stop_loss: fields.opt_f64(&["stop_loss"]),
            take_profit: fields.opt_f64(&["take_profit"]),
            annotation: fields.opt_string(&["annotation"]),
            created_at: fields.timestamp(&["created_at"]),
            profit: fields.f64_or(&["profit"], 0.0),
            duration: fields.u64_or(&["duration"], 0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_decode_full_position() {
        let position = Position::decode(&json!({
            "id": "p-1",
            "symbol": {"ticker": "TQQQ", "name": "ProShares", "price": "105.0"},
            "quantity": "10",
            "price": 100,
            "stop_loss": 98.5,
            "take_profit": "104",
            "annotation": "breakout",
            "created_at": "2025-10-27 14:30:00",
            "profit": "12.5",
            "duration": "45"
        }))
        .unwrap();

        assert_eq!(position.id, "p-1");
        assert_eq!(position.quantity, 10.0);
        assert_eq!(position.price, 100.0);
        assert_eq!(position.stop_loss, Some(98.5));
        assert_eq!(position.take_profit, Some(104.0));
        assert_eq!(position.annotation.as_deref(), Some("breakout"));
        assert_eq!(
            position.created_at,
            Utc.with_ymd_and_hms(2025, 10, 27, 14, 30, 0).unwrap()
        );
        assert_eq!(position.duration, 45);
        assert_eq!(position.unrealized_pnl(), Some(50.0));
        assert_eq!(position.unrealized_pnl_percent(), Some(5.0));
    }

    #[test]
    fn test_sparse_position_uses_defaults() {
        let before = Utc::now();
        let position = Position::decode(&json!({"symbol": "SPY"})).unwrap();

        assert!(!position.id.is_empty());
        assert_eq!(position.symbol, Symbol::from_ticker("SPY"));
        assert_eq!(position.quantity, 0.0);
        assert_eq!(position.price, 0.0);
        assert_eq!(position.stop_loss, None);
        assert!(position.signal.is_none());
        assert!(position.created_at >= before);
        assert_eq!(position.unrealized_pnl(), None);
        assert_eq!(position.unrealized_pnl_percent(), None);
    }

    #[test]
    fn test_missing_symbol_uses_placeholder() {
        let position = Position::decode(&json!({"id": 3, "quantity": 1})).unwrap();
        assert_eq!(position.id, "3");
        assert_eq!(position.symbol, Symbol::placeholder());
    }

    #[test]
    fn test_malformed_nested_signal_is_dropped() {
        let position = Position::decode(&json!({
            "symbol": "QQQ",
            "signal": {"confidence": 0.4}
        }))
        .unwrap();
        assert!(position.signal.is_none());

        let linked = Position::decode(&json!({
            "symbol": "QQQ",
            "signal": {"symbol": "QQQ", "type": "buy"}
        }))
        .unwrap();
        assert_eq!(linked.signal.map(|s| s.kind), Some(super::super::SignalType::Buy));
    }

    #[test]
    fn test_total_unrealized_pnl_skips_unpriced() {
        let priced = Position::new("a", Symbol::new("A", "", Some(12.0)), 2.0, 10.0);
        let unpriced = Position::new("b", Symbol::from_ticker("B"), 5.0, 10.0);
        let losing = Position::new("c", Symbol::new("C", "", Some(9.0)), 1.0, 10.0);

        assert_eq!(total_unrealized_pnl(&[priced, unpriced, losing.clone()]), 3.0);
        assert!(!losing.is_profitable());
    }

    #[test]
    fn test_closed_order_derivations() {
        let mut order = Position::new("o", Symbol::from_ticker("TNA"), 10.0, 33.0);
        order.profit = 20.0;
        order.duration = 90;
        order.created_at = Utc.with_ymd_and_hms(2025, 11, 12, 15, 0, 0).unwrap();

        assert_eq!(order.entry_price(), 31.0);
        assert_eq!(
            order.open_time(),
            Utc.with_ymd_and_hms(2025, 11, 12, 13, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_open_time_with_huge_duration_falls_back_to_created_at() {
        for duration in ["200000000000000", "18446744073709551615"] {
            let position =
                Position::decode(&json!({"symbol": "A", "duration": duration})).unwrap();
            assert!(position.duration > 0);
            assert_eq!(position.open_time(), position.created_at);
        }
    }
}
