//! Trading signals and their indicator metrics.

use super::Symbol;
use crate::decode::{Decode, DecodeError, Fields};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Direction and strength of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    StrongSell,
    Sell,
    #[default]
    Hold,
    Buy,
    StrongBuy,
}

impl SignalType {
    pub const ALL: [SignalType; 5] = [
        Self::StrongSell,
        Self::Sell,
        Self::Hold,
        Self::Buy,
        Self::StrongBuy,
    ];

    /// Name used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrongSell => "strong_sell",
            Self::Sell => "sell",
            Self::Hold => "hold",
            Self::Buy => "buy",
            Self::StrongBuy => "strong_buy",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::StrongSell => "STRONG SELL",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
            Self::Buy => "BUY",
            Self::StrongBuy => "STRONG BUY",
        }
    }

    pub fn is_bullish(&self) -> bool {
        matches!(self, Self::Buy | Self::StrongBuy)
    }

    pub fn is_bearish(&self) -> bool {
        matches!(self, Self::Sell | Self::StrongSell)
    }
}

impl FromStr for SignalType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for SignalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A named indicator value attached to a signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    pub value: f64,
}

impl Metric {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

impl Decode for Metric {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::of(value, "Metric")?;
        let name = fields
            .opt_string(&["name", "key"])
            .ok_or(DecodeError::MissingField {
                record: "Metric",
                field: "name",
            })?;

        Ok(Self {
            name,
            value: fields.f64_or(&["value"], 0.0),
        })
    }
}

/// A trading signal for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub id: String,
    pub symbol: Symbol,
    pub confidence: f64,
    #[serde(rename = "type")]
    pub kind: SignalType,
    pub metrics: Vec<Metric>,
}

impl Signal {
    /// Build a signal identified by its ticker.
    pub fn new(symbol: Symbol, confidence: f64, kind: SignalType, metrics: Vec<Metric>) -> Self {
        Self {
            id: symbol.ticker.clone(),
            symbol,
            confidence,
            kind,
            metrics,
        }
    }

    /// Confidence as a percentage.
    pub fn confidence_percent(&self) -> f64 {
        self.confidence * 100.0
    }

    pub fn metric(&self, name: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.name == name)
    }
}

impl Decode for Signal {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::of(value, "Signal")?;

        let symbol = fields
            .get(&["symbol"])
            .and_then(Symbol::decode_object_or_ticker)
            .ok_or(DecodeError::MissingField {
                record: "Signal",
                field: "symbol",
            })?;

        Ok(Self {
            id: fields
                .opt_id(&["id"])
                .unwrap_or_else(|| symbol.ticker.clone()),
            confidence: fields.f64_or(&["confidence"], 0.0),
            kind: fields.enum_or(&["type"], SignalType::Hold),
            metrics: fields.list(&["metrics"])?,
            symbol,
        })
    }
}
