//! Ticker symbols.

use crate::decode::{Decode, DecodeError, Fields};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A tradable instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Symbol {
    /// Ticker, e.g. "TQQQ".
    pub ticker: String,
    /// Display name, empty when the backend omits it.
    pub name: String,
    /// Last known price.
    pub price: Option<f64>,
}

impl Symbol {
    pub fn new(ticker: impl Into<String>, name: impl Into<String>, price: Option<f64>) -> Self {
        Self {
            ticker: ticker.into(),
            name: name.into(),
            price,
        }
    }

    /// A symbol known only by its ticker.
    pub fn from_ticker(ticker: impl Into<String>) -> Self {
        Self::new(ticker, "", None)
    }

    /// Placeholder used when a record carries no usable symbol.
    pub fn placeholder() -> Self {
        Self::from_ticker("")
    }

    /// Decode either a full symbol object or a bare ticker string.
    pub fn decode_object_or_ticker(value: &Value) -> Option<Self> {
        Self::decode(value)
            .ok()
            .or_else(|| value.as_str().map(Self::from_ticker))
    }
}

impl Decode for Symbol {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::of(value, "Symbol")?;
        let ticker = fields
            .require(&["ticker", "symbol"])?
            .as_str()
            .ok_or(DecodeError::MissingField {
                record: "Symbol",
                field: "ticker",
            })?
            .to_owned();

        Ok(Self {
            ticker,
            name: fields.string_or_default(&["name"]),
            price: fields.opt_f64(&["price"]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_object() {
        let symbol = Symbol::decode(&json!({
            "ticker": "TQQQ",
            "name": "ProShares UltraPro QQQ",
            "price": "102.2"
        }))
        .unwrap();
        assert_eq!(
            symbol,
            Symbol::new("TQQQ", "ProShares UltraPro QQQ", Some(102.2))
        );
    }

    #[test]
    fn test_legacy_symbol_key_and_defaults() {
        let symbol = Symbol::decode(&json!({"symbol": "SPY", "price": "n/a"})).unwrap();
        assert_eq!(symbol, Symbol::from_ticker("SPY"));
    }

    #[test]
    fn test_missing_ticker_fails() {
        assert!(Symbol::decode(&json!({"name": "Nameless"})).is_err());
    }

    #[test]
    fn test_object_or_ticker() {
        assert_eq!(
            Symbol::decode_object_or_ticker(&json!("QQQ")),
            Some(Symbol::from_ticker("QQQ"))
        );
        assert_eq!(
            Symbol::decode_object_or_ticker(&json!({"ticker": "QQQ", "price": 501}))
                .and_then(|s| s.price),
            Some(501.0)
        );
        assert_eq!(Symbol::decode_object_or_ticker(&json!(12)), None);
    }
}
