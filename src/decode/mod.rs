//! Tolerant decoding of backend records.
//!
//! The backend schema drifts: numbers arrive as strings, nested objects
//! arrive as bare scalars, and keys get renamed between releases. Records
//! decode field by field through the fallback chains in [`chain`], falling
//! back to documented defaults. Only a missing required key path fails a
//! record.

pub mod chain;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

pub use chain::{Step, first_match, resolve};

/// A record that could not be recovered by tolerant decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(String),

    #[error("expected an object for {record}")]
    NotAnObject { record: &'static str },

    #[error("missing required field `{field}` in {record}")]
    MissingField {
        record: &'static str,
        field: &'static str,
    },

    #[error("record {index}: {source}")]
    AtIndex {
        index: usize,
        #[source]
        source: Box<DecodeError>,
    },
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Types that can be built from one backend JSON record.
pub trait Decode: Sized {
    fn decode(value: &Value) -> Result<Self, DecodeError>;
}

/// Decode every element, preserving order. Fails on the first bad record.
pub fn decode_all<T: Decode>(values: &[Value]) -> Result<Vec<T>, DecodeError> {
    values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            T::decode(value).map_err(|source| DecodeError::AtIndex {
                index,
                source: Box::new(source),
            })
        })
        .collect()
}

/// Keyed view over one JSON object with tolerant accessors.
///
/// Every accessor takes a list of key aliases, tried in order. `null`
/// counts as absent.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
    record: &'static str,
}

impl<'a> Fields<'a> {
    /// Borrow `value` as the object for `record`.
    pub fn of(value: &'a Value, record: &'static str) -> Result<Self, DecodeError> {
        value
            .as_object()
            .map(|map| Self { map, record })
            .ok_or(DecodeError::NotAnObject { record })
    }

    /// First present, non-null value among `keys`.
    pub fn get(&self, keys: &[&str]) -> Option<&'a Value> {
        keys.iter()
            .filter_map(|key| self.map.get(*key))
            .find(|value| !value.is_null())
    }

    /// Like [`Fields::get`], but fails the record when absent.
    pub fn require(&self, keys: &[&'static str]) -> Result<&'a Value, DecodeError> {
        self.get(keys).ok_or(DecodeError::MissingField {
            record: self.record,
            field: keys.first().copied().unwrap_or_default(),
        })
    }

    /// Value from `keys` run through `chain`; `None` when absent or every step declines.
    pub fn chain<T>(&self, keys: &[&str], chain: &[Step<T>]) -> Option<T> {
        self.get(keys).and_then(|value| first_match(value, chain))
    }

    pub fn opt_f64(&self, keys: &[&str]) -> Option<f64> {
        self.chain(keys, chain::NUMBER)
    }

    pub fn f64_or(&self, keys: &[&str], default: f64) -> f64 {
        self.opt_f64(keys).unwrap_or(default)
    }

    pub fn u64_or(&self, keys: &[&str], default: u64) -> u64 {
        self.chain(keys, chain::UNSIGNED).unwrap_or(default)
    }

    pub fn opt_string(&self, keys: &[&str]) -> Option<String> {
        self.get(keys).and_then(Value::as_str).map(str::to_owned)
    }

    pub fn string_or_default(&self, keys: &[&str]) -> String {
        self.opt_string(keys).unwrap_or_default()
    }

    /// Identifier from `keys`, or a freshly generated UUID. Never fails.
    pub fn id(&self, keys: &[&str]) -> String {
        self.opt_id(keys)
            .unwrap_or_else(|| Uuid::new_v4().hyphenated().to_string())
    }

    pub fn opt_id(&self, keys: &[&str]) -> Option<String> {
        self.chain(keys, chain::IDENTIFIER)
    }

    /// Timestamp from `keys`, falling back to now.
    pub fn timestamp(&self, keys: &[&str]) -> DateTime<Utc> {
        self.chain(keys, chain::TIMESTAMP).unwrap_or_else(Utc::now)
    }

    /// Exact match against the enum's wire names, else `default`.
    pub fn enum_or<E: FromStr>(&self, keys: &[&str], default: E) -> E {
        self.get(keys)
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or(default)
    }

    /// Nested record; `None` when absent or undecodable.
    pub fn nested<T: Decode>(&self, keys: &[&str]) -> Option<T> {
        self.get(keys).and_then(|value| T::decode(value).ok())
    }

    /// List of records; absent decodes to empty, bad elements fail the record.
    pub fn list<T: Decode>(&self, keys: &[&str]) -> Result<Vec<T>, DecodeError> {
        match self.get(keys).and_then(Value::as_array) {
            Some(values) => decode_all(values),
            None => Ok(Vec::new()),
        }
    }
}
