//! Ordered fallback chains for individual JSON values.
//!
//! Each chain is a list of `(label, parser)` steps tried in order; the first
//! step returning `Some` wins. Parsers never fail loudly, they just decline.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

/// One step of a fallback chain.
pub type Step<T> = (&'static str, fn(&Value) -> Option<T>);

/// Format used by older backends for timestamps without an offset.
pub const NAIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Run `chain` against `value`, returning the winning label and result.
pub fn resolve<T>(value: &Value, chain: &[Step<T>]) -> Option<(&'static str, T)> {
    chain
        .iter()
        .find_map(|(label, parse)| parse(value).map(|out| (*label, out)))
}

/// Run `chain` against `value`, returning only the result.
pub fn first_match<T>(value: &Value, chain: &[Step<T>]) -> Option<T> {
    resolve(value, chain).map(|(_, out)| out)
}

/// float, then integer widened, then numeric string.
pub const NUMBER: &[Step<f64>] = &[
    ("float", float_native),
    ("integer", integer_widened),
    ("string", numeric_string),
];

/// Non-negative integers (durations, counters).
pub const UNSIGNED: &[Step<u64>] = &[
    ("unsigned", |v| v.as_u64()),
    ("integral float", |v| {
        integral_float(v).filter(|f| *f >= 0.0).map(|f| f as u64)
    }),
    ("string", |v| v.as_str().and_then(|s| s.trim().parse().ok())),
];

/// Identifiers: string, integer stringified, UUID-shaped string.
///
/// Callers synthesize a fresh identifier when the whole chain declines.
pub const IDENTIFIER: &[Step<String>] = &[
    ("string", |v| v.as_str().map(str::to_owned)),
    ("integer", |v| match v {
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(n.to_string()),
        _ => None,
    }),
    ("uuid", |v| {
        v.as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
            .map(|id| id.hyphenated().to_string())
    }),
];

/// Epoch seconds (float or integer), RFC 3339, then the naive format as UTC.
pub const TIMESTAMP: &[Step<DateTime<Utc>>] = &[
    ("epoch float", |v| float_native(v).and_then(from_epoch_secs)),
    ("epoch integer", |v| {
        v.as_i64().and_then(|secs| DateTime::from_timestamp(secs, 0))
    }),
    ("iso8601", |v| {
        v.as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s.trim()).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }),
    ("naive", |v| {
        v.as_str()
            .and_then(|s| NaiveDateTime::parse_from_str(s.trim(), NAIVE_TIMESTAMP_FORMAT).ok())
            .map(|naive| naive.and_utc())
    }),
];

fn float_native(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) if n.is_f64() => n.as_f64(),
        _ => None,
    }
}

fn integer_widened(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(|i| i as f64)
            .or_else(|| n.as_u64().map(|u| u as f64)),
        _ => None,
    }
}

fn numeric_string(value: &Value) -> Option<f64> {
    value
        .as_str()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|f| f.is_finite())
}

fn integral_float(value: &Value) -> Option<f64> {
    float_native(value).filter(|f| f.fract() == 0.0)
}

fn from_epoch_secs(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round() as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_number_encodings_agree() {
        for value in [json!(2), json!(2.0), json!("2"), json!(" 2 ")] {
            assert_eq!(first_match(&value, NUMBER), Some(2.0), "{value}");
        }
    }

    #[test]
    fn test_number_step_labels() {
        assert_eq!(resolve(&json!(1.5), NUMBER).map(|r| r.0), Some("float"));
        assert_eq!(resolve(&json!(7), NUMBER).map(|r| r.0), Some("integer"));
        assert_eq!(resolve(&json!("3.45"), NUMBER).map(|r| r.0), Some("string"));
    }

    #[test]
    fn test_number_declines_garbage() {
        assert_eq!(first_match(&json!("not_a_number"), NUMBER), None);
        assert_eq!(first_match(&json!("NaN"), NUMBER), None);
        assert_eq!(first_match(&json!(true), NUMBER), None);
        assert_eq!(first_match(&json!({"value": 1}), NUMBER), None);
    }

    #[test]
    fn test_unsigned_rejects_negative() {
        assert_eq!(first_match(&json!(42), UNSIGNED), Some(42));
        assert_eq!(first_match(&json!("42"), UNSIGNED), Some(42));
        assert_eq!(first_match(&json!(42.0), UNSIGNED), Some(42));
        assert_eq!(first_match(&json!(-3), UNSIGNED), None);
        assert_eq!(first_match(&json!(1.5), UNSIGNED), None);
    }

    #[test]
    fn test_identifier_chain() {
        assert_eq!(first_match(&json!("abc"), IDENTIFIER).as_deref(), Some("abc"));
        assert_eq!(first_match(&json!(17), IDENTIFIER).as_deref(), Some("17"));
        assert_eq!(first_match(&json!(1.5), IDENTIFIER), None);
        assert_eq!(first_match(&Value::Null, IDENTIFIER), None);
    }

    #[test]
    fn test_timestamp_chain() {
        let expected = Utc.with_ymd_and_hms(2025, 10, 27, 14, 30, 0).unwrap();
        let epoch = expected.timestamp();

        assert_eq!(first_match(&json!(epoch), TIMESTAMP), Some(expected));
        assert_eq!(first_match(&json!(epoch as f64), TIMESTAMP), Some(expected));
        assert_eq!(
            first_match(&json!("2025-10-27T14:30:00Z"), TIMESTAMP),
            Some(expected)
        );
        assert_eq!(
            first_match(&json!("2025-10-27T10:30:00-04:00"), TIMESTAMP),
            Some(expected)
        );
        assert_eq!(
            first_match(&json!("2025-10-27 14:30:00"), TIMESTAMP),
            Some(expected)
        );
        assert_eq!(first_match(&json!("yesterday"), TIMESTAMP), None);
    }

    #[test]
    fn test_fractional_epoch_keeps_millis() {
        let ts = first_match(&json!(1_700_000_000.25), TIMESTAMP).unwrap();
        assert_eq!(ts.timestamp(), 1_700_000_000);
        assert_eq!(ts.timestamp_subsec_millis(), 250);
    }
}
