//! GraphQL response envelopes.
//!
//! Responses look like `{"data": {"<Field>": <payload>}}` where the payload
//! is a list, a `{edges, page_info}` connection, or a single object. A
//! missing `data` or field is an empty result, not an error.

use crate::decode::{Decode, DecodeError, decode_all};
use crate::state::PageCursor;
use serde_json::Value;

/// Records of one response plus its cursor, if the payload was a connection.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub cursor: Option<PageCursor>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            cursor: None,
        }
    }
}

/// Parse `body` and decode the payload found under the first of `fields`.
pub fn decode_page<T: Decode>(body: &str, fields: &[&str]) -> Result<Page<T>, DecodeError> {
    let root: Value = serde_json::from_str(body)?;

    let Some(payload) = root
        .get("data")
        .and_then(|data| {
            fields
                .iter()
                .find_map(|f| data.get(*f).filter(|payload| !payload.is_null()))
        })
    else {
        return Ok(Page::default());
    };

    match payload {
        Value::Array(records) => Ok(Page {
            items: decode_all(records)?,
            cursor: None,
        }),
        Value::Object(map) if map.contains_key("edges") => {
            let records: Vec<Value> = map
                .get("edges")
                .and_then(Value::as_array)
                .map(|edges| edges.iter().map(unwrap_node).cloned().collect())
                .unwrap_or_default();

            let cursor = map
                .get("page_info")
                .or_else(|| map.get("pageInfo"))
                .filter(|info| !info.is_null())
                .map(PageCursor::decode)
                .transpose()?;

            Ok(Page {
                items: decode_all(&records)?,
                cursor,
            })
        }
        Value::Object(_) => Ok(Page {
            items: vec![T::decode(payload)?],
            cursor: None,
        }),
        _ => Err(DecodeError::NotAnObject { record: "payload" }),
    }
}

/// Relay-style edges wrap the record in `node`; ours usually don't.
fn unwrap_node(edge: &Value) -> &Value {
    match edge.get("node") {
        Some(node) if node.is_object() => node,
        _ => edge,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{ProfitSummary, Signal};
    use serde_json::json;

    #[test]
    fn test_list_payload() {
        let body = json!({"data": {"signals": [{"symbol": "TQQQ"}, {"symbol": "SPY"}]}});
        let page: Page<Signal> = decode_page(&body.to_string(), &["signals"]).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[1].symbol.ticker, "SPY");
        assert!(page.cursor.is_none());
    }

    #[test]
    fn test_missing_data_or_field_is_empty() {
        for body in [
            json!({}),
            json!({"data": null}),
            json!({"data": {}}),
            json!({"data": {"signals": null}}),
            json!({"errors": [{"message": "boom"}]}),
        ] {
            let page: Page<Signal> = decode_page(&body.to_string(), &["signals"]).unwrap();
            assert_eq!(page, Page::default(), "{body}");
        }
    }

    #[test]
    fn test_field_aliases_in_order() {
        let body = json!({"data": {"positions": [{"symbol": "A"}]}});
        let page: Page<crate::state::Position> =
            decode_page(&body.to_string(), &["Positions", "positions"]).unwrap();
        assert_eq!(page.items.len(), 1);
    }

    #[test]
    fn test_connection_payload() {
        let body = json!({"data": {"Profits": {
            "edges": [{"id": "d1", "profit": 1}, {"node": {"id": "d2", "profit": "2"}}],
            "page_info": {
                "start_cursor": "d1",
                "end_cursor": "d2",
                "has_next_page": true,
                "has_previous_page": false
            }
        }}});

        let page: Page<ProfitSummary> = decode_page(&body.to_string(), &["Profits"]).unwrap();
        let ids: Vec<&str> = page.items.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "d2"]);
        assert_eq!(page.items[1].profit, 2.0);
        let cursor = page.cursor.unwrap();
        assert_eq!(cursor.end_cursor.as_deref(), Some("d2"));
        assert!(cursor.has_next_page);
    }

    #[test]
    fn test_invalid_json_and_bad_records() {
        assert!(matches!(
            decode_page::<Signal>("<html>502</html>", &["signals"]),
            Err(DecodeError::Json(_))
        ));

        let body = json!({"data": {"signals": [{"symbol": "A"}, {"confidence": 1}]}});
        assert!(matches!(
            decode_page::<Signal>(&body.to_string(), &["signals"]),
            Err(DecodeError::AtIndex { index: 1, .. })
        ));

        let body = json!({"data": {"signals": 5}});
        assert!(decode_page::<Signal>(&body.to_string(), &["signals"]).is_err());
    }

    #[test]
    fn test_broken_page_info_fails_decode() {
        let body = json!({"data": {"Profits": {"edges": [], "page_info": {"end_cursor": "x"}}}});
        assert!(decode_page::<ProfitSummary>(&body.to_string(), &["Profits"]).is_err());
    }
}
