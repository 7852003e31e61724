//! Per-feed fetch state shared with the UI.

use crate::decode::{Decode, DecodeError, Fields};
use crate::error::FeedError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Pagination boundary reported by the backend in `page_info`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl Decode for PageCursor {
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let fields = Fields::of(value, "PageInfo")?;
        let flag = |key: &'static str| {
            fields
                .require(&[key])?
                .as_bool()
                .ok_or(DecodeError::MissingField {
                    record: "PageInfo",
                    field: key,
                })
        };

        Ok(Self {
            start_cursor: fields.opt_string(&["start_cursor"]),
            end_cursor: fields.opt_string(&["end_cursor"]),
            has_next_page: flag("has_next_page")?,
            has_previous_page: flag("has_previous_page")?,
        })
    }
}

/// Fetch state of one feed.
///
/// Only the feed's fetcher writes it; everything else reads a snapshot.
#[derive(Debug, Clone)]
pub struct FeedState<T> {
    /// Last good records; pages concatenated in server order for paged feeds.
    pub items: Vec<T>,
    /// A fetch is in flight.
    pub is_loading: bool,
    /// Failure of the most recent cycle, cleared when the next one starts.
    pub last_error: Option<FeedError>,
    /// Cursor of the last fetched page.
    pub cursor: Option<PageCursor>,
    /// Time of the last successful fetch.
    pub last_updated: Option<DateTime<Utc>>,
}

impl<T> Default for FeedState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            is_loading: false,
            last_error: None,
            cursor: None,
            last_updated: None,
        }
    }
}

impl<T> FeedState<T> {
    /// More pages may exist. Unknown counts as yes.
    pub fn has_next_page(&self) -> bool {
        self.cursor.as_ref().is_none_or(|c| c.has_next_page)
    }

    /// Nothing to show and the last cycle failed; the UI offers a retry.
    pub fn needs_retry(&self) -> bool {
        self.items.is_empty() && self.last_error.is_some() && !self.is_loading
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
