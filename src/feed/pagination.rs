//! Cursor pagination over a [`Fetcher`].

use super::{FeedRecord, FetchOutcome, Fetcher, Merge};
use crate::state::FeedState;
use tokio::sync::watch;

type QueryBuilder = Box<dyn Fn(Option<&str>, usize) -> String + Send + Sync>;

/// Cursor-paged feed.
///
/// Page requests never overlap: a `load_more` issued while another page is
/// loading returns [`FetchOutcome::Skipped`] without touching the network.
pub struct Paginator<T> {
    fetcher: Fetcher<T>,
    query: QueryBuilder,
    page_size: usize,
}

impl<T: FeedRecord> Paginator<T> {
    /// `query` builds the document for a page given the `after` cursor and
    /// page size.
    pub fn new<F>(fetcher: Fetcher<T>, page_size: usize, query: F) -> Self
    where
        F: Fn(Option<&str>, usize) -> String + Send + Sync + 'static,
    {
        Self {
            fetcher,
            query: Box::new(query),
            page_size,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Clear the feed and request the first page.
    pub async fn refresh(&self) -> FetchOutcome {
        let query = (self.query)(None, self.page_size);
        self.fetcher.try_restart(&query).await
    }

    /// Request the page after `after`; `None` means the first page.
    pub async fn load_more(&self, after: Option<&str>, page_size: usize) -> FetchOutcome {
        let merge = if after.is_some() {
            Merge::Append
        } else {
            Merge::Replace
        };
        let query = (self.query)(after, page_size);
        self.fetcher.try_fetch(&query, merge, None).await
    }

    /// Request the page after the stored cursor.
    ///
    /// Does nothing once the server has reported the last page.
    pub async fn load_next(&self) -> FetchOutcome {
        let cursor = {
            let state = self.fetcher.state_ref();
            if !state.has_next_page() {
                return FetchOutcome::Skipped;
            }
            state.cursor.as_ref().and_then(|c| c.end_cursor.clone())
        };
        self.load_more(cursor.as_deref(), self.page_size).await
    }

    pub fn has_next_page(&self) -> bool {
        self.fetcher.state_ref().has_next_page()
    }

    pub fn fetcher(&self) -> &Fetcher<T> {
        &self.fetcher
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedState<T>> {
        self.fetcher.subscribe()
    }
}
