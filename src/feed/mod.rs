//! Polling, fetching and paging of backend feeds.
//!
//! A feed is one logical data stream (signals, positions, profit history)
//! with its own decode schema. Its [`FeedState`](crate::state::FeedState)
//! lives behind a `watch` channel: the [`Fetcher`] is the only writer and
//! the UI holds receivers.

mod connectivity;
mod fetcher;
mod fixtures;
mod pagination;
mod poller;
#[cfg(test)]
pub(crate) mod test_support;

pub use connectivity::ConnectivityCheck;
pub use fetcher::{Feed, FetchOutcome, Fetcher, Merge};
pub use pagination::Paginator;
pub use poller::{PollTarget, Poller};

use crate::api::Page;
use crate::decode::Decode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A record type served by one feed.
pub trait FeedRecord: Decode + Clone + Send + Sync + 'static {
    /// Field names under `data`, tried in order.
    const FIELDS: &'static [&'static str];

    /// Fixed local data served in debug mode.
    fn fixtures() -> Vec<Self>;

    /// Fixtures as a page; paged feeds attach a final cursor.
    fn fixture_page() -> Page<Self> {
        Page {
            items: Self::fixtures(),
            cursor: None,
        }
    }
}

/// Process-wide switch that substitutes fixtures for network data.
///
/// Clones share one flag. Fetchers read it at the start of each cycle, so a
/// change applies from the next cycle on.
#[derive(Debug, Clone, Default)]
pub struct DebugFlag(Arc<AtomicBool>);

impl DebugFlag {
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    pub fn is_enabled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Release);
    }
}

/// Last known network reachability.
///
/// When offline, fetchers fail fast with a transport error instead of
/// issuing a request.
#[derive(Debug, Clone)]
pub struct Reachability(Arc<AtomicBool>);

impl Reachability {
    pub fn new(online: bool) -> Self {
        Self(Arc::new(AtomicBool::new(online)))
    }

    pub fn is_online(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn set_online(&self, online: bool) {
        self.0.store(online, Ordering::Release);
    }
}

impl Default for Reachability {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_flag_is_shared_between_clones() {
        let flag = DebugFlag::new(false);
        let clone = flag.clone();
        clone.set(true);
        assert!(flag.is_enabled());
    }

    #[test]
    fn test_reachability_defaults_online() {
        let reachability = Reachability::default();
        assert!(reachability.is_online());
        reachability.clone().set_online(false);
        assert!(!reachability.is_online());
    }
}
