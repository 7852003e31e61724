//! Backend reachability checks.

use super::{PollTarget, Reachability};
use crate::api::{PING_QUERY, Transport};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Sends the `{ __typename }` query and records the answer in a
/// [`Reachability`].
///
/// As a [`PollTarget`] it only checks while offline, so feeds that were
/// cut off by a failed check come back once the backend answers again.
pub struct ConnectivityCheck {
    transport: Arc<dyn Transport>,
    reachability: Reachability,
}

impl ConnectivityCheck {
    pub fn new(transport: Arc<dyn Transport>, reachability: Reachability) -> Self {
        Self {
            transport,
            reachability,
        }
    }

    /// Check now and update reachability. Any 2xx counts as connected.
    pub async fn check(&self) -> bool {
        let connected = match self.transport.post_query(PING_QUERY).await {
            Ok(response) => response.is_success(),
            Err(e) => {
                debug!(error = %e, "connectivity check failed");
                false
            }
        };

        if connected != self.reachability.is_online() {
            if connected {
                info!("backend reachable");
            } else {
                warn!("backend unreachable, feeds paused until it answers");
            }
        }
        self.reachability.set_online(connected);
        connected
    }

    pub fn is_online(&self) -> bool {
        self.reachability.is_online()
    }
}

#[async_trait]
impl PollTarget for ConnectivityCheck {
    fn name(&self) -> &str {
        "connectivity"
    }

    async fn poll_cycle(&self, _token: &CancellationToken) {
        if !self.reachability.is_online() {
            self.check().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::HttpResponse;
    use crate::error::{FeedError, TransportError};
    use crate::feed::test_support::ScriptedTransport;
    use crate::feed::{DebugFlag, Feed, Fetcher, Poller};
    use crate::state::Position;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_check_tracks_backend_answers() {
        let transport = ScriptedTransport::new()
            .reply(Ok(HttpResponse::new(503, "")))
            .reply(Err(TransportError::TimedOut))
            .ok(json!({"data": {"__typename": "Query"}}))
            .into_arc();
        let check = ConnectivityCheck::new(transport.clone(), Reachability::default());

        assert!(!check.check().await);
        assert!(!check.check().await);
        assert!(check.check().await);
        assert!(check.is_online());
        assert!(transport.queries().iter().all(|q| q == PING_QUERY));
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_cycle_only_checks_while_offline() {
        let transport = ScriptedTransport::new()
            .ok(json!({"data": {"__typename": "Query"}}))
            .into_arc();
        let check = ConnectivityCheck::new(transport.clone(), Reachability::new(false));
        let token = CancellationToken::new();

        check.poll_cycle(&token).await;
        assert!(check.is_online());
        check.poll_cycle(&token).await;
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_feed_recovers_once_backend_answers() {
        let reachability = Reachability::new(false);
        let backend = ScriptedTransport::new()
            .reply(Ok(HttpResponse::new(502, "")))
            .ok(json!({"data": {"__typename": "Query"}}))
            .into_arc();
        let feed_transport = ScriptedTransport::new()
            .ok(json!({"data": {"Positions": [{"id": 1, "symbol": "SPY"}]}}))
            .into_arc();

        let positions = Arc::new(Feed::new(
            Fetcher::<Position>::new("positions", feed_transport.clone(), DebugFlag::default())
                .with_reachability(reachability.clone()),
            "query { Positions { id } }",
        ));
        let mut feed_poller = Poller::new(positions.clone(), Duration::from_secs(15));
        let mut check_poller = Poller::new(
            Arc::new(ConnectivityCheck::new(backend.clone(), reachability.clone())),
            Duration::from_secs(20),
        );

        feed_poller.start();
        check_poller.start();
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(
            positions.fetcher().snapshot().last_error,
            Some(FeedError::Transport(TransportError::Offline))
        );
        assert_eq!(feed_transport.calls(), 0);

        // check at 20s succeeds, the feed cycle at 30s goes out
        tokio::time::sleep(Duration::from_secs(31)).await;
        assert!(reachability.is_online());
        let state = positions.fetcher().snapshot();
        assert_eq!(state.items.len(), 1);
        assert!(state.last_error.is_none());
        assert_eq!(feed_transport.calls(), 1);
        assert_eq!(backend.calls(), 2);
    }
}
