//! Feed wiring and per-view lifecycle.

use crate::api::{Transport, order_log_query, profits_query, query};
use crate::config::FeedsConfig;
use crate::feed::{
    ConnectivityCheck, DebugFlag, Feed, FeedRecord, Fetcher, Paginator, Poller, Reachability,
};
use crate::state::{FeedReceivers, OrderLog, Position, ProfitSummary, Signal, View};
use chrono::NaiveDate;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Every feed the dashboard shows, plus the pollers of the live ones.
///
/// The app calls [`Feeds::activate`] when a view becomes visible and
/// [`Feeds::deactivate`] when it is hidden or the terminal loses focus.
pub struct Feeds {
    signals: Arc<Feed<Signal>>,
    positions: Arc<Feed<Position>>,
    profits: Arc<Paginator<ProfitSummary>>,
    order_log: Arc<Fetcher<OrderLog>>,
    connectivity: Arc<ConnectivityCheck>,
    signals_poller: Poller,
    positions_poller: Poller,
    reconnect_poller: Poller,
}

impl Feeds {
    pub fn new(
        transport: Arc<dyn Transport>,
        config: &FeedsConfig,
        debug: DebugFlag,
        reachability: Reachability,
    ) -> Self {
        let connectivity = Arc::new(ConnectivityCheck::new(
            transport.clone(),
            reachability.clone(),
        ));
        let wiring = Wiring {
            transport,
            debug,
            reachability,
            config,
        };

        let signals = Arc::new(Feed::new(wiring.fetcher("signals"), query::SIGNALS_QUERY));
        let positions = Arc::new(Feed::new(
            wiring.fetcher("positions"),
            query::POSITIONS_QUERY,
        ));
        let interval = config.profit_interval();
        let profits = Arc::new(Paginator::new(
            wiring.fetcher("profits"),
            config.profits_page_size,
            move |after, first| profits_query(interval, after, first),
        ));
        let order_log = Arc::new(wiring.fetcher("order_log"));

        Self {
            signals_poller: Poller::new(signals.clone(), config.signals_interval()),
            positions_poller: Poller::new(positions.clone(), config.positions_interval()),
            reconnect_poller: Poller::new(connectivity.clone(), config.reconnect_interval()),
            connectivity,
            signals,
            positions,
            profits,
            order_log,
        }
    }

    pub fn receivers(&self) -> FeedReceivers {
        FeedReceivers {
            signals: self.signals.subscribe(),
            positions: self.positions.subscribe(),
            profits: self.profits.subscribe(),
            order_log: self.order_log.subscribe(),
        }
    }

    /// `view` became visible.
    ///
    /// Also resumes the background reconnect loop, which checks the backend
    /// while it is unreachable.
    pub fn activate(&mut self, view: View) {
        debug!(view = view.title(), "activating view");
        self.reconnect_poller.start();
        match view {
            View::Signals => {
                self.signals_poller.start();
            }
            View::Positions => {
                self.positions_poller.start();
            }
            View::History => {
                let profits = self.profits.clone();
                tokio::spawn(async move {
                    profits.refresh().await;
                });
            }
            View::About => {}
        }
    }

    /// Stop all polling. In-flight requests finish without reporting errors.
    pub fn deactivate(&mut self) {
        self.signals_poller.stop();
        self.positions_poller.stop();
        self.reconnect_poller.stop();
    }

    /// Check the backend now. Offline feeds fail fast until a check succeeds.
    pub async fn check_connection(&self) -> bool {
        self.connectivity.check().await
    }

    pub fn is_polling(&self, view: View) -> bool {
        match view {
            View::Signals => self.signals_poller.is_running(),
            View::Positions => self.positions_poller.is_running(),
            View::History | View::About => false,
        }
    }

    /// Manual retry: check the backend, then fetch `view`'s feed through
    /// the same guarded path polling uses.
    pub fn retry(&self, view: View) -> impl Future<Output = ()> + Send + 'static {
        let connectivity = self.connectivity.clone();
        let signals = self.signals.clone();
        let positions = self.positions.clone();
        let profits = self.profits.clone();
        async move {
            connectivity.check().await;
            match view {
                View::Signals => {
                    signals.retry().await;
                }
                View::Positions => {
                    positions.retry().await;
                }
                View::History => {
                    profits.refresh().await;
                }
                View::About => {}
            }
        }
    }

    /// Continue history paging from the stored cursor.
    pub fn load_next_page(&self) {
        let profits = self.profits.clone();
        tokio::spawn(async move {
            profits.load_next().await;
        });
    }

    /// Load the order log of the day starting at `date`.
    pub fn load_order_log(&self, date: NaiveDate) {
        let order_log = self.order_log.clone();
        tokio::spawn(async move {
            order_log.restart(&order_log_query(date)).await;
        });
    }
}

/// Shared collaborators of every fetcher.
struct Wiring<'a> {
    transport: Arc<dyn Transport>,
    debug: DebugFlag,
    reachability: Reachability,
    config: &'a FeedsConfig,
}

impl Wiring<'_> {
    fn fetcher<T: FeedRecord>(&self, name: &'static str) -> Fetcher<T> {
        Fetcher::new(name, self.transport.clone(), self.debug.clone())
            .with_reachability(self.reachability.clone())
            .with_fixture_delay(self.config.fixture_delay())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::PING_QUERY;
    use crate::feed::test_support::ScriptedTransport;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::time::Duration;

    fn config() -> FeedsConfig {
        FeedsConfig {
            fixture_delay_ms: 0,
            ..FeedsConfig::default()
        }
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_switching_views_moves_polling() {
        let transport = ScriptedTransport::new()
            .ok(json!({"data": {"signals": [{"symbol": "TQQQ"}]}}))
            .ok(json!({"data": {"Positions": [{"id": 7, "symbol": "SPY", "quantity": "3"}]}}))
            .into_arc();
        let mut feeds = Feeds::new(
            transport.clone(),
            &config(),
            DebugFlag::default(),
            Reachability::default(),
        );
        let receivers = feeds.receivers();

        feeds.activate(View::Signals);
        settle().await;
        assert!(feeds.is_polling(View::Signals));
        assert_eq!(receivers.signals.borrow().len(), 1);

        feeds.deactivate();
        feeds.activate(View::Positions);
        settle().await;
        assert!(!feeds.is_polling(View::Signals));
        assert!(feeds.is_polling(View::Positions));
        assert_eq!(receivers.positions.borrow().items[0].id, "7");

        // one fetch each, nothing fired from the stopped signals loop
        tokio::time::sleep(Duration::from_secs(14)).await;
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_debug_mode_never_hits_network() {
        let transport = ScriptedTransport::new().into_arc();
        let mut feeds = Feeds::new(
            transport.clone(),
            &config(),
            DebugFlag::new(true),
            Reachability::default(),
        );
        let receivers = feeds.receivers();

        feeds.activate(View::Signals);
        feeds.activate(View::History);
        settle().await;

        assert_eq!(receivers.signals.borrow().items, Signal::fixtures());
        assert_eq!(receivers.profits.borrow().items, ProfitSummary::fixtures());
        assert!(!receivers.profits.borrow().has_next_page());
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_retry_checks_then_uses_feed_query() {
        let typename = json!({"data": {"__typename": "Query"}});
        let transport = ScriptedTransport::new()
            .ok(typename.clone())
            .reply(Ok(crate::api::HttpResponse::new(500, "")))
            .ok(typename)
            .ok(json!({"data": {"signals": [{"symbol": "SPY"}]}}))
            .into_arc();
        let feeds = Feeds::new(
            transport.clone(),
            &config(),
            DebugFlag::default(),
            Reachability::default(),
        );
        let receivers = feeds.receivers();

        feeds.retry(View::Signals).await;
        assert!(receivers.signals.borrow().needs_retry());

        feeds.retry(View::Signals).await;
        assert_eq!(receivers.signals.borrow().len(), 1);
        assert_eq!(
            transport.queries(),
            vec![
                PING_QUERY,
                query::SIGNALS_QUERY,
                PING_QUERY,
                query::SIGNALS_QUERY
            ]
        );
    }

    #[tokio::test]
    async fn test_retry_while_unreachable_fails_fast() {
        let transport = ScriptedTransport::new()
            .reply(Err(crate::error::TransportError::TimedOut))
            .into_arc();
        let reachability = Reachability::default();
        let feeds = Feeds::new(
            transport.clone(),
            &config(),
            DebugFlag::default(),
            reachability.clone(),
        );
        let receivers = feeds.receivers();

        feeds.retry(View::Positions).await;
        assert!(!reachability.is_online());
        assert_eq!(
            receivers.positions.borrow().last_error,
            Some(crate::error::FeedError::Transport(
                crate::error::TransportError::Offline
            ))
        );
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_log_loads_requested_day() {
        let transport = ScriptedTransport::new()
            .ok(json!({"data": {"OrderLog": {
                "profit": {"id": "2025-11-12", "profit": "12.5"},
                "log": [{"time": 1_762_958_000, "equity": 100}],
                "orders": []
            }}}))
            .into_arc();
        let feeds = Feeds::new(
            transport.clone(),
            &config(),
            DebugFlag::default(),
            Reachability::default(),
        );
        let receivers = feeds.receivers();

        let date = NaiveDate::from_ymd_opt(2025, 11, 12).unwrap();
        feeds.load_order_log(date);
        settle().await;

        let state = receivers.order_log.borrow();
        assert_eq!(state.items[0].profit.profit, 12.5);
        assert!(transport.queries()[0].contains(r#"OrderLog(date: "2025-11-12")"#));
    }
}
