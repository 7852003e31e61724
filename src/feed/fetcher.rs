//! One request/decode cycle per call.

use super::{DebugFlag, FeedRecord, PollTarget, Reachability};
use crate::api::{Page, Transport, decode_page};
use crate::error::{FeedError, TransportError};
use crate::state::FeedState;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Simulated latency of the debug fixtures.
pub const DEFAULT_FIXTURE_DELAY: Duration = Duration::from_millis(150);

/// How a successful page combines with the current items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Merge {
    Replace,
    Append,
}

/// Result of one fetch call, mirrored into the feed state.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// Records were published.
    Loaded { count: usize },
    /// The cycle failed and `last_error` was set.
    Failed(FeedError),
    /// The owner went away; nothing was reported.
    Cancelled,
    /// Another fetch was in flight, no request was made.
    Skipped,
}

enum Completion<T> {
    Loaded(Page<T>),
    Failed(FeedError),
    Cancelled,
}

/// Issues requests for one feed and owns its [`FeedState`].
pub struct Fetcher<T> {
    name: &'static str,
    transport: Arc<dyn Transport>,
    debug: DebugFlag,
    reachability: Option<Reachability>,
    fixture_delay: Duration,
    state: watch::Sender<FeedState<T>>,
    /// Bumped by every request that starts; only the latest may publish.
    generation: AtomicU64,
}

impl<T: FeedRecord> Fetcher<T> {
    pub fn new(name: &'static str, transport: Arc<dyn Transport>, debug: DebugFlag) -> Self {
        Self {
            name,
            transport,
            debug,
            reachability: None,
            fixture_delay: DEFAULT_FIXTURE_DELAY,
            state: watch::Sender::new(FeedState::default()),
            generation: AtomicU64::new(0),
        }
    }

    /// Fail fast while `reachability` reports offline.
    pub fn with_reachability(mut self, reachability: Reachability) -> Self {
        self.reachability = Some(reachability);
        self
    }

    pub fn with_fixture_delay(mut self, delay: Duration) -> Self {
        self.fixture_delay = delay;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Receiver that observes every state change.
    pub fn subscribe(&self) -> watch::Receiver<FeedState<T>> {
        self.state.subscribe()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> FeedState<T> {
        self.state.borrow().clone()
    }

    /// Borrow the current state. Do not hold across an await.
    pub fn state_ref(&self) -> watch::Ref<'_, FeedState<T>> {
        self.state.borrow()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading
    }

    /// Run one cycle unconditionally.
    ///
    /// `token` belongs to the poll loop driving this call; if it is
    /// cancelled by the time the request completes, failures are dropped
    /// silently. A request superseded by a later one publishes nothing.
    pub async fn fetch(
        &self,
        query: &str,
        merge: Merge,
        token: Option<&CancellationToken>,
    ) -> FetchOutcome {
        let generation = self.begin_unguarded(false);
        self.run(generation, query, merge, token).await
    }

    /// Run one cycle unless another is already in flight.
    ///
    /// `token` has the same meaning as in [`Fetcher::fetch`].
    pub async fn try_fetch(
        &self,
        query: &str,
        merge: Merge,
        token: Option<&CancellationToken>,
    ) -> FetchOutcome {
        let Some(generation) = self.begin(true, false) else {
            debug!(feed = self.name, "fetch already in flight, skipping");
            return FetchOutcome::Skipped;
        };
        self.run(generation, query, merge, token).await
    }

    /// Drop items and cursor, then fetch from scratch.
    pub async fn restart(&self, query: &str) -> FetchOutcome {
        let generation = self.begin_unguarded(true);
        self.run(generation, query, Merge::Replace, None).await
    }

    /// Like [`Fetcher::restart`], but skipped while another fetch is in flight so a late page cannot land
    /// on the emptied list.
    pub async fn try_restart(&self, query: &str) -> FetchOutcome {
        let Some(generation) = self.begin(true, true) else {
            debug!(feed = self.name, "fetch already in flight, skipping restart");
            return FetchOutcome::Skipped;
        };
        self.run(generation, query, Merge::Replace, None).await
    }

    /// Mark the feed loading, clear the previous error and claim a new
    /// generation.
    ///
    /// Returns `None`, leaving the state untouched, when `skip_if_loading`
    /// is set and a fetch is in flight.
    fn begin(&self, skip_if_loading: bool, reset: bool) -> Option<u64> {
        let mut generation = None;
        self.state.send_if_modified(|state| {
            if skip_if_loading && state.is_loading {
                return false;
            }
            if reset {
                state.items.clear();
                state.cursor = None;
            }
            state.is_loading = true;
            state.last_error = None;
            generation = Some(self.generation.fetch_add(1, Ordering::AcqRel) + 1);
            true
        });
        generation
    }

    fn begin_unguarded(&self, reset: bool) -> u64 {
        self.begin(false, reset).unwrap_or_else(|| self.generation.load(Ordering::Acquire))
    }

    async fn run(
        &self,
        generation: u64,
        query: &str,
        merge: Merge,
        token: Option<&CancellationToken>,
    ) -> FetchOutcome {
        if self.debug.is_enabled() {
            debug!(feed = self.name, "debug mode, serving fixtures");
            tokio::time::sleep(self.fixture_delay).await;
            return self.complete(
                generation,
                Completion::Loaded(T::fixture_page()),
                Merge::Replace,
            );
        }

        if let Some(reachability) = &self.reachability
            && !reachability.is_online()
        {
            return self.complete(
                generation,
                Completion::Failed(FeedError::Transport(TransportError::Offline)),
                merge,
            );
        }

        let completion = match self.transport.post_query(query).await {
            Err(TransportError::Cancelled) => Completion::Cancelled,
            Err(err) => Completion::Failed(FeedError::Transport(err)),
            Ok(response) if !response.is_success() => Completion::Failed(FeedError::Http {
                status: response.status,
            }),
            Ok(response) => match decode_page::<T>(&response.body, T::FIELDS) {
                Ok(page) => Completion::Loaded(page),
                Err(err) => Completion::Failed(err.into()),
            },
        };

        let owner_gone = token.is_some_and(CancellationToken::is_cancelled);
        let completion = match completion {
            Completion::Failed(_) if owner_gone => Completion::Cancelled,
            other => other,
        };

        self.complete(generation, completion, merge)
    }

    fn complete(&self, generation: u64, completion: Completion<T>, merge: Merge) -> FetchOutcome {
        let outcome = match &completion {
            Completion::Loaded(page) => FetchOutcome::Loaded {
                count: page.items.len(),
            },
            Completion::Failed(err) => FetchOutcome::Failed(err.clone()),
            Completion::Cancelled => FetchOutcome::Cancelled,
        };

        // Checked under the state lock so a request starting now cannot
        // have its loading flag cleared by this one.
        let published = self.state.send_if_modified(|state| {
            if generation != self.generation.load(Ordering::Acquire) {
                return false;
            }
            state.is_loading = false;
            match completion {
                Completion::Loaded(page) => {
                    match merge {
                        Merge::Replace => state.items = page.items,
                        Merge::Append => state.items.extend(page.items),
                    }
                    if page.cursor.is_some() {
                        state.cursor = page.cursor;
                    }
                    state.last_updated = Some(Utc::now());
                }
                Completion::Failed(err) => state.last_error = Some(err),
                Completion::Cancelled => {}
            }
            true
        });
        if !published {
            debug!(feed = self.name, "superseded response dropped");
            return FetchOutcome::Cancelled;
        }

        match &outcome {
            FetchOutcome::Loaded { count } => info!(feed = self.name, count, "feed updated"),
            FetchOutcome::Failed(err) => warn!(feed = self.name, error = %err, "fetch failed"),
            FetchOutcome::Cancelled => debug!(feed = self.name, "fetch cancelled"),
            FetchOutcome::Skipped => {}
        }

        outcome
    }
}

/// A non-paginated feed with a fixed query.
pub struct Feed<T> {
    fetcher: Fetcher<T>,
    query: String,
}

impl<T: FeedRecord> Feed<T> {
    pub fn new(fetcher: Fetcher<T>, query: impl Into<String>) -> Self {
        Self {
            fetcher,
            query: query.into(),
        }
    }

    /// Fetch and replace the items.
    pub async fn fetch_once(&self) -> FetchOutcome {
        self.fetcher.fetch(&self.query, Merge::Replace, None).await
    }

    /// Manual retry; a no-op while a cycle is in flight.
    pub async fn retry(&self) -> FetchOutcome {
        self.fetcher
            .try_fetch(&self.query, Merge::Replace, None)
            .await
    }

    pub fn fetcher(&self) -> &Fetcher<T> {
        &self.fetcher
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedState<T>> {
        self.fetcher.subscribe()
    }
}

#[async_trait]
impl<T: FeedRecord> PollTarget for Feed<T> {
    fn name(&self) -> &str {
        self.fetcher.name()
    }

    /// Skipped while a request from an earlier loop or a manual retry is
    /// still open, so a stale response cannot overwrite a newer one.
    async fn poll_cycle(&self, token: &CancellationToken) {
        self.fetcher
            .try_fetch(&self.query, Merge::Replace, Some(token))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{HttpResponse, MockTransport};
    use crate::feed::test_support::ScriptedTransport;
    use crate::state::Signal;
    use mockall::Sequence;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn signals_body(tickers: &[&str]) -> String {
        let signals: Vec<_> = tickers
            .iter()
            .map(|t| json!({"symbol": t, "confidence": "0.5", "type": "buy"}))
            .collect();
        json!({"data": {"signals": signals}}).to_string()
    }

    fn tickers(state: &FeedState<Signal>) -> Vec<String> {
        state.items.iter().map(|s| s.symbol.ticker.clone()).collect()
    }

    fn fetcher(transport: Arc<dyn Transport>) -> Fetcher<Signal> {
        Fetcher::new("signals", transport, DebugFlag::default())
    }

    #[tokio::test]
    async fn test_success_replaces_items() {
        let mut mock = MockTransport::new();
        let mut seq = Sequence::new();
        mock.expect_post_query()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|query| query.contains("signals"))
            .returning(|_| Ok(HttpResponse::new(200, signals_body(&["TQQQ", "SPY"]))));
        mock.expect_post_query()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(HttpResponse::new(200, signals_body(&["QQQ"]))));

        let feed = Feed::new(fetcher(Arc::new(mock)), "query { signals { id } }");

        assert_eq!(feed.fetch_once().await, FetchOutcome::Loaded { count: 2 });
        assert_eq!(tickers(&feed.fetcher().snapshot()), vec!["TQQQ", "SPY"]);

        feed.fetch_once().await;
        let state = feed.fetcher().snapshot();
        assert_eq!(tickers(&state), vec!["QQQ"]);
        assert!(!state.is_loading);
        assert!(state.last_error.is_none());
        assert!(state.last_updated.is_some());
    }

    #[tokio::test]
    async fn test_http_500_keeps_items() {
        let mut mock = MockTransport::new();
        let mut seq = Sequence::new();
        mock.expect_post_query()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(HttpResponse::new(200, signals_body(&["TQQQ"]))));
        mock.expect_post_query()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(HttpResponse::new(500, "internal error")));

        let fetcher = fetcher(Arc::new(mock));
        fetcher.fetch("q", Merge::Replace, None).await;

        let outcome = fetcher.fetch("q", Merge::Replace, None).await;
        assert_eq!(outcome, FetchOutcome::Failed(FeedError::Http { status: 500 }));

        let state = fetcher.snapshot();
        assert!(!state.is_loading);
        assert_eq!(state.last_error.as_ref().and_then(FeedError::status), Some(500));
        assert_eq!(tickers(&state), vec!["TQQQ"]);
    }

    #[tokio::test]
    async fn test_transport_errors_are_classified() {
        for err in [
            TransportError::TimedOut,
            TransportError::CannotConnect("refused".into()),
            TransportError::Other("dns".into()),
        ] {
            let transport = ScriptedTransport::new()
                .ok(json!({"data": {"signals": [{"symbol": "A"}]}}))
                .reply(Err(err.clone()))
                .into_arc();
            let fetcher = fetcher(transport);
            fetcher.fetch("q", Merge::Replace, None).await;
            fetcher.fetch("q", Merge::Replace, None).await;

            let state = fetcher.snapshot();
            assert_eq!(state.last_error, Some(FeedError::Transport(err)));
            assert_eq!(state.items.len(), 1);
            assert!(!state.is_loading);
        }
    }

    #[tokio::test]
    async fn test_decode_error_keeps_items() {
        let transport = ScriptedTransport::new()
            .ok(json!({"data": {"signals": [{"symbol": "A"}]}}))
            .reply(Ok(HttpResponse::new(200, "<html>gateway</html>")))
            .into_arc();
        let fetcher = fetcher(transport);
        fetcher.fetch("q", Merge::Replace, None).await;
        fetcher.fetch("q", Merge::Replace, None).await;

        let state = fetcher.snapshot();
        assert!(matches!(state.last_error, Some(FeedError::Decode(_))));
        assert_eq!(tickers(&state), vec!["A"]);
    }

    #[tokio::test]
    async fn test_transport_cancellation_is_silent() {
        let transport = ScriptedTransport::new()
            .reply(Err(TransportError::Cancelled))
            .into_arc();
        let fetcher = fetcher(transport);

        assert_eq!(
            fetcher.fetch("q", Merge::Replace, None).await,
            FetchOutcome::Cancelled
        );
        let state = fetcher.snapshot();
        assert!(!state.is_loading);
        assert!(state.last_error.is_none());
    }

    #[tokio::test]
    async fn test_owner_cancelled_mid_flight_is_silent() {
        let transport = ScriptedTransport::gated()
            .reply(Err(TransportError::CannotConnect("refused".into())))
            .into_arc();
        let fetcher = Arc::new(fetcher(transport.clone()));
        let token = CancellationToken::new();

        let task = {
            let fetcher = fetcher.clone();
            let token = token.clone();
            tokio::spawn(async move { fetcher.fetch("q", Merge::Replace, Some(&token)).await })
        };

        transport.entered().await;
        assert!(fetcher.is_loading());
        token.cancel();
        transport.release();

        assert_eq!(task.await.unwrap(), FetchOutcome::Cancelled);
        let state = fetcher.snapshot();
        assert!(!state.is_loading);
        assert!(state.last_error.is_none());
    }

    #[tokio::test]
    async fn test_loading_clears_previous_error() {
        let transport = ScriptedTransport::gated()
            .reply(Ok(HttpResponse::new(503, "")))
            .ok(json!({"data": {"signals": []}}))
            .into_arc();
        let fetcher = Arc::new(fetcher(transport.clone()));

        transport.release();
        fetcher.fetch("q", Merge::Replace, None).await;
        // consume the first call's entry signal
        transport.entered().await;
        assert!(fetcher.snapshot().last_error.is_some());

        let task = {
            let fetcher = fetcher.clone();
            tokio::spawn(async move { fetcher.fetch("q", Merge::Replace, None).await })
        };
        transport.entered().await;
        let in_flight = fetcher.snapshot();
        assert!(in_flight.is_loading);
        assert!(in_flight.last_error.is_none());

        transport.release();
        assert_eq!(task.await.unwrap(), FetchOutcome::Loaded { count: 0 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_debug_mode_serves_fixtures_without_network() {
        let mut mock = MockTransport::new();
        mock.expect_post_query().never();

        let fetcher = Fetcher::<Signal>::new("signals", Arc::new(mock), DebugFlag::new(true));
        let started = tokio::time::Instant::now();
        let outcome = fetcher.fetch("q", Merge::Replace, None).await;

        assert!(started.elapsed() >= DEFAULT_FIXTURE_DELAY);
        assert_eq!(
            outcome,
            FetchOutcome::Loaded {
                count: Signal::fixtures().len()
            }
        );
        assert_eq!(fetcher.snapshot().items, Signal::fixtures());
    }

    #[tokio::test]
    async fn test_debug_toggle_applies_to_next_cycle() {
        let transport = ScriptedTransport::gated()
            .ok(json!({"data": {"signals": [{"symbol": "LIVE"}]}}))
            .into_arc();
        let debug = DebugFlag::new(false);
        let fetcher = Arc::new(
            Fetcher::<Signal>::new("signals", transport.clone(), debug.clone())
                .with_fixture_delay(Duration::ZERO),
        );

        let task = {
            let fetcher = fetcher.clone();
            tokio::spawn(async move { fetcher.fetch("q", Merge::Replace, None).await })
        };
        transport.entered().await;
        debug.set(true);
        transport.release();
        task.await.unwrap();
        assert_eq!(tickers(&fetcher.snapshot()), vec!["LIVE"]);

        fetcher.fetch("q", Merge::Replace, None).await;
        assert_eq!(fetcher.snapshot().items, Signal::fixtures());
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_offline_skips_request() {
        let transport = ScriptedTransport::new().into_arc();
        let fetcher = fetcher(transport.clone()).with_reachability(Reachability::new(false));

        let outcome = fetcher.fetch("q", Merge::Replace, None).await;
        assert_eq!(
            outcome,
            FetchOutcome::Failed(FeedError::Transport(TransportError::Offline))
        );
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_try_fetch_skips_while_in_flight() {
        let transport = ScriptedTransport::gated()
            .ok(json!({"data": {"signals": [{"symbol": "A"}]}}))
            .into_arc();
        let feed = Arc::new(Feed::new(fetcher(transport.clone()), "q"));

        let task = {
            let feed = feed.clone();
            tokio::spawn(async move { feed.fetch_once().await })
        };
        transport.entered().await;

        assert_eq!(feed.retry().await, FetchOutcome::Skipped);
        assert_eq!(transport.calls(), 1);

        transport.release();
        assert_eq!(task.await.unwrap(), FetchOutcome::Loaded { count: 1 });
    }

    #[tokio::test]
    async fn test_superseded_restart_is_dropped() {
        let transport = ScriptedTransport::gated()
            .ok(json!({"data": {"signals": [{"symbol": "DAY1"}]}}))
            .ok(json!({"data": {"signals": [{"symbol": "DAY2"}]}}))
            .into_arc();
        let fetcher = Arc::new(fetcher(transport.clone()));

        let first = {
            let fetcher = fetcher.clone();
            tokio::spawn(async move { fetcher.restart("day-1").await })
        };
        transport.entered().await;
        let second = {
            let fetcher = fetcher.clone();
            tokio::spawn(async move { fetcher.restart("day-2").await })
        };
        transport.entered().await;

        transport.release();
        assert_eq!(first.await.unwrap(), FetchOutcome::Cancelled);
        let state = fetcher.snapshot();
        assert!(state.is_loading);
        assert!(state.items.is_empty());

        transport.release();
        assert_eq!(second.await.unwrap(), FetchOutcome::Loaded { count: 1 });
        assert_eq!(tickers(&fetcher.snapshot()), vec!["DAY2"]);
    }
}
