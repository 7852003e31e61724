//! Fixed-interval poll loops.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Work run once per poll interval.
#[async_trait]
pub trait PollTarget: Send + Sync + 'static {
    fn name(&self) -> &str;

    /// One cycle. `token` is cancelled when the owning poll loop stops.
    async fn poll_cycle(&self, token: &CancellationToken);
}

struct PollHandle {
    token: CancellationToken,
    // Detached on stop so an in-flight request can finish.
    _task: JoinHandle<()>,
}

/// Fixed-interval poll loop bound to a visible view.
///
/// At most one loop runs per poller. The loop fetches immediately, then
/// again after each interval, until [`Poller::stop`] is called or the
/// poller is dropped.
pub struct Poller {
    target: Arc<dyn PollTarget>,
    interval: Duration,
    handle: Option<PollHandle>,
}

impl Poller {
    pub fn new(target: Arc<dyn PollTarget>, interval: Duration) -> Self {
        Self {
            target,
            interval,
            handle: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Start polling. Returns false if a loop is already running.
    pub fn start(&mut self) -> bool {
        if self.handle.is_some() {
            debug!(feed = self.target.name(), "poller already running");
            return false;
        }

        let token = CancellationToken::new();
        let task = tokio::spawn(poll_loop(
            self.target.clone(),
            self.interval,
            token.clone(),
        ));
        info!(
            feed = self.target.name(),
            interval_secs = self.interval.as_secs_f64(),
            "poller started"
        );
        self.handle = Some(PollHandle { token, _task: task });
        true
    }

    /// Stop polling. No new cycle starts after this returns.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.token.cancel();
            info!(feed = self.target.name(), "poller stopped");
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_loop(target: Arc<dyn PollTarget>, interval: Duration, token: CancellationToken) {
    loop {
        if token.is_cancelled() {
            break;
        }
        target.poll_cycle(&token).await;

        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }
    debug!(feed = target.name(), "poll loop exited");
}
