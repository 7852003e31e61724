//! Scripted transports for feed tests.

use crate::api::{HttpResponse, Transport};
use crate::error::TransportError;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

type Reply = Result<HttpResponse, TransportError>;

/// Replays queued replies in order and records every query.
///
/// When gated, each call announces itself on `entered` and then parks until
/// the test calls [`ScriptedTransport::release`].
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    queries: Mutex<Vec<String>>,
    calls: AtomicUsize,
    gate: Option<Gate>,
}

struct Gate {
    entered: Notify,
    release: Notify,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gated() -> Self {
        Self {
            gate: Some(Gate {
                entered: Notify::new(),
                release: Notify::new(),
            }),
            ..Self::default()
        }
    }

    pub fn reply(self, reply: Reply) -> Self {
        self.replies
            .lock()
            .expect("replies lock")
            .push_back(reply);
        self
    }

    pub fn ok(self, body: serde_json::Value) -> Self {
        self.reply(Ok(HttpResponse::new(200, body.to_string())))
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().expect("queries lock").clone()
    }

    /// Wait until a gated call is in flight.
    pub async fn entered(&self) {
        if let Some(gate) = &self.gate {
            gate.entered.notified().await;
        }
    }

    /// Let one gated call complete.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.release.notify_one();
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post_query(&self, query: &str) -> Result<HttpResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries
            .lock()
            .expect("queries lock")
            .push(query.to_string());

        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        self.replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Other("no scripted reply".into())))
    }
}
