//! The seam between fetchers and the network.

use crate::error::TransportError;
use async_trait::async_trait;

/// Raw response to a GraphQL POST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Status in 200..=299.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one GraphQL query and returns whatever came back.
///
/// Implementations report only transport failures as errors; non-2xx
/// statuses are returned as responses for the caller to judge.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_query(&self, query: &str) -> Result<HttpResponse, TransportError>;
}
