//! GraphQL client over reqwest.

use super::transport::{HttpResponse, Transport};
use crate::config::ApiConfig;
use crate::error::{Result, TransportError};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// Query used to check that the backend answers at all.
pub const PING_QUERY: &str = "query { __typename }";

/// Builder for creating a GraphQL client.
pub struct GraphQlClientBuilder {
    config: ApiConfig,
}

impl GraphQlClientBuilder {
    /// Create a new builder with default config.
    pub fn new() -> Self {
        Self {
            config: ApiConfig::default(),
        }
    }

    /// Set the API configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the endpoint URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Override the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<GraphQlClient> {
        GraphQlClient::new(self.config)
    }
}

impl Default for GraphQlClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct QueryBody<'a> {
    query: &'a str,
}

/// POSTs `{"query": ...}` bodies to one GraphQL endpoint.
#[derive(Debug, Clone)]
pub struct GraphQlClient {
    http: reqwest::Client,
    endpoint: String,
}

impl GraphQlClient {
    /// Create a new client with the configured timeout.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for GraphQlClient {
    async fn post_query(&self, query: &str) -> std::result::Result<HttpResponse, TransportError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&QueryBody { query })
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!(status, bytes = body.len(), "GraphQL response");

        Ok(HttpResponse { status, body })
    }
}
