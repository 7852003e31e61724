//! GraphQL backend integration.
//!
//! This module owns everything that touches the wire: the transport seam,
//! the reqwest client, query documents and response envelopes.

mod client;
pub mod envelope;
pub mod query;
mod transport;

pub use client::{GraphQlClient, GraphQlClientBuilder, PING_QUERY};
pub use envelope::{Page, decode_page};
pub use query::{ProfitInterval, order_log_query, profits_query};
pub use transport::{HttpResponse, Transport};

#[cfg(test)]
pub use transport::MockTransport;
