//! # Sentio - Trading Dashboard TUI
//!
//! A terminal dashboard for the Sentio trading backend: live signals,
//! open positions and daily profit history, fetched over GraphQL.
//! Built with ratatui and tokio.
//!
//! ## Architecture
//!
//! - **App**: Core application lifecycle and feed wiring
//! - **API**: GraphQL transport, queries and response envelopes
//! - **Decode**: Tolerant field decoding for loosely typed payloads
//! - **Feed**: Fetching, pagination, polling and debug fixtures
//! - **State**: Centralized state management
//! - **UI**: Layout and rendering logic
//! - **Events**: Input handling and event processing
//! - **Config**: Configuration and persisted preferences

pub mod api;
pub mod app;
pub mod config;
pub mod decode;
pub mod error;
pub mod events;
pub mod feed;
pub mod state;
pub mod ui;

pub use app::App;
pub use config::Config;
pub use error::{Error, Result};
