//! Event handling for Sentio.
//!
//! Terminal input is translated into [`Action`](crate::state::Action)s using
//! the configured key bindings.

mod handler;
mod input;

pub use handler::EventHandler;
pub use input::{InputEvent, Key, Modifiers};
