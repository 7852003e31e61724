//! Error types for the Sentio dashboard.

use thiserror::Error;

/// The main error type for Sentio.
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (file operations, terminal, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Terminal/TUI related errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// HTTP client construction errors
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Alias for Result with our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new terminal error.
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }

    /// Create a new config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Failure of a single request before any response arrived.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("The request timed out")]
    TimedOut,

    #[error("Cannot connect to server: {0}")]
    CannotConnect(String),

    #[error("Network is offline")]
    Offline,

    /// The request was cancelled by its owner. Never surfaced to the user.
    #[error("Request cancelled")]
    Cancelled,

    #[error("Network error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::TimedOut
        } else if err.is_connect() {
            Self::CannotConnect(err.to_string())
        } else {
            Self::Other(err.to_string())
        }
    }
}

/// Error recorded on a feed after a failed fetch cycle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// A response arrived with a status outside 2xx.
    #[error("HTTP error: {status}")]
    Http { status: u16 },

    /// No response arrived.
    #[error(transparent)]
    Transport(TransportError),

    /// The body was not valid JSON or lacked a required key path.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl FeedError {
    /// Status code for HTTP errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status } => Some(*status),
            _ => None,
        }
    }

    /// Whether retrying the same request could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http { status } => *status >= 500 || *status == 429,
            Self::Transport(_) => true,
            Self::Decode(_) => false,
        }
    }
}

impl From<crate::decode::DecodeError> for FeedError {
    fn from(err: crate::decode::DecodeError) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_carries_status() {
        let err = FeedError::Http { status: 500 };
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.to_string(), "HTTP error: 500");
        assert!(err.is_retryable());
    }

    #[test]
    fn test_client_errors_are_not_retryable() {
        assert!(!FeedError::Http { status: 404 }.is_retryable());
        assert!(FeedError::Http { status: 429 }.is_retryable());
        assert!(!FeedError::Decode("bad".into()).is_retryable());
    }

    #[test]
    fn test_transport_kinds_display() {
        let timed_out = FeedError::Transport(TransportError::TimedOut);
        assert_eq!(timed_out.to_string(), "The request timed out");
        assert_eq!(timed_out.status(), None);
        assert!(FeedError::Transport(TransportError::Offline).is_retryable());
    }

    #[test]
    fn test_app_error_display() {
        assert_eq!(
            Error::terminal("raw mode unavailable").to_string(),
            "Terminal error: raw mode unavailable"
        );
        assert_eq!(Error::config("nope").to_string(), "Configuration error: nope");
    }
}
