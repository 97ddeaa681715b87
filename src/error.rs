//! # Error Types
//!
//! Every fallible operation in the crate returns [`Error`]. A single call to
//! [`DocumentClient::submit`](crate::DocumentClient::submit) ends in exactly
//! one of three outcomes:
//!
//! ```text
//!     submit()
//!        │
//!        ├──► Ok(body)                     admitted, 2xx response
//!        ├──► Err(RateLimitExceeded)       denied, no network call
//!        └──► Err(Network | Server | ..)   admitted, call failed
//! ```
//!
//! The limiter never produces an error from `try_acquire`; denial is its
//! boolean result and the client turns it into [`Error::RateLimitExceeded`].

use std::time::Duration;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the limiter constructors and the document client.
#[derive(Error, Debug)]
pub enum Error {
    /// The limiter had no permit left in the current window.
    ///
    /// `retry_after` is the time left until the next window reset, or
    /// `None` when the limiter has been shut down and no reset will come.
    #[error("request rate limit exceeded{}", retry_hint(.retry_after))]
    RateLimitExceeded {
        /// Time until the next reset, when one is scheduled.
        retry_after: Option<Duration>,
    },

    /// The request could not be delivered or its response could not be read.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status.
    #[error("server responded with status {status}: {body}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Raw response body, possibly empty.
        body: String,
    },

    /// The document could not be encoded as JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A limiter or client setting is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The replenisher thread could not be started.
    #[error("failed to spawn replenisher thread: {0}")]
    Spawn(#[source] std::io::Error),
}

impl Error {
    /// Returns `true` for a rate-limit denial.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimitExceeded { .. })
    }

    /// Returns `true` when the same call may succeed if issued again later.
    ///
    /// Denials and 5xx responses qualify; the crate itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimitExceeded { .. } => true,
            Self::Network(err) => err.is_timeout() || err.is_connect(),
            Self::Server { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// The retry hint attached to a denial.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimitExceeded { retry_after } => *retry_after,
            _ => None,
        }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}

fn retry_hint(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(wait) => format!(" (retry in {} ms)", wait.as_millis()),
        None => String::new(),
    }
}
