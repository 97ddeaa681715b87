//! # docrate - Rate-Limited Document Submission
//!
//! A thread-safe client that posts documents to a remote HTTP endpoint while
//! enforcing a hard ceiling on request rate: at most `capacity` submissions in
//! any window of length `period`.
//!
//! ## The Fixed-Window Limiter
//!
//! Permits are a single counter. Every admitted call takes one; a background
//! thread puts the counter back to full at every window boundary.
//!
//! ```text
//!     capacity = 3, period = 1s
//!
//!     t=0.0s   [■■■]  window opens
//!     t=0.1s   [■■ ]  submit ✅
//!     t=0.2s   [■  ]  submit ✅
//!     t=0.3s   [   ]  submit ✅
//!     t=0.4s   [   ]  submit ⛔ RateLimitExceeded (retry in ~600ms)
//!     t=1.0s   [■■■]  reset: back to capacity, never above it
//! ```
//!
//! Unused permits do not carry over. Denied calls never wait and never touch
//! the network.
//!
//! ## Quick Start
//!
//! ### Bare limiter
//!
//! ```rust
//! use docrate::RateLimiter;
//! use std::time::Duration;
//!
//! // 5 permits per second
//! let limiter = RateLimiter::new(5, Duration::from_secs(1))?;
//!
//! if limiter.try_acquire() {
//!     // do the rate-limited work
//! } else {
//!     println!("retry in {:?}", limiter.time_until_reset());
//! }
//!
//! limiter.shutdown();
//! # Ok::<(), docrate::Error>(())
//! ```
//!
//! ### Document client
//!
//! ```rust,no_run
//! use docrate::{ClientConfig, DocumentClient, IntroductionDocument};
//! use std::time::Duration;
//!
//! # async fn run() -> docrate::Result<()> {
//! let config = ClientConfig::new(5, Duration::from_secs(1));
//! let client = DocumentClient::from_config(config)?;
//!
//! let doc = IntroductionDocument::new().with_participant("7700000000");
//! let body = client.create_document(&doc, "signature").await?;
//! println!("{}", body);
//!
//! client.shutdown();
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture Overview
//!
//! ```text
//!                 ┌───────────────────────────┐
//!                 │     DocumentClient        │
//!                 │  submit / create_document │
//!                 └──────┬─────────────┬──────┘
//!                        │             │
//!           ┌────────────▼───┐   ┌─────▼──────────────┐
//!           │  RateLimiter   │   │ DocumentTransport  │
//!           ├────────────────┤   ├────────────────────┤
//!           │ • atomic CAS   │   │ • HttpTransport    │
//!           │ • replenisher  │   │   (reqwest, JSON)  │
//!           └────────────────┘   └────────────────────┘
//! ```
//!
//! ## Thread Safety
//!
//! `RateLimiter` and `DocumentClient` are `Send + Sync`. Share them with
//! `Arc`; any number of threads or tasks may call `try_acquire` or `submit`
//! concurrently and the per-window bound still holds exactly.
//!
//! ## Memory Ordering
//!
//! - `Relaxed` - Fastest, the bound still holds but observers may lag
//! - `AcquireRelease` - Default
//! - `Sequential` - Strongest guarantees
//!
//! ## Safety
//!
//! The crate contains no `unsafe` code.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    missing_debug_implementations
)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod rate_limiter;

pub use client::{
    ClientConfig, Description, DocumentClient, DocumentTransport, HttpTransport,
    IntroductionDocument, Product, DEFAULT_DOC_TYPE, DEFAULT_ENDPOINT,
};
pub use error::{Error, Result};
pub use rate_limiter::{MemoryOrdering, RateLimiter, RateLimiterConfig, RateLimiterMetrics};

use std::time::Duration;

/// A rate limiter wrapped in `Arc` for sharing between threads and clients.
///
/// ```rust
/// use docrate::{RateLimiter, SharedRateLimiter};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let shared: SharedRateLimiter = Arc::new(RateLimiter::new(100, Duration::from_secs(1))?);
///
/// let worker = shared.clone();
/// std::thread::spawn(move || {
///     worker.try_acquire();
/// })
/// .join()
/// .unwrap();
/// # Ok::<(), docrate::Error>(())
/// ```
pub type SharedRateLimiter = std::sync::Arc<RateLimiter>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports.
///
/// ```rust
/// use docrate::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        ClientConfig, DocumentClient, DocumentTransport, Error, IntroductionDocument,
        MemoryOrdering, Product, RateLimiter, RateLimiterBuilder, RateLimiterConfig,
        RateLimiterMetrics, Result, SharedRateLimiter,
    };
}

/// Fluent construction of a [`RateLimiter`].
///
/// ```rust
/// use docrate::{MemoryOrdering, RateLimiterBuilder};
/// use std::time::Duration;
///
/// let limiter = RateLimiterBuilder::new()
///     .capacity(100)
///     .period(Duration::from_secs(60))
///     .memory_ordering(MemoryOrdering::Relaxed)
///     .build()?;
/// assert_eq!(limiter.capacity(), 100);
///
/// let invalid = RateLimiterBuilder::new().capacity(0).build();
/// assert!(invalid.is_err());
/// # Ok::<(), docrate::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct RateLimiterBuilder {
    config: RateLimiterConfig,
}

impl RateLimiterBuilder {
    /// Starts from the default of 10 permits per second.
    pub fn new() -> Self {
        Self::default()
    }

    /// Permits per window (must be > 0).
    pub fn capacity(mut self, capacity: u64) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Window length (must be > 0).
    pub fn period(mut self, period: Duration) -> Self {
        self.config.period = period;
        self
    }

    /// Atomic ordering for the permit counter.
    pub fn memory_ordering(mut self, ordering: MemoryOrdering) -> Self {
        self.config.ordering = ordering;
        self
    }

    /// Validates the settings and starts the limiter.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`] for a zero capacity or period, and
    /// [`Error::Spawn`] if the replenisher thread cannot be started.
    pub fn build(self) -> Result<RateLimiter> {
        RateLimiter::with_config(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_basic_functionality() {
        let limiter = RateLimiter::new(10, Duration::from_secs(3600)).unwrap();

        for _ in 0..10 {
            assert!(limiter.try_acquire());
        }
        assert!(!limiter.try_acquire());

        let metrics = limiter.metrics();
        assert_eq!(metrics.total_acquired, 10);
        assert_eq!(metrics.total_rejected, 1);
    }

    #[test]
    fn test_builder_pattern() {
        let limiter = RateLimiterBuilder::new()
            .capacity(50)
            .period(Duration::from_millis(500))
            .memory_ordering(MemoryOrdering::Sequential)
            .build()
            .unwrap();

        assert_eq!(limiter.capacity(), 50);
        assert_eq!(limiter.period(), Duration::from_millis(500));
        assert_eq!(limiter.available_permits(), 50);
    }

    #[test]
    fn test_builder_defaults() {
        let limiter = RateLimiterBuilder::default().build().unwrap();
        assert_eq!(limiter.capacity(), 10);
        assert_eq!(limiter.period(), Duration::from_secs(1));
    }

    #[test]
    fn test_builder_validation() {
        assert!(matches!(
            RateLimiterBuilder::new().capacity(0).build(),
            Err(Error::InvalidConfiguration(_))
        ));
        assert!(RateLimiterBuilder::new().period(Duration::ZERO).build().is_err());
    }

    #[test]
    fn test_shared_limiter() {
        let limiter: SharedRateLimiter =
            Arc::new(RateLimiter::new(100, Duration::from_secs(3600)).unwrap());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let limiter = limiter.clone();
                thread::spawn(move || (0..50).filter(|_| limiter.try_acquire()).count())
            })
            .collect();

        let total: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_version_info() {
        assert!(!VERSION.is_empty());
    }
}
