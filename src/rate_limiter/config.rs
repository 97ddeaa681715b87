//! # Rate Limiter Configuration
//!
//! Settings for a fixed-window limiter: how many permits a window holds and
//! how long a window lasts.
//!
//! ```text
//!     Fixed Window Configuration:
//!
//!     ┌──────────────────────────────┐
//!     │   Capacity: 5                │ ← Permits per window
//!     │   ┌─────────────────────┐    │
//!     │   │ ▣ ▣ ▣ □ □           │    │ ← 3 left in this window
//!     │   └─────────────────────┘    │
//!     │                              │
//!     │   Period: 1s                 │ ← Reset back to 5 every second
//!     └──────────────────────────────┘
//! ```
//!
//! ### Memory Ordering
//!
//! ```text
//!     Relaxed ──────► Fastest, counter stays exact
//!        │
//!     AcquireRelease ► Default
//!        │
//!     Sequential ───► Single total order across all limiter atomics
//! ```

use crate::error::{Error, Result};
use std::sync::atomic::Ordering;
use std::time::Duration;

/// Memory ordering strategy for the limiter's atomic operations.
///
/// The permit counter is a single atomic updated by compare-and-swap, so
/// admission stays exact under every variant. The choice only affects how
/// the counter synchronizes with surrounding memory in the caller.
///
/// ## Example
///
/// ```rust
/// use docrate::{MemoryOrdering, RateLimiterConfig};
/// use std::time::Duration;
///
/// let config = RateLimiterConfig::new(100, Duration::from_secs(1))
///     .with_ordering(MemoryOrdering::Sequential);
/// assert_eq!(config.ordering, MemoryOrdering::Sequential);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemoryOrdering {
    /// No cross-variable synchronization.
    Relaxed,

    /// Acquire on loads, release on stores (default).
    #[default]
    AcquireRelease,

    /// Sequential consistency.
    Sequential,
}

impl MemoryOrdering {
    /// Ordering for plain loads.
    #[inline(always)]
    pub(crate) fn load(&self) -> Ordering {
        match self {
            Self::Relaxed => Ordering::Relaxed,
            Self::AcquireRelease => Ordering::Acquire,
            Self::Sequential => Ordering::SeqCst,
        }
    }

    /// Ordering for plain stores (window resets).
    #[inline(always)]
    pub(crate) fn store(&self) -> Ordering {
        match self {
            Self::Relaxed => Ordering::Relaxed,
            Self::AcquireRelease => Ordering::Release,
            Self::Sequential => Ordering::SeqCst,
        }
    }

    /// Ordering for a successful compare-and-swap or fetch-add.
    #[inline(always)]
    pub(crate) fn rmw(&self) -> Ordering {
        match self {
            Self::Relaxed => Ordering::Relaxed,
            Self::AcquireRelease => Ordering::AcqRel,
            Self::Sequential => Ordering::SeqCst,
        }
    }

    /// Ordering for the reload after a failed compare-and-swap.
    #[inline(always)]
    pub(crate) fn cas_failure(&self) -> Ordering {
        match self {
            Self::Relaxed => Ordering::Relaxed,
            Self::AcquireRelease => Ordering::Acquire,
            Self::Sequential => Ordering::SeqCst,
        }
    }
}

/// Configuration for a fixed-window rate limiter.
///
/// ## Examples
///
/// ```rust
/// use docrate::RateLimiterConfig;
/// use std::time::Duration;
///
/// // 5 requests per second
/// let config = RateLimiterConfig::per_second(5);
///
/// // 1000 requests per minute
/// let config = RateLimiterConfig::per_minute(1000);
///
/// // 3 requests every 250ms
/// let config = RateLimiterConfig::new(3, Duration::from_millis(250));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Permits available at the start of every window. Must be positive.
    pub capacity: u64,

    /// Length of one window. Must be non-zero.
    pub period: Duration,

    /// Memory ordering for the permit counter.
    pub ordering: MemoryOrdering,
}

impl Default for RateLimiterConfig {
    /// 10 permits per second with `AcquireRelease` ordering.
    fn default() -> Self {
        Self {
            capacity: 10,
            period: Duration::from_secs(1),
            ordering: MemoryOrdering::AcquireRelease,
        }
    }
}

impl RateLimiterConfig {
    /// Creates a configuration admitting `capacity` operations per `period`.
    pub fn new(capacity: u64, period: Duration) -> Self {
        Self {
            capacity,
            period,
            ordering: MemoryOrdering::default(),
        }
    }

    /// `requests` permits per one-second window.
    pub fn per_second(requests: u64) -> Self {
        Self::new(requests, Duration::from_secs(1))
    }

    /// `requests` permits per one-minute window.
    pub fn per_minute(requests: u64) -> Self {
        Self::new(requests, Duration::from_secs(60))
    }

    /// Sets the memory ordering strategy.
    pub fn with_ordering(mut self, ordering: MemoryOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    /// Checks that capacity and period are both positive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `capacity` is 0 or
    /// `period` is zero.
    ///
    /// ```rust
    /// use docrate::RateLimiterConfig;
    /// use std::time::Duration;
    ///
    /// assert!(RateLimiterConfig::new(0, Duration::from_secs(1)).validate().is_err());
    /// assert!(RateLimiterConfig::new(5, Duration::ZERO).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::invalid_config("capacity must be greater than 0"));
        }

        if self.period.is_zero() {
            return Err(Error::invalid_config("period must be greater than 0"));
        }

        // Window anchors are kept in whole milliseconds.
        if self.period.as_millis() > u64::MAX as u128 {
            return Err(Error::invalid_config("period is too long"));
        }

        Ok(())
    }

    /// Average admitted operations per second at full utilization.
    pub fn effective_rate_per_second(&self) -> f64 {
        if self.period.is_zero() {
            0.0
        } else {
            self.capacity as f64 / self.period.as_secs_f64()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_ordering() {
        let ordering = MemoryOrdering::AcquireRelease;
        assert_eq!(ordering.load(), Ordering::Acquire);
        assert_eq!(ordering.store(), Ordering::Release);
        assert_eq!(ordering.rmw(), Ordering::AcqRel);
        assert_eq!(ordering.cas_failure(), Ordering::Acquire);

        let relaxed = MemoryOrdering::Relaxed;
        assert_eq!(relaxed.rmw(), Ordering::Relaxed);

        let sequential = MemoryOrdering::Sequential;
        assert_eq!(sequential.load(), Ordering::SeqCst);
        assert_eq!(sequential.store(), Ordering::SeqCst);
    }

    #[test]
    fn test_default_memory_ordering() {
        assert_eq!(MemoryOrdering::default(), MemoryOrdering::AcquireRelease);
    }

    #[test]
    fn test_config_validation() {
        assert!(RateLimiterConfig::default().validate().is_ok());

        let no_capacity = RateLimiterConfig {
            capacity: 0,
            ..Default::default()
        };
        assert!(matches!(
            no_capacity.validate(),
            Err(Error::InvalidConfiguration(_))
        ));

        let no_period = RateLimiterConfig {
            period: Duration::ZERO,
            ..Default::default()
        };
        assert!(matches!(
            no_period.validate(),
            Err(Error::InvalidConfiguration(_))
        ));

        let huge_period = RateLimiterConfig {
            period: Duration::MAX,
            ..Default::default()
        };
        assert!(huge_period.validate().is_err());
    }

    #[test]
    fn test_config_constructors() {
        let config = RateLimiterConfig::per_second(5);
        assert_eq!(config.capacity, 5);
        assert_eq!(config.period, Duration::from_secs(1));
        assert_eq!(config.effective_rate_per_second(), 5.0);

        let config = RateLimiterConfig::per_minute(120);
        assert_eq!(config.period, Duration::from_secs(60));
        assert_eq!(config.effective_rate_per_second(), 2.0);

        let config = RateLimiterConfig::new(3, Duration::from_millis(500));
        assert_eq!(config.effective_rate_per_second(), 6.0);
    }

    #[test]
    fn test_zero_period_rate() {
        let config = RateLimiterConfig::new(10, Duration::ZERO);
        assert_eq!(config.effective_rate_per_second(), 0.0);
    }

    #[test]
    fn test_with_ordering() {
        let config = RateLimiterConfig::default().with_ordering(MemoryOrdering::Relaxed);
        assert_eq!(config.ordering, MemoryOrdering::Relaxed);
    }
}
