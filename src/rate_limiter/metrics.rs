//! # Rate Limiter Metrics
//!
//! Point-in-time snapshot of a limiter's counters.
//!
//! ```text
//!     Metrics Snapshot:
//!     ┌─────────────────────────────────────┐
//!     │  Admitted: 42    Rejected: 8        │
//!     │  Success Rate: 84%                  │
//!     │                                     │
//!     │  Permits: 3/10   Utilization: 70%   │
//!     │  Resets: 5       Replenishing: yes  │
//!     └─────────────────────────────────────┘
//! ```

use std::fmt;

/// Snapshot of a [`RateLimiter`](crate::RateLimiter)'s counters.
///
/// Counters are read individually, so a snapshot taken while other threads
/// acquire permits may mix values from slightly different instants.
///
/// ```rust
/// use docrate::RateLimiter;
/// use std::time::Duration;
///
/// let limiter = RateLimiter::new(2, Duration::from_secs(60)).unwrap();
/// limiter.try_acquire();
/// limiter.try_acquire();
/// limiter.try_acquire();
///
/// let metrics = limiter.metrics();
/// assert_eq!(metrics.total_acquired, 2);
/// assert_eq!(metrics.total_rejected, 1);
/// println!("{}", metrics);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimiterMetrics {
    /// Permits handed out since construction. A bulk acquisition of `n`
    /// counts `n`.
    pub total_acquired: u64,

    /// Acquisition attempts admitted since construction, one per call.
    pub total_admitted: u64,

    /// Acquisition attempts denied since construction.
    pub total_rejected: u64,

    /// Window resets performed by the replenisher.
    pub total_resets: u64,

    /// Permits left in the current window.
    pub available_permits: u64,

    /// Permits at the start of each window.
    pub capacity: u64,

    /// Whether the replenisher is still running.
    pub replenishing: bool,
}

impl RateLimiterMetrics {
    /// Fraction of attempts that were admitted, 1.0 when nothing was tried.
    #[inline]
    pub fn success_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            1.0
        } else {
            self.total_admitted as f64 / total as f64
        }
    }

    /// Fraction of attempts that were denied.
    #[inline]
    pub fn rejection_rate(&self) -> f64 {
        1.0 - self.success_rate()
    }

    /// Share of the current window's budget already spent (0.0 to 1.0).
    #[inline]
    pub fn utilization(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            1.0 - (self.available_permits as f64 / self.capacity as f64)
        }
    }

    /// Admitted plus denied attempts.
    #[inline]
    pub fn total_requests(&self) -> u64 {
        self.total_admitted.saturating_add(self.total_rejected)
    }

    /// True when the current window has no permit left.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.available_permits == 0
    }

    /// Human-readable multi-line report.
    pub fn summary(&self) -> String {
        format!(
            "RateLimiter Metrics:\n\
             ├─ Window:\n\
             │  ├─ Available Permits: {}/{}\n\
             │  └─ Utilization: {:.2}%\n\
             ├─ Counters:\n\
             │  ├─ Permits Acquired: {}\n\
             │  ├─ Calls Admitted: {}\n\
             │  ├─ Calls Rejected: {}\n\
             │  ├─ Success Rate: {:.2}%\n\
             │  └─ Total Resets: {}\n\
             └─ Replenishing: {}",
            self.available_permits,
            self.capacity,
            self.utilization() * 100.0,
            self.total_acquired,
            self.total_admitted,
            self.total_rejected,
            self.success_rate() * 100.0,
            self.total_resets,
            self.replenishing
        )
    }
}

impl fmt::Display for RateLimiterMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}
