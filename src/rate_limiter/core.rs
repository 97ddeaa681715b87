//! # Core Rate Limiter Implementation
//!
//! A fixed-window admission counter: every window starts with `capacity`
//! permits, each admitted operation takes one, and a background replenisher
//! puts the count back to `capacity` when the window ends.
//!
//! ```text
//!     Fixed Window (capacity = 5, period = 1s):
//!
//!     t=0.0s  [▣▣▣▣▣]  window opens with 5 permits
//!     t=0.2s  [▣▣▣□□]  2 admitted
//!     t=0.6s  [□□□□□]  3 more admitted, further callers denied
//!     t=1.0s  [▣▣▣▣▣]  reset, leftover budget is discarded, never added
//! ```
//!
//! ## Lock-Free Admission
//!
//! The permit count is one atomic. Admission is a compare-and-swap loop on
//! it and the window reset is a store to it, so every caller observes a
//! count in `[0, capacity]` and no decrement is lost or applied twice.
//!
//! ```text
//!     Thread A ──┐
//!                ├──► CAS(n, n-1) ──► admitted / retry / denied at 0
//!     Thread B ──┤        ▲
//!                │        │
//!     Replenisher ──► store(capacity) at each window boundary
//! ```
//!
//! ## Window Boundaries
//!
//! Windows are anchored at construction and scheduled at a fixed rate, so a
//! caller can be admitted `capacity` times at the end of one window and
//! `capacity` more right after the reset. Callers that need smooth pacing
//! must add their own spacing on top.

use super::{
    config::{MemoryOrdering, RateLimiterConfig},
    metrics::RateLimiterMetrics,
    replenisher::Replenisher,
    utils::{Backoff, CacheAligned},
};
use crate::error::Result;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Admission state shared between callers and the replenisher thread.
pub(crate) struct PermitState {
    /// Permits left in the current window. The only value admission reads.
    permits: CacheAligned<AtomicU64>,

    /// Construction time; scheduled boundaries are stored relative to it.
    origin: Instant,

    /// Next scheduled reset as nanoseconds after `origin`, or `NO_RESET`.
    next_reset_ns: AtomicU64,

    /// Cleared once the replenisher has been told to stop.
    running: AtomicBool,

    capacity: u64,
    ordering: MemoryOrdering,

    /// Permits handed out.
    total_acquired: AtomicU64,
    /// Calls admitted, whatever their permit count.
    total_admitted: AtomicU64,
    total_rejected: AtomicU64,
    total_resets: AtomicU64,
}

/// Boundary beyond what `Instant` can represent.
const NO_RESET: u64 = u64::MAX;

impl PermitState {
    fn new(config: &RateLimiterConfig, origin: Instant) -> Self {
        let state = Self {
            permits: CacheAligned::new(AtomicU64::new(config.capacity)),
            origin,
            next_reset_ns: AtomicU64::new(NO_RESET),
            running: AtomicBool::new(true),
            capacity: config.capacity,
            ordering: config.ordering,
            total_acquired: AtomicU64::new(0),
            total_admitted: AtomicU64::new(0),
            total_rejected: AtomicU64::new(0),
            total_resets: AtomicU64::new(0),
        };
        state.schedule(origin.checked_add(config.period));
        state
    }

    /// Takes `n` permits if at least `n` are left; all or nothing.
    #[inline]
    fn try_take(&self, n: u64) -> bool {
        let counter = self.permits.get();
        let mut backoff = Backoff::new();
        let mut current = counter.load(self.ordering.load());

        loop {
            if current < n {
                self.total_rejected.fetch_add(1, Ordering::Relaxed);
                return false;
            }

            match counter.compare_exchange_weak(
                current,
                current - n,
                self.ordering.rmw(),
                self.ordering.cas_failure(),
            ) {
                Ok(_) => {
                    self.total_acquired.fetch_add(n, Ordering::Relaxed);
                    self.total_admitted.fetch_add(1, Ordering::Relaxed);
                    return true;
                }
                Err(actual) => {
                    // Lost the race or failed spuriously: retry on the fresh value.
                    current = actual;
                    backoff.snooze();
                }
            }
        }
    }

    /// Starts a new window with the full budget.
    pub(crate) fn reset(&self) {
        let previous = self
            .permits
            .get()
            .swap(self.capacity, self.ordering.rmw());
        self.total_resets.fetch_add(1, Ordering::Relaxed);

        debug!("Window reset: {} -> {} permits", previous, self.capacity);
    }

    /// Records the boundary the replenisher will wake for next.
    pub(crate) fn schedule(&self, boundary: Option<Instant>) {
        let offset = boundary
            .and_then(|at| u64::try_from(at.saturating_duration_since(self.origin).as_nanos()).ok())
            .unwrap_or(NO_RESET);
        self.next_reset_ns.store(offset, self.ordering.store());
    }

    /// The boundary last passed to [`schedule`](Self::schedule).
    fn next_reset(&self) -> Option<Instant> {
        match self.next_reset_ns.load(self.ordering.load()) {
            NO_RESET => None,
            offset => self.origin.checked_add(Duration::from_nanos(offset)),
        }
    }

    #[inline]
    fn available(&self) -> u64 {
        self.permits.get().load(self.ordering.load())
    }

    #[inline]
    pub(crate) fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub(crate) fn mark_stopped(&self) {
        self.running.store(false, Ordering::Release);
    }
}

/// Fixed-window rate limiter admitting at most `capacity` operations per
/// `period`.
///
/// Construction starts one background replenisher thread;
/// [`shutdown`](Self::shutdown) (or dropping the limiter) stops it. Share a
/// limiter between threads or tasks with `Arc`.
///
/// ## Example
///
/// ```rust
/// use docrate::RateLimiter;
/// use std::sync::Arc;
/// use std::thread;
/// use std::time::Duration;
///
/// let limiter = Arc::new(RateLimiter::new(10, Duration::from_secs(1)).unwrap());
///
/// let handles: Vec<_> = (0..4)
///     .map(|_| {
///         let limiter = limiter.clone();
///         thread::spawn(move || (0..5).filter(|_| limiter.try_acquire()).count())
///     })
///     .collect();
///
/// let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
/// assert!(admitted <= 20);
/// limiter.shutdown();
/// ```
pub struct RateLimiter {
    state: Arc<PermitState>,
    period: Duration,
    replenisher: Replenisher,
}

impl RateLimiter {
    /// Creates a limiter admitting `capacity` operations per `period`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidConfiguration`](crate::Error::InvalidConfiguration)
    ///   if `capacity` is 0 or `period` is zero.
    /// - [`Error::Spawn`](crate::Error::Spawn) if the replenisher thread
    ///   cannot be started.
    ///
    /// ```rust
    /// use docrate::RateLimiter;
    /// use std::time::Duration;
    ///
    /// assert!(RateLimiter::new(0, Duration::from_secs(1)).is_err());
    /// assert!(RateLimiter::new(5, Duration::ZERO).is_err());
    /// ```
    pub fn new(capacity: u64, period: Duration) -> Result<Self> {
        Self::with_config(RateLimiterConfig::new(capacity, period))
    }

    /// Creates a limiter from a full configuration.
    pub fn with_config(config: RateLimiterConfig) -> Result<Self> {
        config.validate()?;

        let started_at = Instant::now();
        let state = Arc::new(PermitState::new(&config, started_at));
        let replenisher = Replenisher::start(state.clone(), config.period, started_at)?;

        Ok(Self {
            state,
            period: config.period,
            replenisher,
        })
    }

    /// Attempts to take one permit without blocking.
    ///
    /// Returns `true` and consumes a permit if one is left in the current
    /// window; returns `false` and changes nothing otherwise. Under `N`
    /// concurrent callers exactly `min(N, available)` calls succeed.
    ///
    /// Still works after [`shutdown`](Self::shutdown), against the frozen
    /// count.
    ///
    /// ```rust
    /// use docrate::RateLimiter;
    /// use std::time::Duration;
    ///
    /// let limiter = RateLimiter::new(2, Duration::from_secs(60)).unwrap();
    /// assert!(limiter.try_acquire());
    /// assert!(limiter.try_acquire());
    /// assert!(!limiter.try_acquire());
    /// ```
    #[inline]
    pub fn try_acquire(&self) -> bool {
        self.state.try_take(1)
    }

    /// Attempts to take `n` permits at once; either all are taken or none.
    ///
    /// `n == 0` always succeeds. `n > capacity` always fails.
    #[inline]
    pub fn try_acquire_n(&self, n: u64) -> bool {
        if n == 0 {
            return true;
        }
        if n > self.state.capacity {
            self.state.total_rejected.fetch_add(1, Ordering::Relaxed);
            return false;
        }
        self.state.try_take(n)
    }

    /// Permits left in the current window.
    #[inline]
    pub fn available_permits(&self) -> u64 {
        self.state.available()
    }

    /// Permits granted at the start of every window.
    #[inline]
    pub fn capacity(&self) -> u64 {
        self.state.capacity
    }

    /// Length of one window.
    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Whether windows are still being reset.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Time left until the next scheduled window boundary.
    ///
    /// Measured against the replenisher's own schedule, so it does not drift
    /// with the thread's wake-up latency. Reads zero in the instant between a
    /// boundary passing and the reset landing. `None` after shutdown, since
    /// no further reset will happen.
    pub fn time_until_reset(&self) -> Option<Duration> {
        if !self.state.is_running() {
            return None;
        }

        self.state
            .next_reset()
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// Snapshot of the limiter's counters.
    pub fn metrics(&self) -> RateLimiterMetrics {
        RateLimiterMetrics {
            total_acquired: self.state.total_acquired.load(Ordering::Relaxed),
            total_admitted: self.state.total_admitted.load(Ordering::Relaxed),
            total_rejected: self.state.total_rejected.load(Ordering::Relaxed),
            total_resets: self.state.total_resets.load(Ordering::Relaxed),
            available_permits: self.state.available(),
            capacity: self.state.capacity,
            replenishing: self.state.is_running(),
        }
    }

    /// Stops the replenisher and waits for its thread to exit.
    ///
    /// Idempotent and safe to call while other threads are acquiring. When
    /// it returns, no further reset will happen and the permit count stays
    /// where it is.
    ///
    /// ```rust
    /// use docrate::RateLimiter;
    /// use std::time::Duration;
    ///
    /// let limiter = RateLimiter::new(1, Duration::from_millis(10)).unwrap();
    /// limiter.shutdown();
    /// limiter.shutdown();
    /// assert!(!limiter.is_running());
    /// ```
    pub fn shutdown(&self) {
        if self.replenisher.stop() {
            debug!(
                "Rate limiter shut down with {}/{} permits left",
                self.state.available(),
                self.state.capacity
            );
        }
    }
}

impl Drop for RateLimiter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("capacity", &self.state.capacity)
            .field("period", &self.period)
            .field("available_permits", &self.available_permits())
            .field("running", &self.is_running())
            .finish()
    }
}
