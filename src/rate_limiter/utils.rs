//! # Utility Functions (utils.rs)
//!
//! Low-level helpers for the admission path: a cache-line wrapper for the
//! hot permit counter and spin-then-yield backoff for the compare-and-swap
//! loop.
//!
//! ```text
//!     Platform-Specific Features:
//!
//!     x86_64 (Intel/AMD):
//!     ├─ Cache line: 64 bytes
//!     └─ PAUSE instruction for spin loops
//!
//!     AArch64 (ARM):
//!     ├─ Cache line: 128 bytes
//!     └─ YIELD instruction for spin loops
//!
//!     Generic (Fallback):
//!     ├─ Cache line: 64 bytes (assumed)
//!     └─ Standard spin loop hints
//! ```

/// Cache line size for x86_64 processors.
#[cfg(target_arch = "x86_64")]
pub(crate) const CACHE_LINE_SIZE: usize = 64;

/// Cache line size for ARM64 processors.
#[cfg(target_arch = "aarch64")]
pub(crate) const CACHE_LINE_SIZE: usize = 128;

/// Assumed cache line size elsewhere.
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub(crate) const CACHE_LINE_SIZE: usize = 64;

/// Hint to the CPU that the caller is spinning.
///
/// `spin_loop` lowers to PAUSE on x86_64 and YIELD/ISB on ARM64.
#[inline(always)]
pub(crate) fn cpu_relax() {
    std::hint::spin_loop();
}

/// Cache-aligned wrapper preventing false sharing.
///
/// ```text
///     Without Cache Alignment:
///     ┌───────────────────────────┐
///     │ permits │ total_acquired  │ ← Same cache line
///     └───────────────────────────┘
///     Every metrics bump invalidates the counter callers CAS on.
///
///     With Cache Alignment:
///     ┌───────────────────────────┐
///     │          permits          │ ← Own cache line
///     └───────────────────────────┘
/// ```
#[cfg(target_arch = "x86_64")]
#[repr(C, align(64))]
pub(crate) struct CacheAligned<T>(pub(crate) T);
#[cfg(target_arch = "aarch64")]
#[repr(C, align(128))]
pub(crate) struct CacheAligned<T>(pub(crate) T);
#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
#[repr(C, align(64))]
pub(crate) struct CacheAligned<T>(pub(crate) T);

const _: () = assert!(std::mem::align_of::<CacheAligned<u64>>() == CACHE_LINE_SIZE);

impl<T> CacheAligned<T> {
    #[inline(always)]
    pub(crate) const fn new(value: T) -> Self {
        Self(value)
    }

    #[inline(always)]
    pub(crate) fn get(&self) -> &T {
        &self.0
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for CacheAligned<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Spin-then-yield backoff for compare-and-swap retries.
///
/// ```text
///     Retry attempts and backoff:
///
///     Attempt 1: Spin 1 time
///     Attempt 2: Spin 2 times
///     Attempt 3: Spin 4 times
///     Attempt 4: Spin 8 times
///     Attempt 5+: Yield to scheduler
/// ```
///
/// Backoff never gives up; the admission loop keeps retrying for as long as
/// permits remain.
#[derive(Debug, Clone, Default)]
pub(crate) struct Backoff {
    step: u32,
}

/// Number of spinning steps before yielding to the scheduler.
const SPIN_LIMIT: u32 = 4;

impl Backoff {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn snooze(&mut self) {
        if self.step < SPIN_LIMIT {
            for _ in 0..(1 << self.step) {
                cpu_relax();
            }
            self.step += 1;
        } else {
            std::thread::yield_now();
        }
    }

    #[cfg(test)]
    fn is_yielding(&self) -> bool {
        self.step >= SPIN_LIMIT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    #[test]
    fn test_cache_line_size() {
        assert!(CACHE_LINE_SIZE >= 32);
        assert!(CACHE_LINE_SIZE <= 256);
        assert!(CACHE_LINE_SIZE.is_power_of_two());
        assert_eq!(std::mem::align_of::<CacheAligned<AtomicU64>>(), CACHE_LINE_SIZE);
    }

    #[test]
    fn test_cpu_relax_in_spin_loop() {
        let flag = AtomicU64::new(0);
        let mut spins = 0;
        while flag.load(Ordering::Relaxed) == 0 {
            cpu_relax();
            spins += 1;
            if spins == 64 {
                flag.store(1, Ordering::Relaxed);
            }
        }
        assert_eq!(spins, 64);
    }

    #[test]
    fn test_cache_aligned() {
        let aligned = CacheAligned::new(AtomicU64::new(42));
        assert_eq!(aligned.get().load(Ordering::Relaxed), 42);
        assert_eq!(format!("{:?}", CacheAligned::new(7u64)), "7");
    }

    #[test]
    fn test_backoff_progression() {
        let mut backoff = Backoff::new();
        assert!(!backoff.is_yielding());

        for _ in 0..SPIN_LIMIT {
            backoff.snooze();
        }
        assert!(backoff.is_yielding());

        // Stays in yield mode
        backoff.snooze();
        assert!(backoff.is_yielding());
    }
}
