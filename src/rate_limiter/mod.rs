//! # Rate Limiter Module
//!
//! Internal implementation of the fixed-window limiter.
//!
//! ## Module Structure
//!
//! ```text
//!     rate_limiter/
//!     ├── mod.rs          (You are here - Module organization)
//!     ├── config.rs       (Capacity, period, memory ordering)
//!     ├── core.rs         (Permit counter and admission)
//!     ├── replenisher.rs  (Background window reset thread)
//!     ├── metrics.rs      (Counter snapshots)
//!     └── utils.rs        (Cache alignment, backoff)
//! ```
//!
//! ## Architecture Flow
//!
//! ```text
//!     try_acquire()              window boundary
//!          │                           │
//!          ▼                           ▼
//!     ┌─────────┐              ┌─────────────┐
//!     │  Core   │ ◄── reset ── │ Replenisher │
//!     └────┬────┘              └─────────────┘
//!          │
//!          ▼
//!     ┌─────────┐
//!     │  Utils  │ ◄── CAS backoff, cache alignment
//!     └─────────┘
//! ```

mod config;
mod core;
mod metrics;
mod replenisher;
mod utils;

/// Limiter configuration
pub use config::{MemoryOrdering, RateLimiterConfig};

/// Fixed-window rate limiter
pub use core::RateLimiter;

/// Counter snapshots
pub use metrics::RateLimiterMetrics;
