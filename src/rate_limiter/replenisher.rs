//! # Window Replenisher
//!
//! One background thread per limiter that resets the permit count at every
//! window boundary.
//!
//! ```text
//!     Replenisher Lifecycle:
//!
//!     RateLimiter::new ──► spawn "docrate-replenisher"
//!                              │
//!                              ▼
//!                  ┌──► recv_timeout(until next boundary)
//!                  │           │
//!                  │     Timeout ──► reset() ──► schedule next boundary
//!                  └───────────┘
//!                              │
//!     shutdown() ──► send(()) ─┘──► thread exits ──► join
//! ```
//!
//! Boundaries are `start + k * period`. A replenisher that falls more than a
//! full window behind (suspended process, starved thread) resets once and
//! re-anchors on the current time; skipped windows are never made up.

use super::core::PermitState;
use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

struct Worker {
    thread: thread::JoinHandle<()>,
    stop_tx: mpsc::Sender<()>,
}

/// Owned handle to the replenisher thread.
pub(crate) struct Replenisher {
    worker: Mutex<Option<Worker>>,
    state: Arc<PermitState>,
}

impl Replenisher {
    /// Spawns the thread. The first reset is due at `started_at + period`.
    pub(crate) fn start(
        state: Arc<PermitState>,
        period: Duration,
        started_at: Instant,
    ) -> Result<Self> {
        let (stop_tx, stop_rx) = mpsc::channel();
        let thread_state = state.clone();

        let thread = thread::Builder::new()
            .name("docrate-replenisher".to_string())
            .spawn(move || run(thread_state, period, started_at, stop_rx))
            .map_err(|err| {
                warn!("Failed to spawn replenisher thread: {}", err);
                Error::Spawn(err)
            })?;

        Ok(Self {
            worker: Mutex::new(Some(Worker { thread, stop_tx })),
            state,
        })
    }

    /// Signals the thread to exit and joins it.
    ///
    /// Returns `true` for the call that actually stopped the thread and
    /// `false` for every later call. The lock is held across the join so a
    /// concurrent caller also returns only after the thread has exited.
    pub(crate) fn stop(&self) -> bool {
        let mut worker = self.worker.lock();
        let Some(Worker { thread, stop_tx }) = worker.take() else {
            return false;
        };

        self.state.mark_stopped();

        // A send error only means the thread is already gone.
        let _ = stop_tx.send(());
        if thread.join().is_err() {
            warn!("Replenisher thread panicked before shutdown");
        }

        true
    }
}

fn run(
    state: Arc<PermitState>,
    period: Duration,
    started_at: Instant,
    stop_rx: mpsc::Receiver<()>,
) {
    info!("Started replenisher thread (period: {:?})", period);

    let mut next_reset = started_at.checked_add(period);

    loop {
        let signal = match next_reset {
            Some(deadline) => {
                stop_rx.recv_timeout(deadline.saturating_duration_since(Instant::now()))
            }
            // Boundary beyond what Instant can represent: only a stop can come.
            None => stop_rx.recv().map_err(|_| mpsc::RecvTimeoutError::Disconnected),
        };

        match signal {
            Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => {
                info!("Replenisher thread stopping");
                break;
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                state.reset();
                next_reset = next_boundary(next_reset, period, Instant::now());
                state.schedule(next_reset);
            }
        }
    }
}

/// Next fixed-rate boundary after `current`, re-anchored on `now` when more
/// than one full window was missed.
fn next_boundary(current: Option<Instant>, period: Duration, now: Instant) -> Option<Instant> {
    let next = current?.checked_add(period)?;
    if next <= now {
        debug!("Replenisher fell behind, re-anchoring window");
        now.checked_add(period)
    } else {
        Some(next)
    }
}
