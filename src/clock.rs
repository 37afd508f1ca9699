//! Time sources for the calibration window.
//!
//! Calibration is measured in elapsed wall-clock time, not tick count, so the
//! pipeline asks a [`Clock`] for the current offset from an arbitrary origin.
//! [`MonotonicClock`] is used on device; [`ManualClock`] drives replays and
//! tests where ticks carry their own timing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A monotonic source of elapsed time.
pub trait Clock {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;
}

/// Clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Externally advanced clock.
///
/// Clones share the same time, so a caller can keep a handle and advance it
/// while the pipeline owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_us: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward. Saturates at `u64::MAX` microseconds.
    pub fn advance(&self, by: Duration) {
        let by = micros(by);
        // The closure always returns Some, so the update cannot fail.
        let _ = self
            .now_us
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |now| {
                Some(now.saturating_add(by))
            });
    }

    /// Jump to an absolute offset. Callers must not move time backwards.
    pub fn set(&self, at: Duration) {
        self.now_us.store(micros(at), Ordering::SeqCst);
    }
}

fn micros(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_micros(self.now_us.load(Ordering::SeqCst))
    }
}
