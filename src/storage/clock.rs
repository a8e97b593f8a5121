//! Clock Sources
//!
//! Monotonic "now" providers used for computing and checking deadlines.

use parking_lot::Mutex;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Source of monotonic time for expiry decisions
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> Instant;
}

/// Real monotonic clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Manually driven clock for deterministic tests.
///
/// Clones share the same time source, so a test can keep one handle and
/// hand another to the store.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    /// Create a clock frozen at the current instant
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    /// Move time forward. Saturates at the latest representable instant
    /// instead of wrapping.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        let mut remaining = by;
        let mut step = by;
        // Halve the step on overflow until it fits; ends within 1ns of the limit
        while !remaining.is_zero() && !step.is_zero() {
            step = step.min(remaining);
            match now.checked_add(step) {
                Some(next) => {
                    *now = next;
                    remaining -= step;
                }
                None => step /= 2,
            }
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }
}
