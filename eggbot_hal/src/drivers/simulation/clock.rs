//! Simulated time source.
//!
//! Time only moves when something sleeps or a blocking axis move completes.
//! A sleep never advances the clock by less than one sampling latency, so a
//! busy-poll loop issuing zero-length sleeps still makes progress.

use eggbot_common::hal::driver::Clock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::trace;

/// Shared simulated clock.
#[derive(Debug)]
pub struct SimClock {
    /// Nanoseconds since power-on.
    now_ns: AtomicU64,
    /// Minimum advance of one sleep.
    sample_latency: Duration,
}

impl SimClock {
    /// Create a clock at t = 0.
    pub fn new(sample_latency: Duration) -> Self {
        Self {
            now_ns: AtomicU64::new(0),
            sample_latency,
        }
    }

    /// Move simulated time forward.
    pub fn advance(&self, duration: Duration) {
        let ns = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        self.now_ns.fetch_add(ns, Ordering::Relaxed);
    }

    /// Minimum advance of one sleep.
    pub fn sample_latency(&self) -> Duration {
        self.sample_latency
    }
}

impl Clock for SimClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.now_ns.load(Ordering::Relaxed))
    }

    fn sleep(&self, duration: Duration) {
        let step = duration.max(self.sample_latency);
        trace!(?step, "sim clock sleep");
        self.advance(step);
    }
}
