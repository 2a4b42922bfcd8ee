//! Millisecond time sources and the minimum-interval guard
//!
//! Every subsystem works on plain `u64` millisecond timestamps supplied by the
//! control loop. The loop reads one [`Clock`] per tick and hands the same value
//! to each subsystem so they all agree on "now".

use std::time::Instant;

/// Source of monotonic millisecond timestamps
pub trait Clock {
    /// Milliseconds since an arbitrary, fixed origin
    fn now_ms(&self) -> u64;
}

/// Wall clock backed by [`Instant`], counting from construction
#[derive(Debug, Clone)]
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
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Manually driven clock for simulation and tests
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: u64,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self { now_ms: start_ms }
    }

    /// Jump to an absolute time
    pub fn set(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
    }

    /// Move forward by `delta_ms`
    pub fn advance(&mut self, delta_ms: u64) {
        self.now_ms = self.now_ms.saturating_add(delta_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }
}

/// Elapsed milliseconds between two timestamps; zero if time went backwards
pub fn elapsed_ms(since_ms: u64, now_ms: u64) -> u64 {
    now_ms.saturating_sub(since_ms)
}

/// "Too soon" guard that keeps a sensor from being sampled faster than intended
///
/// [`RateGate::ready`] accepts a sample when at least `min_interval_ms` has
/// passed since the previously accepted one, and re-arms on acceptance.
#[derive(Debug, Clone)]
pub struct RateGate {
    min_interval_ms: u64,
    last_accepted_ms: u64,
}

impl RateGate {
    /// Create a gate whose first window starts at `start_ms`
    pub fn new(min_interval_ms: u64, start_ms: u64) -> Self {
        Self {
            min_interval_ms,
            last_accepted_ms: start_ms,
        }
    }

    /// Returns the elapsed time since the last accepted sample when a new one
    /// may be taken, re-arming the gate.
    pub fn ready(&mut self, now_ms: u64) -> Option<u64> {
        let dt = elapsed_ms(self.last_accepted_ms, now_ms);
        if dt < self.min_interval_ms {
            return None;
        }
        self.last_accepted_ms = now_ms;
        Some(dt)
    }

    pub fn min_interval_ms(&self) -> u64 {
        self.min_interval_ms
    }

    pub fn last_accepted_ms(&self) -> u64 {
        self.last_accepted_ms
    }
}
