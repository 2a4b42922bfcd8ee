//! Reverse-Coast Guard
//!
//! Inserts a forced-neutral window whenever the throttle target asks for the
//! opposite direction of the current actual throttle.
//!
//! # Transitions
//!
//! ```text
//!            sign(target) != sign(actual), both nonzero
//!  Driving ─────────────────────────────────────────────▶ Coasting { until }
//!     ▲                                                        │
//!     └──────────────────── now >= until ──────────────────────┘
//! ```
//!
//! A flip seen while already coasting re-arms the deadline, so the window
//! always ends `coast_ms` after the last tick on which the drive was still
//! turning the other way.
//!
//! # Example
//!
//! ```rust
//! use tugbot_library::algorithms::reverse_coast::ReverseCoast;
//!
//! let mut guard = ReverseCoast::new(200);
//! assert_eq!(guard.apply(0.5, -0.5, 1_000), 0.0);   // flip: coast
//! assert_eq!(guard.apply(0.0, -0.5, 1_100), 0.0);   // still inside window
//! assert_eq!(guard.apply(0.0, -0.5, 1_200), -0.5);  // window over
//! ```

/// Reverse-coast state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoastState {
    #[default]
    Driving,
    Coasting { until_ms: u64 },
}

/// Reverse-coast guard
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReverseCoast {
    coast_ms: u64,
    state: CoastState,
}

impl ReverseCoast {
    /// Create a guard; a zero `coast_ms` disables it
    pub fn new(coast_ms: u64) -> Self {
        Self {
            coast_ms,
            state: CoastState::Driving,
        }
    }

    /// True when `target` asks for the opposite direction of `actual`
    pub fn is_sign_flip(actual: f64, target: f64) -> bool {
        (actual > 0.0 && target < 0.0) || (actual < 0.0 && target > 0.0)
    }

    /// Filter a throttle target; returns 0 while a coast window is open
    pub fn apply(&mut self, actual: f64, target: f64, now_ms: u64) -> f64 {
        if self.coast_ms == 0 {
            return target;
        }

        if Self::is_sign_flip(actual, target) {
            self.state = CoastState::Coasting {
                until_ms: now_ms.saturating_add(self.coast_ms),
            };
        }

        match self.state {
            CoastState::Coasting { until_ms } if now_ms < until_ms => 0.0,
            CoastState::Coasting { .. } => {
                self.state = CoastState::Driving;
                target
            }
            CoastState::Driving => target,
        }
    }

    pub fn state(&self) -> CoastState {
        self.state
    }

    pub fn is_coasting(&self) -> bool {
        matches!(self.state, CoastState::Coasting { .. })
    }

    pub fn coast_ms(&self) -> u64 {
        self.coast_ms
    }

    pub fn reset(&mut self) {
        self.state = CoastState::Driving;
    }
}
