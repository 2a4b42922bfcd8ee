//! Minimum-Run Hold Timer
//!
//! Keeps an actuator running for a minimum time after its trigger clears.
//!
//! The hold window is tracked as remaining time and is only advanced by
//! [`HoldTimer::update`]. A caller that stops calling `update` (for example
//! while a manual override is in force) freezes the window. New trigger
//! edges seen during that time still reach the timer through
//! [`HoldTimer::arm`], which restarts the window without advancing it.
//!
//! # Transitions
//!
//! ```text
//!              trigger                      trigger
//!   Idle ─────────────────▶ Active ◀──────────────────── Holding
//!    │                       │  (window re-armed to        ▲  │
//!    │                       │   min_run every update)     │  │ remaining == 0
//!    │                       └──── !trigger ───────────────┘  ▼
//!    │                                                      Idle
//!    │          arm (no time advanced)
//!    └──────────────────────────────────▶ Holding { min_run }
//!                                         (also from Holding)
//! ```
//!
//! # Example
//!
//! ```rust
//! use tugbot_library::algorithms::hold_timer::HoldTimer;
//!
//! let mut bilge = HoldTimer::new(10_000);
//! assert!(bilge.update(true, 0));        // wet for one tick
//! assert!(bilge.update(false, 50));      // dry again, still holding
//! assert!(!bilge.update(false, 9_950));  // window elapsed
//! ```

/// Hold timer state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoldState {
    /// Not running
    #[default]
    Idle,
    /// Trigger present; the window restarts at full length on every update
    Active,
    /// Trigger cleared; running out the remaining window
    Holding { remaining_ms: u64 },
}

impl HoldState {
    pub fn is_running(&self) -> bool {
        !matches!(self, HoldState::Idle)
    }
}

/// Minimum-run hold timer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoldTimer {
    min_run_ms: u64,
    state: HoldState,
}

impl HoldTimer {
    pub fn new(min_run_ms: u64) -> Self {
        Self {
            min_run_ms,
            state: HoldState::Idle,
        }
    }

    /// Advance by `dt_ms` with the current trigger level; returns whether the
    /// actuator should run
    pub fn update(&mut self, trigger: bool, dt_ms: u64) -> bool {
        self.state = if trigger {
            HoldState::Active
        } else {
            let remaining = match self.state {
                HoldState::Idle => 0,
                HoldState::Active => self.min_run_ms.saturating_sub(dt_ms),
                HoldState::Holding { remaining_ms } => remaining_ms.saturating_sub(dt_ms),
            };
            if remaining > 0 {
                HoldState::Holding {
                    remaining_ms: remaining,
                }
            } else {
                HoldState::Idle
            }
        };
        self.state.is_running()
    }

    /// Restart the full window on a trigger edge without advancing time
    ///
    /// A timer that is already `Active` stays active.
    pub fn arm(&mut self) {
        if self.state == HoldState::Active {
            return;
        }
        self.state = if self.min_run_ms > 0 {
            HoldState::Holding {
                remaining_ms: self.min_run_ms,
            }
        } else {
            HoldState::Idle
        };
    }

    pub fn state(&self) -> HoldState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Time left in the hold window; the full window while triggered
    pub fn remaining_ms(&self) -> u64 {
        match self.state {
            HoldState::Idle => 0,
            HoldState::Active => self.min_run_ms,
            HoldState::Holding { remaining_ms } => remaining_ms,
        }
    }

    pub fn min_run_ms(&self) -> u64 {
        self.min_run_ms
    }
}
