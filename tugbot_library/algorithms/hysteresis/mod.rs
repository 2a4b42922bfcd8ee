//! Two-Threshold Hysteresis Switch
//!
//! On/off control that avoids chattering around a single set point.
//!
//! # Transitions
//!
//! ```text
//!            value >= on_threshold
//!   Off  ─────────────────────────────▶  On
//!        ◀─────────────────────────────
//!            value <= off_threshold
//! ```
//!
//! While `off_threshold < value < on_threshold` the state never changes.
//!
//! # Example
//!
//! ```rust
//! use tugbot_library::algorithms::hysteresis::{HysteresisSwitch, SwitchState};
//!
//! let mut pump = HysteresisSwitch::new(55.0, 45.0);
//! assert_eq!(pump.update(56.0), SwitchState::On);
//! assert_eq!(pump.update(50.0), SwitchState::On);  // still on in the band
//! assert_eq!(pump.update(45.0), SwitchState::Off);
//! ```

/// Output of a hysteresis switch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwitchState {
    #[default]
    Off,
    On,
}

impl SwitchState {
    pub fn is_on(self) -> bool {
        self == SwitchState::On
    }
}

impl From<bool> for SwitchState {
    fn from(on: bool) -> Self {
        if on {
            SwitchState::On
        } else {
            SwitchState::Off
        }
    }
}

/// Hysteresis switch over a scalar input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HysteresisSwitch {
    on_threshold: f64,
    off_threshold: f64,
    state: SwitchState,
}

impl HysteresisSwitch {
    /// Create a switch in the `Off` state
    ///
    /// Callers are expected to pass `on_threshold > off_threshold`; when they
    /// are equal the switch degenerates to a single-threshold comparator.
    pub fn new(on_threshold: f64, off_threshold: f64) -> Self {
        Self {
            on_threshold,
            off_threshold,
            state: SwitchState::Off,
        }
    }

    /// Apply one input sample and return the resulting state
    pub fn update(&mut self, value: f64) -> SwitchState {
        self.state = match self.state {
            SwitchState::On if value <= self.off_threshold => SwitchState::Off,
            SwitchState::Off if value >= self.on_threshold => SwitchState::On,
            unchanged => unchanged,
        };
        self.state
    }

    pub fn state(&self) -> SwitchState {
        self.state
    }

    /// Force the state without evaluating thresholds
    pub fn set_state(&mut self, state: SwitchState) {
        self.state = state;
    }

    pub fn on_threshold(&self) -> f64 {
        self.on_threshold
    }

    pub fn off_threshold(&self) -> f64 {
        self.off_threshold
    }
}
