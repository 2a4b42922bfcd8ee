//! Command shaper state

use serde::{Deserialize, Serialize};
use tugbot_core::LogSummary;

/// Throttle and rudder targets and actuals
///
/// Owned by the command shaper and updated once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct MotionState {
    /// Throttle target after limiting and reverse coast (-1..1)
    pub throttle_target: f64,
    /// Rate-limited throttle (-1..1)
    pub throttle_actual: f64,
    /// Rudder target after shaping and limit clamping (degrees)
    pub rudder_target_deg: f64,
    /// Rate-limited rudder angle (degrees)
    pub rudder_actual_deg: f64,
    /// End of the current reverse-coast window, if one is open
    pub reverse_coast_until_ms: Option<u64>,
}

impl LogSummary for MotionState {
    fn log_summary(&self) -> String {
        format!(
            "thr {:.3}->{:.3} rud {:.1}->{:.1}{}",
            self.throttle_actual,
            self.throttle_target,
            self.rudder_actual_deg,
            self.rudder_target_deg,
            if self.reverse_coast_until_ms.is_some() {
                " coast"
            } else {
                ""
            }
        )
    }
}
