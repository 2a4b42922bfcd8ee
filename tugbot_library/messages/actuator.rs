//! Per-tick actuator command handed to the output drivers

use serde::{Deserialize, Serialize};
use tugbot_core::LogSummary;

use super::energy::EnergyClass;
use super::thermal::ThermalClass;

/// Map a normalized throttle (-1..1) to a symmetric 8-bit PWM duty
///
/// -1 maps to 0, neutral to 128, +1 to 255.
pub fn throttle_to_pwm(throttle: f64) -> u8 {
    let t = throttle.clamp(-1.0, 1.0);
    ((t + 1.0) * 0.5 * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Final governor output for one tick
///
/// Consumed by actuator drivers and telemetry; never fed back into the governor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ActuatorCommand {
    /// Actual throttle after shaping and limiting (-1..1)
    pub throttle: f64,
    pub throttle_pwm: u8,
    /// Actual rudder angle (degrees)
    pub rudder_deg: f64,
    /// Rudder relative to the commanded range (-1..1)
    pub rudder_norm: f64,

    pub cooling_pump: bool,
    pub bilge_pump: bool,

    pub energy_class: EnergyClass,
    pub thermal_class: ThermalClass,
    pub effects_allowed: bool,

    /// False while the intent link watchdog holds the failsafe
    pub link_ok: bool,
}

impl LogSummary for ActuatorCommand {
    fn log_summary(&self) -> String {
        format!(
            "thr={:.3}({}) rud={:.1}deg E={} T={} cool={} bilge={}{}",
            self.throttle,
            self.throttle_pwm,
            self.rudder_deg,
            self.energy_class.as_str(),
            self.thermal_class.as_str(),
            self.cooling_pump.log_summary(),
            self.bilge_pump.log_summary(),
            if self.link_ok { "" } else { " LINK-LOST" }
        )
    }
}
