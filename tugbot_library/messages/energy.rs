//! Energy classification messages

use serde::{Deserialize, Serialize};
use tugbot_core::LogSummary;

/// Battery severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum EnergyClass {
    /// Normal operation
    #[default]
    Ok,
    /// Lowish, start backing off
    Warn,
    /// Critical, limp mode
    Crit,
    /// Essentially flat, stop propulsion
    Dead,
}

impl EnergyClass {
    /// Throttle-limit factor applied to the shaper's target for this class
    pub fn throttle_limit_factor(self) -> f64 {
        match self {
            EnergyClass::Ok => 1.0,
            EnergyClass::Warn => 0.7,
            EnergyClass::Crit => 0.3,
            EnergyClass::Dead => 0.0,
        }
    }

    /// Whether non-essential loads (smoke, big sound effects) may run
    pub fn effects_allowed(self) -> bool {
        matches!(self, EnergyClass::Ok | EnergyClass::Warn)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EnergyClass::Ok => "OK",
            EnergyClass::Warn => "WARN",
            EnergyClass::Crit => "CRIT",
            EnergyClass::Dead => "DEAD",
        }
    }
}

/// Smoothed battery readings and the policy derived from them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyState {
    /// Propulsion pack voltage (V)
    pub v_prop: f64,
    /// Logic/accessory pack voltage (V)
    pub v_sys: f64,
    /// Propulsion current (A)
    pub i_prop: f64,
    /// Approximate propulsion power (W)
    pub power_w: f64,

    pub class: EnergyClass,

    /// Multiply the throttle target by this (0..1)
    pub throttle_limit_factor: f64,
    /// Same limit as a rounded percentage (0..=100)
    pub throttle_limit_pct: u8,
    pub effects_allowed: bool,
}

impl EnergyState {
    /// Readings with the policy for `class` applied
    pub fn new(v_prop: f64, v_sys: f64, i_prop: f64, class: EnergyClass) -> Self {
        let factor = class.throttle_limit_factor().clamp(0.0, 1.0);
        Self {
            v_prop,
            v_sys,
            i_prop,
            power_w: v_prop * i_prop,
            class,
            throttle_limit_factor: factor,
            throttle_limit_pct: (factor * 100.0).round() as u8,
            effects_allowed: class.effects_allowed(),
        }
    }
}

impl Default for EnergyState {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, EnergyClass::Ok)
    }
}

impl LogSummary for EnergyState {
    fn log_summary(&self) -> String {
        format!(
            "{} vProp={:.2}V vSys={:.2}V iProp={:.2}A limit={}%",
            self.class.as_str(),
            self.v_prop,
            self.v_sys,
            self.i_prop,
            self.throttle_limit_pct
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_table() {
        let cases = [
            (EnergyClass::Ok, 1.0, 100, true),
            (EnergyClass::Warn, 0.7, 70, true),
            (EnergyClass::Crit, 0.3, 30, false),
            (EnergyClass::Dead, 0.0, 0, false),
        ];
        for (class, factor, pct, effects) in cases {
            let state = EnergyState::new(7.2, 14.0, 2.0, class);
            assert_eq!(state.throttle_limit_factor, factor);
            assert_eq!(state.throttle_limit_pct, pct);
            assert_eq!(state.effects_allowed, effects);
        }
    }

    #[test]
    fn test_severity_ordering() {
        assert!(EnergyClass::Ok < EnergyClass::Warn);
        assert!(EnergyClass::Warn < EnergyClass::Crit);
        assert!(EnergyClass::Crit < EnergyClass::Dead);
    }

    #[test]
    fn test_power() {
        let state = EnergyState::new(7.0, 14.0, 3.0, EnergyClass::Ok);
        assert_eq!(state.power_w, 21.0);
    }
}
