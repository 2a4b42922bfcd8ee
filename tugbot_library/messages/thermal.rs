//! Thermal and water-ingress messages

use serde::{Deserialize, Serialize};
use tugbot_core::LogSummary;

/// Temperature severity of the hotter sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum ThermalClass {
    #[default]
    Normal,
    Warn,
    Crit,
}

impl ThermalClass {
    pub fn as_str(self) -> &'static str {
        match self {
            ThermalClass::Normal => "NORMAL",
            ThermalClass::Warn => "WARN",
            ThermalClass::Crit => "CRIT",
        }
    }
}

/// Supervisory control of one pump
///
/// `Manual(on)` replaces the automatic decision for as long as it is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PumpControl {
    #[default]
    Automatic,
    Manual(bool),
}

impl PumpControl {
    pub fn is_manual(self) -> bool {
        matches!(self, PumpControl::Manual(_))
    }

    /// The (enabled, value) pair used by operator panels
    pub fn from_pair(enabled: bool, on: bool) -> Self {
        if enabled {
            PumpControl::Manual(on)
        } else {
            PumpControl::Automatic
        }
    }
}

/// Temperatures, ingress and pump outputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ThermalIngressState {
    /// Motor temperature (°C)
    pub temp1_c: f64,
    /// Speed controller temperature (°C)
    pub temp2_c: f64,
    pub hottest_c: f64,
    pub thermal_class: ThermalClass,

    /// Normalized water sensor level (0..1)
    pub water_level: f64,
    pub water_ingress: bool,

    pub cooling_pump_on: bool,
    pub bilge_pump_on: bool,
    /// Dry-to-wet events spaced at least the retrigger interval apart
    pub bilge_trigger_count: u32,
}

impl LogSummary for ThermalIngressState {
    fn log_summary(&self) -> String {
        format!(
            "{} hottest={:.1}C water={:.2}{} cool={} bilge={}",
            self.thermal_class.as_str(),
            self.hottest_c,
            self.water_level,
            if self.water_ingress { " WET" } else { "" },
            self.cooling_pump_on.log_summary(),
            self.bilge_pump_on.log_summary()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pump_control_pairs() {
        assert_eq!(PumpControl::from_pair(false, true), PumpControl::Automatic);
        assert_eq!(PumpControl::from_pair(true, false), PumpControl::Manual(false));
        assert!(PumpControl::Manual(true).is_manual());
        assert!(!PumpControl::Automatic.is_manual());
    }

    #[test]
    fn test_summary_marks_ingress() {
        let state = ThermalIngressState {
            water_ingress: true,
            bilge_pump_on: true,
            water_level: 0.3,
            ..Default::default()
        };
        let summary = state.log_summary();
        assert!(summary.contains("WET"));
        assert!(summary.contains("bilge=on"));
    }
}
