//! Thermal / Ingress Guard
//!
//! Watches the motor and speed-controller temperatures and the bilge water
//! sensor, and drives the cooling and bilge pumps.
//!
//! - Thermal class: CRIT if hottest ≥ crit, WARN if hottest ≥ warn, else NORMAL
//! - Cooling pump: [`HysteresisSwitch`] on the hottest temperature
//! - Bilge pump: [`HoldTimer`] triggered by water ingress, so even a one-sample
//!   wet reading runs the pump for the full minimum-run window
//!
//! Either pump can be put under [`PumpControl::Manual`]. The manual value
//! applies immediately and the automatic state machine is neither advanced
//! nor reset until control returns to [`PumpControl::Automatic`].

use crate::algorithms::hold_timer::HoldTimer;
use crate::algorithms::hysteresis::{HysteresisSwitch, SwitchState};
use crate::messages::{PumpControl, ThermalClass, ThermalIngressState};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tugbot_core::clock::{elapsed_ms, RateGate};
use tugbot_core::params::EngineerConfig;
use tugbot_core::LogSummary;

/// Convert raw 10-bit ADC counts to a normalized water level
pub fn adc_counts_to_level(counts: u16) -> f64 {
    (f64::from(counts) / 1023.0).clamp(0.0, 1.0)
}

/// One synchronous read of the engine-room sensors
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineerReading {
    /// Motor temperature sensor (volts at the pin)
    pub temp1_volts: f64,
    /// Speed controller temperature sensor (volts at the pin)
    pub temp2_volts: f64,
    /// Normalized water sensor level (0..1)
    pub water_level: f64,
}

/// Synchronous source of engine-room readings
pub trait EngineerSensors {
    fn read_engineer(&mut self) -> EngineerReading;
}

impl EngineerSensors for EngineerReading {
    fn read_engineer(&mut self) -> EngineerReading {
        *self
    }
}

/// Classify the hottest temperature
pub fn classify(hottest_c: f64, config: &EngineerConfig) -> ThermalClass {
    if hottest_c >= config.temp_crit_c {
        ThermalClass::Crit
    } else if hottest_c >= config.temp_warn_c {
        ThermalClass::Warn
    } else {
        ThermalClass::Normal
    }
}

/// Temperature, ingress and pump supervision node
#[derive(Debug, Clone)]
pub struct ThermalIngressGuard {
    config: EngineerConfig,
    gate: RateGate,

    cooling: HysteresisSwitch,
    bilge: HoldTimer,
    cooling_control: PumpControl,
    bilge_control: PumpControl,

    last_counted_trigger_ms: Option<u64>,
    state: ThermalIngressState,
    initialised: bool,
}

impl ThermalIngressGuard {
    pub fn new(config: EngineerConfig) -> Self {
        Self {
            gate: RateGate::new(config.min_update_interval_ms, 0),
            cooling: HysteresisSwitch::new(config.cooling_on_c, config.cooling_off_c),
            bilge: HoldTimer::new(config.bilge_min_run_ms),
            cooling_control: PumpControl::Automatic,
            bilge_control: PumpControl::Automatic,
            last_counted_trigger_ms: None,
            state: ThermalIngressState::default(),
            initialised: false,
            config,
        }
    }

    /// Seed temperatures and ingress from one synchronous read
    ///
    /// Pumps stay off (or at their manual value) until the first update.
    pub fn begin<S: EngineerSensors + ?Sized>(&mut self, now_ms: u64, sensors: &mut S) {
        self.gate = RateGate::new(self.config.min_update_interval_ms, now_ms);

        let reading = sensors.read_engineer();
        self.update_temps(&reading);
        self.state.water_level = reading.water_level.clamp(0.0, 1.0);
        self.state.water_ingress = self.state.water_level >= self.config.water_wet_threshold;

        self.state.cooling_pump_on = manual_value(self.cooling_control);
        self.state.bilge_pump_on = manual_value(self.bilge_control);
        self.initialised = true;

        info!(
            "Thermal guard started: {} hottest {:.1} C, water {:.2}",
            self.state.thermal_class.as_str(),
            self.state.hottest_c,
            self.state.water_level
        );
    }

    /// Sample sensors and step both pump state machines; returns false when
    /// the sample was skipped
    pub fn update<S: EngineerSensors + ?Sized>(&mut self, now_ms: u64, sensors: &mut S) -> bool {
        if !self.initialised {
            return false;
        }
        let Some(dt_ms) = self.gate.ready(now_ms) else {
            return false;
        };

        let reading = sensors.read_engineer();
        self.update_temps(&reading);
        self.update_water(reading.water_level, now_ms);
        self.update_cooling_pump();
        self.update_bilge_pump(dt_ms);
        true
    }

    fn update_temps(&mut self, reading: &EngineerReading) {
        let temp1 = self.config.temp1.apply(reading.temp1_volts);
        let temp2 = self.config.temp2.apply(reading.temp2_volts);
        let hottest = temp1.max(temp2);
        let class = classify(hottest, &self.config);

        let previous = self.state.thermal_class;
        if self.initialised && class != previous {
            if class > previous {
                warn!(
                    "Thermal {} -> {}: hottest {:.1} C",
                    previous.as_str(),
                    class.as_str(),
                    hottest
                );
            } else {
                info!("Thermal {} -> {}", previous.as_str(), class.as_str());
            }
        }

        self.state.temp1_c = temp1;
        self.state.temp2_c = temp2;
        self.state.hottest_c = hottest;
        self.state.thermal_class = class;
    }

    fn update_water(&mut self, level: f64, now_ms: u64) {
        let level = level.clamp(0.0, 1.0);
        let was_wet = self.state.water_ingress;
        let wet = level >= self.config.water_wet_threshold;

        if wet && !was_wet {
            let counted = self.last_counted_trigger_ms.map_or(true, |last| {
                elapsed_ms(last, now_ms) >= self.config.bilge_retrigger_ms
            });
            if counted {
                self.state.bilge_trigger_count = self.state.bilge_trigger_count.saturating_add(1);
                self.last_counted_trigger_ms = Some(now_ms);
            }
            // Armed here so an edge seen under manual control is not lost
            self.bilge.arm();
            warn!("Water ingress detected: level {:.2}", level);
        } else if was_wet && !wet {
            info!("Water ingress cleared: level {:.2}", level);
        }

        self.state.water_level = level;
        self.state.water_ingress = wet;
    }

    fn update_cooling_pump(&mut self) {
        let on = match self.cooling_control {
            PumpControl::Manual(on) => on,
            PumpControl::Automatic => self.cooling.update(self.state.hottest_c).is_on(),
        };
        if on != self.state.cooling_pump_on {
            info!(
                "Cooling pump {} (hottest {:.1} C)",
                on.log_summary(),
                self.state.hottest_c
            );
        }
        self.state.cooling_pump_on = on;
    }

    fn update_bilge_pump(&mut self, dt_ms: u64) {
        let on = match self.bilge_control {
            PumpControl::Manual(on) => on,
            PumpControl::Automatic => self.bilge.update(self.state.water_ingress, dt_ms),
        };
        if on != self.state.bilge_pump_on {
            info!("Bilge pump {}", on.log_summary());
        } else if on && !self.state.water_ingress && !self.bilge_control.is_manual() {
            debug!("Bilge hold: {} ms remaining", self.bilge.remaining_ms());
        }
        self.state.bilge_pump_on = on;
    }

    /// Set supervisory control of the cooling pump
    pub fn set_cooling_override(&mut self, control: PumpControl) {
        if control != self.cooling_control {
            info!("Cooling pump control: {:?}", control);
        }
        self.cooling_control = control;
        if let PumpControl::Manual(on) = control {
            self.state.cooling_pump_on = on;
        }
    }

    /// Set supervisory control of the bilge pump
    pub fn set_bilge_override(&mut self, control: PumpControl) {
        if control != self.bilge_control {
            info!("Bilge pump control: {:?}", control);
        }
        self.bilge_control = control;
        if let PumpControl::Manual(on) = control {
            self.state.bilge_pump_on = on;
        }
    }

    pub fn cooling_control(&self) -> PumpControl {
        self.cooling_control
    }

    pub fn bilge_control(&self) -> PumpControl {
        self.bilge_control
    }

    pub fn state(&self) -> &ThermalIngressState {
        &self.state
    }

    /// Automatic cooling state, independent of any override
    pub fn cooling_switch_state(&self) -> SwitchState {
        self.cooling.state()
    }

    /// Automatic bilge hold timer, independent of any override
    pub fn bilge_timer(&self) -> &HoldTimer {
        &self.bilge
    }

    pub fn config(&self) -> &EngineerConfig {
        &self.config
    }

    pub fn is_initialised(&self) -> bool {
        self.initialised
    }
}

fn manual_value(control: PumpControl) -> bool {
    matches!(control, PumpControl::Manual(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dry(temp_volts: f64) -> EngineerReading {
        EngineerReading {
            temp1_volts: temp_volts,
            temp2_volts: 0.2,
            water_level: 0.1,
        }
    }

    fn wet(temp_volts: f64) -> EngineerReading {
        EngineerReading {
            water_level: 0.25,
            ..dry(temp_volts)
        }
    }

    fn started() -> ThermalIngressGuard {
        let mut guard = ThermalIngressGuard::new(EngineerConfig::default());
        guard.begin(0, &mut dry(0.3));
        guard
    }

    #[test]
    fn test_thermal_class_uses_hottest() {
        let config = EngineerConfig::default();
        assert_eq!(classify(30.0, &config), ThermalClass::Normal);
        assert_eq!(classify(65.0, &config), ThermalClass::Warn);
        assert_eq!(classify(80.0, &config), ThermalClass::Crit);

        let mut guard = started();
        let mut reading = EngineerReading {
            temp1_volts: 0.3,
            temp2_volts: 0.65,
            water_level: 0.0,
        };
        guard.update(50, &mut reading);
        assert_eq!(guard.state().thermal_class, ThermalClass::Warn);
        assert!((guard.state().hottest_c - 65.0).abs() < 1e-9);
    }

    #[test]
    fn test_cooling_hysteresis() {
        let mut guard = started();
        guard.update(50, &mut dry(0.50));
        assert!(!guard.state().cooling_pump_on);

        guard.update(100, &mut dry(0.58));
        assert!(guard.state().cooling_pump_on);

        // Inside the band: no change in either direction
        for i in 0..10 {
            guard.update(150 + i * 50, &mut dry(0.50));
            assert!(guard.state().cooling_pump_on);
        }

        guard.update(700, &mut dry(0.40));
        assert!(!guard.state().cooling_pump_on);
        guard.update(750, &mut dry(0.50));
        assert!(!guard.state().cooling_pump_on);
    }

    #[test]
    fn test_single_wet_tick_runs_full_window() {
        let mut guard = started();
        guard.update(50, &mut dry(0.3));
        assert!(!guard.state().bilge_pump_on);

        guard.update(100, &mut wet(0.3));
        assert!(guard.state().water_ingress);
        assert!(guard.state().bilge_pump_on);

        let mut now = 150;
        while now < 10_100 {
            guard.update(now, &mut dry(0.3));
            assert!(!guard.state().water_ingress);
            assert!(guard.state().bilge_pump_on, "pump stopped early at {} ms", now);
            now += 50;
        }
        guard.update(10_100, &mut dry(0.3));
        assert!(!guard.state().bilge_pump_on);
    }

    #[test]
    fn test_bilge_runs_while_wet() {
        let mut guard = started();
        let mut now = 50;
        while now <= 30_000 {
            guard.update(now, &mut wet(0.3));
            assert!(guard.state().bilge_pump_on);
            now += 50;
        }
        // Window restarts from the last wet sample
        guard.update(now, &mut dry(0.3));
        assert_eq!(guard.bilge_timer().remaining_ms(), 9_950);
    }

    #[test]
    fn test_manual_override_applies_immediately() {
        let mut guard = started();
        guard.set_cooling_override(PumpControl::Manual(true));
        assert!(guard.state().cooling_pump_on);

        guard.update(50, &mut dry(0.3));
        assert!(guard.state().cooling_pump_on);
        assert_eq!(guard.cooling_switch_state(), SwitchState::Off);

        guard.set_cooling_override(PumpControl::Automatic);
        guard.update(100, &mut dry(0.3));
        assert!(!guard.state().cooling_pump_on);
    }

    #[test]
    fn test_override_freezes_hold_window() {
        let mut guard = started();
        guard.update(50, &mut wet(0.3));
        guard.update(100, &mut dry(0.3));
        let remaining = guard.bilge_timer().remaining_ms();
        assert_eq!(remaining, 9_950);

        guard.set_bilge_override(PumpControl::Manual(false));
        assert!(!guard.state().bilge_pump_on);
        let mut now = 150;
        while now <= 20_000 {
            guard.update(now, &mut dry(0.3));
            assert!(!guard.state().bilge_pump_on);
            now += 50;
        }
        assert_eq!(guard.bilge_timer().remaining_ms(), remaining);

        // Clearing resumes the frozen window without re-triggering
        guard.set_bilge_override(PumpControl::Automatic);
        guard.update(now, &mut dry(0.3));
        assert!(guard.state().bilge_pump_on);
        assert_eq!(guard.bilge_timer().remaining_ms(), remaining - 50);
    }

    #[test]
    fn test_ingress_under_override_arms_window() {
        let mut guard = started();
        guard.update(50, &mut dry(0.3));
        guard.set_bilge_override(PumpControl::Manual(false));
        guard.update(100, &mut wet(0.3));
        guard.update(150, &mut dry(0.3));
        assert!(!guard.state().bilge_pump_on);
        assert_eq!(guard.state().bilge_trigger_count, 1);
        assert_eq!(guard.bilge_timer().remaining_ms(), 10_000);

        guard.set_bilge_override(PumpControl::Automatic);
        guard.update(1_100, &mut dry(0.3));
        assert!(guard.state().bilge_pump_on);
        assert_eq!(guard.bilge_timer().remaining_ms(), 9_050);
    }

    #[test]
    fn test_trigger_count_respects_retrigger_interval() {
        let mut guard = started();
        guard.update(50, &mut wet(0.3));
        guard.update(100, &mut dry(0.3));
        guard.update(150, &mut wet(0.3));
        assert_eq!(guard.state().bilge_trigger_count, 1);

        guard.update(200, &mut dry(0.3));
        guard.update(5_050, &mut wet(0.3));
        assert_eq!(guard.state().bilge_trigger_count, 2);
    }

    #[test]
    fn test_too_soon_is_skipped() {
        let mut guard = started();
        assert!(!guard.update(49, &mut wet(0.9)));
        assert!(!guard.state().water_ingress);
        assert!(guard.update(50, &mut wet(0.9)));
    }

    #[test]
    fn test_begin_seeds_ingress_without_running_pump() {
        let mut guard = ThermalIngressGuard::new(EngineerConfig::default());
        guard.begin(0, &mut wet(0.3));
        assert!(guard.state().water_ingress);
        assert!(!guard.state().bilge_pump_on);

        guard.update(50, &mut wet(0.3));
        assert!(guard.state().bilge_pump_on);
        // Already wet at startup, so no new trigger is counted
        assert_eq!(guard.state().bilge_trigger_count, 0);
    }

    #[test]
    fn test_adc_level() {
        assert_eq!(adc_counts_to_level(0), 0.0);
        assert_eq!(adc_counts_to_level(1023), 1.0);
        assert_eq!(adc_counts_to_level(4000), 1.0);
    }
}
