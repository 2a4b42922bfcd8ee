//! Energy Classifier
//!
//! Samples the propulsion and system pack voltages plus the propulsion
//! current, smooths them and derives an [`EnergyClass`] with its throttle
//! policy.
//!
//! # Classification
//!
//! Evaluated most severe first on the smoothed voltages:
//!
//! | Class | Condition |
//! |-------|-----------|
//! | DEAD  | either voltage < 0.9 × min(prop crit, sys crit) |
//! | CRIT  | either voltage < its crit threshold |
//! | WARN  | either voltage < its warn threshold |
//! | OK    | otherwise |
//!
//! The throttle-limit factor is an upper bound on the shaper's throttle
//! target; ramp rates are unaffected.

use crate::algorithms::ema_filter::EmaFilter;
use crate::messages::{EnergyClass, EnergyState};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use tugbot_core::clock::RateGate;
use tugbot_core::params::EnergyConfig;

/// ADC reference voltage
pub const ADC_REF_VOLTS: f64 = 5.0;
/// Full-scale count of the 10-bit ADC
pub const ADC_FULL_SCALE: f64 = 1023.0;

/// Convert raw 10-bit ADC counts to volts at the pin
pub fn adc_counts_to_volts(counts: u16) -> f64 {
    f64::from(counts) * ADC_REF_VOLTS / ADC_FULL_SCALE
}

/// Uncalibrated pin voltages from the three energy channels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EnergyReading {
    pub v_prop: f64,
    pub v_sys: f64,
    pub i_prop: f64,
}

/// Synchronous source of energy readings
pub trait EnergySensors {
    fn read_energy(&mut self) -> EnergyReading;
}

impl EnergySensors for EnergyReading {
    fn read_energy(&mut self) -> EnergyReading {
        *self
    }
}

/// Voltage below which either pack is considered DEAD
///
/// One threshold is shared by both channels even though the packs have
/// different nominal voltages; with the default packs the system channel
/// hits CRIT long before this. Flagged for calibration review.
pub fn dead_threshold(config: &EnergyConfig) -> f64 {
    0.9 * config.v_prop_crit.min(config.v_sys_crit)
}

/// Classify a pair of smoothed voltages
pub fn classify(v_prop: f64, v_sys: f64, config: &EnergyConfig) -> EnergyClass {
    let dead = dead_threshold(config);
    if v_prop < dead || v_sys < dead {
        EnergyClass::Dead
    } else if v_prop < config.v_prop_crit || v_sys < config.v_sys_crit {
        EnergyClass::Crit
    } else if v_prop < config.v_prop_warn || v_sys < config.v_sys_warn {
        EnergyClass::Warn
    } else {
        EnergyClass::Ok
    }
}

/// Battery monitoring node
#[derive(Debug, Clone)]
pub struct EnergyClassifier {
    config: EnergyConfig,
    gate: RateGate,
    v_prop: EmaFilter,
    v_sys: EmaFilter,
    i_prop: EmaFilter,
    state: EnergyState,
    initialised: bool,
}

impl EnergyClassifier {
    pub fn new(config: EnergyConfig) -> Self {
        let alpha = config.smoothing_alpha;
        Self {
            gate: RateGate::new(config.min_update_interval_ms, 0),
            v_prop: EmaFilter::new(alpha),
            v_sys: EmaFilter::new(alpha),
            i_prop: EmaFilter::new(alpha),
            state: EnergyState::default(),
            initialised: false,
            config,
        }
    }

    /// Seed the filters from one synchronous read and classify it
    pub fn begin<S: EnergySensors + ?Sized>(&mut self, now_ms: u64, sensors: &mut S) {
        self.gate = RateGate::new(self.config.min_update_interval_ms, now_ms);

        let (v_prop, v_sys, i_prop) = self.calibrate(sensors.read_energy());
        self.v_prop.seed(v_prop);
        self.v_sys.seed(v_sys);
        self.i_prop.seed(i_prop);

        self.state = EnergyState::new(v_prop, v_sys, i_prop, classify(v_prop, v_sys, &self.config));
        self.initialised = true;
        info!(
            "Energy classifier started: {} (vProp {:.2} V, vSys {:.2} V)",
            self.state.class.as_str(),
            v_prop,
            v_sys
        );
    }

    /// Sample, smooth and reclassify; returns false when the sample was skipped
    /// because the previous one is too recent or [`begin`](Self::begin) has not run
    pub fn update<S: EnergySensors + ?Sized>(&mut self, now_ms: u64, sensors: &mut S) -> bool {
        if !self.initialised || self.gate.ready(now_ms).is_none() {
            return false;
        }

        let (v_prop, v_sys, i_prop) = self.calibrate(sensors.read_energy());
        let v_prop = self.v_prop.update(v_prop);
        let v_sys = self.v_sys.update(v_sys);
        let i_prop = self.i_prop.update(i_prop);

        let previous = self.state.class;
        self.state = EnergyState::new(v_prop, v_sys, i_prop, classify(v_prop, v_sys, &self.config));
        self.report_transition(previous);
        true
    }

    fn calibrate(&self, reading: EnergyReading) -> (f64, f64, f64) {
        (
            self.config.v_prop.apply(reading.v_prop),
            self.config.v_sys.apply(reading.v_sys),
            self.config.i_prop.apply(reading.i_prop),
        )
    }

    fn report_transition(&self, previous: EnergyClass) {
        let current = self.state.class;
        if current > previous {
            warn!(
                "Energy {} -> {}: vProp {:.2} V, vSys {:.2} V, throttle limit {}%",
                previous.as_str(),
                current.as_str(),
                self.state.v_prop,
                self.state.v_sys,
                self.state.throttle_limit_pct
            );
        } else if current < previous {
            info!(
                "Energy {} -> {}: throttle limit {}%",
                previous.as_str(),
                current.as_str(),
                self.state.throttle_limit_pct
            );
        }
    }

    pub fn state(&self) -> &EnergyState {
        &self.state
    }

    pub fn class(&self) -> EnergyClass {
        self.state.class
    }

    pub fn throttle_limit_factor(&self) -> f64 {
        self.state.throttle_limit_factor
    }

    pub fn effects_allowed(&self) -> bool {
        self.state.effects_allowed
    }

    pub fn config(&self) -> &EnergyConfig {
        &self.config
    }

    pub fn is_initialised(&self) -> bool {
        self.initialised
    }
}
