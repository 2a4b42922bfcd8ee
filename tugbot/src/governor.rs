//! Propulsion & Safety Governor
//!
//! Composition root that owns the three subsystems, their sensors and the
//! intent link watchdog, and runs them in a fixed order every tick:
//!
//! 1. Energy classifier samples the packs and sets the throttle-limit factor
//! 2. Intent watchdog supplies the operator intent (neutral when stale)
//! 3. Command shaper shapes the intent under that limit factor
//! 4. Thermal/ingress guard samples the engine room and drives the pumps
//!
//! The resulting [`ActuatorCommand`] goes to the output drivers and is never
//! fed back into the governor.
//!
//! # Example
//!
//! ```rust
//! use tugbot::prelude::*;
//!
//! let config = TugbotConfig::default();
//! let battery = EnergyReading { v_prop: 7.4, v_sys: 14.2, i_prop: 1.0 };
//! let engine_room = EngineerReading { temp1_volts: 0.3, temp2_volts: 0.3, water_level: 0.0 };
//!
//! let mut governor = Governor::new(&config, battery, engine_room, 0);
//! governor.submit_intent(IntentFrame::new(100, 0, true), 0);
//!
//! let command = governor.tick(500);
//! assert!(command.link_ok);
//! assert!((command.throttle - 0.1).abs() < 1e-9);
//! ```

use crate::link::IntentLink;
use tugbot_core::params::TugbotConfig;
use tugbot_library::{
    throttle_to_pwm, ActuatorCommand, CommandShaper, EnergyClassifier, EnergySensors,
    EnergyState, EngineerSensors, IntentFrame, MotionState, PumpControl, ThermalIngressGuard,
    ThermalIngressState,
};

/// Tick-driven governor over explicitly owned sensors
pub struct Governor<E: EnergySensors, G: EngineerSensors> {
    shaper: CommandShaper,
    energy: EnergyClassifier,
    thermal: ThermalIngressGuard,
    link: IntentLink,

    energy_sensors: E,
    engineer_sensors: G,

    last_command: ActuatorCommand,
    ticks: u64,
}

impl<E: EnergySensors, G: EngineerSensors> Governor<E, G> {
    /// Build every subsystem from a validated configuration snapshot and seed
    /// them with one synchronous sensor read each
    pub fn new(config: &TugbotConfig, mut energy_sensors: E, mut engineer_sensors: G, now_ms: u64) -> Self {
        let mut shaper = CommandShaper::from_config(config);
        shaper.begin(now_ms);

        let mut energy = EnergyClassifier::new(config.energy.clone());
        energy.begin(now_ms, &mut energy_sensors);

        let mut thermal = ThermalIngressGuard::new(config.engineer.clone());
        thermal.begin(now_ms, &mut engineer_sensors);

        log::info!(
            "Governor ready: profile {}, energy {}, thermal {}",
            shaper.active_profile(),
            energy.class().as_str(),
            thermal.state().thermal_class.as_str()
        );

        let mut governor = Self {
            shaper,
            energy,
            thermal,
            link: IntentLink::new(&config.link),
            energy_sensors,
            engineer_sensors,
            last_command: ActuatorCommand::default(),
            ticks: 0,
        };
        governor.last_command = governor.compose(false);
        governor
    }

    /// Hand over a frame received by the transport layer
    pub fn submit_intent(&mut self, frame: IntentFrame, now_ms: u64) {
        self.link.submit(frame, now_ms);
    }

    /// Run one control tick
    pub fn tick(&mut self, now_ms: u64) -> ActuatorCommand {
        self.energy.update(now_ms, &mut self.energy_sensors);

        let (frame, link_ok) = self.link.current(now_ms);
        let intent = frame.normalized();
        let throttle = if intent.armed { intent.throttle } else { 0.0 };

        self.shaper.update(
            throttle,
            intent.steer,
            now_ms,
            self.energy.throttle_limit_factor(),
        );

        self.thermal.update(now_ms, &mut self.engineer_sensors);

        self.ticks += 1;
        self.last_command = self.compose(link_ok);
        self.last_command
    }

    fn compose(&self, link_ok: bool) -> ActuatorCommand {
        let motion = self.shaper.state();
        let energy = self.energy.state();
        let thermal = self.thermal.state();
        ActuatorCommand {
            throttle: motion.throttle_actual,
            throttle_pwm: throttle_to_pwm(motion.throttle_actual),
            rudder_deg: motion.rudder_actual_deg,
            rudder_norm: self.shaper.rudder_norm(),
            cooling_pump: thermal.cooling_pump_on,
            bilge_pump: thermal.bilge_pump_on,
            energy_class: energy.class,
            thermal_class: thermal.thermal_class,
            effects_allowed: energy.effects_allowed,
            link_ok,
        }
    }

    pub fn set_cooling_override(&mut self, control: PumpControl) {
        self.thermal.set_cooling_override(control);
        self.last_command.cooling_pump = self.thermal.state().cooling_pump_on;
    }

    pub fn set_bilge_override(&mut self, control: PumpControl) {
        self.thermal.set_bilge_override(control);
        self.last_command.bilge_pump = self.thermal.state().bilge_pump_on;
    }

    pub fn set_active_profile(&mut self, index: usize) {
        self.shaper.set_active_profile(index);
    }

    pub fn active_profile(&self) -> usize {
        self.shaper.active_profile()
    }

    pub fn last_command(&self) -> &ActuatorCommand {
        &self.last_command
    }

    pub fn motion_state(&self) -> &MotionState {
        self.shaper.state()
    }

    pub fn energy_state(&self) -> &EnergyState {
        self.energy.state()
    }

    pub fn thermal_state(&self) -> &ThermalIngressState {
        self.thermal.state()
    }

    pub fn latest_intent(&self) -> &IntentFrame {
        self.link.latest()
    }

    pub fn shaper(&self) -> &CommandShaper {
        &self.shaper
    }

    pub fn thermal_guard(&self) -> &ThermalIngressGuard {
        &self.thermal
    }

    pub fn energy_sensors_mut(&mut self) -> &mut E {
        &mut self.energy_sensors
    }

    pub fn engineer_sensors_mut(&mut self) -> &mut G {
        &mut self.engineer_sensors
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
