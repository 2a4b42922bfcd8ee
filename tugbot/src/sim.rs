//! Bench simulation harness
//!
//! Drives a [`Governor`] from a scripted [`Scenario`] on a [`ManualClock`],
//! with simulated sensors standing in for the ADC channels.
//!
//! Scenarios are TOML:
//!
//! ```toml
//! name = "ingress blip"
//! duration_ms = 15000
//!
//! [[step]]
//! at_ms = 0
//! intent = { throttle_pct = 40, steer_pct = 0, armed = true }
//!
//! [[step]]
//! at_ms = 2000
//! water_level = 0.25
//!
//! [[step]]
//! at_ms = 2050
//! water_level = 0.05
//! ```

use crate::governor::Governor;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tugbot_core::clock::{Clock, ManualClock};
use tugbot_core::params::{EngineerConfig, TugbotConfig};
use tugbot_core::{LogSummary, TugbotResult};
use tugbot_library::{
    ActuatorCommand, DriveMode, EnergyClass, EnergyReading, EnergySensors, EngineerReading,
    EngineerSensors, IntentFrame, PumpControl, ThermalClass,
};

/// Simulated battery channels, already in calibrated units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimEnergySensors {
    pub v_prop: f64,
    pub v_sys: f64,
    pub i_prop: f64,
}

impl Default for SimEnergySensors {
    fn default() -> Self {
        Self {
            v_prop: 7.4,
            v_sys: 14.4,
            i_prop: 0.5,
        }
    }
}

impl EnergySensors for SimEnergySensors {
    fn read_energy(&mut self) -> EnergyReading {
        EnergyReading {
            v_prop: self.v_prop,
            v_sys: self.v_sys,
            i_prop: self.i_prop,
        }
    }
}

/// Simulated engine room in °C, converted back to pin volts through the
/// inverse of the configured calibration
#[derive(Debug, Clone, PartialEq)]
pub struct SimEngineerSensors {
    pub motor_c: f64,
    pub esc_c: f64,
    pub water_level: f64,
    calibration: EngineerConfig,
}

impl SimEngineerSensors {
    pub fn new(calibration: &EngineerConfig) -> Self {
        Self {
            motor_c: 25.0,
            esc_c: 25.0,
            water_level: 0.0,
            calibration: calibration.clone(),
        }
    }
}

fn celsius_to_volts(celsius: f64, scale: f64, offset: f64) -> f64 {
    if scale.abs() < f64::EPSILON {
        0.0
    } else {
        (celsius - offset) / scale
    }
}

impl EngineerSensors for SimEngineerSensors {
    fn read_engineer(&mut self) -> EngineerReading {
        let t1 = self.calibration.temp1;
        let t2 = self.calibration.temp2;
        EngineerReading {
            temp1_volts: celsius_to_volts(self.motor_c, t1.scale, t1.offset),
            temp2_volts: celsius_to_volts(self.esc_c, t2.scale, t2.offset),
            water_level: self.water_level,
        }
    }
}

/// Manual pump setting as written in scenario files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PumpSetting {
    Auto,
    On,
    Off,
}

impl From<PumpSetting> for PumpControl {
    fn from(setting: PumpSetting) -> Self {
        match setting {
            PumpSetting::Auto => PumpControl::Automatic,
            PumpSetting::On => PumpControl::Manual(true),
            PumpSetting::Off => PumpControl::Manual(false),
        }
    }
}

/// Operator intent as written in scenario files
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntentStep {
    pub throttle_pct: i8,
    #[serde(default)]
    pub steer_pct: i8,
    #[serde(default = "default_armed")]
    pub armed: bool,
    #[serde(default)]
    pub mode: u8,
}

fn default_armed() -> bool {
    true
}

impl From<IntentStep> for IntentFrame {
    fn from(step: IntentStep) -> Self {
        IntentFrame {
            throttle_pct: step.throttle_pct,
            steer_pct: step.steer_pct,
            armed: step.armed,
            mode: DriveMode::from_byte(step.mode),
        }
    }
}

/// Changes applied once the simulated clock reaches `at_ms`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioStep {
    pub at_ms: u64,
    pub intent: Option<IntentStep>,
    /// False stops intent frames from being delivered
    pub link: Option<bool>,
    pub v_prop: Option<f64>,
    pub v_sys: Option<f64>,
    pub i_prop: Option<f64>,
    pub motor_c: Option<f64>,
    pub esc_c: Option<f64>,
    pub water_level: Option<f64>,
    pub cooling: Option<PumpSetting>,
    pub bilge: Option<PumpSetting>,
    pub profile: Option<u8>,
}

/// Scripted sequence of operator and environment changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub duration_ms: Option<u64>,
    #[serde(default, rename = "step")]
    pub steps: Vec<ScenarioStep>,
}

impl Scenario {
    pub fn from_toml_str(text: &str) -> TugbotResult<Self> {
        let mut scenario: Self = toml::from_str(text)?;
        scenario.steps.sort_by_key(|step| step.at_ms);
        Ok(scenario)
    }

    pub fn load(path: &Path) -> TugbotResult<Self> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Time of the last scripted step
    pub fn last_step_ms(&self) -> u64 {
        self.steps.iter().map(|step| step.at_ms).max().unwrap_or(0)
    }

    /// Built-in tour of every governor behaviour
    pub fn demo() -> Self {
        let intent = |throttle_pct, steer_pct| IntentStep {
            throttle_pct,
            steer_pct,
            armed: true,
            mode: 0,
        };
        let at = |at_ms| ScenarioStep {
            at_ms,
            ..ScenarioStep::default()
        };

        Self {
            name: "demo".to_string(),
            duration_ms: Some(40_000),
            steps: vec![
                ScenarioStep {
                    intent: Some(intent(80, 0)),
                    ..at(0)
                },
                ScenarioStep {
                    intent: Some(intent(80, 60)),
                    ..at(3_000)
                },
                ScenarioStep {
                    intent: Some(intent(-60, 0)),
                    ..at(6_000)
                },
                ScenarioStep {
                    water_level: Some(0.3),
                    ..at(9_000)
                },
                ScenarioStep {
                    water_level: Some(0.05),
                    ..at(9_100)
                },
                ScenarioStep {
                    intent: Some(intent(100, 0)),
                    motor_c: Some(62.0),
                    ..at(12_000)
                },
                ScenarioStep {
                    v_prop: Some(6.9),
                    ..at(15_000)
                },
                ScenarioStep {
                    v_prop: Some(6.6),
                    motor_c: Some(78.0),
                    ..at(18_000)
                },
                ScenarioStep {
                    cooling: Some(PumpSetting::Off),
                    ..at(20_000)
                },
                ScenarioStep {
                    cooling: Some(PumpSetting::Auto),
                    motor_c: Some(40.0),
                    v_prop: Some(7.4),
                    ..at(22_000)
                },
                ScenarioStep {
                    link: Some(false),
                    ..at(25_000)
                },
                ScenarioStep {
                    link: Some(true),
                    profile: Some(2),
                    intent: Some(intent(30, -100)),
                    ..at(28_000)
                },
            ],
        }
    }
}

/// Aggregate observations over a simulation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimSummary {
    pub ticks: u64,
    pub duration_ms: u64,
    pub peak_throttle: f64,
    pub worst_energy: EnergyClass,
    pub worst_thermal: ThermalClass,
    pub cooling_on_ms: u64,
    pub bilge_on_ms: u64,
    pub bilge_triggers: u32,
    pub link_lost_ms: u64,
}

impl LogSummary for SimSummary {
    fn log_summary(&self) -> String {
        format!(
            "{} ticks over {} ms: peak throttle {:.2}, worst energy {}, worst thermal {}, cooling {} ms, bilge {} ms ({} triggers), link lost {} ms",
            self.ticks,
            self.duration_ms,
            self.peak_throttle,
            self.worst_energy.as_str(),
            self.worst_thermal.as_str(),
            self.cooling_on_ms,
            self.bilge_on_ms,
            self.bilge_triggers,
            self.link_lost_ms
        )
    }
}

/// Simulated governor plus the scenario driving it
pub struct Simulation {
    governor: Governor<SimEnergySensors, SimEngineerSensors>,
    scenario: Scenario,
    next_step: usize,
    clock: ManualClock,
    period_ms: u64,
    intent: IntentFrame,
    transmitting: bool,
    summary: SimSummary,
}

impl Simulation {
    /// Build a simulation ticking at `rate_hz` (clamped to 1..=1000)
    pub fn new(config: &TugbotConfig, scenario: Scenario, rate_hz: u32) -> Self {
        let clock = ManualClock::new(0);
        let governor = Governor::new(
            config,
            SimEnergySensors::default(),
            SimEngineerSensors::new(&config.engineer),
            clock.now_ms(),
        );
        Self {
            governor,
            scenario,
            next_step: 0,
            clock,
            period_ms: 1_000 / u64::from(rate_hz.clamp(1, 1_000)),
            intent: IntentFrame::neutral(),
            transmitting: true,
            summary: SimSummary::default(),
        }
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    pub fn governor(&self) -> &Governor<SimEnergySensors, SimEngineerSensors> {
        &self.governor
    }

    pub fn governor_mut(&mut self) -> &mut Governor<SimEnergySensors, SimEngineerSensors> {
        &mut self.governor
    }

    pub fn summary(&self) -> &SimSummary {
        &self.summary
    }

    fn apply_due_steps(&mut self, now_ms: u64) {
        while let Some(step) = self.scenario.steps.get(self.next_step) {
            if step.at_ms > now_ms {
                break;
            }
            let step = step.clone();
            self.next_step += 1;
            log::debug!("Scenario step at {} ms", step.at_ms);

            if let Some(intent) = step.intent {
                self.intent = intent.into();
            }
            if let Some(link) = step.link {
                self.transmitting = link;
            }

            let battery = self.governor.energy_sensors_mut();
            if let Some(v) = step.v_prop {
                battery.v_prop = v;
            }
            if let Some(v) = step.v_sys {
                battery.v_sys = v;
            }
            if let Some(i) = step.i_prop {
                battery.i_prop = i;
            }

            let engine_room = self.governor.engineer_sensors_mut();
            if let Some(c) = step.motor_c {
                engine_room.motor_c = c;
            }
            if let Some(c) = step.esc_c {
                engine_room.esc_c = c;
            }
            if let Some(level) = step.water_level {
                engine_room.water_level = level;
            }

            if let Some(setting) = step.cooling {
                self.governor.set_cooling_override(setting.into());
            }
            if let Some(setting) = step.bilge {
                self.governor.set_bilge_override(setting.into());
            }
            if let Some(profile) = step.profile {
                self.governor.set_active_profile(usize::from(profile));
            }
        }
    }

    /// Advance one period and run a governor tick
    pub fn step(&mut self) -> ActuatorCommand {
        self.clock.advance(self.period_ms);
        let now = self.clock.now_ms();

        self.apply_due_steps(now);
        if self.transmitting {
            self.governor.submit_intent(self.intent, now);
        }
        let command = self.governor.tick(now);
        self.record(&command, now);
        command
    }

    fn record(&mut self, command: &ActuatorCommand, now_ms: u64) {
        let s = &mut self.summary;
        s.ticks += 1;
        s.duration_ms = now_ms;
        s.peak_throttle = s.peak_throttle.max(command.throttle.abs());
        s.worst_energy = s.worst_energy.max(command.energy_class);
        s.worst_thermal = s.worst_thermal.max(command.thermal_class);
        if command.cooling_pump {
            s.cooling_on_ms += self.period_ms;
        }
        if command.bilge_pump {
            s.bilge_on_ms += self.period_ms;
        }
        if !command.link_ok {
            s.link_lost_ms += self.period_ms;
        }
        s.bilge_triggers = self.governor.thermal_state().bilge_trigger_count;
    }

    /// Run until `duration_ms` of simulated time has elapsed, calling
    /// `on_tick` after every tick
    pub fn run<F>(&mut self, duration_ms: u64, mut on_tick: F) -> SimSummary
    where
        F: FnMut(u64, &ActuatorCommand),
    {
        while self.clock.now_ms() + self.period_ms <= duration_ms {
            let command = self.step();
            on_tick(self.clock.now_ms(), &command);
        }
        self.summary.clone()
    }

    /// Run for the scenario's own duration, or one second past its last step
    pub fn run_scenario<F>(&mut self, on_tick: F) -> SimSummary
    where
        F: FnMut(u64, &ActuatorCommand),
    {
        let duration = self
            .scenario
            .duration_ms
            .unwrap_or_else(|| self.scenario.last_step_ms() + 1_000);
        self.run(duration, on_tick)
    }
}
