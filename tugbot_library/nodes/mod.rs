//! Stateful governor subsystems
//!
//! Each node exclusively owns its state record and mutates it once per tick.
//! Sensors are passed in on every call; nodes never hold hardware handles.

pub mod command_shaper;
pub mod energy_classifier;
pub mod thermal_guard;

pub use command_shaper::{CommandShaper, SelfTestCheck, SelfTestReport};
pub use energy_classifier::{EnergyClassifier, EnergyReading, EnergySensors};
pub use thermal_guard::{EngineerReading, EngineerSensors, ThermalIngressGuard};
