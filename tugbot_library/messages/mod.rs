//! Message types exchanged between the governor's subsystems
//!
//! Every record here is plain data: it is produced by exactly one subsystem
//! per tick and read as a snapshot by everything downstream.
//!
//! # Message Organization
//!
//! - Intent: operator commands from the radio link
//! - Motion: command shaper state
//! - Energy: battery readings and throttle policy
//! - Thermal: temperatures, ingress and pumps
//! - Actuator: the final per-tick output
//!
//! All message types are re-exported at the crate root for convenience.

pub mod actuator;
pub mod energy;
pub mod intent;
pub mod motion;
pub mod thermal;

pub use actuator::{throttle_to_pwm, ActuatorCommand};
pub use energy::{EnergyClass, EnergyState};
pub use intent::{DriveMode, IntentFrame, NormalizedIntent};
pub use motion::MotionState;
pub use thermal::{PumpControl, ThermalClass, ThermalIngressState};
