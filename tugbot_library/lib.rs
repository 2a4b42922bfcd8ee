//! # Tugbot Standard Library
//!
//! Algorithms, per-tick messages and the three stateful subsystems of the
//! Tugbot propulsion and safety governor.
//!
//! ## Structure
//!
//! ```text
//! tugbot_library/
//! ── algorithms/     # Pure shaping, filtering and timing building blocks
//! ── messages/       # Plain data records exchanged each tick
//! ── nodes/          # Command shaper, energy classifier, thermal/ingress guard
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use tugbot_library::{
//!     CommandShaper, EnergyClass, EnergyClassifier, EnergyReading, TugbotConfig,
//! };
//!
//! let config = TugbotConfig::default();
//!
//! let mut energy = EnergyClassifier::new(config.energy.clone());
//! energy.begin(0, &mut EnergyReading { v_prop: 6.5, v_sys: 14.0, i_prop: 1.0 });
//! assert_eq!(energy.class(), EnergyClass::Crit);
//!
//! let mut shaper = CommandShaper::from_config(&config);
//! shaper.begin(0);
//! let motion = shaper.update(1.0, 0.0, 100, energy.throttle_limit_factor());
//! assert!((motion.throttle_target - 0.3).abs() < 1e-9);
//! ```

pub mod algorithms;
pub mod messages;
pub mod nodes;

// Re-export core types needed alongside the messages
pub use tugbot_core::params::TugbotConfig;
pub use tugbot_core::LogSummary;

// Re-export message types at the crate root for convenience
pub use messages::*;

pub use nodes::{
    CommandShaper, EnergyClassifier, EnergyReading, EnergySensors, EngineerReading,
    EngineerSensors, SelfTestReport, ThermalIngressGuard,
};
