//! # Tugbot - Propulsion & Safety Governor
//!
//! Turns raw operator intent from an unreliable radio link into smooth,
//! mechanically safe throttle and rudder commands, while energy, thermal and
//! water-ingress monitors limit or override those commands on their own.
//!
//! ## Quick Start
//!
//! ```rust
//! use tugbot::prelude::*;
//!
//! let mut store = MemoryNvStore::new();
//! let config = load_or_defaults(&mut store).unwrap().config;
//!
//! let battery = EnergyReading { v_prop: 7.4, v_sys: 14.2, i_prop: 0.8 };
//! let engine_room = EngineerReading { temp1_volts: 0.3, temp2_volts: 0.3, water_level: 0.0 };
//! let mut governor = Governor::new(&config, battery, engine_room, 0);
//!
//! governor.submit_intent(IntentFrame::new(50, -20, true), 0);
//! let command = governor.tick(50);
//! assert_eq!(command.energy_class, EnergyClass::Ok);
//! ```
//!
//! ## Crates
//!
//! - **tugbot_core**: errors, clocks, configuration and its persisted record
//! - **tugbot_library**: algorithms, messages and the three subsystems
//! - **tugbot**: the [`Governor`] composition root, link watchdog and simulator

pub mod governor;
pub mod link;
pub mod sim;

// Re-export core components
pub use tugbot_core::{self, *};

// Re-export standard library with alias
pub use tugbot_library as library;

pub use governor::Governor;
pub use link::IntentLink;

/// The Tugbot prelude - everything needed to wire up a governor
pub mod prelude {
    pub use crate::governor::Governor;
    pub use crate::link::IntentLink;
    pub use crate::sim::{Scenario, SimEnergySensors, SimEngineerSensors, Simulation};

    // Core types
    pub use tugbot_core::clock::{Clock, ManualClock, MonotonicClock, RateGate};
    pub use tugbot_core::error::{TugbotError, TugbotResult};
    pub use tugbot_core::params::{
        load_or_defaults, save, FileNvStore, LoadOutcome, MemoryNvStore, NvStore,
        SteeringProfileId, TugbotConfig,
    };
    pub use tugbot_core::LogSummary;

    // Subsystems and sensor seams
    pub use tugbot_library::nodes::{
        CommandShaper, EnergyClassifier, EnergyReading, EnergySensors, EngineerReading,
        EngineerSensors, ThermalIngressGuard,
    };

    // Re-export all message types from tugbot_library for convenience
    pub use tugbot_library::messages::*;

    // Re-export anyhow for error handling in binaries
    pub use anyhow::{anyhow, bail, ensure, Context, Result as AnyResult};
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get Tugbot version
pub fn version() -> &'static str {
    VERSION
}
