//! # Tugbot Core
//!
//! Runtime building blocks shared by every Tugbot governor crate:
//!
//! - **Errors**: [`TugbotError`] and the [`TugbotResult`] alias
//! - **Time**: millisecond clocks and the "too soon" [`RateGate`]
//! - **Params**: the [`TugbotConfig`] model, its compiled-in defaults and TOML form
//! - **Persistence**: the versioned, checksummed configuration record and its stores
//!
//! Nothing in this crate touches hardware. Sensor and actuator access lives in
//! the callers that own those devices.
//!
//! ## Quick Start
//!
//! ```rust
//! use tugbot_core::params::{load_or_defaults, MemoryNvStore};
//!
//! let mut store = MemoryNvStore::new();
//! let report = load_or_defaults(&mut store).unwrap();
//! assert!(report.outcome.was_regenerated());
//! assert_eq!(report.config.steering.profiles.len(), 3);
//! ```

pub mod clock;
pub mod core;
pub mod error;
pub mod params;

pub use clock::{Clock, ManualClock, MonotonicClock, RateGate};
pub use core::LogSummary;
pub use error::{TugbotError, TugbotResult};
pub use params::TugbotConfig;
