//! Pure computational building blocks for the governor
//!
//! Nothing here performs I/O or reads a clock. Every algorithm takes elapsed
//! time or timestamps as arguments so it can be exercised deterministically.
//!
//! # Available Algorithms
//!
//! ## Command shaping
//! - **rate_limiter**: slew limiting with separate rise/fall rates
//! - **steering_curve**: stick deadband and expo
//! - **reverse_coast**: forced-neutral window on direction change
//!
//! ## Signal conditioning
//! - **ema_filter**: exponential smoothing seeded by the first sample
//!
//! ## Actuator state machines
//! - **hysteresis**: two-threshold on/off switch
//! - **hold_timer**: minimum-run window after a trigger clears

pub mod ema_filter;
pub mod hold_timer;
pub mod hysteresis;
pub mod rate_limiter;
pub mod reverse_coast;
pub mod steering_curve;
