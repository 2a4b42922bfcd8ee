//! Slew Rate Limiter
//!
//! Moves a value toward a target by at most a bounded step per update.
//!
//! # Features
//!
//! - Independent rising and falling rates
//! - Step bound scales with elapsed time
//! - Never overshoots the target
//!
//! # Example
//!
//! ```rust
//! use tugbot_library::algorithms::rate_limiter::SlewLimiter;
//!
//! // 20%/s up, 40%/s down, in normalized units per second
//! let limiter = SlewLimiter::new(0.2, 0.4);
//!
//! let next = limiter.step(0.0, 1.0, 0.5);
//! assert!((next - 0.1).abs() < 1e-9);
//! ```

/// Slew rate limiter with separate rising and falling bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlewLimiter {
    rise_per_s: f64,
    fall_per_s: f64,
}

impl SlewLimiter {
    /// Create a limiter; negative rates are treated as zero
    ///
    /// # Arguments
    /// * `rise_per_s` - Maximum increase per second
    /// * `fall_per_s` - Maximum decrease per second
    pub fn new(rise_per_s: f64, fall_per_s: f64) -> Self {
        Self {
            rise_per_s: rise_per_s.max(0.0),
            fall_per_s: fall_per_s.max(0.0),
        }
    }

    /// Same bound in both directions
    pub fn symmetric(rate_per_s: f64) -> Self {
        Self::new(rate_per_s, rate_per_s)
    }

    /// Build from ramp rates expressed in percent of full scale per second
    pub fn from_percent_per_s(rise_percent_s: f64, fall_percent_s: f64) -> Self {
        Self::new(rise_percent_s / 100.0, fall_percent_s / 100.0)
    }

    pub fn rise_per_s(&self) -> f64 {
        self.rise_per_s
    }

    pub fn fall_per_s(&self) -> f64 {
        self.fall_per_s
    }

    /// Advance `current` toward `target` over `dt_s` seconds
    pub fn step(&self, current: f64, target: f64, dt_s: f64) -> f64 {
        let dt_s = dt_s.max(0.0);
        let max_rise = self.rise_per_s * dt_s;
        let max_fall = self.fall_per_s * dt_s;

        let diff = target - current;
        let bounded = if diff > 0.0 {
            diff.min(max_rise)
        } else {
            diff.max(-max_fall)
        };

        current + bounded
    }
}
