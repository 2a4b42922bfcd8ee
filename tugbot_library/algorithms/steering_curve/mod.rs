//! Stick Deadband and Expo Curve
//!
//! RC-style input shaping for a normalized steering stick.
//!
//! # Features
//!
//! - Deadband around centre with linear rescale so full stick still reaches ±1
//! - Expo blend `x·(1−e) + x³·e` that softens the centre without moving the endpoints
//!
//! # Example
//!
//! ```rust
//! use tugbot_library::algorithms::steering_curve::SteeringCurve;
//!
//! let curve = SteeringCurve::new(0.03, 0.3);
//!
//! assert_eq!(curve.shape(0.01), 0.0);            // inside deadband
//! assert!((curve.shape(1.0) - 1.0).abs() < 1e-9); // endpoints preserved
//! ```

/// Deadband + expo shaping curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringCurve {
    deadband: f64,
    expo: f64,
}

impl SteeringCurve {
    /// Create a curve; both parameters are clamped to [0, 1]
    pub fn new(deadband: f64, expo: f64) -> Self {
        Self {
            deadband: deadband.clamp(0.0, 1.0),
            expo: expo.clamp(0.0, 1.0),
        }
    }

    pub fn deadband(&self) -> f64 {
        self.deadband
    }

    pub fn expo(&self) -> f64 {
        self.expo
    }

    /// Remove the deadband and rescale the remainder back onto [-1, 1]
    pub fn apply_deadband(&self, input: f64) -> f64 {
        let x = input.clamp(-1.0, 1.0);
        let magnitude = x.abs();

        if magnitude < self.deadband {
            return 0.0;
        }
        if self.deadband >= 1.0 {
            // Whole travel is deadband; only full deflection reaches here
            return x.signum();
        }

        let rescaled = ((magnitude - self.deadband) / (1.0 - self.deadband)).clamp(0.0, 1.0);
        rescaled.copysign(x)
    }

    /// Blend linear and cubic response
    pub fn apply_expo(&self, x: f64) -> f64 {
        let e = self.expo;
        x * (1.0 - e) + x * x * x * e
    }

    /// Full shaping: deadband then expo
    pub fn shape(&self, input: f64) -> f64 {
        self.apply_expo(self.apply_deadband(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_deadband_zeroes_small_inputs() {
        let curve = SteeringCurve::new(0.04, 0.0);
        assert_eq!(curve.apply_deadband(0.039), 0.0);
        assert_eq!(curve.apply_deadband(-0.039), 0.0);
        assert_eq!(curve.apply_deadband(0.04), 0.0);
    }

    #[test]
    fn test_deadband_rescales_to_full_range() {
        let curve = SteeringCurve::new(0.2, 0.0);
        assert_abs_diff_eq!(curve.apply_deadband(1.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.apply_deadband(-1.0), -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.apply_deadband(0.6), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.apply_deadband(-0.6), -0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_expo_endpoints_fixed() {
        for e in [0.0, 0.25, 0.5, 1.0] {
            let curve = SteeringCurve::new(0.0, e);
            assert_eq!(curve.apply_expo(0.0), 0.0);
            assert_abs_diff_eq!(curve.apply_expo(1.0), 1.0, epsilon = 1e-12);
            assert_abs_diff_eq!(curve.apply_expo(-1.0), -1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_expo_softens_centre() {
        let curve = SteeringCurve::new(0.0, 0.5);
        let out = curve.apply_expo(0.5);
        assert_abs_diff_eq!(out, 0.5 * 0.5 + 0.125 * 0.5, epsilon = 1e-12);
        assert!(out < 0.5);
    }

    #[test]
    fn test_out_of_range_input_clamped() {
        let curve = SteeringCurve::new(0.03, 0.3);
        assert_abs_diff_eq!(curve.shape(3.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.shape(-3.0), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_full_deadband() {
        let curve = SteeringCurve::new(1.0, 0.0);
        assert_eq!(curve.shape(0.99), 0.0);
        assert_eq!(curve.shape(1.0), 1.0);
    }
}
