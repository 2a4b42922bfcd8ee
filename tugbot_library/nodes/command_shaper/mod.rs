//! Command Shaper
//!
//! Turns raw normalized operator intent into rate-limited actuator commands.
//!
//! # Throttle pipeline
//!
//! 1. Clamp to `±(throttle_limit_normal × limit_factor)`
//! 2. Reverse-coast guard ([`ReverseCoast`])
//! 3. Separate ramp-up / ramp-down slew ([`SlewLimiter`]), result clamped to [-1, 1]
//!
//! # Steering pipeline
//!
//! 1. Deadband and expo from the active [`SteeringProfile`] ([`SteeringCurve`])
//! 2. Map to degrees around the centre offset, clamp to the mechanical limits
//! 3. Slew toward the target at the profile's angular rate
//! 4. Snap angles inside the mechanical deadzone to zero
//!
//! Elapsed time per update is capped at one second.
//!
//! Without a motion configuration or steering profiles the shaper passes the
//! clamped throttle straight through and holds the rudder at zero.
//!
//! # Example
//!
//! ```rust
//! use tugbot_core::params::TugbotConfig;
//! use tugbot_library::nodes::CommandShaper;
//!
//! let mut shaper = CommandShaper::from_config(&TugbotConfig::default());
//! shaper.begin(0);
//!
//! // Full throttle requested; 20%/s ramp allows 0.1 after half a second
//! let state = shaper.update(1.0, 0.0, 500, 1.0);
//! assert!((state.throttle_actual - 0.1).abs() < 1e-9);
//! ```

use crate::algorithms::rate_limiter::SlewLimiter;
use crate::algorithms::reverse_coast::{CoastState, ReverseCoast};
use crate::algorithms::steering_curve::SteeringCurve;
use crate::messages::{throttle_to_pwm, MotionState};
use log::{debug, info, warn};
use tugbot_core::clock::elapsed_ms;
use tugbot_core::params::{MotionConfig, SteeringProfile, TugbotConfig};

/// Largest elapsed time a single update will integrate
pub const MAX_STEP_MS: u64 = 1_000;

/// Commanded angles at or below this are treated as "no steering configured"
const MIN_COMMAND_DEG: f64 = 0.001;

/// Throttle and rudder shaping node
#[derive(Debug, Clone)]
pub struct CommandShaper {
    motion: Option<MotionConfig>,
    profiles: Vec<SteeringProfile>,
    active_profile: usize,

    throttle_slew: SlewLimiter,
    coast: ReverseCoast,

    state: MotionState,
    last_update_ms: u64,
    reported_unconfigured: bool,
}

impl CommandShaper {
    /// Create an unconfigured shaper
    pub fn new() -> Self {
        Self {
            motion: None,
            profiles: Vec::new(),
            active_profile: 0,
            throttle_slew: SlewLimiter::symmetric(1.0),
            coast: ReverseCoast::new(0),
            state: MotionState::default(),
            last_update_ms: 0,
            reported_unconfigured: false,
        }
    }

    /// Create a shaper with the motion settings, profiles and default
    /// profile from a configuration snapshot
    pub fn from_config(config: &TugbotConfig) -> Self {
        let mut shaper = Self::new();
        shaper.set_motion_config(config.motion.clone());
        shaper.set_steering_profiles(config.steering.profiles.clone());
        shaper.set_active_profile(usize::from(config.steering.active_profile));
        shaper
    }

    pub fn set_motion_config(&mut self, motion: MotionConfig) {
        self.throttle_slew =
            SlewLimiter::from_percent_per_s(motion.ramp_up_percent_s, motion.ramp_down_percent_s);
        self.coast = ReverseCoast::new(motion.reverse_coast_ms);
        self.motion = Some(motion);
    }

    /// Replace the profile list; an out-of-range active index falls back to 0
    pub fn set_steering_profiles(&mut self, profiles: Vec<SteeringProfile>) {
        self.profiles = profiles;
        if self.active_profile >= self.profiles.len() {
            self.active_profile = 0;
        }
    }

    /// Select the active profile; out-of-range selects 0, ignored with no profiles
    pub fn set_active_profile(&mut self, index: usize) {
        if self.profiles.is_empty() {
            return;
        }
        let index = if index < self.profiles.len() { index } else { 0 };
        if index != self.active_profile {
            info!(
                "Steering profile -> {} ({})",
                index, self.profiles[index].name
            );
        }
        self.active_profile = index;
    }

    pub fn active_profile(&self) -> usize {
        self.active_profile
    }

    pub fn current_profile(&self) -> Option<&SteeringProfile> {
        self.profiles
            .get(self.active_profile)
            .or_else(|| self.profiles.first())
    }

    pub fn motion_config(&self) -> Option<&MotionConfig> {
        self.motion.as_ref()
    }

    pub fn is_configured(&self) -> bool {
        self.motion.is_some() && !self.profiles.is_empty()
    }

    /// Zero all targets and actuals and start timing from `now_ms`
    pub fn begin(&mut self, now_ms: u64) {
        self.state = MotionState::default();
        self.coast.reset();
        self.last_update_ms = now_ms;
    }

    /// Run one shaping step
    ///
    /// # Arguments
    /// * `throttle` - Raw throttle intent (-1..1)
    /// * `steer` - Raw steering intent (-1..1, positive = starboard)
    /// * `now_ms` - Current time
    /// * `limit_factor` - Externally imposed throttle ceiling (0..1)
    pub fn update(&mut self, throttle: f64, steer: f64, now_ms: u64, limit_factor: f64) -> MotionState {
        let limit_factor = finite_or_zero(limit_factor).clamp(0.0, 1.0);
        let throttle = finite_or_zero(throttle);
        let steer = finite_or_zero(steer);

        let dt_ms = elapsed_ms(self.last_update_ms, now_ms).min(MAX_STEP_MS);
        self.last_update_ms = now_ms;

        let Some(motion) = self.motion.as_ref().filter(|_| !self.profiles.is_empty()) else {
            self.update_unconfigured(throttle, limit_factor);
            return self.state;
        };
        let limit = motion.throttle_limit_normal.clamp(0.0, 1.0) * limit_factor;

        if self.reported_unconfigured {
            info!("Command shaper configured, shaping resumed");
            self.reported_unconfigured = false;
        }

        let dt_s = dt_ms as f64 / 1000.0;

        self.update_throttle(throttle, limit, dt_s, now_ms);
        self.update_rudder(steer, dt_s);

        self.state
    }

    fn update_unconfigured(&mut self, throttle: f64, limit: f64) {
        if !self.reported_unconfigured {
            warn!("Command shaper unconfigured: passing throttle through, rudder held at zero");
            self.reported_unconfigured = true;
        }
        let throttle = throttle.clamp(-limit, limit);
        self.state = MotionState {
            throttle_target: throttle,
            throttle_actual: throttle,
            ..MotionState::default()
        };
    }

    fn update_throttle(&mut self, intent: f64, limit: f64, dt_s: f64, now_ms: u64) {
        let actual = self.state.throttle_actual;
        let requested = intent.clamp(-limit, limit);

        let was_coasting = self.coast.is_coasting();
        let target = self.coast.apply(actual, requested, now_ms);
        if !was_coasting && self.coast.is_coasting() {
            debug!(
                "Reverse coast armed: actual {:.3} -> requested {:.3} for {} ms",
                actual,
                requested,
                self.coast.coast_ms()
            );
        }

        self.state.throttle_target = target;
        self.state.throttle_actual = self.throttle_slew.step(actual, target, dt_s).clamp(-1.0, 1.0);
        self.state.reverse_coast_until_ms = match self.coast.state() {
            CoastState::Coasting { until_ms } => Some(until_ms),
            CoastState::Driving => None,
        };
    }

    fn update_rudder(&mut self, steer: f64, dt_s: f64) {
        let Some(profile) = self.current_profile() else {
            self.state.rudder_target_deg = 0.0;
            self.state.rudder_actual_deg = 0.0;
            return;
        };

        let max_cmd = profile.max_cmd_deg.abs();
        if max_cmd <= MIN_COMMAND_DEG {
            self.state.rudder_target_deg = 0.0;
            self.state.rudder_actual_deg = 0.0;
            return;
        }

        let shaped = SteeringCurve::new(profile.deadband, profile.expo).shape(steer);
        let target = (profile.center_offset_deg + shaped * max_cmd)
            .max(profile.max_port_deg)
            .min(profile.max_starboard_deg);

        let slew = SlewLimiter::symmetric(profile.rate_deg_s);
        let mut actual = slew.step(self.state.rudder_actual_deg, target, dt_s);
        if actual.abs() < profile.mech_deadzone_deg {
            actual = 0.0;
        }

        self.state.rudder_target_deg = target;
        self.state.rudder_actual_deg = actual;
    }

    pub fn state(&self) -> &MotionState {
        &self.state
    }

    pub fn throttle_actual(&self) -> f64 {
        self.state.throttle_actual
    }

    pub fn rudder_actual_deg(&self) -> f64 {
        self.state.rudder_actual_deg
    }

    /// Actual throttle as a symmetric 8-bit PWM duty (128 = neutral)
    pub fn throttle_pwm(&self) -> u8 {
        throttle_to_pwm(self.state.throttle_actual)
    }

    /// Actual rudder relative to the active profile's commanded range
    pub fn rudder_norm(&self) -> f64 {
        let Some(profile) = self.current_profile().filter(|_| self.is_configured()) else {
            return 0.0;
        };
        let max_cmd = profile.max_cmd_deg.abs();
        if max_cmd <= MIN_COMMAND_DEG {
            return 0.0;
        }
        ((self.state.rudder_actual_deg - profile.center_offset_deg) / max_cmd).clamp(-1.0, 1.0)
    }

    /// Run the built-in shaping checks on a scratch shaper
    ///
    /// The running shaper is not touched.
    pub fn self_test() -> SelfTestReport {
        let mut report = SelfTestReport::default();

        let mut scratch = CommandShaper::new();
        scratch.set_motion_config(MotionConfig {
            throttle_limit_normal: 1.0,
            ramp_up_percent_s: 20.0,
            ramp_down_percent_s: 20.0,
            reverse_coast_ms: 0,
        });
        let profile = SteeringProfile::normal();
        scratch.set_steering_profiles(vec![profile.clone()]);
        scratch.begin(0);

        let state = scratch.update(1.0, 0.5, 500, 1.0);
        report.check("throttle ramp 0->1 over 0.5s", state.throttle_actual, 0.1, 0.02);

        let curve = SteeringCurve::new(profile.deadband, profile.expo);
        report.check("steer expo at 0", curve.shape(0.0), 0.0, 0.001);
        report.check("steer small input in deadband", curve.shape(0.01), 0.0, 0.05);
        report.check("steer expo mid-range sensible", curve.shape(0.5), 0.45, 0.25);
        report.check("rudder target approx 15deg", state.rudder_target_deg, 15.0, 5.0);

        if report.failed > 0 {
            warn!("Command shaper self-test: {} passed, {} failed", report.passed, report.failed);
        } else {
            info!("Command shaper self-test: {} passed", report.passed);
        }
        report
    }
}

impl Default for CommandShaper {
    fn default() -> Self {
        Self::new()
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// One self-test comparison
#[derive(Debug, Clone, PartialEq)]
pub struct SelfTestCheck {
    pub name: &'static str,
    pub got: f64,
    pub expected: f64,
    pub tolerance: f64,
    pub passed: bool,
}

/// Outcome of [`CommandShaper::self_test`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelfTestReport {
    pub passed: u32,
    pub failed: u32,
    pub checks: Vec<SelfTestCheck>,
}

impl SelfTestReport {
    fn check(&mut self, name: &'static str, got: f64, expected: f64, tolerance: f64) {
        let passed = (got - expected).abs() <= tolerance;
        if passed {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.checks.push(SelfTestCheck {
            name,
            got,
            expected,
            tolerance,
            passed,
        });
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}
