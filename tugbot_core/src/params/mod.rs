//! Tugbot configuration model
//!
//! [`TugbotConfig`] holds every calibration constant and tunable threshold the
//! governor reads. Subsystems receive immutable snapshots of it at startup; the
//! governor never mutates configuration at runtime.
//!
//! Two serialized forms exist:
//! - TOML, human-editable, for bench tuning ([`TugbotConfig::load_toml`])
//! - the checksummed binary record in [`nv`], which is what the vessel persists

pub mod nv;

pub use nv::{
    load_or_defaults, save, FileNvStore, LoadOutcome, LoadReport, MemoryNvStore, NvRecord,
    NvStore, NV_MAGIC, NV_VERSION,
};

use crate::error::{TugbotError, TugbotResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of steering profiles carried by a configuration
pub const STEERING_PROFILE_COUNT: usize = 3;

/// Linear sensor calibration: `value = raw * scale + offset`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearCalibration {
    pub scale: f64,
    pub offset: f64,
}

impl LinearCalibration {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        offset: 0.0,
    };

    pub fn apply(&self, raw: f64) -> f64 {
        raw * self.scale + self.offset
    }
}

impl Default for LinearCalibration {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Current sensor calibration: `amps = (raw - zero) * scale`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentCalibration {
    pub zero: f64,
    pub scale: f64,
}

impl CurrentCalibration {
    pub fn apply(&self, raw: f64) -> f64 {
        (raw - self.zero) * self.scale
    }
}

impl Default for CurrentCalibration {
    fn default() -> Self {
        Self {
            zero: 0.0,
            scale: 1.0,
        }
    }
}

/// Throttle behaviour: limits, ramping and reverse coast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Upper bound on |throttle| in normal operation (0..1)
    pub throttle_limit_normal: f64,
    /// Ramp-up rate, percent of full scale per second
    pub ramp_up_percent_s: f64,
    /// Ramp-down rate, percent of full scale per second
    pub ramp_down_percent_s: f64,
    /// Neutral window forced when the throttle direction flips; 0 disables it
    pub reverse_coast_ms: u64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            throttle_limit_normal: 1.0,
            ramp_up_percent_s: 20.0,
            ramp_down_percent_s: 20.0,
            reverse_coast_ms: 200,
        }
    }
}

/// Index names for the three standard steering profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SteeringProfileId {
    /// Training / conservative
    Safe = 0,
    Normal = 1,
    /// Demo / aggressive
    Demo = 2,
}

impl SteeringProfileId {
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Immutable per-profile steering tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SteeringProfile {
    pub name: String,
    /// Rudder angle commanded by a centred stick (degrees)
    pub center_offset_deg: f64,
    /// Mechanical port limit, negative (degrees)
    pub max_port_deg: f64,
    /// Mechanical starboard limit, positive (degrees)
    pub max_starboard_deg: f64,
    /// Actual angles smaller than this snap to zero (degrees)
    pub mech_deadzone_deg: f64,
    /// Linear/cubic blend factor (0..1)
    pub expo: f64,
    /// Maximum rudder slew rate (degrees per second)
    pub rate_deg_s: f64,
    /// Stick deadband as a fraction of full deflection (0..1)
    pub deadband: f64,
    /// Rudder angle commanded at full stick (degrees)
    pub max_cmd_deg: f64,
}

impl SteeringProfile {
    /// Check the profile invariants
    pub fn validate(&self) -> TugbotResult<()> {
        if !(self.max_port_deg < 0.0 && self.max_starboard_deg > 0.0) {
            return Err(TugbotError::InvalidConfig(format!(
                "profile '{}': port limit {} must be < 0 < starboard limit {}",
                self.name, self.max_port_deg, self.max_starboard_deg
            )));
        }
        if !(0.0..=1.0).contains(&self.deadband) {
            return Err(TugbotError::InvalidConfig(format!(
                "profile '{}': deadband {} outside [0, 1]",
                self.name, self.deadband
            )));
        }
        if !(0.0..=1.0).contains(&self.expo) {
            return Err(TugbotError::InvalidConfig(format!(
                "profile '{}': expo {} outside [0, 1]",
                self.name, self.expo
            )));
        }
        if self.rate_deg_s < 0.0 || self.mech_deadzone_deg < 0.0 {
            return Err(TugbotError::InvalidConfig(format!(
                "profile '{}': rate and deadzone must be non-negative",
                self.name
            )));
        }
        Ok(())
    }

    /// Built-in SAFE / TRAINING profile
    pub fn safe() -> Self {
        Self {
            name: "SAFE".to_string(),
            center_offset_deg: 0.0,
            max_port_deg: -20.0,
            max_starboard_deg: 20.0,
            mech_deadzone_deg: 1.0,
            expo: 0.4,
            rate_deg_s: 90.0,
            deadband: 0.04,
            max_cmd_deg: 20.0,
        }
    }

    /// Built-in NORMAL profile
    pub fn normal() -> Self {
        Self {
            name: "NORMAL".to_string(),
            center_offset_deg: 0.0,
            max_port_deg: -35.0,
            max_starboard_deg: 35.0,
            mech_deadzone_deg: 0.5,
            expo: 0.3,
            rate_deg_s: 150.0,
            deadband: 0.03,
            max_cmd_deg: 30.0,
        }
    }

    /// Built-in DEMO / AGGRESSIVE profile
    pub fn demo() -> Self {
        Self {
            name: "DEMO".to_string(),
            center_offset_deg: 0.0,
            max_port_deg: -40.0,
            max_starboard_deg: 40.0,
            mech_deadzone_deg: 0.5,
            expo: 0.2,
            rate_deg_s: 200.0,
            deadband: 0.02,
            max_cmd_deg: 35.0,
        }
    }
}

/// Ordered steering profiles plus the profile selected at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringConfig {
    pub active_profile: u8,
    pub profiles: Vec<SteeringProfile>,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            active_profile: SteeringProfileId::Normal as u8,
            profiles: vec![
                SteeringProfile::safe(),
                SteeringProfile::normal(),
                SteeringProfile::demo(),
            ],
        }
    }
}

/// Battery calibration and thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyConfig {
    pub v_prop: LinearCalibration,
    pub v_sys: LinearCalibration,
    pub i_prop: CurrentCalibration,

    pub v_prop_warn: f64,
    pub v_prop_crit: f64,
    pub v_sys_warn: f64,
    pub v_sys_crit: f64,

    /// Exponential smoothing coefficient applied to each new sample (0..1]
    pub smoothing_alpha: f64,
    /// Minimum time between ADC samples
    pub min_update_interval_ms: u64,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            v_prop: LinearCalibration::IDENTITY,
            v_sys: LinearCalibration::IDENTITY,
            i_prop: CurrentCalibration::default(),
            v_prop_warn: 7.0,
            v_prop_crit: 6.8,
            v_sys_warn: 13.8,
            v_sys_crit: 13.2,
            smoothing_alpha: 0.2,
            min_update_interval_ms: 50,
        }
    }
}

/// Temperature, water ingress and pump configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineerConfig {
    /// Motor temperature: `deg_c = volts * scale + offset`
    pub temp1: LinearCalibration,
    /// Speed controller temperature
    pub temp2: LinearCalibration,

    pub temp_warn_c: f64,
    pub temp_crit_c: f64,

    /// Hottest >= this turns the cooling pump on
    pub cooling_on_c: f64,
    /// Hottest <= this turns the cooling pump off
    pub cooling_off_c: f64,

    /// Normalized water level at or above which ingress is reported
    pub water_wet_threshold: f64,

    /// Minimum bilge run per ingress event
    pub bilge_min_run_ms: u64,
    /// Minimum spacing between counted bilge triggers
    pub bilge_retrigger_ms: u64,

    pub min_update_interval_ms: u64,
}

impl Default for EngineerConfig {
    fn default() -> Self {
        // Linear placeholders: an NTC divider is not linear, but a higher
        // reading still maps to a higher temperature.
        let temp = LinearCalibration {
            scale: 100.0,
            offset: 0.0,
        };
        Self {
            temp1: temp,
            temp2: temp,
            temp_warn_c: 60.0,
            temp_crit_c: 75.0,
            cooling_on_c: 55.0,
            cooling_off_c: 45.0,
            water_wet_threshold: 0.20,
            bilge_min_run_ms: 10_000,
            bilge_retrigger_ms: 5_000,
            min_update_interval_ms: 50,
        }
    }
}

/// Intent link supervision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Intent older than this is replaced by a neutral, disarmed intent
    pub intent_timeout_ms: u64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            intent_timeout_ms: 500,
        }
    }
}

/// Persisted bookkeeping counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunCounters {
    pub run_counter: u32,
    pub hours_run: u32,
    /// 0 = manual, 1 = assist, 2 = auto
    pub last_mode: u8,
}

/// Complete Tugbot configuration snapshot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TugbotConfig {
    pub motion: MotionConfig,
    pub steering: SteeringConfig,
    pub energy: EnergyConfig,
    pub engineer: EngineerConfig,
    pub link: LinkConfig,
    pub counters: RunCounters,
}

impl TugbotConfig {
    /// Check every cross-field invariant the governor relies on
    pub fn validate(&self) -> TugbotResult<()> {
        let m = &self.motion;
        if !(0.0..=1.0).contains(&m.throttle_limit_normal) {
            return invalid(format!(
                "throttle_limit_normal {} outside [0, 1]",
                m.throttle_limit_normal
            ));
        }
        if m.ramp_up_percent_s < 0.0 || m.ramp_down_percent_s < 0.0 {
            return invalid("throttle ramp rates must be non-negative".to_string());
        }

        if self.steering.profiles.len() != STEERING_PROFILE_COUNT {
            return invalid(format!(
                "expected {} steering profiles, found {}",
                STEERING_PROFILE_COUNT,
                self.steering.profiles.len()
            ));
        }
        for profile in &self.steering.profiles {
            profile.validate()?;
        }

        let e = &self.energy;
        if e.v_prop_warn < e.v_prop_crit || e.v_sys_warn < e.v_sys_crit {
            return invalid("energy warn thresholds must not be below crit thresholds".to_string());
        }
        if !(e.smoothing_alpha > 0.0 && e.smoothing_alpha <= 1.0) {
            return invalid(format!(
                "energy smoothing_alpha {} outside (0, 1]",
                e.smoothing_alpha
            ));
        }

        let g = &self.engineer;
        if g.temp_crit_c < g.temp_warn_c {
            return invalid("thermal crit threshold must not be below warn".to_string());
        }
        if g.cooling_on_c <= g.cooling_off_c {
            return invalid(format!(
                "cooling on threshold {} must exceed off threshold {}",
                g.cooling_on_c, g.cooling_off_c
            ));
        }
        if !(g.water_wet_threshold > 0.0 && g.water_wet_threshold <= 1.0) {
            return invalid(format!(
                "water_wet_threshold {} outside (0, 1]",
                g.water_wet_threshold
            ));
        }

        Ok(())
    }

    /// Parse a TOML document; missing sections fall back to defaults
    pub fn from_toml_str(text: &str) -> TugbotResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> TugbotResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load and validate a TOML configuration file
    pub fn load_toml(path: &Path) -> TugbotResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Write this configuration as TOML, creating parent directories
    pub fn save_toml(&self, path: &Path) -> TugbotResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }
}

fn invalid(message: String) -> TugbotResult<()> {
    Err(TugbotError::InvalidConfig(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_defaults_are_valid() {
        let config = TugbotConfig::default();
        config.validate().unwrap();

        assert_eq!(config.steering.active_profile, 1);
        assert_eq!(config.steering.profiles[0].name, "SAFE");
        assert_eq!(config.steering.profiles[2].max_cmd_deg, 35.0);
        assert_eq!(config.motion.reverse_coast_ms, 200);
        assert_eq!(config.energy.v_prop_crit, 6.8);
        assert_eq!(config.engineer.bilge_min_run_ms, 10_000);
    }

    #[test]
    fn test_calibrations() {
        let v = LinearCalibration {
            scale: 3.0,
            offset: 0.5,
        };
        assert_abs_diff_eq!(v.apply(2.0), 6.5, epsilon = 1e-12);

        let i = CurrentCalibration {
            zero: 2.5,
            scale: 10.0,
        };
        assert_abs_diff_eq!(i.apply(3.0), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(i.apply(2.0), -5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_profile_rejects_inverted_limits() {
        let mut profile = SteeringProfile::normal();
        profile.max_port_deg = 5.0;
        assert!(profile.validate().is_err());

        let mut profile = SteeringProfile::normal();
        profile.expo = 1.5;
        assert!(profile.validate().is_err());
    }

    #[test]
    fn test_cooling_thresholds_must_be_ordered() {
        let mut config = TugbotConfig::default();
        config.engineer.cooling_off_c = config.engineer.cooling_on_c;
        assert!(matches!(
            config.validate(),
            Err(TugbotError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_profile_count_enforced() {
        let mut config = TugbotConfig::default();
        config.steering.profiles.pop();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = TugbotConfig::from_toml_str(
            r#"
            [motion]
            ramp_up_percent_s = 40.0

            [energy]
            v_prop_warn = 11.1
            v_prop_crit = 10.5
            "#,
        )
        .unwrap();

        assert_eq!(config.motion.ramp_up_percent_s, 40.0);
        assert_eq!(config.motion.ramp_down_percent_s, 20.0);
        assert_eq!(config.energy.v_prop_crit, 10.5);
        assert_eq!(config.energy.v_sys_crit, 13.2);
        assert_eq!(config.steering.profiles.len(), 3);
    }

    #[test]
    fn test_toml_roundtrip_preserves_profiles() {
        let config = TugbotConfig::default();
        let text = config.to_toml_string().unwrap();
        let parsed = TugbotConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let err = TugbotConfig::from_toml_str("[motion]\nthrottle_limit_normal = 2.0\n").unwrap_err();
        assert!(matches!(err, TugbotError::InvalidConfig(_)));
    }
}
