//! Operator intent delivered by the radio link
//!
//! The transport layer hands the governor one [`IntentFrame`] per received
//! command. Framing, sequencing and retries are the transport's business.

use serde::{Deserialize, Serialize};
use tugbot_core::LogSummary;

/// Drive mode byte carried in every intent frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DriveMode {
    #[default]
    Manual,
    Assist,
    Auto,
    /// Mode byte this build does not know; treated like manual
    Unknown(u8),
}

impl DriveMode {
    pub fn from_byte(byte: u8) -> Self {
        match byte {
            0 => DriveMode::Manual,
            1 => DriveMode::Assist,
            2 => DriveMode::Auto,
            other => DriveMode::Unknown(other),
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            DriveMode::Manual => 0,
            DriveMode::Assist => 1,
            DriveMode::Auto => 2,
            DriveMode::Unknown(other) => other,
        }
    }
}

/// Raw per-tick operator intent, percentages as sent on air
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IntentFrame {
    /// Signed throttle, -100..=100
    pub throttle_pct: i8,
    /// Signed steering, -100..=100 (positive = starboard)
    pub steer_pct: i8,
    pub armed: bool,
    pub mode: DriveMode,
}

impl IntentFrame {
    pub fn new(throttle_pct: i8, steer_pct: i8, armed: bool) -> Self {
        Self {
            throttle_pct,
            steer_pct,
            armed,
            mode: DriveMode::Manual,
        }
    }

    /// Neutral, disarmed intent used when the link is lost
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Build from the on-air flag and mode bytes (flags bit 0 = armed)
    pub fn from_raw(throttle_pct: i8, steer_pct: i8, flags: u8, mode: u8) -> Self {
        Self {
            throttle_pct,
            steer_pct,
            armed: flags & 0x01 != 0,
            mode: DriveMode::from_byte(mode),
        }
    }

    /// Clamp to [-100, 100] and scale to [-1, 1]
    pub fn normalized(&self) -> NormalizedIntent {
        NormalizedIntent {
            throttle: pct_to_norm(self.throttle_pct),
            steer: pct_to_norm(self.steer_pct),
            armed: self.armed,
            mode: self.mode,
        }
    }
}

fn pct_to_norm(pct: i8) -> f64 {
    f64::from(pct.clamp(-100, 100)) / 100.0
}

/// Intent scaled to the shaper's normalized units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct NormalizedIntent {
    pub throttle: f64,
    pub steer: f64,
    pub armed: bool,
    pub mode: DriveMode,
}

impl LogSummary for IntentFrame {
    fn log_summary(&self) -> String {
        format!(
            "thr={}% steer={}% {} mode={}",
            self.throttle_pct,
            self.steer_pct,
            if self.armed { "armed" } else { "safe" },
            self.mode.as_byte()
        )
    }
}
