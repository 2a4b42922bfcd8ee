//! Error types for the Tugbot governor
//!
//! Only configuration loading, saving and validation can fail. The per-tick
//! control paths never return errors; they degrade to a safe output instead.

use thiserror::Error;

/// Errors raised by configuration handling and persistence
#[derive(Debug, Error)]
pub enum TugbotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to render TOML configuration: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Failed to encode or decode configuration record: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("Configuration record has bad magic {found:02x?}")]
    BadMagic { found: [u8; 2] },

    #[error("Configuration record version {found} does not match expected {expected}")]
    VersionMismatch { expected: u8, found: u8 },

    #[error("Configuration record checksum {found:#010x} does not match computed {expected:#010x}")]
    ChecksumMismatch { expected: u32, found: u32 },

    #[error("Configuration record truncated at {len} bytes")]
    Truncated { len: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TugbotError {
    /// True for errors that mean the stored record is unusable and defaults
    /// must be regenerated, as opposed to the store itself failing.
    pub fn is_corruption(&self) -> bool {
        !matches!(self, TugbotError::Io(_))
    }
}

/// Result alias used across the Tugbot crates
pub type TugbotResult<T> = Result<T, TugbotError>;
