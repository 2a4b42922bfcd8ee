//! Versioned, checksummed configuration record
//!
//! ```text
//! offset  size  field
//! 0       2     magic "TB"
//! 2       1     version (NV_VERSION)
//! 3       4     body length, little endian
//! 7       len   bincode-encoded TugbotConfig
//! 7+len   4     CRC-32 over bytes 2..7+len, little endian
//! ```
//!
//! A record that fails any check is never handed to the governor. The loader
//! regenerates the compiled-in defaults, persists them and reports why.

use super::TugbotConfig;
use crate::error::{TugbotError, TugbotResult};
use std::path::{Path, PathBuf};

pub const NV_MAGIC: [u8; 2] = *b"TB";
pub const NV_VERSION: u8 = 2;

const HEADER_LEN: usize = 7;
const CRC_LEN: usize = 4;

/// Encoder/decoder for the persisted record
pub struct NvRecord;

impl NvRecord {
    /// Serialize a configuration into a fresh record with a valid checksum
    pub fn encode(config: &TugbotConfig) -> TugbotResult<Vec<u8>> {
        let body = bincode::serialize(config)?;

        let mut bytes = Vec::with_capacity(HEADER_LEN + body.len() + CRC_LEN);
        bytes.extend_from_slice(&NV_MAGIC);
        bytes.push(NV_VERSION);
        bytes.extend_from_slice(&(body.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&body);

        let crc = crc32fast::hash(&bytes[2..]);
        bytes.extend_from_slice(&crc.to_le_bytes());
        Ok(bytes)
    }

    /// Parse and verify a record, reporting the first check that fails
    pub fn decode(bytes: &[u8]) -> TugbotResult<TugbotConfig> {
        if bytes.len() < HEADER_LEN + CRC_LEN {
            return Err(TugbotError::Truncated { len: bytes.len() });
        }

        let magic = [bytes[0], bytes[1]];
        if magic != NV_MAGIC {
            return Err(TugbotError::BadMagic { found: magic });
        }

        let version = bytes[2];
        if version != NV_VERSION {
            return Err(TugbotError::VersionMismatch {
                expected: NV_VERSION,
                found: version,
            });
        }

        let body_len = u32::from_le_bytes([bytes[3], bytes[4], bytes[5], bytes[6]]) as usize;
        let Some(crc_at) = HEADER_LEN.checked_add(body_len) else {
            return Err(TugbotError::Truncated { len: bytes.len() });
        };
        if bytes.len().saturating_sub(CRC_LEN) < crc_at {
            return Err(TugbotError::Truncated { len: bytes.len() });
        }

        let stored = u32::from_le_bytes([
            bytes[crc_at],
            bytes[crc_at + 1],
            bytes[crc_at + 2],
            bytes[crc_at + 3],
        ]);
        let computed = crc32fast::hash(&bytes[2..crc_at]);
        if stored != computed {
            return Err(TugbotError::ChecksumMismatch {
                expected: computed,
                found: stored,
            });
        }

        let config: TugbotConfig = bincode::deserialize(&bytes[HEADER_LEN..crc_at])?;
        config.validate()?;
        Ok(config)
    }
}

/// Byte-level backing store for the configuration record
pub trait NvStore {
    /// Read the stored record, `None` if nothing has been written yet
    fn read(&mut self) -> TugbotResult<Option<Vec<u8>>>;

    /// Replace the stored record
    fn write(&mut self, bytes: &[u8]) -> TugbotResult<()>;
}

/// Record stored in a single file
#[derive(Debug, Clone)]
pub struct FileNvStore {
    path: PathBuf,
}

impl FileNvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NvStore for FileNvStore {
    fn read(&mut self) -> TugbotResult<Option<Vec<u8>>> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, bytes: &[u8]) -> TugbotResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, bytes)?;
        Ok(())
    }
}

/// In-memory store for simulation and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryNvStore {
    bytes: Option<Vec<u8>>,
    writes: usize,
}

impl MemoryNvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Some(bytes),
            writes: 0,
        }
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }

    /// Mutable access for corrupting the record in tests
    pub fn bytes_mut(&mut self) -> Option<&mut Vec<u8>> {
        self.bytes.as_mut()
    }

    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl NvStore for MemoryNvStore {
    fn read(&mut self) -> TugbotResult<Option<Vec<u8>>> {
        Ok(self.bytes.clone())
    }

    fn write(&mut self, bytes: &[u8]) -> TugbotResult<()> {
        self.bytes = Some(bytes.to_vec());
        self.writes += 1;
        Ok(())
    }
}

/// How the configuration in a [`LoadReport`] was obtained
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The stored record was intact
    Loaded,
    /// Defaults were regenerated and persisted; the string says why
    Regenerated(String),
}

impl LoadOutcome {
    pub fn was_regenerated(&self) -> bool {
        matches!(self, LoadOutcome::Regenerated(_))
    }
}

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub config: TugbotConfig,
    pub outcome: LoadOutcome,
}

/// Load the stored configuration, substituting and persisting defaults when
/// the record is missing or corrupt
///
/// Only failures of the store itself are returned as errors.
pub fn load_or_defaults<S: NvStore + ?Sized>(store: &mut S) -> TugbotResult<LoadReport> {
    let reason = match store.read()? {
        None => "no stored configuration".to_string(),
        Some(bytes) => match NvRecord::decode(&bytes) {
            Ok(config) => {
                log::debug!("Loaded configuration record ({} bytes)", bytes.len());
                return Ok(LoadReport {
                    config,
                    outcome: LoadOutcome::Loaded,
                });
            }
            Err(e) if e.is_corruption() => e.to_string(),
            Err(e) => return Err(e),
        },
    };

    log::warn!("Regenerating default configuration: {}", reason);
    let config = TugbotConfig::default();
    store.write(&NvRecord::encode(&config)?)?;

    Ok(LoadReport {
        config,
        outcome: LoadOutcome::Regenerated(reason),
    })
}

/// Validate and persist a configuration with a fresh checksum
pub fn save<S: NvStore + ?Sized>(store: &mut S, config: &TugbotConfig) -> TugbotResult<()> {
    config.validate()?;
    store.write(&NvRecord::encode(config)?)
}
