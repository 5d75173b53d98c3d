use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::MachineError;

/// Physical load address of the BIOS image.
pub const BIOS_BASE: u32 = 0xFE000;
/// Physical load address of the ROM BASIC image.
pub const BASIC_BASE: u32 = 0xF6000;

pub const DEFAULT_TEXT_PUBLISH_INTERVAL: u64 = 10_000;

/// A raw binary copied byte-for-byte into memory at `base` before reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwareImage {
    pub path: PathBuf,
    pub base: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Images loaded in order; later images overwrite earlier ones where
    /// they overlap.
    pub firmware: Vec<FirmwareImage>,
    /// Executed instructions between automatic text-frame publications
    /// inside [`crate::Machine::run_slice`]. `0` disables auto-publish.
    pub text_publish_interval: u64,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            firmware: vec![
                FirmwareImage {
                    path: PathBuf::from("bin/bios.bin"),
                    base: BIOS_BASE,
                },
                FirmwareImage {
                    path: PathBuf::from("bin/basic.bin"),
                    base: BASIC_BASE,
                },
            ],
            text_publish_interval: DEFAULT_TEXT_PUBLISH_INTERVAL,
        }
    }
}

impl MachineConfig {
    /// A configuration that loads nothing; callers place code with
    /// [`crate::Machine::load_image`].
    pub fn bare() -> Self {
        Self {
            firmware: Vec::new(),
            ..Self::default()
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, MachineError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| MachineError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, MachineError> {
        serde_json::from_str(text).map_err(|e| MachineError::Config(e.to_string()))
    }
}
