//! Configuration file and setting resolution.
//!
//! Precedence, highest first: command-line flag, environment variable (both
//! handled by clap), `/etc/zramd.toml`, built-in default.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use zramd_core::MAX_DEVICES;

/// Configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/zramd.toml";

/// Default compression algorithm.
pub const DEFAULT_ALGORITHM: &str = "zstd";
/// Default cap on total swap, in MiB.
pub const DEFAULT_MAX_SIZE_MIB: u64 = 8192;
/// Default share of RAM.
pub const DEFAULT_MAX_RAM: f64 = 0.5;
/// Default swap priority.
pub const DEFAULT_PRIORITY: i32 = 100;

/// Contents of the configuration file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Compression algorithm.
    pub algorithm: Option<String>,
    /// Maximum total swap in MiB.
    pub max_size: Option<u64>,
    /// Maximum share of RAM.
    pub max_ram: Option<f64>,
    /// Swap priority.
    pub priority: Option<i32>,
    /// Number of devices.
    pub num_devices: Option<u32>,
    /// Do nothing on virtual machines.
    pub skip_vm: Option<bool>,
}

impl Config {
    /// Load `path` if given (it must exist), else the default file if present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None => Self::load_optional(Path::new(DEFAULT_CONFIG_PATH)),
        }
    }

    /// Load `path`, or return an empty configuration when it does not exist.
    pub fn load_optional(path: &Path) -> Result<Self> {
        if path.is_file() {
            Self::read(path)
        } else {
            Ok(Self::default())
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("invalid configuration in {}", path.display()))
    }

    /// Parse and range-check TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(fraction) = self.max_ram {
            check_fraction(fraction).map_err(anyhow::Error::msg)?;
        }
        if let Some(priority) = self.priority {
            if !(-1..=32767).contains(&priority) {
                bail!("priority must be a value between -1 and 32767");
            }
        }
        if let Some(count) = self.num_devices {
            if !(1..=MAX_DEVICES).contains(&count) {
                bail!("num_devices must be a value between 1 and {MAX_DEVICES}");
            }
        }
        if self.max_size == Some(0) {
            bail!("max_size must be at least 1 MiB");
        }
        if self.algorithm.as_deref().is_some_and(|a| a.trim().is_empty()) {
            bail!("algorithm must not be empty");
        }
        Ok(())
    }
}

/// Accept a RAM share in `[0.05, 1.0]`.
pub fn check_fraction(fraction: f64) -> std::result::Result<f64, String> {
    if (0.05..=1.0).contains(&fraction) {
        Ok(fraction)
    } else {
        Err("max-ram must be a value between 0.05 and 1".to_string())
    }
}

/// clap value parser for `--max-ram`.
pub fn parse_fraction(s: &str) -> std::result::Result<f64, String> {
    let fraction: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("invalid number: {s}"))?;
    check_fraction(fraction)
}
