//! Start command.
//!
//! Resolves settings, applies the kernel and host checks, then delegates to
//! `zramd_core::SwapManager`.

use crate::config::{
    parse_fraction, Config, DEFAULT_ALGORITHM, DEFAULT_MAX_RAM, DEFAULT_MAX_SIZE_MIB,
    DEFAULT_PRIORITY,
};
use anyhow::{bail, ensure, Result};
use clap::builder::BoolishValueParser;
use clap::{value_parser, Args};
use std::path::PathBuf;
use tracing::info;
use zramd_core::{host, Capabilities, LinuxSystem, StartRequest, SwapManager, MAX_DEVICES};

const MIB: u64 = 1024 * 1024;

/// Arguments for the start command.
#[derive(Debug, Args)]
pub struct StartArgs {
    /// zram compression algorithm [default: zstd]
    #[arg(short, long, env = "ALGORITHM", value_name = "A")]
    pub algorithm: Option<String>,

    /// Maximum total MiB of swap to allocate [default: 8192]
    #[arg(short = 'm', long = "max-size", env = "MAX_SIZE", value_name = "M",
          value_parser = value_parser!(u64).range(1..))]
    pub max_size: Option<u64>,

    /// Maximum share of RAM to use, 0.05 to 1 [default: 0.5]
    #[arg(short = 'r', long = "max-ram", env = "MAX_RAM", value_name = "P",
          value_parser = parse_fraction)]
    pub max_ram: Option<f64>,

    /// Swap priority, -1 to 32767 [default: 100]
    #[arg(short, long, env = "PRIORITY", value_name = "N", allow_negative_numbers = true,
          value_parser = value_parser!(i32).range(-1..=32767))]
    pub priority: Option<i32>,

    /// Number of zram devices [default: 1, or one per CPU on kernels < 3.15]
    #[arg(short = 'n', long = "num-devices", env = "NUM_DEVICES", value_name = "N",
          value_parser = value_parser!(u32).range(1..=i64::from(MAX_DEVICES)))]
    pub num_devices: Option<u32>,

    /// Do nothing when running on a virtual machine
    #[arg(short, long, env = "SKIP_VM", value_parser = BoolishValueParser::new())]
    pub skip_vm: bool,

    /// Configuration file [default: /etc/zramd.toml]
    #[arg(long, env = "ZRAMD_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Fully resolved start settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Compression algorithm.
    pub algorithm: String,
    /// Cap on total swap in MiB.
    pub max_size_mib: u64,
    /// Share of RAM.
    pub max_ram: f64,
    /// Swap priority.
    pub priority: i32,
    /// Number of devices.
    pub num_devices: u32,
    /// Do nothing on virtual machines.
    pub skip_vm: bool,
}

impl Settings {
    /// Merge flags/environment over the configuration file over defaults.
    /// `cpus` only matters when no device count was given.
    #[must_use]
    pub fn resolve(args: &StartArgs, config: &Config, caps: Capabilities, cpus: usize) -> Self {
        Self {
            algorithm: args
                .algorithm
                .clone()
                .or_else(|| config.algorithm.clone())
                .unwrap_or_else(|| DEFAULT_ALGORITHM.to_string()),
            max_size_mib: args
                .max_size
                .or(config.max_size)
                .unwrap_or(DEFAULT_MAX_SIZE_MIB),
            max_ram: args.max_ram.or(config.max_ram).unwrap_or(DEFAULT_MAX_RAM),
            priority: args.priority.or(config.priority).unwrap_or(DEFAULT_PRIORITY),
            num_devices: args
                .num_devices
                .or(config.num_devices)
                .unwrap_or_else(|| caps.default_device_count(cpus).min(MAX_DEVICES)),
            skip_vm: args.skip_vm || config.skip_vm.unwrap_or(false),
        }
    }

    /// Request handed to the orchestrator.
    #[must_use]
    pub fn request(&self) -> StartRequest {
        StartRequest {
            algorithm: self.algorithm.clone(),
            fraction: self.max_ram,
            max_size_bytes: self.max_size_mib.saturating_mul(MIB),
            device_count: self.num_devices,
            priority: self.priority,
        }
    }
}

/// Load the zram module and set up swap devices.
pub fn start(args: &StartArgs) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;
    let caps = Capabilities::detect()?;
    let settings = Settings::resolve(args, &config, caps, host::cpu_count());

    if !caps.supports_zram() {
        bail!("zram is not supported on kernels < 3.14");
    }
    if !caps.supports_algorithm(&settings.algorithm) {
        bail!("the {} algorithm is not supported on kernels < 4.19", settings.algorithm);
    }
    if settings.skip_vm && host::is_virtual_machine() {
        info!("Virtual machine detected, skipping zram setup");
        return Ok(());
    }
    ensure!(host::has_privileges(), "root privileges are required");

    info!(
        kernel = %caps.version(),
        algorithm = %settings.algorithm,
        max_size_mib = settings.max_size_mib,
        max_ram = settings.max_ram,
        devices = settings.num_devices,
        priority = settings.priority,
        "Starting zram swap"
    );

    let system = LinuxSystem::new();
    let activation = SwapManager::new(&system, caps).start(&settings.request())?;

    info!(
        devices = activation.devices,
        device_bytes = activation.device_bytes,
        "zram swap started"
    );
    Ok(())
}
