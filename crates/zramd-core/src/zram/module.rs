//! zram kernel module lifecycle.

use crate::system::{CommandRunner, ProcFile, ProcSource};
use crate::Result;
use tracing::info;

/// Kernel module name.
pub const MODULE_NAME: &str = "zram";

/// Whether a `/proc/modules` listing contains the zram module.
///
/// The first field must be exactly `zram`, so modules that merely share
/// the prefix (e.g. `zram_other`) do not count.
#[must_use]
pub fn module_listed(listing: &str) -> bool {
    listing
        .lines()
        .any(|line| line.split_whitespace().next() == Some(MODULE_NAME))
}

/// Whether the zram module is currently loaded.
pub fn is_loaded<S: ProcSource + ?Sized>(source: &S) -> Result<bool> {
    Ok(module_listed(&source.read_proc(ProcFile::Modules)?))
}

/// Load the module with `num_devices` devices.
///
/// Without the parameter the kernel creates a single device.
pub fn load<R: CommandRunner + ?Sized>(runner: &R, num_devices: u32) -> Result<()> {
    info!(num_devices, "Loading zram module");
    runner.run(
        "modprobe",
        &[MODULE_NAME.to_string(), format!("num_devices={num_devices}")],
    )
}

/// Unload the module.
pub fn unload<R: CommandRunner + ?Sized>(runner: &R) -> Result<()> {
    info!("Unloading zram module");
    runner.run("modprobe", &["-r".to_string(), MODULE_NAME.to_string()])
}
