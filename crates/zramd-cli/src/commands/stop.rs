//! Stop command.
//!
//! This is a pure shim that delegates to `zramd_core::orchestrator::stop`.

use anyhow::{ensure, Result};
use tracing::info;
use zramd_core::{host, orchestrator, LinuxSystem};

/// Disable every zram swap device and unload the module.
pub fn stop() -> Result<()> {
    ensure!(host::has_privileges(), "root privileges are required");

    let system = LinuxSystem::new();
    let stopped = orchestrator::stop(&system)?;

    info!(devices = stopped.len(), "zram swap stopped");
    Ok(())
}
