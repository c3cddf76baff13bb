//! Start/stop orchestration.
//!
//! Start: module loaded, devices configured one by one, then every device
//! formatted and enabled concurrently. Stop: active zram swaps discovered,
//! disabled concurrently, module unloaded. Per-device failures never stop
//! sibling devices; they are collected and reported together once every
//! task has finished. Nothing is rolled back.

use crate::kernel::Capabilities;
use crate::sizing::SizingRequest;
use crate::system::{ProcFile, System};
use crate::zram;
use crate::{meminfo, Error, Failure, Result};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{info, warn};

/// Highest number of devices a single start may create.
pub const MAX_DEVICES: u32 = 255;

/// Parameters for [`SwapManager::start`], already range-checked by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct StartRequest {
    /// Compression algorithm written to `comp_algorithm`.
    pub algorithm: String,
    /// Share of RAM to use, in `[0.05, 1.0]`.
    pub fraction: f64,
    /// Cap on the total swap size in bytes.
    pub max_size_bytes: u64,
    /// Devices to create.
    pub device_count: u32,
    /// Swap priority, in `[-1, 32767]`.
    pub priority: i32,
}

/// What a successful start set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activation {
    /// Devices enabled as swap.
    pub devices: u32,
    /// Size of each device in bytes.
    pub device_bytes: u64,
}

/// Drives zram swap setup and teardown against a [`System`].
#[derive(Debug)]
pub struct SwapManager<'a, S: System + ?Sized> {
    system: &'a S,
    capabilities: Capabilities,
}

impl<'a, S: System + ?Sized> SwapManager<'a, S> {
    /// Manager for `system` running the kernel described by `capabilities`.
    #[must_use]
    pub fn new(system: &'a S, capabilities: Capabilities) -> Self {
        Self {
            system,
            capabilities,
        }
    }

    /// Load the module and bring up `device_count` swap devices.
    ///
    /// # Errors
    ///
    /// Precondition failures (module already loaded, unsupported kernel,
    /// bad device count, missing device node) abort before any swap is
    /// enabled. A failure after the module load leaves it loaded.
    /// Activation failures are returned together as [`Error::Failures`];
    /// devices that came up stay active.
    pub fn start(&self, req: &StartRequest) -> Result<Activation> {
        self.check_start(req)?;
        if zram::is_loaded(self.system)? {
            return Err(Error::ModuleAlreadyLoaded);
        }

        zram::load(self.system, req.device_count)?;

        let table = meminfo::parse(&self.system.read_proc(ProcFile::MemInfo)?);
        let sizing = SizingRequest {
            total_ram_bytes: meminfo::mem_total_bytes(&table)?,
            fraction: req.fraction,
            cap_bytes: req.max_size_bytes,
            device_count: req.device_count,
        };
        let device_bytes = sizing.per_device_bytes();

        for index in 0..req.device_count {
            zram::configure(self.system, index, device_bytes, &req.algorithm)?;
        }
        info!(
            devices = req.device_count,
            device_bytes,
            algorithm = %req.algorithm,
            "Configured zram devices"
        );

        let indices: Vec<u32> = (0..req.device_count).collect();
        let started = Instant::now();
        let failures = fan_out(&indices, |index| {
            zram::make_swap(self.system, index)?;
            zram::swap_on(self.system, index, req.priority)
        });
        info!(
            elapsed = ?started.elapsed(),
            failed = failures.len(),
            "Swap activation finished"
        );

        if failures.is_empty() {
            Ok(Activation {
                devices: req.device_count,
                device_bytes,
            })
        } else {
            Err(Error::Failures(failures))
        }
    }

    /// Disable every active zram swap and unload the module.
    ///
    /// See [`stop`].
    ///
    /// # Errors
    ///
    /// Same as [`stop`].
    pub fn stop(&self) -> Result<Vec<u32>> {
        stop(self.system)
    }

    fn check_start(&self, req: &StartRequest) -> Result<()> {
        if req.device_count == 0 {
            return Err(Error::InvalidInput(
                "at least one device is required".to_string(),
            ));
        }
        if req.device_count > MAX_DEVICES {
            return Err(Error::TooManyDevices {
                requested: req.device_count,
                max: MAX_DEVICES,
            });
        }
        let version = self.capabilities.version();
        if !self.capabilities.supports_zram() {
            return Err(Error::Unsupported(format!(
                "zram requires Linux 3.14 or newer, running {version}"
            )));
        }
        if !self.capabilities.supports_algorithm(&req.algorithm) {
            return Err(Error::Unsupported(format!(
                "the {} algorithm requires Linux 4.19 or newer, running {version}",
                req.algorithm
            )));
        }
        Ok(())
    }
}

/// Disable every active zram swap and unload the module.
///
/// Teardown does not depend on the kernel version. Returns the indices that
/// were found active.
///
/// # Errors
///
/// [`Error::ModuleNotLoaded`] when there is nothing to stop. Otherwise
/// every swapoff failure plus a module unload failure are returned as
/// [`Error::Failures`].
pub fn stop<S: System + ?Sized>(system: &S) -> Result<Vec<u32>> {
    if !zram::is_loaded(system)? {
        return Err(Error::ModuleNotLoaded);
    }

    let indices = zram::active_swap_indices(system)?;
    info!(devices = ?indices, "Disabling zram swap");
    let mut failures = fan_out(&indices, |index| zram::swap_off(system, index));

    // Unload even after swapoff failures; a device still in use makes
    // modprobe fail and that is reported too.
    if let Err(e) = zram::unload(system) {
        warn!(error = %e, "Module unload failed");
        failures.push(Failure::other(e.to_string()));
    }

    if failures.is_empty() {
        Ok(indices)
    } else {
        Err(Error::Failures(failures))
    }
}

/// Run `task` for every index on the rayon pool and collect the failures.
///
/// Returns only after every task has completed. Failures are sorted by
/// device index.
pub fn fan_out<F>(indices: &[u32], task: F) -> Vec<Failure>
where
    F: Fn(u32) -> Result<()> + Sync,
{
    let mut failures: Vec<Failure> = indices
        .par_iter()
        .filter_map(|&index| {
            task(index).err().map(|e| {
                warn!(device = index, error = %e, "Device operation failed");
                Failure::device(index, e.to_string())
            })
        })
        .collect();
    failures.sort_by_key(|f| f.device);
    failures
}
