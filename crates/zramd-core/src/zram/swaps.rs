//! Active swap discovery and swap tool invocations.

use crate::system::{CommandRunner, DeviceBackend, ProcFile, ProcSource};
use crate::Result;

/// Extract the zram index from a `/proc/swaps` line.
///
/// Only `partition` entries count, so a swap file that happens to be named
/// like a zram device is ignored. The filename may appear as `/dev/zramN` or
/// `/zramN` depending on the mount namespace of whoever ran `swapon`, so
/// only its last path segment is inspected.
#[must_use]
pub fn parse_swap_line(line: &str) -> Option<u32> {
    let mut fields = line.split_whitespace();
    let filename = fields.next()?;
    if fields.next()? != "partition" {
        return None;
    }
    let name = filename.rsplit('/').next()?;
    name.strip_prefix("zram")?.parse().ok()
}

/// All zram indices in a `/proc/swaps` listing, in listing order.
#[must_use]
pub fn swap_indices(listing: &str) -> Vec<u32> {
    listing.lines().filter_map(parse_swap_line).collect()
}

/// zram devices currently in use as swap.
pub fn active_swap_indices<S: ProcSource + ?Sized>(source: &S) -> Result<Vec<u32>> {
    Ok(swap_indices(&source.read_proc(ProcFile::Swaps)?))
}

fn node_arg<S: DeviceBackend + ?Sized>(system: &S, index: u32) -> String {
    system.device_path(index).to_string_lossy().into_owned()
}

/// Write a swap signature to the device.
pub fn make_swap<S>(system: &S, index: u32) -> Result<()>
where
    S: DeviceBackend + CommandRunner + ?Sized,
{
    system.run("mkswap", &[node_arg(system, index)])
}

/// Enable the device as swap with the given priority.
pub fn swap_on<S>(system: &S, index: u32, priority: i32) -> Result<()>
where
    S: DeviceBackend + CommandRunner + ?Sized,
{
    system.run(
        "swapon",
        &[
            node_arg(system, index),
            "--priority".to_string(),
            priority.to_string(),
        ],
    )
}

/// Disable swapping on the device.
pub fn swap_off<S>(system: &S, index: u32) -> Result<()>
where
    S: DeviceBackend + CommandRunner + ?Sized,
{
    system.run("swapoff", &[node_arg(system, index)])
}
