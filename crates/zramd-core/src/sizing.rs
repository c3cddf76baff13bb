//! Swap size computation.

/// Inputs for sizing the swap devices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingRequest {
    /// Physical memory in bytes.
    pub total_ram_bytes: u64,
    /// Share of RAM to turn into swap, in `(0, 1]`.
    pub fraction: f64,
    /// Absolute ceiling for the total swap size in bytes.
    pub cap_bytes: u64,
    /// Number of devices the total is split across, at least 1.
    pub device_count: u32,
}

impl SizingRequest {
    /// Total swap across all devices.
    #[must_use]
    pub fn total_bytes(&self) -> u64 {
        total_swap_bytes(self.total_ram_bytes, self.fraction, self.cap_bytes)
    }

    /// Size of each device. Remainder bytes are dropped.
    #[must_use]
    pub fn per_device_bytes(&self) -> u64 {
        per_device_bytes(self.total_bytes(), self.device_count)
    }
}

/// `min(floor(mem_total_bytes * fraction), cap_bytes)`.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn total_swap_bytes(mem_total_bytes: u64, fraction: f64, cap_bytes: u64) -> u64 {
    // `as` saturates, so a fraction above 1 can never wrap
    let share = (mem_total_bytes as f64 * fraction).floor() as u64;
    share.min(cap_bytes)
}

/// Floor division of `total_bytes` over `device_count` devices.
///
/// # Panics
///
/// Debug builds assert `device_count >= 1`.
#[must_use]
pub fn per_device_bytes(total_bytes: u64, device_count: u32) -> u64 {
    debug_assert!(device_count >= 1, "device count must be at least 1");
    total_bytes / u64::from(device_count.max(1))
}
