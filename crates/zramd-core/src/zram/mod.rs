//! zram device, swap and module operations.
//!
//! A device is identified only by its index; all state lives in the kernel
//! and is re-read through the [`crate::system`] traits on every call.

mod device;
mod module;
mod swaps;

pub use device::{configure, ZramDevice};
pub use module::{is_loaded, load, module_listed, unload, MODULE_NAME};
pub use swaps::{active_swap_indices, make_swap, parse_swap_line, swap_indices, swap_off, swap_on};
