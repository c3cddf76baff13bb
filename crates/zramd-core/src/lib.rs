//! Compressed-RAM swap provisioning for Linux.
//!
//! This crate sizes zram swap as a bounded share of physical memory, loads
//! the zram module, configures each device and enables them concurrently.
//! It also tears everything down again, discovering active devices from
//! `/proc/swaps` rather than assuming how many were created.
//!
//! # Example
//!
//! ```no_run
//! use zramd_core::{Capabilities, LinuxSystem, StartRequest, SwapManager};
//!
//! let caps = Capabilities::detect().unwrap();
//! let system = LinuxSystem::new();
//! let manager = SwapManager::new(&system, caps);
//! manager
//!     .start(&StartRequest {
//!         algorithm: "zstd".to_string(),
//!         fraction: 0.5,
//!         max_size_bytes: 8 << 30,
//!         device_count: 1,
//!         priority: 100,
//!     })
//!     .unwrap();
//! ```

#![deny(missing_docs)]
#![deny(clippy::panic)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod error;
pub mod host;
pub mod kernel;
pub mod meminfo;
pub mod orchestrator;
pub mod sizing;
pub mod system;
pub mod zram;

pub use error::{Error, Failure, Result};
pub use kernel::{Capabilities, KernelVersion};
pub use orchestrator::{Activation, StartRequest, SwapManager, MAX_DEVICES};
pub use sizing::SizingRequest;
pub use system::{LinuxSystem, System};
