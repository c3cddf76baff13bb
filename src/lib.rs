//! # zramd
//!
//! Compressed-RAM swap provisioning for Linux zram devices.
//!
//! This is the workspace root crate that re-exports core functionality.
//! For direct usage, depend on individual sub-crates:
//!
//! - [`zramd-core`] - Sizing, kernel gates, swap discovery and the
//!   start/stop orchestrator
//! - [`zramd-cli`] - CLI tool (`zramd` binary)

pub use zramd_core::*;
