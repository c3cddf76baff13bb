//! Error types for zramd-core.

use std::fmt;
use thiserror::Error;

/// A single failure collected while driving several devices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Device index the failure belongs to, `None` for module-level steps.
    pub device: Option<u32>,
    /// Diagnostic text.
    pub message: String,
}

impl Failure {
    /// Failure attached to a zram device.
    #[must_use]
    pub fn device(index: u32, message: impl Into<String>) -> Self {
        Self {
            device: Some(index),
            message: message.into(),
        }
    }

    /// Failure not tied to any device.
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self {
            device: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.device {
            Some(index) => write!(f, "zram{index}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Errors that can occur while provisioning or tearing down zram swap.
#[derive(Debug, Error)]
pub enum Error {
    /// Start was requested while the module is present.
    #[error("the zram module is already loaded")]
    ModuleAlreadyLoaded,

    /// Stop was requested while the module is absent.
    #[error("the zram module is not loaded")]
    ModuleNotLoaded,

    /// The module did not create the expected device node.
    #[error("device zram{0} does not exist")]
    DeviceMissing(u32),

    /// Device count outside `1..=max`.
    #[error("cannot use {requested} devices, the limit is {max}")]
    TooManyDevices {
        /// Devices requested.
        requested: u32,
        /// Ceiling.
        max: u32,
    },

    /// The running kernel lacks a required feature.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// An external tool exited unsuccessfully.
    #[error("{0}")]
    Command(String),

    /// I/O error (procfs, sysfs, device nodes).
    #[error("I/O error: {0}")]
    IoError(String),

    /// Input data is invalid or malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// One or more independent steps failed; every failure is kept.
    #[error("{}", join_failures(.0))]
    Failures(Vec<Failure>),
}

fn join_failures(failures: &[Failure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Result type for zramd operations.
pub type Result<T> = std::result::Result<T, Error>;
