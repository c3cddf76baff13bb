//! Kernel version detection and feature gates.
//!
//! The version is read once by the caller and handed around as a value, so
//! every gate can be exercised with synthetic versions.

use crate::{Error, Result};
use std::fmt;

/// Kernel `major.minor` version.
///
/// Ordering compares `major` first and `minor` only within the same major,
/// so a higher major always wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct KernelVersion {
    /// Major version.
    pub major: u32,
    /// Minor version.
    pub minor: u32,
}

impl KernelVersion {
    /// First release shipping zram outside of staging.
    pub const ZRAM: Self = Self::new(3, 14);
    /// First release with multiple compression streams per device.
    pub const MULTI_COMP_STREAMS: Self = Self::new(3, 15);
    /// First release accepting `zstd` as `comp_algorithm`.
    pub const ZSTD: Self = Self::new(4, 19);

    /// Create a version from its parts.
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse a release string such as `5.15.0-91-generic`.
    ///
    /// Only the first two dot-separated fields are used. A field that is
    /// missing or not a plain integer becomes 0.
    #[must_use]
    pub fn parse(release: &str) -> Self {
        let mut fields = release.trim().split('.');
        let mut next = || {
            fields
                .next()
                .and_then(|f| f.parse::<u32>().ok())
                .unwrap_or(0)
        };
        let major = next();
        let minor = next();
        Self { major, minor }
    }

    /// Read the running kernel's version through `uname(2)`.
    pub fn current() -> Result<Self> {
        let uts = nix::sys::utsname::uname()
            .map_err(|e| Error::IoError(format!("uname failed: {e}")))?;
        Ok(Self::parse(&uts.release().to_string_lossy()))
    }

    /// `self >= other` under the major-then-minor ordering.
    #[must_use]
    pub fn at_least(self, other: Self) -> bool {
        self >= other
    }
}

impl fmt::Display for KernelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Feature gates derived from a [`KernelVersion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    version: KernelVersion,
}

impl Capabilities {
    /// Gates for the given kernel.
    #[must_use]
    pub const fn new(version: KernelVersion) -> Self {
        Self { version }
    }

    /// Gates for the running kernel.
    pub fn detect() -> Result<Self> {
        KernelVersion::current().map(Self::new)
    }

    /// Kernel version the gates were computed from.
    #[must_use]
    pub const fn version(&self) -> KernelVersion {
        self.version
    }

    /// zram is available (>= 3.14).
    #[must_use]
    pub fn supports_zram(&self) -> bool {
        self.version.at_least(KernelVersion::ZRAM)
    }

    /// zstd compression is available (>= 4.19).
    #[must_use]
    pub fn supports_zstd(&self) -> bool {
        self.version.at_least(KernelVersion::ZSTD)
    }

    /// A single device can compress on several cores (>= 3.15).
    #[must_use]
    pub fn supports_multi_comp_streams(&self) -> bool {
        self.version.at_least(KernelVersion::MULTI_COMP_STREAMS)
    }

    /// Whether `algorithm` can be written to `comp_algorithm` on this kernel.
    #[must_use]
    pub fn supports_algorithm(&self, algorithm: &str) -> bool {
        algorithm != "zstd" || self.supports_zstd()
    }

    /// Number of devices to create when none was requested: one device
    /// when it can use every core, else one device per core.
    #[must_use]
    pub fn default_device_count(&self, cpus: usize) -> u32 {
        if self.supports_multi_comp_streams() {
            1
        } else {
            u32::try_from(cpus.max(1)).unwrap_or(u32::MAX)
        }
    }
}
