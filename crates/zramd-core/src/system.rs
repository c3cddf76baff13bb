//! Host collaborators.
//!
//! The orchestrator only talks to the host through these traits, so the
//! coordination logic can be tested without root or a zram module.

use crate::zram::ZramDevice;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;

/// Live kernel listings under `/proc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcFile {
    /// `/proc/modules`
    Modules,
    /// `/proc/swaps`
    Swaps,
    /// `/proc/meminfo`
    MemInfo,
}

impl ProcFile {
    /// File name under the proc root.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Modules => "modules",
            Self::Swaps => "swaps",
            Self::MemInfo => "meminfo",
        }
    }
}

/// Reads the full text of a proc listing.
pub trait ProcSource {
    /// Return the current contents of `file`.
    fn read_proc(&self, file: ProcFile) -> Result<String>;
}

/// Per-device node and sysfs attribute access.
pub trait DeviceBackend {
    /// Whether the device node exists.
    fn device_exists(&self, index: u32) -> bool;

    /// Device node handed to the swap tools.
    fn device_path(&self, index: u32) -> PathBuf {
        ZramDevice::new(index).dev_path()
    }

    /// Write `value` to `/sys/block/zram<index>/<attr>`.
    fn write_attr(&self, index: u32, attr: &str, value: &str) -> Result<()>;
}

/// Runs external tools (`modprobe`, `mkswap`, `swapon`, `swapoff`).
pub trait CommandRunner {
    /// Run `program` with `args`, failing with the tool's diagnostic text.
    fn run(&self, program: &str, args: &[String]) -> Result<()>;
}

/// Everything the orchestrator needs from the host.
pub trait System: ProcSource + DeviceBackend + CommandRunner + Sync {}

impl<T: ProcSource + DeviceBackend + CommandRunner + Sync> System for T {}

/// The real Linux host.
#[derive(Debug, Clone)]
pub struct LinuxSystem {
    proc_root: PathBuf,
    sys_root: PathBuf,
    dev_root: PathBuf,
}

impl Default for LinuxSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl LinuxSystem {
    /// Host rooted at `/proc`, `/sys` and `/dev`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_roots("/proc", "/sys", "/dev")
    }

    /// Host with relocated roots.
    #[must_use]
    pub fn with_roots(
        proc_root: impl Into<PathBuf>,
        sys_root: impl Into<PathBuf>,
        dev_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            proc_root: proc_root.into(),
            sys_root: sys_root.into(),
            dev_root: dev_root.into(),
        }
    }

    /// `<sys>/block/zram<index>`
    #[must_use]
    pub fn sys_path(&self, index: u32) -> PathBuf {
        self.sys_root.join("block").join(format!("zram{index}"))
    }
}

impl ProcSource for LinuxSystem {
    fn read_proc(&self, file: ProcFile) -> Result<String> {
        let path = self.proc_root.join(file.name());
        read_to_string(&path)
    }
}

impl DeviceBackend for LinuxSystem {
    fn device_exists(&self, index: u32) -> bool {
        self.device_path(index).exists()
    }

    fn device_path(&self, index: u32) -> PathBuf {
        self.dev_root.join(format!("zram{index}"))
    }

    fn write_attr(&self, index: u32, attr: &str, value: &str) -> Result<()> {
        let path = self.sys_path(index).join(attr);
        std::fs::write(&path, value)
            .map_err(|e| Error::IoError(format!("failed to write {}: {e}", path.display())))
    }
}

impl CommandRunner for LinuxSystem {
    fn run(&self, program: &str, args: &[String]) -> Result<()> {
        run_command(program, args)
    }
}

fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .map_err(|e| Error::IoError(format!("failed to read {}: {e}", path.display())))
}

/// Run a command, capturing stderr as the failure message.
///
/// When the tool exits non-zero without printing anything, the message names
/// the command line instead.
pub fn run_command(program: &str, args: &[String]) -> Result<()> {
    debug!(program, ?args, "Running command");
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output();

    match output {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => Err(command_error(
            program,
            args,
            &String::from_utf8_lossy(&out.stderr),
        )),
        Err(_) => Err(command_error(program, args, "")),
    }
}

fn command_error(program: &str, args: &[String], stderr: &str) -> Error {
    let msg = stderr.trim();
    if msg.is_empty() {
        let mut line = vec![program.to_string()];
        line.extend(args.iter().cloned());
        Error::Command(format!("failed to execute \"{}\"", line.join(" ")))
    } else {
        Error::Command(msg.to_string())
    }
}
