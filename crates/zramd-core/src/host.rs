//! Host environment checks made before touching any device.

use std::process::{Command, Stdio};
use tracing::debug;

/// Whether the process may manage swap: running as root, or started
/// directly by init (which is expected to grant the needed capabilities).
#[must_use]
pub fn has_privileges() -> bool {
    nix::unistd::getppid().as_raw() == 1 || nix::unistd::geteuid().is_root()
}

/// Number of online CPUs.
#[must_use]
pub fn cpu_count() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1)
}

/// Whether the host is a virtual machine.
///
/// Asks `systemd-detect-virt`; if it cannot be run at all, falls back to
/// the `hypervisor` CPU flag.
#[must_use]
pub fn is_virtual_machine() -> bool {
    let status = Command::new("systemd-detect-virt")
        .args(["--vm", "--quiet"])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    let detected = match status {
        Ok(status) => Some(status.success()),
        Err(e) => {
            debug!(error = %e, "systemd-detect-virt unavailable, reading /proc/cpuinfo");
            None
        }
    };
    vm_verdict(detected, || std::fs::read_to_string("/proc/cpuinfo").ok())
}

/// Combine the `systemd-detect-virt` answer with the cpuinfo fallback,
/// which is only read when the tool could not run.
fn vm_verdict(detected: Option<bool>, cpuinfo: impl FnOnce() -> Option<String>) -> bool {
    detected.unwrap_or_else(|| cpuinfo().is_some_and(|info| cpuinfo_has_hypervisor(&info)))
}

/// Whether any `flags` line of a `/proc/cpuinfo` dump lists `hypervisor`.
#[must_use]
pub fn cpuinfo_has_hypervisor(cpuinfo: &str) -> bool {
    cpuinfo.lines().any(|line| {
        line.split_once(':').is_some_and(|(key, value)| {
            key.trim() == "flags" && value.split_whitespace().any(|flag| flag == "hypervisor")
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpuinfo_hypervisor() {
        let vm = "processor\t: 0\nflags\t\t: fpu vme de pse hypervisor lahf_lm\n";
        assert!(cpuinfo_has_hypervisor(vm));
        let tail = "flags\t\t: fpu vme hypervisor\n";
        assert!(cpuinfo_has_hypervisor(tail));
    }

    #[test]
    fn test_cpuinfo_bare_metal() {
        let metal = "processor\t: 0\nflags\t\t: fpu vme de pse lahf_lm\n";
        assert!(!cpuinfo_has_hypervisor(metal));
        assert!(!cpuinfo_has_hypervisor("model name\t: hypervisor-branded cpu\n"));
        assert!(!cpuinfo_has_hypervisor("flags\t\t: not_a_hypervisor_flag\n"));
        assert!(!cpuinfo_has_hypervisor(""));
    }

    #[test]
    fn test_cpu_count() {
        assert!(cpu_count() >= 1);
    }

    #[test]
    fn test_vm_verdict_trusts_detect_virt() {
        let unread = || -> Option<String> { unreachable!("cpuinfo must not be read") };
        assert!(vm_verdict(Some(true), unread));
        assert!(!vm_verdict(Some(false), unread));
    }

    #[test]
    fn test_vm_verdict_falls_back_to_cpuinfo() {
        let vm = || Some("flags\t\t: fpu hypervisor\n".to_string());
        let metal = || Some("flags\t\t: fpu vme\n".to_string());
        assert!(vm_verdict(None, vm));
        assert!(!vm_verdict(None, metal));
        assert!(!vm_verdict(None, || None));
    }

    #[test]
    fn test_root_has_privileges() {
        if nix::unistd::geteuid().is_root() {
            assert!(has_privileges());
        }
    }
}
