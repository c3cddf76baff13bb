//! Device naming and sysfs configuration.

use crate::system::DeviceBackend;
use crate::{Error, Result};
use std::fmt;
use std::path::PathBuf;

/// Handle for `/dev/zram<index>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZramDevice {
    /// Device index.
    pub index: u32,
}

impl ZramDevice {
    /// Handle for the given index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self { index }
    }

    /// Device node path on a host with the standard `/dev` layout.
    #[must_use]
    pub fn dev_path(&self) -> PathBuf {
        PathBuf::from(format!("/dev/zram{}", self.index))
    }
}

impl fmt::Display for ZramDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zram{}", self.index)
    }
}

/// Set the compression algorithm and size of a device.
///
/// `comp_algorithm` must be written before `disksize`: once a device is
/// sized the kernel rejects algorithm changes with "device busy".
pub fn configure<B: DeviceBackend + ?Sized>(
    backend: &B,
    index: u32,
    size_bytes: u64,
    algorithm: &str,
) -> Result<()> {
    if !backend.device_exists(index) {
        return Err(Error::DeviceMissing(index));
    }
    backend.write_attr(index, "comp_algorithm", algorithm)?;
    backend.write_attr(index, "disksize", &size_bytes.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingBackend {
        present: Vec<u32>,
        writes: Mutex<Vec<(u32, String, String)>>,
        reject: Option<&'static str>,
    }

    impl DeviceBackend for RecordingBackend {
        fn device_exists(&self, index: u32) -> bool {
            self.present.contains(&index)
        }

        fn write_attr(&self, index: u32, attr: &str, value: &str) -> Result<()> {
            if self.reject == Some(attr) {
                return Err(Error::IoError(format!("failed to write {attr}")));
            }
            self.writes
                .lock()
                .push((index, attr.to_string(), value.to_string()));
            Ok(())
        }
    }

    #[test]
    fn test_device_paths() {
        let dev = ZramDevice::new(5);
        assert_eq!(dev.dev_path(), PathBuf::from("/dev/zram5"));
        assert_eq!(dev.to_string(), "zram5");
    }

    #[test]
    fn test_configure_writes_algorithm_before_size() {
        let backend = RecordingBackend {
            present: vec![2],
            ..Default::default()
        };
        configure(&backend, 2, 4096, "zstd").unwrap();
        let writes = backend.writes.lock();
        assert_eq!(
            *writes,
            vec![
                (2, "comp_algorithm".to_string(), "zstd".to_string()),
                (2, "disksize".to_string(), "4096".to_string()),
            ]
        );
    }

    #[test]
    fn test_configure_missing_device() {
        let backend = RecordingBackend::default();
        let err = configure(&backend, 4, 4096, "lz4").unwrap_err();
        assert_eq!(err.to_string(), "device zram4 does not exist");
        assert!(backend.writes.lock().is_empty());
    }

    #[test]
    fn test_configure_stops_when_algorithm_rejected() {
        let backend = RecordingBackend {
            present: vec![0],
            reject: Some("comp_algorithm"),
            ..Default::default()
        };
        assert!(configure(&backend, 0, 4096, "lz4").is_err());
        assert!(backend.writes.lock().is_empty());
    }
}
