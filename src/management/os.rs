//! The operating system management object, backed by sysinfo.

use sysinfo::{MemoryRefreshKind, System};

use super::{
    AttributeValue, ManagedObject, ObjectName, FREE_PHYSICAL_MEMORY_SIZE, OPERATING_SYSTEM,
    TOTAL_PHYSICAL_MEMORY_SIZE,
};
use crate::error::ManagementError;

/// The name [`OperatingSystemInfo`] is registered under.
pub(crate) fn object_name() -> ObjectName {
    ObjectName {
        domain: "host".to_string(),
        properties: vec![("type".to_string(), "OperatingSystem".to_string())],
    }
}

/// Host memory attributes. Every read queries the OS again.
#[derive(Debug)]
pub struct OperatingSystemInfo {
    _private: (),
}

impl OperatingSystemInfo {
    /// Return the object if this platform can report host memory, or [`None`].
    pub fn for_platform() -> Option<Self> {
        cfg_if::cfg_if! {
            if #[cfg(any(
                target_os = "linux",
                target_os = "android",
                target_os = "macos",
                target_os = "ios",
                target_os = "windows",
                target_os = "freebsd",
            ))] {
                sysinfo::IS_SUPPORTED_SYSTEM.then_some(Self { _private: () })
            } else {
                None
            }
        }
    }

    /// sysinfo reports 0 for anything it failed to read, and an installed
    /// total of 0 is never real, so treat it as missing.
    fn ram(
        &self, attribute: &str, read: impl FnOnce(&System) -> u64,
    ) -> Result<AttributeValue, ManagementError> {
        let mut sys = System::new();
        sys.refresh_memory_specifics(MemoryRefreshKind::nothing().with_ram());
        let (total, value) = (sys.total_memory(), read(&sys));

        if total == 0 {
            crate::debug!("{OPERATING_SYSTEM}.{attribute}: platform reported no total");
            Err(self.not_found(attribute))
        } else {
            Ok(AttributeValue::U64(value))
        }
    }

    fn not_found(&self, attribute: &str) -> ManagementError {
        ManagementError::AttributeNotFound {
            object: OPERATING_SYSTEM.to_string(),
            attribute: attribute.to_string(),
        }
    }
}

impl ManagedObject for OperatingSystemInfo {
    fn attribute(&self, name: &str) -> Result<AttributeValue, ManagementError> {
        match name {
            TOTAL_PHYSICAL_MEMORY_SIZE => self.ram(name, System::total_memory),
            FREE_PHYSICAL_MEMORY_SIZE => self.ram(name, System::free_memory),
            _ => Err(self.not_found(name)),
        }
    }
}
