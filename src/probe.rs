//! The memory query facade.

use std::time::Duration;

use serde::Serialize;

use crate::{
    error::{ProbeError, Result},
    management::{
        FromAttribute, ManagementServer, ObjectName, PlatformManagementServer,
        FREE_PHYSICAL_MEMORY_SIZE, OPERATING_SYSTEM, TOTAL_PHYSICAL_MEMORY_SIZE,
    },
    options::Config,
    runtime::{ManagedRuntime, ProcessRuntime},
};

/// Point-in-time memory metrics for the current process and host.
///
/// The maximum memory is read once at construction. Everything else is queried
/// again on every call, so two calls may disagree even with nothing happening
/// in between.
///
/// ```no_run
/// use memprobe::MemoryProbe;
///
/// let probe = MemoryProbe::new();
/// assert!(probe.committed_memory() <= probe.max_memory());
///
/// match probe.total_physical_memory() {
///     Ok(total) => println!("{total} bytes installed"),
///     Err(err) => println!("{err}"),
/// }
/// ```
#[derive(Debug)]
pub struct MemoryProbe<R = ProcessRuntime, S = PlatformManagementServer> {
    max_memory: u64,
    runtime: R,
    server: S,
}

impl MemoryProbe {
    /// Create a probe over this process and the platform's management server.
    pub fn new() -> Self {
        Self::with_sources(ProcessRuntime::default(), PlatformManagementServer::new())
    }

    /// Create a probe over this process with limits taken from `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::with_sources(
            ProcessRuntime::new(&config.runtime_limits()),
            PlatformManagementServer::new(),
        )
    }
}

impl Default for MemoryProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ManagedRuntime, S: ManagementServer> MemoryProbe<R, S> {
    /// Create a probe over arbitrary sources.
    pub fn with_sources(runtime: R, server: S) -> Self {
        Self {
            max_memory: runtime.max_memory(),
            runtime,
            server,
        }
    }

    /// The most memory the runtime will ever commit, in bytes. Never changes.
    pub fn max_memory(&self) -> u64 {
        self.max_memory
    }

    /// Memory currently committed by the runtime, in bytes. At most
    /// [`MemoryProbe::max_memory`] when the runtime enforces its maximum.
    pub fn committed_memory(&self) -> u64 {
        self.runtime.committed_memory()
    }

    /// Approximate total time spent collecting garbage, summed across every
    /// collector. Collectors that don't track their time are left out.
    pub fn collection_time(&self) -> Duration {
        self.runtime
            .garbage_collectors()
            .iter()
            .filter_map(|collector| {
                let time = collector.collection_time();
                if time.is_none() {
                    crate::trace!("collector '{}' has no collection time", collector.name());
                }
                time
            })
            .fold(Duration::ZERO, Duration::saturating_add)
    }

    /// Total physical memory on the host in bytes, independent of
    /// [`MemoryProbe::max_memory`].
    pub fn total_physical_memory(&self) -> Result<u64> {
        self.get_attribute(OPERATING_SYSTEM, TOTAL_PHYSICAL_MEMORY_SIZE)
    }

    /// Free physical memory on the host in bytes, independent of
    /// [`MemoryProbe::committed_memory`].
    pub fn free_physical_memory(&self) -> Result<u64> {
        self.get_attribute(OPERATING_SYSTEM, FREE_PHYSICAL_MEMORY_SIZE)
    }

    /// Query every metric once.
    pub fn snapshot(&self) -> MemorySnapshot {
        MemorySnapshot {
            max_memory: self.max_memory(),
            committed_memory: self.committed_memory(),
            collection_time_ms: u64::try_from(self.collection_time().as_millis())
                .unwrap_or(u64::MAX),
            total_physical_memory: self.total_physical_memory().ok(),
            free_physical_memory: self.free_physical_memory().ok(),
        }
    }

    /// The runtime committed memory and collection time are read from.
    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// The management server physical memory is read from.
    pub fn server(&self) -> &S {
        &self.server
    }

    /// Read `attribute` of `object`. Whatever goes wrong is reported as
    /// [`ProbeError::UnsupportedOperation`] with the cause attached.
    fn get_attribute<T: FromAttribute>(&self, object: &str, attribute: &str) -> Result<T> {
        ObjectName::new(object)
            .and_then(|name| self.server.get_attribute(&name, attribute))
            .and_then(|value| T::extract(attribute, value))
            .map_err(|cause| {
                crate::debug!("({object}).{attribute} is unavailable: {cause}");
                ProbeError::UnsupportedOperation {
                    object: object.to_string(),
                    attribute: attribute.to_string(),
                    cause,
                }
            })
    }
}

/// Every metric of a [`MemoryProbe`] at one point in time.
///
/// Physical memory fields are [`None`] where the platform can't report them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MemorySnapshot {
    pub max_memory: u64,
    pub committed_memory: u64,
    pub collection_time_ms: u64,
    pub total_physical_memory: Option<u64>,
    pub free_physical_memory: Option<u64>,
}
