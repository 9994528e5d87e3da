//! The current process as a [`ManagedRuntime`].

use std::{fmt, sync::Arc};

use serde::Serialize;
use sysinfo::{MemoryRefreshKind, Pid, ProcessRefreshKind, ProcessesToUpdate, System};

use super::{GarbageCollector, ManagedRuntime};

/// Which bounds may be considered when resolving the maximum memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeLimits {
    /// An operator-declared ceiling in bytes.
    pub declared_max: Option<u64>,
    /// Consider the cgroup memory limit (Linux only).
    pub cgroup_limit: bool,
    /// Consider `RLIMIT_AS` (Unix only).
    pub address_space_limit: bool,
}

impl Default for RuntimeLimits {
    fn default() -> Self {
        Self {
            declared_max: None,
            cgroup_limit: true,
            address_space_limit: true,
        }
    }
}

/// Where the resolved maximum came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxMemorySource {
    Declared,
    Cgroup,
    AddressSpace,
    Physical,
    Unbounded,
}

impl fmt::Display for MaxMemorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MaxMemorySource::Declared => "declared",
            MaxMemorySource::Cgroup => "cgroup",
            MaxMemorySource::AddressSpace => "address space",
            MaxMemorySource::Physical => "physical",
            MaxMemorySource::Unbounded => "unbounded",
        })
    }
}

/// Pick the tightest available bound. Earlier candidates win ties.
fn tightest_bound(candidates: &[(MaxMemorySource, Option<u64>)]) -> (MaxMemorySource, u64) {
    candidates
        .iter()
        .filter_map(|&(source, bound)| bound.map(|bytes| (source, bytes)))
        .fold(None, |best: Option<(MaxMemorySource, u64)>, candidate| match best {
            Some(best) if best.1 <= candidate.1 => Some(best),
            _ => Some(candidate),
        })
        .unwrap_or((MaxMemorySource::Unbounded, u64::MAX))
}

fn cgroup_limit(sys: &System) -> Option<u64> {
    // sysinfo asserts that memory was refreshed before reading cgroup limits.
    if sys.total_memory() == 0 {
        return None;
    }

    sys.cgroup_limits().map(|limits| limits.total_memory)
}

fn address_space_limit() -> Option<u64> {
    cfg_if::cfg_if! {
        if #[cfg(unix)] {
            // SAFETY: `getrlimit` only writes into the struct we pass, and we only
            // read it on success.
            unsafe {
                let mut limit: libc::rlimit = std::mem::zeroed();
                if libc::getrlimit(libc::RLIMIT_AS, &mut limit) == 0
                    && limit.rlim_cur != libc::RLIM_INFINITY
                {
                    Some(limit.rlim_cur as u64)
                } else {
                    None
                }
            }
        } else {
            None
        }
    }
}

/// Memory accounting for the running process.
///
/// The maximum is resolved once, in [`ProcessRuntime::new`], as the tightest of
/// the enabled bounds: a declared ceiling, the cgroup limit, `RLIMIT_AS`, and
/// the host's physical memory. Committed memory is the process's resident set.
///
/// The kernel enforces every bound except the declared one. A declared ceiling
/// is advisory: the resident set may grow past it, and committed memory then
/// reports more than the maximum.
pub struct ProcessRuntime {
    max_memory: u64,
    max_memory_source: MaxMemorySource,
    pid: Option<Pid>,
    collectors: Vec<Arc<dyn GarbageCollector>>,
}

impl ProcessRuntime {
    pub fn new(limits: &RuntimeLimits) -> Self {
        let mut sys = System::new();
        sys.refresh_memory_specifics(MemoryRefreshKind::nothing().with_ram());

        let physical = Some(sys.total_memory()).filter(|&total| total > 0);
        let cgroup = limits.cgroup_limit.then(|| cgroup_limit(&sys)).flatten();
        let address_space = limits
            .address_space_limit
            .then(address_space_limit)
            .flatten();

        let (max_memory_source, max_memory) = tightest_bound(&[
            (MaxMemorySource::Declared, limits.declared_max),
            (MaxMemorySource::Cgroup, cgroup),
            (MaxMemorySource::AddressSpace, address_space),
            (MaxMemorySource::Physical, physical),
        ]);

        crate::info!("resolved max memory to {max_memory} bytes ({max_memory_source})");

        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(_err) => {
                crate::warn!("cannot determine own pid, committed memory will be 0: {_err}");
                None
            }
        };

        Self {
            max_memory,
            max_memory_source,
            pid,
            collectors: Vec::new(),
        }
    }

    /// Register a collector whose time counts towards collection time.
    #[must_use]
    pub fn with_collector(mut self, collector: Arc<dyn GarbageCollector>) -> Self {
        self.collectors.push(collector);
        self
    }

    pub fn max_memory_source(&self) -> MaxMemorySource {
        self.max_memory_source
    }

    fn resident_set_size(&self) -> Option<u64> {
        let pid = self.pid?;
        let mut sys = System::new();
        sys.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );

        sys.process(pid).map(|process| process.memory())
    }
}

impl Default for ProcessRuntime {
    fn default() -> Self {
        Self::new(&RuntimeLimits::default())
    }
}

impl fmt::Debug for ProcessRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessRuntime")
            .field("max_memory", &self.max_memory)
            .field("max_memory_source", &self.max_memory_source)
            .field("pid", &self.pid)
            .field(
                "collectors",
                &self.collectors.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ManagedRuntime for ProcessRuntime {
    fn max_memory(&self) -> u64 {
        self.max_memory
    }

    fn committed_memory(&self) -> u64 {
        self.resident_set_size().unwrap_or_default()
    }

    fn garbage_collectors(&self) -> Vec<Arc<dyn GarbageCollector>> {
        self.collectors.clone()
    }
}
