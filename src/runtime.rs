//! The process's own memory accounting.

mod collector;
mod process;

use std::{sync::Arc, time::Duration};

pub use self::{
    collector::CollectionClock,
    process::{MaxMemorySource, ProcessRuntime, RuntimeLimits},
};

/// Self-introspection of the runtime that manages this process's memory.
///
/// Implementations must never fail; degrade to a coarse value instead.
pub trait ManagedRuntime: Send + Sync {
    /// The most memory the runtime will ever commit, in bytes.
    fn max_memory(&self) -> u64;

    /// Memory currently committed by the runtime, in bytes.
    fn committed_memory(&self) -> u64;

    /// Every collector whose time should count towards collection time.
    fn garbage_collectors(&self) -> Vec<Arc<dyn GarbageCollector>>;
}

/// A source of memory reclamation work, such as a cache sweeper or an arena
/// reset, that keeps a cumulative time counter.
pub trait GarbageCollector: Send + Sync {
    fn name(&self) -> &str;

    /// Total time spent collecting since the process started, or [`None`] if
    /// this collector does not track it.
    fn collection_time(&self) -> Option<Duration>;
}

impl<R: ManagedRuntime + ?Sized> ManagedRuntime for Arc<R> {
    fn max_memory(&self) -> u64 {
        (**self).max_memory()
    }

    fn committed_memory(&self) -> u64 {
        (**self).committed_memory()
    }

    fn garbage_collectors(&self) -> Vec<Arc<dyn GarbageCollector>> {
        (**self).garbage_collectors()
    }
}
