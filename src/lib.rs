//! Memory metrics for a long-lived process and the host it runs on.
//!
//! [`MemoryProbe`] answers five questions, for example to let a daemon decide
//! whether it should restart itself under memory pressure:
//!
//! - [`MemoryProbe::max_memory`]: the most memory the process may commit,
//!   fixed at construction.
//! - [`MemoryProbe::committed_memory`]: memory currently committed.
//! - [`MemoryProbe::collection_time`]: time spent in registered collectors.
//! - [`MemoryProbe::total_physical_memory`] and
//!   [`MemoryProbe::free_physical_memory`]: host RAM, which not every platform
//!   can report. Those fail with [`ProbeError::UnsupportedOperation`] instead of
//!   returning a made-up value.
//!
//! What to do with the numbers is up to the caller.

#![warn(rust_2018_idioms)]

pub mod args;
pub mod error;
pub mod management;
pub mod options;
pub mod probe;
pub mod runtime;

pub mod utils {
    pub mod logging;
}

pub use error::{ProbeError, Result};
pub use probe::{MemoryProbe, MemorySnapshot};
pub use runtime::{CollectionClock, GarbageCollector, ManagedRuntime, ProcessRuntime};
