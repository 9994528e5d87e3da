use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{Duration, Instant},
};

use super::GarbageCollector;

/// A [`GarbageCollector`] driven by the application.
///
/// Wrap each reclamation pass with [`CollectionClock::time`] (or report it via
/// [`CollectionClock::record`]) and register the clock with the runtime.
/// Time is kept at millisecond resolution and only ever grows.
#[derive(Debug)]
pub struct CollectionClock {
    name: String,
    millis: AtomicU64,
    supported: bool,
}

impl CollectionClock {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            millis: AtomicU64::new(0),
            supported: true,
        }
    }

    /// A clock for a collector that cannot measure its own time. It always
    /// reports [`None`].
    pub fn unsupported(name: impl Into<String>) -> Self {
        Self {
            supported: false,
            ..Self::new(name)
        }
    }

    /// Add a finished pass.
    pub fn record(&self, elapsed: Duration) {
        let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.millis
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                Some(current.saturating_add(millis))
            })
            .ok();
    }

    /// Run `pass`, recording how long it took.
    pub fn time<T>(&self, pass: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = pass();
        self.record(start.elapsed());

        result
    }
}

impl GarbageCollector for CollectionClock {
    fn name(&self) -> &str {
        &self.name
    }

    fn collection_time(&self) -> Option<Duration> {
        self.supported
            .then(|| Duration::from_millis(self.millis.load(Ordering::Relaxed)))
    }
}
