//! Heap accounting for registry workloads using dhat.
//!
//! Profiling is only active with the `memory_profiling` feature; without it every measurement
//! reports zeros so benchmarks can call into this module unconditionally.
//!
//! ```bash
//! cargo bench -p rusty_ecs_bench --features memory_profiling
//! ```
//!
//! Load the generated `dhat-heap.json` into
//! <https://nnethercote.github.io/dh_view/dh_view.html> for the full profile.

use std::fmt;

/// Heap usage observed while building or mutating a registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Footprint {
    /// Total bytes allocated during the measurement.
    pub bytes: u64,
    /// Total number of allocations.
    pub allocations: u64,
    /// Peak heap usage in bytes.
    pub peak: u64,
}

impl Footprint {
    /// Bytes per entity, covering component buffers, owner vecs, index and membership records.
    pub fn bytes_per_entity(&self, entities: usize) -> f64 {
        per(self.bytes, entities)
    }

    /// Allocations per entity. Amortized growth keeps this well below one.
    pub fn allocations_per_entity(&self, entities: usize) -> f64 {
        per(self.allocations, entities)
    }
}

fn per(total: u64, entities: usize) -> f64 {
    if entities == 0 {
        0.0
    } else {
        total as f64 / entities as f64
    }
}

impl fmt::Display for Footprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bytes in {} allocs, peak {} bytes",
            self.bytes, self.allocations, self.peak
        )
    }
}

/// Active heap profile. Dropping it without [`finish`](Profile::finish) discards the numbers.
#[cfg(feature = "memory_profiling")]
pub struct Profile {
    _profiler: dhat::Profiler,
}

#[cfg(feature = "memory_profiling")]
impl Profile {
    /// Start profiling. Only one profile may be active at a time.
    pub fn start() -> Self {
        Self {
            _profiler: dhat::Profiler::new_heap(),
        }
    }

    /// Stop profiling and collect the footprint. Also writes `dhat-heap.json`.
    pub fn finish(self) -> Footprint {
        let stats = dhat::HeapStats::get();
        Footprint {
            bytes: stats.total_bytes as u64,
            allocations: stats.total_blocks as u64,
            peak: stats.max_bytes as u64,
        }
    }
}

#[cfg(not(feature = "memory_profiling"))]
pub struct Profile;

#[cfg(not(feature = "memory_profiling"))]
impl Profile {
    pub fn start() -> Self {
        Self
    }

    pub fn finish(self) -> Footprint {
        Footprint::default()
    }
}

/// Run `f` under a heap profile, returning its result and the observed footprint.
pub fn measure<F, R>(f: F) -> (R, Footprint)
where
    F: FnOnce() -> R,
{
    let profile = Profile::start();
    let result = f();
    (result, profile.finish())
}
