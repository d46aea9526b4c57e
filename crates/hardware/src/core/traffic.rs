//! Off-chip memory traffic counter.
//!
//! One counter is shared by a whole hierarchy. Each level holds a cloned
//! handle and bumps it whenever a request leaves the last level: a block
//! fetched from memory, or a dirty block written back to it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared handle to the memory-traffic count.
///
/// Clones refer to the same counter. The count only ever increases.
#[derive(Clone, Debug, Default)]
pub struct MemoryTraffic(Arc<AtomicU64>);

impl MemoryTraffic {
    /// Creates a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one transfer to or from memory.
    #[inline]
    pub fn record(&self) {
        let _ = self.0.fetch_add(1, Ordering::Relaxed);
    }

    /// Transfers recorded so far.
    #[inline]
    pub fn count(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}
