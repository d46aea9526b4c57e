//! Ordered chain of cache levels.
//!
//! The hierarchy owns every level and the shared memory-traffic counter.
//! Chain order is storage order: a level forwards to the slice of levels
//! stored after it, so there are no back-references and no shared ownership
//! between levels.

use crate::common::{AccessType, ConfigError};
use crate::config::{CacheGeometry, Config};
use crate::core::cache::{AccessOutcome, CacheLevel};
use crate::core::traffic::MemoryTraffic;
use crate::stats::HierarchyStats;

/// A cache hierarchy, L1 first, backed by a notional main memory.
#[derive(Debug)]
pub struct CacheHierarchy {
    levels: Vec<CacheLevel>,
    memory: MemoryTraffic,
}

impl CacheHierarchy {
    /// Builds empty levels for `geometries`, in order.
    ///
    /// An empty slice is a hierarchy with no caches: every request goes
    /// straight to memory.
    pub fn new(geometries: &[CacheGeometry]) -> Self {
        let memory = MemoryTraffic::new();
        let levels = geometries
            .iter()
            .map(|geometry| {
                tracing::debug!(
                    level = geometry.level,
                    sets = geometry.sets,
                    ways = geometry.ways,
                    index_bits = geometry.index_bits,
                    offset_bits = geometry.offset_bits,
                    "cache level configured"
                );
                CacheLevel::new(geometry, memory.clone())
            })
            .collect();
        Self { levels, memory }
    }

    /// Validates `config` and builds its enabled levels.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] reported by [`Config::geometries`].
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self::new(&config.geometries()?))
    }

    /// Issues one request at the head of the chain.
    ///
    /// Returns the head level's outcome. With no levels the request is one
    /// unit of memory traffic and reported as a miss.
    pub fn request(&mut self, op: AccessType, addr: u32) -> AccessOutcome {
        match self.levels.split_first_mut() {
            Some((head, below)) => head.request(op, addr, below),
            None => {
                self.memory.record();
                AccessOutcome {
                    hit: false,
                    writeback: None,
                }
            }
        }
    }

    /// Levels in chain order.
    #[inline]
    pub fn levels(&self) -> &[CacheLevel] {
        &self.levels
    }

    /// Level at chain position `position` (0 = L1).
    #[inline]
    pub fn level(&self, position: usize) -> Option<&CacheLevel> {
        self.levels.get(position)
    }

    /// Transfers that crossed the last level.
    #[inline]
    pub fn memory_traffic(&self) -> u64 {
        self.memory.count()
    }

    /// Snapshot of every counter.
    pub fn stats(&self) -> HierarchyStats {
        HierarchyStats::collect(self)
    }
}
