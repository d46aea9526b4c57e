//! Simulation statistics collection and reporting.
//!
//! This module tracks and presents the results of a trace replay. It provides:
//! 1. **Counters:** Reads, writes, their misses, and writebacks per level.
//! 2. **Snapshots:** A serializable view of the whole hierarchy, including the
//!    memory-traffic count.
//! 3. **Report:** The plain-text report (configuration echo, per-set contents
//!    and the lettered measurements).
//!
//! Miss rates are `None` when a level has seen no accesses of the relevant
//! kind. The text report prints those as `0.0000`; JSON output has `null`.

use std::fmt;

use serde::Serialize;

use crate::common::AccessType;
use crate::config::Config;
use crate::core::{CacheHierarchy, CacheLevel};

/// Counters of one cache level.
///
/// Every counter only increases. A miss counts both as an access and as a
/// miss, so `read_misses <= reads` and `write_misses <= writes`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LevelStats {
    /// Read requests received (demand reads and fetches from the level above).
    pub reads: u64,
    /// Read requests that missed.
    pub read_misses: u64,
    /// Write requests received (stores and writebacks from the level above).
    pub writes: u64,
    /// Write requests that missed.
    pub write_misses: u64,
    /// Dirty victims written back to the next level or memory.
    pub writebacks: u64,
}

impl LevelStats {
    #[inline]
    pub(crate) const fn record_hit(&mut self, op: AccessType) {
        match op {
            AccessType::Read => self.reads += 1,
            AccessType::Write => self.writes += 1,
        }
    }

    #[inline]
    pub(crate) const fn record_miss(&mut self, op: AccessType) {
        match op {
            AccessType::Read => {
                self.reads += 1;
                self.read_misses += 1;
            }
            AccessType::Write => {
                self.writes += 1;
                self.write_misses += 1;
            }
        }
    }

    /// Reads plus writes.
    pub const fn accesses(&self) -> u64 {
        self.reads + self.writes
    }

    /// Read misses plus write misses.
    pub const fn misses(&self) -> u64 {
        self.read_misses + self.write_misses
    }

    /// `(read_misses + write_misses) / (reads + writes)`.
    ///
    /// The miss rate reported for the first level.
    pub fn demand_miss_rate(&self) -> Option<f64> {
        ratio(self.misses(), self.accesses())
    }

    /// `read_misses / reads`.
    ///
    /// The miss rate reported for every level after the first. Write traffic
    /// (writebacks arriving from above) is left out of it, unlike
    /// [`LevelStats::demand_miss_rate`].
    pub fn read_miss_rate(&self) -> Option<f64> {
        ratio(self.read_misses, self.reads)
    }

    /// The miss rate reported for a level at chain `position` (0 = L1).
    pub fn miss_rate_at(&self, position: usize) -> Option<f64> {
        if position == 0 {
            self.demand_miss_rate()
        } else {
            self.read_miss_rate()
        }
    }
}

fn ratio(num: u64, den: u64) -> Option<f64> {
    (den != 0).then(|| num as f64 / den as f64)
}

/// Counters and miss rate of one level, as reported.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LevelSummary {
    /// 1-based level number.
    pub level: usize,
    /// Raw counters.
    #[serde(flatten)]
    pub counters: LevelStats,
    /// Miss rate under the formula for this level's position.
    pub miss_rate: Option<f64>,
}

/// Snapshot of a whole hierarchy.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HierarchyStats {
    /// Per level, L1 first.
    pub levels: Vec<LevelSummary>,
    /// Transfers that crossed the last level.
    pub memory_traffic: u64,
}

impl HierarchyStats {
    /// Reads every counter of `hierarchy`.
    pub fn collect(hierarchy: &CacheHierarchy) -> Self {
        let levels = hierarchy
            .levels()
            .iter()
            .enumerate()
            .map(|(position, level)| LevelSummary {
                level: level.level(),
                counters: *level.stats(),
                miss_rate: level.stats().miss_rate_at(position),
            })
            .collect();
        Self {
            levels,
            memory_traffic: hierarchy.memory_traffic(),
        }
    }

    /// Serializes the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Propagates [`serde_json::Error`]; a snapshot holds only numbers, so
    /// this does not fail in practice.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Plain-text simulation report.
///
/// Rendered through [`fmt::Display`]:
///
/// ```text
/// ===== Simulator configuration =====
/// BLOCKSIZE:  16
/// ...
/// ===== L1 contents =====
/// set	0:	7 D	3
/// ...
/// ===== Measurements =====
/// a. L1 reads:                   ...
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    config: &'a Config,
    trace_file: &'a str,
    hierarchy: &'a CacheHierarchy,
}

impl<'a> Report<'a> {
    /// Creates a report over the final state of `hierarchy`.
    pub const fn new(config: &'a Config, trace_file: &'a str, hierarchy: &'a CacheHierarchy) -> Self {
        Self {
            config,
            trace_file,
            hierarchy,
        }
    }

    fn fmt_configuration(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = self.config;
        writeln!(f, "===== Simulator configuration =====")?;
        writeln!(f, "BLOCKSIZE:  {}", c.block_size)?;
        writeln!(f, "L1_SIZE:    {}", c.l1.size_bytes)?;
        writeln!(f, "L1_ASSOC:   {}", c.l1.ways)?;
        writeln!(f, "L2_SIZE:    {}", c.l2.size_bytes)?;
        writeln!(f, "L2_ASSOC:   {}", c.l2.ways)?;
        writeln!(f, "trace_file: {}", self.trace_file)?;
        writeln!(f)
    }

    fn fmt_contents(f: &mut fmt::Formatter<'_>, level: &CacheLevel) -> fmt::Result {
        writeln!(f, "===== L{} contents =====", level.level())?;
        for (index, set) in level.sets().iter().enumerate() {
            write!(f, "set\t{index}:")?;
            for block in set.mru_order() {
                write!(f, "\t{:x}", block.tag())?;
                if block.dirty() {
                    write!(f, " D")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }

    fn fmt_measurements(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let l1 = self
            .hierarchy
            .level(0)
            .map(|level| *level.stats())
            .unwrap_or_default();
        let l2 = self.hierarchy.level(1).map(|level| *level.stats());

        writeln!(f)?;
        writeln!(f, "===== Measurements =====")?;
        writeln!(f, "a. L1 reads:                   {}", l1.reads)?;
        writeln!(f, "b. L1 read misses:             {}", l1.read_misses)?;
        writeln!(f, "c. L1 writes:                  {}", l1.writes)?;
        writeln!(f, "d. L1 write misses:            {}", l1.write_misses)?;
        writeln!(f, "e. L1 miss rate:               {:.4}", rate(l1.miss_rate_at(0)))?;
        writeln!(f, "f. L1 writebacks:              {}", l1.writebacks)?;
        writeln!(f, "g. L1 prefetches:              0")?;

        let l2_rate = rate(l2.and_then(|s| s.miss_rate_at(1)));
        let l2 = l2.unwrap_or_default();
        writeln!(f, "h. L2 reads (demand):          {}", l2.reads)?;
        writeln!(f, "i. L2 read misses (demand):    {}", l2.read_misses)?;
        writeln!(f, "j. L2 reads (prefetch):        0")?;
        writeln!(f, "k. L2 read misses (prefetch):  0")?;
        writeln!(f, "l. L2 writes:                  {}", l2.writes)?;
        writeln!(f, "m. L2 write misses:            {}", l2.write_misses)?;
        writeln!(f, "n. L2 miss rate:               {l2_rate:.4}")?;
        writeln!(f, "o. L2 writebacks:              {}", l2.writebacks)?;
        writeln!(f, "p. L2 prefetches:              0")?;
        writeln!(f, "q. memory traffic:             {}", self.hierarchy.memory_traffic())
    }
}

/// An undefined rate is printed as zero.
fn rate(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_configuration(f)?;
        for (position, level) in self.hierarchy.levels().iter().enumerate() {
            if position > 0 {
                writeln!(f)?;
            }
            Self::fmt_contents(f, level)?;
        }
        self.fmt_measurements(f)
    }
}
