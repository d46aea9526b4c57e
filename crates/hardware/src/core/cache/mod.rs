//! Set-Associative Cache Level.
//!
//! One level of a write-back, write-allocate hierarchy with LRU replacement.
//! A level owns a fixed grid of sets × ways and its own counters. On a miss it
//! writes back a dirty victim and then fetches the requested block, both as
//! synchronous requests to the levels below it; with nothing below, each of
//! those transfers is counted as memory traffic instead.

/// Per-way block state and per-set LRU bookkeeping.
pub mod block;

pub use self::block::{Block, CacheSet};

use crate::common::{AccessType, AddressCodec, BlockAddr};
use crate::config::CacheGeometry;
use crate::core::traffic::MemoryTraffic;
use crate::stats::LevelStats;

/// Result of one request at one level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessOutcome {
    /// The block was resident.
    pub hit: bool,
    /// Block-aligned address of the dirty victim written back on this miss.
    pub writeback: Option<u32>,
}

impl AccessOutcome {
    const HIT: Self = Self {
        hit: true,
        writeback: None,
    };

    const fn miss(writeback: Option<u32>) -> Self {
        Self {
            hit: false,
            writeback,
        }
    }
}

/// A single cache level.
#[derive(Debug)]
pub struct CacheLevel {
    level: usize,
    ways: u32,
    codec: AddressCodec,
    sets: Vec<CacheSet>,
    stats: LevelStats,
    memory: MemoryTraffic,
}

impl CacheLevel {
    /// Creates an empty level laid out by `geometry`.
    ///
    /// `memory` is the hierarchy's shared traffic counter; it is only touched
    /// when this level turns out to be the last one.
    pub fn new(geometry: &CacheGeometry, memory: MemoryTraffic) -> Self {
        Self {
            level: geometry.level,
            ways: geometry.ways,
            codec: AddressCodec::new(geometry.index_bits, geometry.offset_bits),
            sets: (0..geometry.sets)
                .map(|_| CacheSet::new(geometry.ways))
                .collect(),
            stats: LevelStats::default(),
            memory,
        }
    }

    /// 1-based level number.
    #[inline]
    pub const fn level(&self) -> usize {
        self.level
    }

    /// Associativity.
    #[inline]
    pub const fn ways(&self) -> u32 {
        self.ways
    }

    /// Address codec for this level's geometry.
    #[inline]
    pub const fn codec(&self) -> AddressCodec {
        self.codec
    }

    /// All sets, by index.
    #[inline]
    pub fn sets(&self) -> &[CacheSet] {
        &self.sets
    }

    /// Counters accumulated so far.
    #[inline]
    pub const fn stats(&self) -> &LevelStats {
        &self.stats
    }

    /// Whether a valid block holding `addr` is resident.
    pub fn contains(&self, addr: u32) -> bool {
        let BlockAddr { tag, index } = self.codec.decode(addr);
        self.sets[index as usize].find(tag).is_some()
    }

    /// Services one request, cascading into `below` on a miss.
    ///
    /// `below` is the rest of the chain, nearest level first. When it is
    /// empty this is the last level and transfers go to memory. Returns once
    /// every sub-request has completed.
    pub fn request(&mut self, op: AccessType, addr: u32, below: &mut [Self]) -> AccessOutcome {
        let BlockAddr { tag, index } = self.codec.decode(addr);
        let set = &mut self.sets[index as usize];

        if let Some(way) = set.find(tag) {
            self.stats.record_hit(op);
            if op.is_write() {
                set.mark_dirty(way);
            }
            set.touch(way);
            tracing::trace!(level = self.level, %op, addr, index, way, "hit");
            return AccessOutcome::HIT;
        }

        self.stats.record_miss(op);
        let way = set.victim();
        let victim = set.blocks()[way];

        // Writeback strictly precedes the fetch.
        let writeback = victim.dirty().then(|| {
            self.codec.recode(BlockAddr {
                tag: victim.tag(),
                index,
            })
        });
        if let Some(wb_addr) = writeback {
            tracing::trace!(level = self.level, wb_addr, index, way, "writeback");
            forward(&self.memory, AccessType::Write, wb_addr, below);
            self.stats.writebacks += 1;
            set.clean(way);
        }

        forward(&self.memory, AccessType::Read, addr, below);

        set.install(way, tag, op.is_write());
        set.touch(way);
        tracing::trace!(level = self.level, %op, addr, index, way, "miss");

        AccessOutcome::miss(writeback)
    }
}

/// Sends a sub-request to the next level, or to memory past the last one.
fn forward(memory: &MemoryTraffic, op: AccessType, addr: u32, below: &mut [CacheLevel]) {
    match below.split_first_mut() {
        Some((next, rest)) => {
            let _ = next.request(op, addr, rest);
        }
        None => memory.record(),
    }
}
