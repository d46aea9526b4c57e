//! Cache Level Unit Tests.
//!
//! Verifies a single `CacheLevel` acting as the last level (nothing below it,
//! so every fetch and writeback is memory traffic). Tests exercise hit/miss
//! logic, LRU victim choice, write-allocate, and dirty writebacks.

use cachesim_core::common::AccessType::{Read, Write};
use cachesim_core::config::CacheGeometry;
use cachesim_core::core::{CacheLevel, MemoryTraffic};
use pretty_assertions::assert_eq;

use crate::common::contents;

// ──────────────────────────────────────────────────────────
// Helper: build a simple test level
// ──────────────────────────────────────────────────────────

/// 2 sets, 2 ways, 16-byte blocks.
///
///   - Set index = bit 4
///   - Tag       = addr >> 5
///
/// 0x000, 0x020, 0x040, 0x060 all map to set 0 with tags 0, 1, 2, 3.
fn test_level() -> (CacheLevel, MemoryTraffic) {
    let geometry = CacheGeometry {
        level: 1,
        sets: 2,
        ways: 2,
        index_bits: 1,
        offset_bits: 4,
    };
    let memory = MemoryTraffic::new();
    (CacheLevel::new(&geometry, memory.clone()), memory)
}

const A: u32 = 0x000;
const B: u32 = 0x020;
const C: u32 = 0x040;

// ══════════════════════════════════════════════════════════
// 1. Cold Miss / Warm Hit
// ══════════════════════════════════════════════════════════

#[test]
fn codec_matches_geometry() {
    let (level, _) = test_level();
    assert_eq!(level.codec().index_bits(), 1);
    assert_eq!(level.codec().offset_bits(), 4);
    assert_eq!(level.sets().len(), 2);
    assert_eq!(level.ways(), 2);
}

#[test]
fn cold_miss_fetches_from_memory() {
    let (mut level, memory) = test_level();
    let outcome = level.request(Read, 0x100, &mut []);

    assert!(!outcome.hit, "First access should be a miss");
    assert_eq!(outcome.writeback, None, "No dirty victim on a cold miss");
    assert_eq!(level.stats().reads, 1);
    assert_eq!(level.stats().read_misses, 1);
    assert_eq!(memory.count(), 1, "One fetch from memory");
}

#[test]
fn warm_hit_does_not_touch_memory() {
    let (mut level, memory) = test_level();
    let _ = level.request(Read, 0x100, &mut []);
    let outcome = level.request(Read, 0x100, &mut []);

    assert!(outcome.hit);
    assert_eq!(level.stats().reads, 2);
    assert_eq!(level.stats().read_misses, 1);
    assert_eq!(memory.count(), 1);
}

#[test]
fn same_block_different_offset_hits() {
    let (mut level, _) = test_level();
    let _ = level.request(Read, 0x100, &mut []);
    assert!(level.request(Read, 0x10F, &mut []).hit);
}

#[test]
fn adjacent_block_maps_to_other_set() {
    let (mut level, _) = test_level();
    let _ = level.request(Read, 0x100, &mut []);
    assert!(!level.request(Read, 0x110, &mut []).hit);
    assert!(level.contains(0x100));
    assert!(level.contains(0x110));
}

// ══════════════════════════════════════════════════════════
// 2. LRU Eviction
// ══════════════════════════════════════════════════════════

#[test]
fn third_conflicting_block_evicts_lru() {
    let (mut level, _) = test_level();
    let _ = level.request(Read, A, &mut []);
    let _ = level.request(Read, B, &mut []);
    let outcome = level.request(Read, C, &mut []);

    assert!(!outcome.hit);
    assert!(!level.contains(A), "LRU victim should be evicted");
    assert!(level.contains(B));
    assert!(level.contains(C));
}

#[test]
fn reaccess_protects_block_from_eviction() {
    let (mut level, _) = test_level();
    let _ = level.request(Read, A, &mut []);
    let _ = level.request(Read, B, &mut []);
    assert!(level.request(Read, A, &mut []).hit);
    let _ = level.request(Read, C, &mut []);

    assert!(level.contains(A), "Recently used block should survive");
    assert!(!level.contains(B));
    assert_eq!(contents(&level, 0), vec![(2, false), (0, false)]);
}

#[test]
fn write_hit_counts_as_recent_use() {
    let (mut level, _) = test_level();
    let _ = level.request(Read, A, &mut []);
    let _ = level.request(Read, B, &mut []);
    assert!(level.request(Write, A, &mut []).hit);
    let _ = level.request(Read, C, &mut []);
    assert!(level.contains(A));
    assert!(!level.contains(B));
}

// ══════════════════════════════════════════════════════════
// 3. Write-Allocate and Dirty State
// ══════════════════════════════════════════════════════════

#[test]
fn write_miss_allocates_dirty_block() {
    let (mut level, memory) = test_level();
    let outcome = level.request(Write, A, &mut []);

    assert!(!outcome.hit);
    assert_eq!(level.stats().writes, 1);
    assert_eq!(level.stats().write_misses, 1);
    assert_eq!(memory.count(), 1, "Write-allocate fetches the block");
    assert_eq!(contents(&level, 0), vec![(0, true)]);
}

#[test]
fn write_hit_marks_dirty_without_traffic() {
    let (mut level, memory) = test_level();
    let _ = level.request(Read, A, &mut []);
    assert_eq!(contents(&level, 0), vec![(0, false)]);

    assert!(level.request(Write, A, &mut []).hit);
    assert_eq!(contents(&level, 0), vec![(0, true)]);
    assert_eq!(memory.count(), 1);
    assert_eq!(level.stats().writes, 1);
    assert_eq!(level.stats().write_misses, 0);
}

#[test]
fn read_hit_keeps_dirty_bit() {
    let (mut level, _) = test_level();
    let _ = level.request(Write, A, &mut []);
    let _ = level.request(Read, A, &mut []);
    assert_eq!(contents(&level, 0), vec![(0, true)]);
}

// ══════════════════════════════════════════════════════════
// 4. Writebacks
// ══════════════════════════════════════════════════════════

#[test]
fn dirty_victim_is_written_back() {
    let (mut level, memory) = test_level();
    let _ = level.request(Write, A, &mut []);
    let _ = level.request(Read, B, &mut []);
    let outcome = level.request(Read, C, &mut []);

    assert_eq!(outcome.writeback, Some(A));
    assert_eq!(level.stats().writebacks, 1);
    // Fetch A, fetch B, write back A, fetch C.
    assert_eq!(memory.count(), 4);
    assert_eq!(contents(&level, 0), vec![(2, false), (1, false)]);
}

#[test]
fn clean_victim_is_dropped_silently() {
    let (mut level, memory) = test_level();
    let _ = level.request(Read, A, &mut []);
    let _ = level.request(Read, B, &mut []);
    let outcome = level.request(Read, C, &mut []);

    assert_eq!(outcome.writeback, None);
    assert_eq!(level.stats().writebacks, 0);
    assert_eq!(memory.count(), 3);
}

#[test]
fn writeback_address_is_block_aligned() {
    let (mut level, _) = test_level();
    // 0x02C: tag 1, set 0, offset 0xC.
    let _ = level.request(Write, 0x02C, &mut []);
    let _ = level.request(Read, C, &mut []);
    let outcome = level.request(Read, 0x060, &mut []);
    assert_eq!(outcome.writeback, Some(0x020));
}

#[test]
fn write_miss_over_dirty_victim_installs_dirty() {
    let (mut level, _) = test_level();
    let _ = level.request(Write, A, &mut []);
    let _ = level.request(Write, B, &mut []);
    let outcome = level.request(Write, C, &mut []);

    assert_eq!(outcome.writeback, Some(A));
    assert_eq!(contents(&level, 0), vec![(2, true), (1, true)]);
    assert_eq!(level.stats().write_misses, 3);
}

#[test]
fn levels_share_one_traffic_counter() {
    let (mut level, memory) = test_level();
    let observer = memory.clone();
    let _ = level.request(Read, A, &mut []);
    assert_eq!(observer.count(), 1);
    assert_eq!(memory.count(), 1);
}
