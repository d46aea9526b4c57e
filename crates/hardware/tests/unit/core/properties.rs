//! Randomized hierarchy properties.
//!
//! Arbitrary geometries (one or two levels) replay arbitrary traces over a
//! small address window so that conflicts are frequent.

use cachesim_core::common::{AccessType, BlockAddr};
use cachesim_core::config::{CacheConfig, Config};
use cachesim_core::core::{CacheHierarchy, CacheLevel};
use proptest::prelude::*;

use crate::common::assert_invariants;

/// `(block_bits, (l1 set bits, l1 ways), Option<(l2 set bits, l2 ways)>)`.
type Shape = (u32, (u32, u32), Option<(u32, u32)>);

fn shape() -> impl Strategy<Value = Shape> {
    (
        2u32..=5,
        (0u32..=3, 1u32..=4),
        proptest::option::of((0u32..=4, 1u32..=8)),
    )
}

fn trace() -> impl Strategy<Value = Vec<(AccessType, u32)>> {
    prop::collection::vec(
        (
            prop_oneof![Just(AccessType::Read), Just(AccessType::Write)],
            0u32..4096,
        ),
        1..200,
    )
}

fn build((block_bits, (l1_sets, l1_ways), l2): Shape) -> CacheHierarchy {
    let block = 1u32 << block_bits;
    let (l2_size, l2_ways) = l2.map_or((0, 0), |(sets, ways)| ((block << sets) * ways, ways));
    let config = Config {
        block_size: block,
        l1: CacheConfig::new((block << l1_sets) * l1_ways, l1_ways),
        l2: CacheConfig::new(l2_size, l2_ways),
        ..Config::default()
    };
    match CacheHierarchy::from_config(&config) {
        Ok(caches) => caches,
        Err(e) => panic!("generated geometry rejected: {e}"),
    }
}

/// Block-aligned address of the way `addr` would evict from `level`, if that
/// way is dirty and `addr` misses.
fn expected_writeback(level: &CacheLevel, addr: u32) -> Option<u32> {
    let codec = level.codec();
    let BlockAddr { tag, index } = codec.decode(addr);
    let set = &level.sets()[index as usize];
    if set.find(tag).is_some() {
        return None;
    }
    let victim = set.blocks()[set.victim()];
    victim.dirty().then(|| {
        codec.recode(BlockAddr {
            tag: victim.tag(),
            index,
        })
    })
}

proptest! {
    #[test]
    fn invariants_hold_after_every_request(shape in shape(), trace in trace()) {
        let mut caches = build(shape);
        for (op, addr) in trace {
            let _ = caches.request(op, addr);
            assert_invariants(&caches);
        }
    }

    /// The outcome is predictable from the state just before the request.
    #[test]
    fn hit_and_writeback_follow_prior_state(shape in shape(), trace in trace()) {
        let mut caches = build(shape);
        for (op, addr) in trace {
            let l1 = &caches.levels()[0];
            let will_hit = l1.contains(addr);
            let writeback = expected_writeback(l1, addr);

            let outcome = caches.request(op, addr);
            prop_assert_eq!(outcome.hit, will_hit);
            prop_assert_eq!(outcome.writeback, writeback);
            prop_assert!(caches.levels()[0].contains(addr));
        }
    }

    #[test]
    fn l1_counts_each_request_once(shape in shape(), trace in trace()) {
        let mut caches = build(shape);
        let mut prev = *caches.levels()[0].stats();
        let mut traffic = caches.memory_traffic();
        for (op, addr) in trace {
            let outcome = caches.request(op, addr);
            let now = *caches.levels()[0].stats();

            prop_assert_eq!(now.accesses(), prev.accesses() + 1);
            prop_assert_eq!(now.misses(), prev.misses() + u64::from(!outcome.hit));
            prop_assert_eq!(
                now.writebacks,
                prev.writebacks + u64::from(outcome.writeback.is_some())
            );
            match op {
                AccessType::Read => {
                    prop_assert_eq!(now.reads, prev.reads + 1);
                }
                AccessType::Write => {
                    prop_assert_eq!(now.writes, prev.writes + 1);
                }
            }
            prop_assert!(caches.memory_traffic() >= traffic);

            prev = now;
            traffic = caches.memory_traffic();
        }
    }

    /// Each level sees exactly the fetches and writebacks of the one above,
    /// and memory sees those of the last level.
    #[test]
    fn traffic_is_conserved_between_levels(shape in shape(), trace in trace()) {
        let mut caches = build(shape);
        for (op, addr) in &trace {
            let _ = caches.request(*op, *addr);
        }

        for pair in caches.levels().windows(2) {
            let (upper, lower) = (pair[0].stats(), pair[1].stats());
            prop_assert_eq!(lower.reads, upper.misses());
            prop_assert_eq!(lower.writes, upper.writebacks);
        }
        for level in caches.levels() {
            let s = level.stats();
            prop_assert!(s.read_misses <= s.reads);
            prop_assert!(s.write_misses <= s.writes);
            prop_assert!(s.writebacks <= s.misses());
        }
        if let Some(last) = caches.levels().last() {
            let s = last.stats();
            prop_assert_eq!(caches.memory_traffic(), s.misses() + s.writebacks);
        }
    }

    #[test]
    fn replay_is_deterministic(shape in shape(), trace in trace()) {
        let mut first = build(shape);
        let mut second = build(shape);
        for (op, addr) in &trace {
            let _ = first.request(*op, *addr);
            let _ = second.request(*op, *addr);
        }
        prop_assert_eq!(first.stats(), second.stats());
        for (a, b) in first.levels().iter().zip(second.levels()) {
            prop_assert_eq!(a.sets(), b.sets());
        }
    }
}
