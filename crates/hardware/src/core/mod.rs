//! Cache hierarchy model.
//!
//! This module contains the functional model of the memory hierarchy: the
//! individual cache levels, the chain that owns them, and the shared counter
//! of traffic to main memory. No data is moved; only valid, dirty, tag and
//! recency state is tracked.

/// Set-associative cache level with LRU replacement.
pub mod cache;

/// Ordered chain of levels; single entry point for requests.
pub mod hierarchy;

/// Shared count of transfers past the last level.
pub mod traffic;

pub use self::cache::{AccessOutcome, CacheLevel};
pub use self::hierarchy::CacheHierarchy;
pub use self::traffic::MemoryTraffic;
