//! Trace-driven cache hierarchy simulator library.
//!
//! This crate implements a functional model of a write-back, write-allocate
//! cache hierarchy with LRU replacement:
//! 1. **Core:** Cache levels, the chain that owns them, and the shared count
//!    of traffic to main memory.
//! 2. **Configuration:** Per-level capacity and associativity, geometry
//!    derivation and validation.
//! 3. **Simulation:** Trace reading and replay.
//! 4. **Statistics:** Per-level counters, JSON snapshots and the text report.
//!
//! # Examples
//!
//! ```
//! use cachesim_core::common::AccessType;
//! use cachesim_core::config::{CacheConfig, Config};
//! use cachesim_core::core::CacheHierarchy;
//!
//! let config = Config {
//!     block_size: 4,
//!     l1: CacheConfig::new(16, 1),
//!     ..Config::default()
//! };
//! let mut caches = CacheHierarchy::from_config(&config).unwrap();
//!
//! assert!(!caches.request(AccessType::Read, 0x0).hit);
//! assert!(caches.request(AccessType::Read, 0x0).hit);
//! assert_eq!(caches.memory_traffic(), 1);
//! ```

/// Common types (addresses, access types, errors).
pub mod common;
/// Simulator configuration and geometry derivation.
pub mod config;
/// Cache hierarchy model (levels, chain, memory traffic).
pub mod core;
/// Trace reader and simulation driver.
pub mod sim;
/// Statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Cache hierarchy; construct with `CacheHierarchy::from_config`.
pub use crate::core::CacheHierarchy;
/// Trace-replay driver.
pub use crate::sim::Simulator;
