//! Configuration system for the cache hierarchy simulator.
//!
//! This module defines the configuration structures used to parameterize
//! the simulator. It provides:
//! 1. **Defaults:** Baseline geometry constants.
//! 2. **Structures:** Per-level capacity/associativity, the shared block size,
//!    and reserved prefetch parameters.
//! 3. **Geometry:** Derivation of sets, index bits and offset bits, with
//!    validation of every level before a hierarchy is built.
//!
//! Configuration is built from command-line arguments by the CLI, or
//! deserialized from JSON for scripted sweeps.

use serde::Deserialize;

use crate::common::ConfigError;

/// Default configuration constants for the simulator.
mod defaults {
    /// Default block size in bytes, shared by every level.
    pub const BLOCK_SIZE: u32 = 16;

    /// Default L1 capacity in bytes (1 KiB).
    pub const L1_SIZE: u32 = 1024;

    /// Default L1 associativity.
    pub const L1_WAYS: u32 = 2;

    /// Prefetch stream count. Reserved.
    pub const PREFETCH_N: u32 = 1;

    /// Prefetch stream depth in blocks. Reserved.
    pub const PREFETCH_M: u32 = 1;
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use cachesim_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.block_size, 16);
/// assert!(config.l1.enabled());
/// assert!(!config.l2.enabled());
/// ```
///
/// Deserializing from JSON:
///
/// ```
/// use cachesim_core::config::Config;
///
/// let json = r#"{
///     "block_size": 32,
///     "l1": { "size_bytes": 8192, "ways": 4 },
///     "l2": { "size_bytes": 65536, "ways": 8 }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.l2.ways, 8);
/// assert_eq!(config.prefetch.n, 1);
/// let levels = config.geometries().unwrap();
/// assert_eq!(levels[1].sets, 256);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Block size in bytes, shared by every level
    #[serde(default = "Config::default_block_size")]
    pub block_size: u32,

    /// First-level cache
    #[serde(default = "CacheConfig::default_l1")]
    pub l1: CacheConfig,

    /// Second-level cache (disabled when size or ways is zero)
    #[serde(default)]
    pub l2: CacheConfig,

    /// Prefetcher parameters (reserved)
    #[serde(default)]
    pub prefetch: PrefetchConfig,
}

impl Config {
    const fn default_block_size() -> u32 {
        defaults::BLOCK_SIZE
    }

    /// Levels in hierarchy order, L1 first.
    pub const fn levels(&self) -> [&CacheConfig; 2] {
        [&self.l1, &self.l2]
    }

    /// Derives the geometry of every enabled level, L1 first.
    ///
    /// Disabled levels are omitted. An enabled level below a disabled one is
    /// rejected, since nothing could forward requests to it.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found, checking levels top-down.
    pub fn geometries(&self) -> Result<Vec<CacheGeometry>, ConfigError> {
        let mut geometries = Vec::with_capacity(2);
        let mut gap = false;
        for (i, cache) in self.levels().into_iter().enumerate() {
            let level = i + 1;
            match CacheGeometry::derive(level, cache, self.block_size)? {
                Some(_) if gap => return Err(ConfigError::DetachedLevel { level }),
                Some(geometry) => geometries.push(geometry),
                None => gap = true,
            }
        }
        Ok(geometries)
    }

    /// Checks that every level can be laid out.
    ///
    /// # Errors
    ///
    /// Same as [`Config::geometries`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.geometries().map(|_| ())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            block_size: defaults::BLOCK_SIZE,
            l1: CacheConfig::default_l1(),
            l2: CacheConfig::default(),
            prefetch: PrefetchConfig::default(),
        }
    }
}

/// Individual cache level configuration.
///
/// The default is a disabled level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    /// Total cache size in bytes
    #[serde(default)]
    pub size_bytes: u32,

    /// Associativity (number of ways)
    #[serde(default)]
    pub ways: u32,
}

impl CacheConfig {
    /// Creates a level of `size_bytes` bytes and `ways` ways.
    pub const fn new(size_bytes: u32, ways: u32) -> Self {
        Self { size_bytes, ways }
    }

    const fn default_l1() -> Self {
        Self::new(defaults::L1_SIZE, defaults::L1_WAYS)
    }

    /// A level with zero size or zero associativity is absent.
    pub const fn enabled(&self) -> bool {
        self.size_bytes != 0 && self.ways != 0
    }
}

/// Prefetcher parameters.
///
/// Parsed and echoed but never consulted by the cache model: no prefetch
/// requests are ever issued and prefetch counters always read zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PrefetchConfig {
    /// Number of stream buffers
    #[serde(default = "PrefetchConfig::default_n")]
    pub n: u32,

    /// Blocks per stream buffer
    #[serde(default = "PrefetchConfig::default_m")]
    pub m: u32,
}

impl PrefetchConfig {
    const fn default_n() -> u32 {
        defaults::PREFETCH_N
    }

    const fn default_m() -> u32 {
        defaults::PREFETCH_M
    }
}

impl Default for PrefetchConfig {
    fn default() -> Self {
        Self {
            n: defaults::PREFETCH_N,
            m: defaults::PREFETCH_M,
        }
    }
}

/// Validated layout of one cache level.
///
/// Invariants: `sets` is a power of two, `index_bits == log2(sets)`, and
/// `offset_bits == log2(block_size)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheGeometry {
    /// 1-based level number (1 = L1).
    pub level: usize,
    /// Number of sets.
    pub sets: u32,
    /// Associativity.
    pub ways: u32,
    /// Set-index bits.
    pub index_bits: u32,
    /// Block-offset bits.
    pub offset_bits: u32,
}

impl CacheGeometry {
    /// Derives the layout of `cache` for the shared `block_size`.
    ///
    /// Returns `Ok(None)` for a disabled level.
    ///
    /// # Errors
    ///
    /// Fails when the block size is not a power of two, when the capacity is
    /// not a whole number of sets, or when the set count is not a power of two.
    pub fn derive(
        level: usize,
        cache: &CacheConfig,
        block_size: u32,
    ) -> Result<Option<Self>, ConfigError> {
        if !cache.enabled() {
            return Ok(None);
        }
        if !block_size.is_power_of_two() {
            return Err(ConfigError::InvalidBlockSize(block_size));
        }

        let set_bytes = u64::from(cache.ways) * u64::from(block_size);
        let size = u64::from(cache.size_bytes);
        if size % set_bytes != 0 {
            return Err(ConfigError::UnevenCapacity {
                level,
                size: cache.size_bytes,
                ways: cache.ways,
                block_size,
            });
        }

        // size / set_bytes <= size, so it fits back into u32.
        let sets = (size / set_bytes) as u32;
        if !sets.is_power_of_two() {
            return Err(ConfigError::InvalidSetCount { level, sets });
        }

        Ok(Some(Self {
            level,
            sets,
            ways: cache.ways,
            index_bits: sets.trailing_zeros(),
            offset_bits: block_size.trailing_zeros(),
        }))
    }

    /// Capacity in bytes this geometry describes.
    pub const fn size_bytes(&self) -> u64 {
        ((self.sets as u64) * (self.ways as u64)) << self.offset_bits
    }
}
