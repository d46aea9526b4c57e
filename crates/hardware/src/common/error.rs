//! Error types for configuration and trace handling.
//!
//! The cache model itself cannot fail: it only ever sees validated geometry
//! and well-formed requests. Everything that can go wrong happens before a
//! request reaches it:
//! 1. **Configuration:** Geometry that cannot be laid out as power-of-two sets.
//! 2. **Trace:** Unreadable files and malformed records.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Invalid cache geometry.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Block size is zero or not a power of two.
    #[error("block size must be a non-zero power of two, got {0}")]
    InvalidBlockSize(u32),

    /// Level capacity does not divide into whole sets.
    #[error(
        "L{level} size {size} is not a multiple of {ways} ways x {block_size}-byte blocks"
    )]
    UnevenCapacity {
        /// 1-based level number.
        level: usize,
        /// Configured capacity in bytes.
        size: u32,
        /// Configured associativity.
        ways: u32,
        /// Shared block size in bytes.
        block_size: u32,
    },

    /// Derived set count is zero or not a power of two.
    #[error("L{level} set count {sets} must be a non-zero power of two")]
    InvalidSetCount {
        /// 1-based level number.
        level: usize,
        /// Derived number of sets.
        sets: u32,
    },

    /// An enabled level sits below a disabled one.
    #[error("L{level} is enabled but L{} is not", .level - 1)]
    DetachedLevel {
        /// 1-based level number of the enabled level.
        level: usize,
    },
}

/// Failure while reading a trace.
///
/// Line numbers are 1-based.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The trace file could not be opened.
    #[error("unable to open file {}: {source}", path.display())]
    Open {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Reading from an open trace failed.
    #[error("trace read failed: {0}")]
    Io(#[from] io::Error),

    /// The request type is neither `r` nor `w`.
    #[error("line {line}: unknown request type {op}")]
    UnknownOperation {
        /// Line of the record.
        line: usize,
        /// The offending tag.
        op: String,
    },

    /// The record does not have exactly two fields.
    #[error("line {line}: malformed trace record {text:?}")]
    MalformedRecord {
        /// Line of the record.
        line: usize,
        /// The whole record.
        text: String,
    },

    /// The address field is not a 32-bit hexadecimal number.
    #[error("line {line}: invalid address {text:?}")]
    InvalidAddress {
        /// Line of the record.
        line: usize,
        /// The address field.
        text: String,
    },
}

/// Any error a simulation run can report.
#[derive(Debug, Error)]
pub enum SimError {
    /// Configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Trace could not be read.
    #[error(transparent)]
    Trace(#[from] TraceError),
}
