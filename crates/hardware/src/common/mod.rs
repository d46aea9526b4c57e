//! Common types shared by every part of the simulator.
//!
//! 1. **Addresses:** Tag/index decomposition and block-aligned reconstruction.
//! 2. **Access types:** Read and write requests.
//! 3. **Errors:** Configuration and trace failures.

/// Address decomposition (tag, set index, block offset).
pub mod addr;

/// Memory access type definitions.
pub mod data;

/// Error types for configuration and trace handling.
pub mod error;

pub use addr::{AddressCodec, BlockAddr};
pub use data::AccessType;
pub use error::{ConfigError, SimError, TraceError};
