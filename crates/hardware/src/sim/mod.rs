//! Simulation driver and trace input.
//!
//! Reads request traces and replays them through a hierarchy built from a
//! [`Config`](crate::config::Config).

/// Top-level simulator.
pub mod simulator;

/// Text trace reader.
pub mod trace;

pub use simulator::Simulator;
pub use trace::{TraceReader, TraceRecord};
