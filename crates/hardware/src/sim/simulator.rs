//! Top-level simulator that replays a trace through a cache hierarchy.

use std::io::BufRead;

use crate::common::{ConfigError, SimError};
use crate::config::Config;
use crate::core::CacheHierarchy;
use crate::sim::trace::{TraceReader, TraceRecord};
use crate::stats::{HierarchyStats, Report};

/// Configuration plus the hierarchy built from it.
#[derive(Debug)]
pub struct Simulator {
    /// Configuration the hierarchy was built from.
    pub config: Config,
    /// The cache hierarchy.
    pub hierarchy: CacheHierarchy,
    requests: u64,
}

impl Simulator {
    /// Validates `config` and builds an empty hierarchy.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] for the first invalid level.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let hierarchy = CacheHierarchy::from_config(&config)?;
        tracing::info!(
            block_size = config.block_size,
            levels = hierarchy.levels().len(),
            "hierarchy built"
        );
        Ok(Self {
            config,
            hierarchy,
            requests: 0,
        })
    }

    /// Issues one trace record.
    pub fn step(&mut self, record: TraceRecord) {
        tracing::trace!(request = self.requests, %record, "step");
        let _ = self.hierarchy.request(record.op, record.addr);
        self.requests += 1;
    }

    /// Replays every record of `trace`, in order.
    ///
    /// Returns the number of records replayed by this call.
    ///
    /// # Errors
    ///
    /// Stops at the first unreadable or malformed record. Records before it
    /// have already been applied.
    pub fn run<R: BufRead>(&mut self, trace: TraceReader<R>) -> Result<u64, SimError> {
        let start = self.requests;
        for record in trace {
            self.step(record?);
        }
        let replayed = self.requests - start;
        tracing::info!(
            replayed,
            memory_traffic = self.hierarchy.memory_traffic(),
            "trace replayed"
        );
        Ok(replayed)
    }

    /// Records replayed since construction.
    pub const fn requests(&self) -> u64 {
        self.requests
    }

    /// Snapshot of every counter.
    pub fn stats(&self) -> HierarchyStats {
        self.hierarchy.stats()
    }

    /// Text report naming `trace_file` in its configuration echo.
    pub const fn report<'a>(&'a self, trace_file: &'a str) -> Report<'a> {
        Report::new(&self.config, trace_file, &self.hierarchy)
    }
}
