//! Cache hierarchy simulator CLI.
//!
//! Replays a memory trace through an L1/L2 hierarchy and prints the
//! configuration, the final contents of every level, and the measurements.
//!
//! ```text
//! sim <blocksize> <l1_size> <l1_assoc> <l2_size> <l2_assoc> <trace_file>
//! sim 16 1024 2 65536 8 traces/gcc_trace.txt
//! ```

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cachesim_core::Simulator;
use cachesim_core::config::{CacheConfig, Config};
use cachesim_core::sim::TraceReader;

#[derive(Parser, Debug)]
#[command(
    name = "sim",
    author,
    version,
    about = "Trace-driven two-level cache hierarchy simulator",
    long_about = "Replay a memory trace through a write-back, write-allocate L1/L2 hierarchy with LRU replacement.\n\nA level with size 0 or associativity 0 is absent.\n\nExamples:\n  sim 16 1024 2 0 0 traces/gcc_trace.txt\n  sim 32 8192 4 262144 8 traces/perl_trace.txt --json"
)]
struct Cli {
    /// Block size in bytes, shared by both levels.
    blocksize: u32,

    /// L1 capacity in bytes.
    l1_size: u32,

    /// L1 associativity.
    l1_assoc: u32,

    /// L2 capacity in bytes (0 = no L2).
    l2_size: u32,

    /// L2 associativity (0 = no L2).
    l2_assoc: u32,

    /// Trace file: one `r|w <hex address>` request per line.
    trace_file: String,

    /// Also print the measurements as JSON after the report.
    #[arg(long)]
    json: bool,

    /// Log progress to stderr (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            block_size: self.blocksize,
            l1: CacheConfig::new(self.l1_size, self.l1_assoc),
            l2: CacheConfig::new(self.l2_size, self.l2_assoc),
            ..Config::default()
        }
    }
}

fn main() {
    // Usage errors exit with 1 like every other failure; help and version
    // still print to stdout and exit 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            process::exit(1);
        }
    };
    init_logging(cli.verbose);

    if let Err(message) = run(&cli) {
        eprintln!("Error: {message}");
        process::exit(1);
    }
}

/// Installs the stderr subscriber. `RUST_LOG` overrides `-v`.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Builds the hierarchy, replays the trace, and prints the report.
///
/// The trace is opened before anything is printed, so a missing file
/// produces only the error.
fn run(cli: &Cli) -> Result<(), String> {
    let mut sim = Simulator::new(cli.config()).map_err(|e| e.to_string())?;
    let trace = TraceReader::open(&cli.trace_file).map_err(|e| e.to_string())?;

    let _ = sim.run(trace).map_err(|e| e.to_string())?;

    print!("{}", sim.report(&cli.trace_file));
    if cli.json {
        let json = sim.stats().to_json().map_err(|e| e.to_string())?;
        println!("{json}");
    }
    Ok(())
}
