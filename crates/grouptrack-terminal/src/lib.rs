//! Grouptrack Terminal
//!
//! Argument parsing, logging setup and run orchestration for the
//! `grouptrack` binary. The library half exists so the pipeline can be driven
//! against the in-memory platform in tests.

pub mod cli;
pub mod run;

pub use cli::{Cli, RunInputs};
pub use run::{execute, run, RunSummary};

use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects `debug` over `info`.
pub fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
