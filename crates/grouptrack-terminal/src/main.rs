//! `grouptrack` binary

use clap::Parser;
use grouptrack_effects::ShutdownToken;
use grouptrack_terminal::{init_tracing, run, Cli};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("grouptrack: {e:#}");
        return ExitCode::FAILURE;
    }

    let cancel = ShutdownToken::new();
    cancel.listen_for_signals();

    match run(&cli, &cancel).await {
        Ok(summary) => {
            tracing::info!("Done! {} users in {}", summary.report.len(), summary.path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(exit_code = err.exit_code(), "{err}");
            eprintln!("grouptrack: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
