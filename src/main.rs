//! `tracephase` - check window-manager traces against assertion plans

use clap::Parser;

use tracephase::cli::args::Cli;
use tracephase::cli::commands;
use tracephase::error::{ExitCode, TracePhaseError, VerifyError};
use tracephase::observability::init_logging;

fn main() {
    let cli = Cli::parse();

    if !cli.quiet {
        init_logging(cli.log_format, cli.verbose, cli.color);
    }

    match commands::dispatch(cli) {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            // the report itself has already been printed to stdout
            if let TracePhaseError::Verify(VerifyError::Failed(report)) = &e {
                eprintln!(
                    "error: verification failed ({} failure(s))",
                    report.failures.len()
                );
            } else {
                eprintln!("error: {e}");
            }
            std::process::exit(e.exit_code());
        }
    }
}
