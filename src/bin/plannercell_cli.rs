use std::process::ExitCode;

use clap::Parser;
use plannercell::cli::{self, output, Cli};

fn main() -> ExitCode {
    let args = Cli::parse();
    match cli::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(&err);
            tracing::debug!(recoverable = err.is_recoverable(), "command failed");
            ExitCode::FAILURE
        }
    }
}
