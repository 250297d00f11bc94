// dashpack-cli/src/main.rs
//
// Entry point of the `dashpack` binary: parses arguments, installs the
// logger, dispatches to the selected command and maps its outcome to the
// process exit code.

use clap::Parser;
use dashpack_cli::logging::init_logging;
use dashpack_cli::{Cli, Commands, run_check, run_convert, run_package};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let console = !cli.command.prints_result();
    if let Some(path) = init_logging(cli.verbose, console, cli.log_dir.as_deref())? {
        log::info!("Main log file: {}", path.display());
    }

    match cli.command {
        Commands::Convert(args) => run_convert(args),
        Commands::Package(args) => run_package(args),
        Commands::Check(args) => run_check(args),
    }
}
