use procdl_core::logging;
use std::process::ExitCode;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() -> ExitCode {
    // Log file first; stderr if the state dir isn't writable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    match CliCommand::run_from_args().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("procdl error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
