use dbx_core::{logging, ExtractError};

mod cli;

use crate::cli::CliCommand;

fn main() {
    // Log to the state dir when possible, otherwise warnings go to stderr.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    if let Err(err) = CliCommand::run_from_args() {
        match err.downcast_ref::<ExtractError>() {
            Some(e) if e.is_expected() => eprintln!("dbx: {e}"),
            _ => eprintln!("dbx: {:#}", err),
        }
        std::process::exit(1);
    }
}
