//! AGCM CLI entry point
//!
//! Parses arguments, runs the command, and turns failures into a readable
//! message with suggestions. Results themselves are printed as JSON by the
//! commands.

use agcm::cli;
use agcm::core::error::user_friendly_error;
use clap::Parser;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            user_friendly_error(e).display();
            ExitCode::FAILURE
        }
    }
}
