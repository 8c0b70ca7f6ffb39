//! Command implementations and dispatch.

pub mod index;
pub mod search;

use std::process::ExitCode;

use super::args::Commands;

/// Dispatches to the selected subcommand.
pub fn run(command: Commands) -> ExitCode {
    match command {
        Commands::Index(cmd) => index::run(&cmd),
        Commands::Search(cmd) => search::run(&cmd),
    }
}
