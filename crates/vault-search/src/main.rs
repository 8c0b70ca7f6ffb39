//! Entry point for the `vault` command-line facade.

mod cli;

use std::process::ExitCode;

use cli::{args::parse_cli, commands};

fn main() -> ExitCode {
    cli::logging::init().ok();

    let parsed = parse_cli();
    commands::run(parsed.command)
}
