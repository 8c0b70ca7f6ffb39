//! Implementation of `vault index`.

use std::process::ExitCode;

use crate::cli::{args::IndexCommand, context::CommandContext};

/// Cold-indexes a vault root and reports what was touched.
pub fn run(cmd: &IndexCommand) -> ExitCode {
    let ctx = match CommandContext::load(&cmd.vault) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let (provider, stats) = match ctx.build_index() {
        Ok(result) => result,
        Err(code) => return code,
    };

    println!("indexed {} document(s)", provider.total_docs());
    println!("  queued:    {}", stats.files_queued);
    println!("  excluded:  {}", stats.files_excluded);
    println!("  unchanged: {}", stats.files_unchanged);
    println!("  loaded:    {}", stats.bodies_loaded);

    if !stats.read_errors.is_empty() {
        println!("  read errors:");
        for (id, err) in &stats.read_errors {
            println!("    {id}: {err}");
        }
    }

    ExitCode::SUCCESS
}
