//! Implementation of `vault search`.
//!
//! Grounded on `ra/src/cli/commands/search.rs`'s shape (build overrides,
//! resolve a searcher, run the query, hand off to the output module), with
//! the multi-query `OR`-join collapsed to a single joined-by-space string
//! since this engine's parser (unlike `ra-query`'s recursive grammar) reads
//! one flat query string, not one expression per invocation argument.

use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use vault_index::{QueryOptions, QueryOutcome};
use vault_query::parse_with_errors;

use crate::cli::{args::SearchCommand, context::CommandContext, output};

/// Builds a fresh in-memory index from the vault root, runs the query and
/// prints the results.
pub fn run(cmd: &SearchCommand) -> ExitCode {
    let ctx = match CommandContext::load(&cmd.vault) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let (provider, _stats) = match ctx.build_index() {
        Ok(result) => result,
        Err(code) => return code,
    };

    let combined_query = cmd.query.join(" ");
    let parsed = parse_with_errors(&combined_query, provider.settings());

    for err in &parsed.errors {
        eprintln!("warning: {err}");
    }

    let opts = QueryOptions {
        limit: cmd.limit,
        cancel: None,
    };

    match provider.query(&parsed, &opts, now_millis()) {
        QueryOutcome::Completed(results) => {
            output::print_results(&provider, &results, cmd.output.json);
            ExitCode::SUCCESS
        }
        QueryOutcome::Cancelled => {
            eprintln!("error: query cancelled");
            ExitCode::FAILURE
        }
    }
}

/// Current wall-clock time, epoch milliseconds, for the scorer's recency term.
fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
