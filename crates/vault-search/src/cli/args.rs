//! Clap argument definitions for the `vault` CLI.
//!
//! Grounded on `ra/src/cli/args.rs`'s shared-flag-struct-plus-flatten idiom
//! (`SearchParamsArgs`/`OutputArgs` there, `VaultArgs`/`OutputArgs` here) and
//! its `parse_cli`/`print_hierarchical_help` pair for a friendlier bare
//! `vault --help`. Narrowed to the two commands this engine exposes:
//! `index` (cold scan plus lazy body pass) and `search` (one-shot query).

use std::env;
use std::path::PathBuf;
use std::process::exit;

use clap::{Args, CommandFactory, Parser, Subcommand, error::ErrorKind};

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "vault")]
#[command(about = "Local note search engine")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every subcommand that opens a vault.
#[derive(Args, Debug, Clone)]
pub struct VaultArgs {
    /// Vault root directory to index or search
    #[arg(short = 'p', long, default_value = ".")]
    pub path: PathBuf,

    /// Settings TOML file (defaults to built-in settings if absent)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// File-cache JSON path, for skipping unchanged files on a later run
    #[arg(long)]
    pub cache: Option<PathBuf>,

    /// Run with the mobile-host indexer batch parameters
    #[arg(long)]
    pub mobile: bool,
}

/// Shared output mode flags.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `vault index`.
#[derive(Args, Debug, Clone)]
pub struct IndexCommand {
    #[command(flatten)]
    pub vault: VaultArgs,
}

/// Arguments for `vault search`.
#[derive(Args, Debug, Clone)]
pub struct SearchCommand {
    /// Search query, e.g. `tag:rust -deprecated "error handling"`
    #[arg(required = true)]
    pub query: Vec<String>,

    #[command(flatten)]
    pub vault: VaultArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Maximum results to return
    #[arg(short = 'n', long, default_value_t = 10)]
    pub limit: usize,
}

/// Supported `vault` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Cold-scan a vault and build its index
    #[command(after_help = "\
EXAMPLES:
  vault index
  vault index --path ~/notes --cache ~/.cache/vault/files.json")]
    Index(IndexCommand),

    /// Run a one-shot query against a vault
    #[command(after_help = "\
QUERY SYNTAX:
  term              Term must appear (fuzzy-matched)
  term1 term2       Both terms (implicit AND)
  \"phrase\"          Exact phrase match
  -term             Term must NOT appear
  term1 OR term2    Either term
  /pattern/flags    Regex post-filter over the top candidates

FILTERS:
  #tag, tag:tag     Restrict to documents carrying this tag
  path:value        Restrict to documents under this path segment
  in:value          Same as path:, any path segment
  #                 Restrict scoring to headings only
  @                 Restrict scoring to symbols (links, block refs) only

EXAMPLES:
  vault search rust async
  vault search '\"error handling\"'
  vault search 'rust -deprecated'
  vault search 'rust OR golang'
  vault search 'tag:guide /^Chapter [0-9]+/'")]
    Search(SearchCommand),
}

/// Parses CLI arguments, printing hierarchical help for top-level `--help`.
pub fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if e.kind() == ErrorKind::DisplayHelp {
                let args: Vec<_> = env::args().collect();
                if args.len() <= 2 {
                    print_hierarchical_help();
                    exit(0);
                }
            }
            e.exit();
        }
    }
}

/// Prints custom help with hierarchical subcommand display.
fn print_hierarchical_help() {
    let cmd = Cli::command();
    let about = cmd.get_about().map(|s| s.to_string()).unwrap_or_default();

    println!("{about}");
    println!();
    println!("Usage: vault <COMMAND>");
    println!();
    println!("Commands:");

    for sub in cmd.get_subcommands() {
        let name = sub.get_name();
        if name == "help" {
            continue;
        }
        let about = sub.get_about().map(|s| s.to_string()).unwrap_or_default();
        println!("  {name:10} {about}");
    }

    println!(
        "  {:<10} Print this message or the help of the given subcommand(s)",
        "help"
    );
    println!();
    println!("Options:");
    println!("  -h, --help  Print help");
}
