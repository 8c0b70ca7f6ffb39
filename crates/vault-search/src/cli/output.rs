//! Result rendering: a `comfy-table` text view and a JSON mode.
//!
//! Grounded on `ra/src/cli/commands/context.rs`'s `comfy_table::Table`
//! usage (`UTF8_FULL_CONDENSED` preset, `set_header`/`add_row` with `Cell`).
//! The teacher's own search-result renderer (`ra/src/cli/output/mod.rs`)
//! leans on `ra_highlight`, an internal crate with no counterpart in this
//! workspace, so result rows here are built directly from `SearchResult`
//! plus the resolved `Document` rather than ported from that module.

use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use serde::Serialize;
use vault_index::{Document, Provider, SearchResult};

/// One rendered result row, JSON or table.
#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    /// Document id (source path).
    id: &'a str,
    /// Match score.
    score: f64,
    /// Resolved title.
    title: &'a str,
    /// Folder path segments.
    path: &'a [String],
    /// Tags.
    tags: &'a [String],
}

/// Prints `results` either as a `comfy-table` or as a JSON array,
/// resolving each id's title/path/tags through `provider`.
pub fn print_results(provider: &Provider, results: &[SearchResult], json: bool) {
    if json {
        print_json(provider, results);
    } else {
        print_table(provider, results);
    }
}

/// Prints `results` as a pretty-printed JSON array.
fn print_json(provider: &Provider, results: &[SearchResult]) {
    let empty_doc = Document::default();
    let rows: Vec<ResultRow<'_>> = results
        .iter()
        .map(|r| {
            let doc = provider.document(&r.id).unwrap_or(&empty_doc);
            ResultRow {
                id: &r.id,
                score: r.score,
                title: &doc.title,
                path: &doc.path,
                tags: &doc.tags,
            }
        })
        .collect();

    match serde_json::to_string_pretty(&rows) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("error: failed to serialize results: {err}"),
    }
}

/// Prints `results` as a `comfy-table` text table.
fn print_table(provider: &Provider, results: &[SearchResult]) {
    if results.is_empty() {
        println!("(no matches)");
        return;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Score", "Title", "Path", "Tags"]);

    for result in results {
        let title = provider
            .document(&result.id)
            .map(|d| d.title.as_str())
            .unwrap_or(result.id.as_str());
        let path = provider
            .document(&result.id)
            .map(|d| d.path.join("/"))
            .unwrap_or_default();
        let tags = provider
            .document(&result.id)
            .map(|d| d.tags.join(", "))
            .unwrap_or_default();

        table.add_row(vec![
            Cell::new(format!("{:.2}", result.score)),
            Cell::new(title),
            Cell::new(path),
            Cell::new(tags),
        ]);
    }

    println!("{table}");
}
