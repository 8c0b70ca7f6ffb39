//! Filesystem-backed [`SourceFile`] producer: walks a vault root and parses
//! frontmatter, headings and symbols out of each markdown/text file it
//! finds.
//!
//! Grounded on `ra-index/src/discovery.rs`'s `WalkDir`-based walk (hidden
//! entries and binary extensions filtered the same way) and
//! `ra-document/src/frontmatter.rs`/`parse.rs`'s frontmatter-then-heading
//! parse pipeline, folded into a single eager `SourceFile` implementation:
//! this engine's indexer expects metadata (title/tags/headings/symbols) up
//! front and only defers the body, so parsing happens once at discovery
//! time rather than split across a document/chunk-tree pipeline.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Parser, Tag, TagEnd};
use serde::Deserialize;
use vault_index::{IndexError, SourceFile};
use walkdir::WalkDir;

const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "webp", "svg", "tiff", "tif", "psd", "raw", "heic",
    "heif", "mp3", "wav", "flac", "aac", "ogg", "wma", "m4a", "opus", "mp4", "avi", "mkv", "mov",
    "wmv", "flv", "webm", "m4v", "mpeg", "mpg", "zip", "tar", "gz", "bz2", "xz", "7z", "rar", "iso",
    "dmg", "exe", "dll", "so", "dylib", "bin", "app", "pdf", "doc", "docx", "xls", "xlsx", "ppt",
    "pptx", "odt", "ods", "odp", "ttf", "otf", "woff", "woff2", "eot", "db", "sqlite", "sqlite3",
    "mdb", "class", "pyc", "pyo", "o", "a", "lib", "obj", "wasm",
];

/// YAML frontmatter fields this engine reads; anything else is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
struct Frontmatter {
    /// Explicit title override.
    title: Option<String>,
    /// Tags list.
    #[serde(default)]
    tags: Vec<String>,
}

/// One markdown/text file discovered under a vault root, with its
/// metadata already extracted and its body held in memory for the
/// lazy body pass.
pub struct MarkdownFile {
    /// Absolute path, doubling as the document's stable id.
    id: String,
    /// Resolved title (frontmatter, first H1, or filename stem).
    title: String,
    /// Folder path segments relative to the vault root.
    path_segments: Vec<String>,
    /// Frontmatter tags.
    tags: Vec<String>,
    /// Heading text, in document order.
    headings: Vec<String>,
    /// Link targets, wiki-links and code-fence language labels.
    symbols: Vec<String>,
    /// Body content with the frontmatter block stripped off.
    body: String,
    /// Last-modified time, epoch milliseconds.
    mtime: i64,
    /// File size in bytes.
    size: u64,
}

impl SourceFile for MarkdownFile {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn path_segments(&self) -> Vec<String> {
        self.path_segments.clone()
    }

    fn tags(&self) -> Vec<String> {
        self.tags.clone()
    }

    fn headings(&self) -> Vec<String> {
        self.headings.clone()
    }

    fn symbols(&self) -> Vec<String> {
        self.symbols.clone()
    }

    fn mtime(&self) -> i64 {
        self.mtime
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn read_body(&self) -> Result<String, IndexError> {
        Ok(self.body.clone())
    }
}

/// Walks `root` and returns every markdown/text file found as a
/// [`SourceFile`], skipping hidden entries, symlinks and binary
/// extensions. Read failures are recorded rather than aborting the walk.
/// `include_code_blocks` controls whether fenced code content is kept in
/// the indexed body, per `search.include_code_blocks`.
pub fn discover(root: &Path, include_code_blocks: bool) -> (Vec<Box<dyn SourceFile>>, Vec<(String, String)>) {
    let mut files: Vec<Box<dyn SourceFile>> = Vec::new();
    let mut errors = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_hidden(e.file_name()))
    {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let abs_path = entry.path();
        if !is_indexable(abs_path) {
            continue;
        }

        match load(root, abs_path, include_code_blocks) {
            Ok(file) => files.push(Box::new(file)),
            Err(err) => errors.push((abs_path.display().to_string(), err.to_string())),
        }
    }

    (files, errors)
}

/// Whether `name` is a dot-prefixed entry (directory or file).
fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|s| s.starts_with('.'))
}

/// Whether `path`'s extension is absent from [`BINARY_EXTENSIONS`].
fn is_indexable(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => !BINARY_EXTENSIONS.contains(&ext.to_lowercase().as_str()),
        None => true,
    }
}

/// Reads and parses one file into a [`MarkdownFile`].
fn load(root: &Path, abs_path: &Path, include_code_blocks: bool) -> Result<MarkdownFile, IndexError> {
    let metadata = fs::metadata(abs_path).map_err(|e| IndexError::read(abs_path.display().to_string(), e))?;
    let content = fs::read_to_string(abs_path).map_err(|e| IndexError::read(abs_path.display().to_string(), e))?;

    let (frontmatter, body) = parse_frontmatter(&content);
    let frontmatter = frontmatter.unwrap_or_default();
    let headings = extract_headings(&content);
    let title = determine_title(&frontmatter, &headings, abs_path);
    let symbols = extract_symbols(&content);
    let body = if include_code_blocks {
        body.to_string()
    } else {
        strip_fenced_code_blocks(body)
    };

    let rel_path = abs_path.strip_prefix(root).unwrap_or(abs_path);
    let path_segments = rel_path
        .parent()
        .map(|p| {
            p.components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();

    let mtime = metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0);

    Ok(MarkdownFile {
        id: abs_path.display().to_string(),
        title,
        path_segments,
        tags: frontmatter.tags,
        headings: headings.iter().map(|h| h.text.clone()).collect(),
        symbols,
        body,
        mtime,
        size: metadata.len(),
    })
}

/// Resolves a title via frontmatter, then the first H1 heading, then the
/// filename stem.
fn determine_title(frontmatter: &Frontmatter, headings: &[Heading], path: &Path) -> String {
    if let Some(title) = &frontmatter.title {
        return title.clone();
    }
    if let Some(h1) = headings.iter().find(|h| h.level == 1) {
        return h1.text.clone();
    }
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Untitled".to_string())
}

/// One heading extracted from a document, with its nesting level.
struct Heading {
    /// 1-6, corresponding to `#` through `######`.
    level: u8,
    /// The heading's rendered text.
    text: String,
}

/// Extracts every heading's level and text, in document order.
fn extract_headings(content: &str) -> Vec<Heading> {
    let parser = Parser::new(content);
    let mut headings = Vec::new();
    let mut current: Option<(HeadingLevel, String)> = None;

    for event in parser {
        match event {
            Event::Start(Tag::Heading { level, .. }) => current = Some((level, String::new())),
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, ref mut heading_text)) = current {
                    heading_text.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, text)) = current.take() {
                    headings.push(Heading {
                        level: heading_level_to_u8(level),
                        text,
                    });
                }
            }
            _ => {}
        }
    }

    headings
}

/// Converts `pulldown_cmark`'s heading level enum to a plain integer.
fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Drops the content of fenced (``` or ~~~) code blocks, keeping the rest
/// of the body intact. Used when `search.include_code_blocks` is false.
fn strip_fenced_code_blocks(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut in_fence = false;
    let mut fence_marker = "";

    for line in content.lines() {
        let trimmed = line.trim_start();
        let opens_or_closes = trimmed.starts_with("```") || trimmed.starts_with("~~~");

        if !in_fence && opens_or_closes {
            in_fence = true;
            fence_marker = &trimmed[..3];
            continue;
        }
        if in_fence && trimmed.starts_with(fence_marker) {
            in_fence = false;
            continue;
        }
        if !in_fence {
            out.push_str(line);
            out.push('\n');
        }
    }

    out
}

/// Outbound link targets, fenced code-block language labels and
/// Obsidian-style `[[wiki links]]`.
fn extract_symbols(content: &str) -> Vec<String> {
    let mut symbols = Vec::new();
    let parser = Parser::new(content);

    for event in parser {
        match event {
            Event::Start(Tag::Link { dest_url, .. }) => symbols.push(dest_url.into_string()),
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(lang))) if !lang.is_empty() => {
                symbols.push(lang.into_string())
            }
            _ => {}
        }
    }

    let mut rest = content;
    while let Some(start) = rest.find("[[") {
        let after = &rest[start + 2..];
        match after.find("]]") {
            Some(end) => {
                let target = &after[..end];
                if !target.is_empty() {
                    symbols.push(target.to_string());
                }
                rest = &after[end + 2..];
            }
            None => break,
        }
    }

    symbols
}

/// Splits a leading `---`-delimited YAML block off `content`, returning the
/// parsed frontmatter (if any) and the remaining body. Returns `(None,
/// content)` unchanged when there is no frontmatter block or it fails to
/// parse as YAML.
fn parse_frontmatter(content: &str) -> (Option<Frontmatter>, &str) {
    let content = content.trim_start_matches('\u{feff}');
    if !content.starts_with("---") {
        return (None, content);
    }

    let after_opening = &content[3..];
    let after_opening = after_opening
        .strip_prefix("\r\n")
        .or_else(|| after_opening.strip_prefix('\n'))
        .unwrap_or(after_opening);

    let Some(closing_pos) = find_closing_delimiter(after_opening) else {
        return (None, content);
    };

    let yaml_content = &after_opening[..closing_pos];
    let remaining = &after_opening[closing_pos..];
    let remaining = remaining.strip_prefix("---").unwrap_or(remaining);
    let remaining = remaining
        .strip_prefix("\r\n")
        .or_else(|| remaining.strip_prefix('\n'))
        .unwrap_or(remaining);
    let remaining = remaining
        .strip_prefix("\r\n")
        .or_else(|| remaining.strip_prefix('\n'))
        .unwrap_or(remaining);

    match serde_yaml::from_str::<Frontmatter>(yaml_content) {
        Ok(fm) => (Some(fm), remaining),
        Err(_) => (None, content),
    }
}

/// Byte offset of the line `---` that closes a frontmatter block started at
/// the beginning of `content`.
fn find_closing_delimiter(content: &str) -> Option<usize> {
    let mut pos = 0;
    for line in content.lines() {
        if line == "---" {
            return Some(pos);
        }
        pos += line.len() + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn discovers_markdown_and_skips_hidden_and_binary() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("note.md"), "# Hello\n\nBody text").unwrap();
        fs::write(dir.path().join("image.png"), "fake").unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        fs::write(dir.path().join(".git/config"), "hidden").unwrap();

        let (files, errors) = discover(dir.path(), true);
        assert!(errors.is_empty());
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].title(), "Hello");
    }

    #[test]
    fn frontmatter_title_and_tags_take_priority_over_heading() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("note.md"),
            "---\ntitle: Custom Title\ntags: [a, b]\n---\n\n# Heading Instead\n\nBody",
        )
        .unwrap();

        let (files, _) = discover(dir.path(), true);
        assert_eq!(files[0].title(), "Custom Title");
        assert_eq!(files[0].tags(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(files[0].headings(), vec!["Heading Instead".to_string()]);
    }

    #[test]
    fn filename_is_the_last_resort_title() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("untitled-note.md"), "just a paragraph").unwrap();

        let (files, _) = discover(dir.path(), true);
        assert_eq!(files[0].title(), "untitled-note");
    }

    #[test]
    fn symbols_include_links_fence_labels_and_wiki_links() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("note.md"),
            "See [other](other.md) and [[Another Note]].\n\n```rust\nfn x() {}\n```\n",
        )
        .unwrap();

        let (files, _) = discover(dir.path(), true);
        let symbols = files[0].symbols();
        assert!(symbols.contains(&"other.md".to_string()));
        assert!(symbols.contains(&"Another Note".to_string()));
        assert!(symbols.contains(&"rust".to_string()));
    }

    #[test]
    fn path_segments_reflect_subdirectory_nesting() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("projects")).unwrap();
        fs::write(dir.path().join("projects/plan.md"), "# Plan").unwrap();

        let (files, _) = discover(dir.path(), true);
        assert_eq!(files[0].path_segments(), vec!["projects".to_string()]);
    }

    #[test]
    fn code_blocks_are_dropped_from_the_body_unless_included() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("note.md"),
            "# Snippet\n\nSome prose.\n\n```rust\nfn super_secret_symbol() {}\n```\n\nMore prose.",
        )
        .unwrap();

        let (excluded, _) = discover(dir.path(), false);
        let body = excluded[0].read_body().unwrap();
        assert!(!body.contains("super_secret_symbol"));
        assert!(body.contains("Some prose."));
        assert!(body.contains("More prose."));

        let (included, _) = discover(dir.path(), true);
        let body = included[0].read_body().unwrap();
        assert!(body.contains("super_secret_symbol"));
    }
}
