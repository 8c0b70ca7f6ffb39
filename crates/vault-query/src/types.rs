//! Structured query types produced by [`crate::parse`].

use crate::error::QueryError;

/// Whether a parsed query addresses the document corpus or an opaque
/// command name lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryMode {
    /// Ordinary document search (the default).
    #[default]
    Files,
    /// The raw input started with the commands prefix; the remainder is an
    /// opaque single-term lookup and all other query syntax is inert.
    Commands,
}

/// Which single field, if any, matching is restricted to by a lone `#` or
/// `@` token. Latest occurrence wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRestriction {
    /// Restrict matching to the `headings` field.
    Headings,
    /// Restrict matching to the `symbols` field.
    Symbols,
}

/// Non-scoring constraints extracted from the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    /// `#TAG` / `tag:TAG` clauses.
    pub tag: Vec<String>,
    /// `path:VALUE` clauses.
    pub path: Vec<String>,
    /// `in:VALUE` clauses.
    pub in_: Vec<String>,
    /// The field restriction set by a lone `#`/`@` token, if any.
    pub field: Option<FieldRestriction>,
}

impl Filters {
    /// True if no tag, path, `in:`, or field-restriction clause was set.
    pub fn is_empty(&self) -> bool {
        self.tag.is_empty() && self.path.is_empty() && self.in_.is_empty() && self.field.is_none()
    }
}

/// A validated `/PATTERN/FLAGS` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexClause {
    /// The pattern source, with the delimiting slashes stripped.
    pub source: String,
    /// The flag letters that followed the closing slash, in input order.
    pub flags: String,
}

/// A structured query, produced by [`crate::parse`] from a raw string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery {
    /// Verbatim input string, preserved for UI echo.
    pub raw: String,
    /// `files` (default) or `commands`.
    pub mode: QueryMode,
    /// Ordered sequence of conjunctive fuzzy terms.
    pub terms: Vec<String>,
    /// Ordered sequence of substrings that must appear literally.
    pub phrases: Vec<String>,
    /// Terms whose presence in any searchable field rejects a document.
    pub excludes: Vec<String>,
    /// Disjunctive groups; conjunctive across groups, disjunctive within one.
    pub or_groups: Vec<Vec<String>>,
    /// Non-scoring constraints.
    pub filters: Filters,
    /// Optional regex clause, applied to the top-K candidates only.
    pub regex: Option<RegexClause>,
    /// Non-fatal errors accumulated while parsing.
    pub errors: Vec<QueryError>,
}

impl ParsedQuery {
    /// True if the query carries no positive *term* constraint at all: no
    /// terms, phrases, or-groups, or regex. Does not consider `filters` or
    /// `excludes` — callers deciding whether to use the recency-ordered
    /// fallback (see the provider) must check those separately, since a
    /// filters-only or excludes-only query is not the same as no query.
    pub fn is_empty_query(&self) -> bool {
        self.terms.is_empty()
            && self.phrases.is_empty()
            && self.or_groups.is_empty()
            && self.regex.is_none()
    }
}
