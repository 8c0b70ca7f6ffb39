//! Search result and match-span types (§3).
//!
//! Grounded on `ra-index/src/result.rs`'s `SearchCandidate` field list and
//! its `match_ranges: Vec<Range<usize>>` field, the direct precedent for
//! this specification's match spans.

use crate::document::Field;

/// A half-open character range within one field of a document, produced by
/// the scorer for highlight rendering. Invariant: `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    /// The field the span is relative to.
    pub field: Field,
    /// Start offset, inclusive.
    pub start: usize,
    /// End offset, exclusive.
    pub end: usize,
}

/// One scored document returned by a query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// The matched document's id.
    pub id: String,
    /// Non-negative, finite relevance score; higher is more relevant.
    pub score: f64,
    /// Match spans collected across all scored fields, in scoring order.
    pub spans: Vec<MatchSpan>,
}
