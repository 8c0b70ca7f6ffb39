//! Postings storage and document-frequency bookkeeping (§4.5, §9).
//!
//! No direct teacher counterpart exists for this structure (Tantivy owns
//! postings internally in `ra-index`), so this module follows the
//! specification's own "Representation choices" notes: a flat mapping from
//! term to posting entries, plus `ajw998-blaze`'s hand-rolled, in-memory,
//! non-Tantivy index style as architectural enrichment.

use std::collections::{HashMap, HashSet};

use crate::document::Field;

/// One occurrence record: a term appeared in `field` of `doc_id` at the
/// given positions (character offsets in that field's flattened text).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    /// The document this posting belongs to.
    pub doc_id: String,
    /// The field the term occurred in.
    pub field: Field,
    /// Number of occurrences of the term in this field of this document.
    pub term_frequency: usize,
    /// Character-offset positions of each occurrence.
    pub positions: Vec<usize>,
}

/// Inverted index storage: term → posting list, plus document frequency.
///
/// `df` increments once per `(term, field)` pair a term first occurs in
/// within a document: a term appearing in both `title` and `body` of the
/// same document increments its df twice. This only affects
/// [`PostingsStore::document_frequency`], an introspection accessor; the
/// scorer never reads `df` directly.
#[derive(Debug, Clone, Default)]
pub struct PostingsStore {
    postings: HashMap<String, Vec<Posting>>,
    df: HashMap<String, usize>,
}

impl PostingsStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one posting entry for `term`, incrementing its document
    /// frequency by one.
    pub fn insert(&mut self, term: &str, posting: Posting) {
        self.postings.entry(term.to_string()).or_default().push(posting);
        *self.df.entry(term.to_string()).or_insert(0) += 1;
    }

    /// Distinct document ids with at least one posting for `term`.
    pub fn ids_for_term(&self, term: &str) -> HashSet<String> {
        self.postings
            .get(term)
            .map(|list| list.iter().map(|p| p.doc_id.clone()).collect())
            .unwrap_or_default()
    }

    /// The posting list for `term`, if any.
    pub fn postings_for_term(&self, term: &str) -> &[Posting] {
        self.postings.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Document frequency of `term`: the number of `(term, field)` pairs
    /// recorded across all documents (see the struct docs for the counting
    /// convention).
    pub fn document_frequency(&self, term: &str) -> usize {
        *self.df.get(term).unwrap_or(&0)
    }

    /// Number of distinct terms currently indexed.
    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    /// Removes every posting belonging to `id`, decrementing `df` by the
    /// number of postings removed per term and dropping any term whose
    /// posting list becomes empty.
    pub fn remove_doc(&mut self, id: &str) {
        let mut emptied = Vec::new();
        for (term, list) in self.postings.iter_mut() {
            let before = list.len();
            list.retain(|p| p.doc_id != id);
            let removed = before - list.len();
            if removed == 0 {
                continue;
            }
            if let Some(count) = self.df.get_mut(term) {
                *count = count.saturating_sub(removed);
            }
            if list.is_empty() {
                emptied.push(term.clone());
            }
        }
        for term in emptied {
            self.postings.remove(&term);
            self.df.remove(&term);
        }
    }

    /// Resets all state.
    pub fn clear(&mut self) {
        self.postings.clear();
        self.df.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn posting(doc_id: &str, field: Field, positions: Vec<usize>) -> Posting {
        Posting {
            doc_id: doc_id.to_string(),
            field,
            term_frequency: positions.len(),
            positions,
        }
    }

    #[test]
    fn insert_increments_df_per_posting() {
        let mut store = PostingsStore::new();
        store.insert("project", posting("note1.md", Field::Title, vec![0]));
        store.insert("project", posting("note1.md", Field::Body, vec![5]));
        assert_eq!(store.document_frequency("project"), 2);
        assert_eq!(store.ids_for_term("project").len(), 1);
    }

    #[test]
    fn remove_doc_drops_empty_terms() {
        let mut store = PostingsStore::new();
        store.insert("unique", posting("note1.md", Field::Body, vec![0]));
        store.remove_doc("note1.md");
        assert_eq!(store.document_frequency("unique"), 0);
        assert_eq!(store.term_count(), 0);
    }

    #[test]
    fn remove_doc_leaves_other_documents_postings_intact() {
        let mut store = PostingsStore::new();
        store.insert("shared", posting("note1.md", Field::Body, vec![0]));
        store.insert("shared", posting("note2.md", Field::Body, vec![3]));
        store.remove_doc("note1.md");
        assert_eq!(store.document_frequency("shared"), 1);
        assert_eq!(store.ids_for_term("shared"), HashSet::from(["note2.md".to_string()]));
    }

    #[test]
    fn clear_resets_everything() {
        let mut store = PostingsStore::new();
        store.insert("x", posting("note1.md", Field::Body, vec![0]));
        store.clear();
        assert_eq!(store.term_count(), 0);
        assert_eq!(store.document_frequency("x"), 0);
    }
}
