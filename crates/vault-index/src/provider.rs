//! The Inverted Index / Provider (§4.5): postings storage, candidate
//! gathering, regex post-filter, and streaming top-K retrieval.
//!
//! Grounded on `ra-index/src/indexer.rs`'s `ProgressReporter`-driven
//! orchestration style and `ra-index/src/diff.rs`'s change-detection idioms,
//! adapted into upsert/remove/query operations rather than a Tantivy
//! writer/reader pair — this engine's index is a hand-rolled postings map,
//! not a Tantivy segment.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use log::{debug, trace, warn};
use regex::RegexBuilder;
use vault_config::Settings;
use vault_query::ParsedQuery;
use vault_text::{BoundedHeap, tokenize};

use crate::cancel::CancellationToken;
use crate::document::{Document, Field};
use crate::error::IndexError;
use crate::postings::{Posting, PostingsStore};
use crate::result::{MatchSpan, SearchResult};
use crate::scorer::score_document;

/// Per-document bookkeeping the provider retains alongside the record
/// itself: a token count per searchable field, used only for introspection
/// (the scorer retokenizes fields directly for match-span positions).
#[derive(Debug, Clone, Default)]
struct IndexedDoc {
    document: Document,
    field_token_counts: HashMap<Field, usize>,
}

/// Options controlling one `query`/`query_stream` invocation.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Maximum number of results to return. `0` means unbounded.
    pub limit: usize,
    /// Optional cooperative cancellation token, checked before each
    /// candidate is scored and between progressive emits.
    pub cancel: Option<CancellationToken>,
}

/// The outcome of a (possibly cancelled) non-streaming query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// The query ran to completion.
    Completed(Vec<SearchResult>),
    /// The caller's cancellation token tripped before completion; any
    /// partial work is discarded.
    Cancelled,
}

/// One progressive emission from [`Provider::query_stream`].
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A batch of results, in descending score order, none previously
    /// yielded by this stream.
    Partial(Vec<SearchResult>),
    /// The stream has no further events.
    Done,
    /// The caller's cancellation token tripped; the stream ends here.
    Cancelled,
}

/// A scored candidate, ordered by score for the bounded heap. Ties break on
/// id so ordering (and therefore eviction under a full heap) is
/// deterministic.
#[derive(Debug, Clone)]
struct Scored {
    score: f64,
    id: String,
    spans: Vec<MatchSpan>,
}

impl PartialEq for Scored {
    fn eq(&self, other: &Self) -> bool {
        self.score == other.score && self.id == other.id
    }
}
impl Eq for Scored {}

impl PartialOrd for Scored {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scored {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .partial_cmp(&other.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// The canonical search provider: postings, per-document metadata, and
/// document-frequency bookkeeping, per §4.5.
#[derive(Debug)]
pub struct Provider {
    settings: Settings,
    postings: PostingsStore,
    docs: HashMap<String, IndexedDoc>,
}

impl Provider {
    /// Creates an empty provider under the given settings.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            postings: PostingsStore::new(),
            docs: HashMap::new(),
        }
    }

    /// Read access to the settings this provider was built with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replaces the provider's settings. Does not rebuild already-indexed
    /// postings; only affects subsequent upserts and queries.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Current document count.
    pub fn total_docs(&self) -> usize {
        self.docs.len()
    }

    /// Number of distinct indexed terms.
    pub fn term_count(&self) -> usize {
        self.postings.term_count()
    }

    /// Document frequency of `term`, per the `(term, field)`-pair counting
    /// convention documented on [`PostingsStore`].
    pub fn document_frequency(&self, term: &str) -> usize {
        let normalized = vault_text::normalize(term, self.settings.search.preserve_diacritics);
        self.postings.document_frequency(&normalized)
    }

    /// Looks up the indexed record for `id`, for callers joining a
    /// [`SearchResult`] (which carries only the id, score and spans) back
    /// to title/path/tags for display.
    pub fn document(&self, id: &str) -> Option<&Document> {
        self.docs.get(id).map(|indexed| &indexed.document)
    }

    /// Clears the index, then upserts every document in `docs` in order.
    pub fn index_all(&mut self, docs: Vec<Document>) -> Result<(), IndexError> {
        self.clear();
        for doc in docs {
            self.upsert(doc)?;
        }
        Ok(())
    }

    /// Inserts or replaces `doc`. If `doc.id` is already indexed, the prior
    /// version is removed first so the operation behaves as a clean
    /// replace rather than an accumulation. Fails without effect if the
    /// corpus is already at `max_docs` and `doc.id` was not already present.
    pub fn upsert(&mut self, mut doc: Document) -> Result<(), IndexError> {
        let already_present = self.docs.contains_key(&doc.id);
        if already_present {
            self.remove(&doc.id);
        }

        if self.total_docs() >= self.settings.indexer.max_docs {
            warn!(
                "upsert rejected for {:?}: capacity {} exceeded",
                doc.id, self.settings.indexer.max_docs
            );
            return Err(IndexError::CapacityExceeded {
                max_docs: self.settings.indexer.max_docs,
            });
        }

        doc.truncate_body(self.settings.indexer.max_body_bytes);

        let preserve = self.settings.search.preserve_diacritics;
        let mut field_token_counts = HashMap::new();

        for &field in &Document::SEARCHABLE_FIELDS {
            let text = doc.field_text(field);
            let tokens = tokenize(&text, preserve);
            field_token_counts.insert(field, tokens.len());

            let mut by_term: HashMap<String, Vec<usize>> = HashMap::new();
            for token in &tokens {
                by_term.entry(token.text.clone()).or_default().push(token.start);
            }

            for (term, positions) in by_term {
                let tf = positions.len();
                self.postings.insert(
                    &term,
                    Posting {
                        doc_id: doc.id.clone(),
                        field,
                        term_frequency: tf,
                        positions,
                    },
                );
            }
        }

        debug!("indexed {:?} ({} fields tokenized)", doc.id, field_token_counts.len());

        self.docs.insert(
            doc.id.clone(),
            IndexedDoc {
                document: doc,
                field_token_counts,
            },
        );
        Ok(())
    }

    /// Removes `id` and every posting it contributed. A no-op if `id` is
    /// not indexed.
    pub fn remove(&mut self, id: &str) {
        if self.docs.remove(id).is_some() {
            self.postings.remove_doc(id);
            debug!("removed {id:?} from index");
        }
    }

    /// Resets all state: postings, metadata, and document frequencies.
    pub fn clear(&mut self) {
        self.postings.clear();
        self.docs.clear();
    }

    /// Gathers candidate ids for `query`, per §4.5 step 2: AND across terms
    /// and or-groups, OR within an or-group. Returns `None` when there is no
    /// positive term/or-group constraint at all (the caller falls back to
    /// "all ids" in that case).
    fn gather_candidates(&self, query: &ParsedQuery) -> Option<HashSet<String>> {
        if query.terms.is_empty() && query.or_groups.is_empty() {
            return None;
        }

        let preserve = self.settings.search.preserve_diacritics;
        let mut required_sets: Vec<HashSet<String>> = Vec::new();

        for term in &query.terms {
            let normalized = vault_text::normalize(term, preserve);
            required_sets.push(self.postings.ids_for_term(&normalized));
        }

        for group in &query.or_groups {
            let mut union = HashSet::new();
            for term in group {
                let normalized = vault_text::normalize(term, preserve);
                union.extend(self.postings.ids_for_term(&normalized));
            }
            required_sets.push(union);
        }

        let mut iter = required_sets.into_iter();
        let first = iter.next().unwrap_or_default();
        Some(iter.fold(first, |acc, set| acc.intersection(&set).cloned().collect()))
    }

    /// The candidate id set a query resolves against, per §4.5 steps 2-3.
    /// When there are no positive term/or-group constraints, the candidate
    /// set is "all indexed ids" only if phrases or filters still narrow it
    /// down further; a query with neither (e.g. excludes-only) has no
    /// candidates at all, per §8 ("query containing only excludes returns
    /// the empty result set").
    fn candidate_ids(&self, query: &ParsedQuery) -> Vec<String> {
        match self.gather_candidates(query) {
            Some(ids) => ids.into_iter().collect(),
            None if !query.phrases.is_empty() || !query.filters.is_empty() => {
                self.docs.keys().cloned().collect()
            }
            None => Vec::new(),
        }
    }

    /// §4.5 step 1: the `limit` most-recently-modified documents, most
    /// recent first, with a monotonic `score = N - rank` so the result is
    /// still meaningfully sortable downstream.
    fn recency_fallback(&self, limit: usize) -> Vec<SearchResult> {
        let mut ordered: Vec<&IndexedDoc> = self.docs.values().collect();
        ordered.sort_by(|a, b| {
            b.document
                .mtime
                .cmp(&a.document.mtime)
                .then_with(|| a.document.id.cmp(&b.document.id))
        });

        let total = ordered.len();
        let take = if limit == 0 { total } else { limit.min(total) };

        ordered
            .into_iter()
            .take(take)
            .enumerate()
            .map(|(rank, indexed)| SearchResult {
                id: indexed.document.id.clone(),
                score: (total - rank) as f64,
                spans: Vec::new(),
            })
            .collect()
    }

    /// Runs the scoring loop over `candidates`, pushing survivors into a
    /// heap bounded by `opts.limit`. Returns `None` on cancellation.
    fn score_candidates(
        &self,
        candidates: &[String],
        query: &ParsedQuery,
        opts: &QueryOptions,
        now_ms: i64,
    ) -> Option<BoundedHeap<Scored>> {
        let mut heap = BoundedHeap::new(opts.limit);

        for id in candidates {
            if let Some(token) = &opts.cancel
                && token.is_cancelled()
            {
                return None;
            }

            let Some(indexed) = self.docs.get(id) else {
                continue;
            };

            if let Some(result) = score_document(&indexed.document, query, &self.settings.search, now_ms) {
                trace!("scored {id:?}: {:.4}", result.score);
                heap.push(Scored {
                    score: result.score,
                    id: id.clone(),
                    spans: result.spans,
                });
            }
        }

        Some(heap)
    }

    /// Compiles `query.regex`'s source/flags into a [`regex::Regex`],
    /// logging and returning `None` if it somehow fails to build here
    /// (the parser already validated it, so this should not happen in
    /// practice, but the provider does not trust that invariant blindly).
    fn compile_regex(&self, query: &ParsedQuery) -> Option<regex::Regex> {
        let clause = query.regex.as_ref()?;
        let mut builder = RegexBuilder::new(&clause.source);
        builder
            .case_insensitive(clause.flags.contains('i'))
            .multi_line(clause.flags.contains('m'))
            .dot_matches_new_line(clause.flags.contains('s'));
        match builder.build() {
            Ok(re) => Some(re),
            Err(e) => {
                warn!("regex clause failed to recompile in provider: {e}");
                None
            }
        }
    }

    /// §4.5 step 4: filters `scored` (already sorted descending) down to
    /// regex matches among the top `regex_candidate_k`, attaching regex
    /// match spans to survivors.
    fn apply_regex_filter(&self, scored: Vec<Scored>, query: &ParsedQuery) -> Vec<Scored> {
        let Some(regex) = self.compile_regex(query) else {
            return scored;
        };

        let k = self.settings.search.regex_candidate_k;
        let mut filtered = Vec::new();

        for mut candidate in scored.into_iter().take(k) {
            let Some(indexed) = self.docs.get(&candidate.id) else {
                continue;
            };

            let mut matched_any = false;
            for (field, text) in [
                (Field::Title, indexed.document.title.as_str()),
                (Field::Body, indexed.document.body.as_str()),
            ] {
                for m in regex.find_iter(text) {
                    matched_any = true;
                    let start = text[..m.start()].chars().count();
                    let end = start + text[m.start()..m.end()].chars().count();
                    candidate.spans.push(MatchSpan { field, start, end });
                }
            }

            if matched_any {
                filtered.push(candidate);
            }
        }

        filtered
    }

    /// Resolves `query` to an ordered result list, per §4.5.
    pub fn query(&self, query: &ParsedQuery, opts: &QueryOptions, now_ms: i64) -> QueryOutcome {
        if query.is_empty_query() && query.filters.is_empty() && query.excludes.is_empty() {
            return QueryOutcome::Completed(self.recency_fallback(opts.limit));
        }

        let candidates = self.candidate_ids(query);
        let Some(heap) = self.score_candidates(&candidates, query, opts, now_ms) else {
            return QueryOutcome::Cancelled;
        };

        if let Some(token) = &opts.cancel
            && token.is_cancelled()
        {
            return QueryOutcome::Cancelled;
        }

        let mut scored = heap.extract_all();
        scored.reverse(); // descending by score

        if query.regex.is_some() {
            scored = self.apply_regex_filter(scored, query);
        }

        if opts.limit > 0 {
            scored.truncate(opts.limit);
        }

        QueryOutcome::Completed(
            scored
                .into_iter()
                .map(|s| SearchResult {
                    id: s.id,
                    score: s.score,
                    spans: s.spans,
                })
                .collect(),
        )
    }

    /// A pull-driven streaming variant of [`Provider::query`]: the caller
    /// repeatedly calls [`QueryStream::next_event`], each call performing a
    /// bounded chunk of work (§5's suspension-point model, no async runtime
    /// assumed). The final set of yielded ids always equals
    /// [`Provider::query`]'s result set.
    pub fn query_stream<'a>(
        &'a self,
        query: &'a ParsedQuery,
        opts: QueryOptions,
        now_ms: i64,
    ) -> QueryStream<'a> {
        QueryStream::new(self, query, opts, now_ms)
    }
}

/// Candidates-processed count that triggers a progressive emission.
const STREAM_EMIT_EVERY: usize = 100;

/// Pull-based streaming query cursor, see [`Provider::query_stream`].
pub struct QueryStream<'a> {
    provider: &'a Provider,
    query: &'a ParsedQuery,
    opts: QueryOptions,
    now_ms: i64,
    candidates: Vec<String>,
    cursor: usize,
    heap: BoundedHeap<Scored>,
    yielded: HashSet<String>,
    finished: bool,
    empty_query_results: Option<Vec<SearchResult>>,
}

impl<'a> QueryStream<'a> {
    fn new(provider: &'a Provider, query: &'a ParsedQuery, opts: QueryOptions, now_ms: i64) -> Self {
        if query.is_empty_query() && query.filters.is_empty() && query.excludes.is_empty() {
            let results = provider.recency_fallback(opts.limit);
            return Self {
                provider,
                query,
                opts,
                now_ms,
                candidates: Vec::new(),
                cursor: 0,
                heap: BoundedHeap::new(0),
                yielded: HashSet::new(),
                finished: false,
                empty_query_results: Some(results),
            };
        }

        let candidates = provider.candidate_ids(query);
        let limit = opts.limit;
        Self {
            provider,
            query,
            opts,
            now_ms,
            candidates,
            cursor: 0,
            heap: BoundedHeap::new(limit),
            yielded: HashSet::new(),
            finished: false,
            empty_query_results: None,
        }
    }

    fn is_cancelled(&self) -> bool {
        self.opts.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    fn emit_slice_size(&self) -> usize {
        let limit = self.opts.limit;
        let half = if limit == 0 { usize::MAX } else { limit / 2 };
        5.min(half.max(1))
    }

    fn top_unyielded(&self, count: usize) -> Vec<SearchResult> {
        let mut snapshot = self.heap.snapshot();
        snapshot.sort_by(|a, b| b.cmp(a));
        snapshot
            .into_iter()
            .filter(|s| !self.yielded.contains(&s.id))
            .take(count)
            .map(|s| SearchResult {
                id: s.id,
                score: s.score,
                spans: s.spans,
            })
            .collect()
    }

    /// Produces the next streaming event. Returns `StreamEvent::Done` on
    /// every call after completion, so callers can loop until they see it.
    pub fn next_event(&mut self) -> StreamEvent {
        if let Some(results) = self.empty_query_results.take() {
            self.finished = true;
            for r in &results {
                self.yielded.insert(r.id.clone());
            }
            return StreamEvent::Partial(results);
        }

        if self.finished {
            return StreamEvent::Done;
        }

        if self.is_cancelled() {
            self.finished = true;
            return StreamEvent::Cancelled;
        }

        let mut processed_this_call = 0;
        while self.cursor < self.candidates.len() {
            if self.is_cancelled() {
                self.finished = true;
                return StreamEvent::Cancelled;
            }

            let id = &self.candidates[self.cursor];
            self.cursor += 1;
            processed_this_call += 1;

            if let Some(indexed) = self.provider.docs.get(id)
                && let Some(result) =
                    score_document(&indexed.document, self.query, &self.provider.settings.search, self.now_ms)
            {
                self.heap.push(Scored {
                    score: result.score,
                    id: id.clone(),
                    spans: result.spans,
                });
            }

            if processed_this_call >= STREAM_EMIT_EVERY {
                let batch = self.top_unyielded(self.emit_slice_size());
                if !batch.is_empty() {
                    for r in &batch {
                        self.yielded.insert(r.id.clone());
                    }
                    return StreamEvent::Partial(batch);
                }
                processed_this_call = 0;
            }
        }

        // All candidates processed: apply the regex post-filter and flush
        // whatever has not yet been yielded.
        let mut scored = self.heap.snapshot();
        scored.sort_by(|a, b| b.cmp(a));
        if self.query.regex.is_some() {
            scored = self.provider.apply_regex_filter(scored, self.query);
        }
        if self.opts.limit > 0 {
            scored.truncate(self.opts.limit);
        }

        let remaining: Vec<SearchResult> = scored
            .into_iter()
            .filter(|s| !self.yielded.contains(&s.id))
            .map(|s| SearchResult {
                id: s.id,
                score: s.score,
                spans: s.spans,
            })
            .collect();

        self.finished = true;
        if remaining.is_empty() {
            StreamEvent::Done
        } else {
            for r in &remaining {
                self.yielded.insert(r.id.clone());
            }
            StreamEvent::Partial(remaining)
        }
    }
}

impl Iterator for QueryStream<'_> {
    type Item = StreamEvent;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_event() {
            StreamEvent::Done => {
                self.finished = true;
                None
            }
            other => Some(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use vault_query::parse;

    use super::*;

    fn doc(id: &str, title: &str, path: &[&str], tags: &[&str], body: &str, mtime: i64) -> Document {
        Document {
            id: id.to_string(),
            title: title.to_string(),
            path: path.iter().map(|s| s.to_string()).collect(),
            tags: tags.iter().map(|s| s.to_string()).collect(),
            headings: Vec::new(),
            symbols: Vec::new(),
            body: body.to_string(),
            mtime,
            size: body.len() as u64,
        }
    }

    fn three_doc_corpus() -> Vec<Document> {
        vec![
            doc(
                "note1.md",
                "Project Planning",
                &["projects", "work"],
                &["todo", "urgent"],
                "this is a detailed project planning document with tasks and deadlines.",
                1_640_995_200_000,
            ),
            doc(
                "note2.md",
                "Meeting Notes",
                &["meetings"],
                &["meeting", "work"],
                "team meeting notes with action items and follow-ups.",
                1_641_081_600_000,
            ),
            doc(
                "note3.md",
                "Research Ideas",
                &["research"],
                &["research", "ideas"],
                "research ideas and hypotheses for the upcoming project.",
                1_641_168_000_000,
            ),
        ]
    }

    fn provider_with_corpus() -> Provider {
        let mut provider = Provider::new(Settings::default());
        provider.index_all(three_doc_corpus()).unwrap();
        provider
    }

    fn opts(limit: usize) -> QueryOptions {
        QueryOptions { limit, cancel: None }
    }

    #[test]
    fn scenario_2_project_query_orders_title_over_body_only() {
        let provider = provider_with_corpus();
        let query = parse("project", &Settings::default());
        let QueryOutcome::Completed(results) = provider.query(&query, &opts(10), 0) else {
            panic!("not cancelled");
        };
        let ids: Vec<_> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["note1.md", "note3.md"]);
    }

    #[test]
    fn scenario_3_empty_query_is_mtime_descending() {
        let provider = provider_with_corpus();
        let query = parse("", &Settings::default());
        let QueryOutcome::Completed(results) = provider.query(&query, &opts(3), 0) else {
            panic!("not cancelled");
        };
        let ids: Vec<_> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["note3.md", "note2.md", "note1.md"]);
        assert!(results[0].score > results[1].score);
        assert!(results[1].score > results[2].score);
    }

    #[test]
    fn scenario_4_or_group_unions_across_terms() {
        let provider = provider_with_corpus();
        let query = parse("meeting OR research", &Settings::default());
        let QueryOutcome::Completed(results) = provider.query(&query, &opts(10), 0) else {
            panic!("not cancelled");
        };
        let ids: HashSet<_> = results.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, HashSet::from(["note2.md".to_string(), "note3.md".to_string()]));
    }

    #[test]
    fn scenario_5_regex_post_filter_narrows_to_matching_body() {
        let provider = provider_with_corpus();
        let query = parse(r"project /up\w+/i", &Settings::default());
        let QueryOutcome::Completed(results) = provider.query(&query, &opts(10), 0) else {
            panic!("not cancelled");
        };
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "note3.md");
        assert!(results[0].spans.iter().any(|s| s.field == Field::Body));
    }

    #[test]
    fn scenario_6_exclude_rejects_regardless_of_other_matches() {
        let mut provider = Provider::new(Settings::default());
        provider
            .upsert(doc("spammy.md", "Notes", &[], &[], "spam content here", 0))
            .unwrap();
        let query = parse("content -spam", &Settings::default());
        let QueryOutcome::Completed(results) = provider.query(&query, &opts(10), 0) else {
            panic!("not cancelled");
        };
        assert!(results.is_empty());
    }

    #[test]
    fn only_excludes_returns_empty_result_set() {
        let provider = provider_with_corpus();
        let query = parse("-spam", &Settings::default());
        let QueryOutcome::Completed(results) = provider.query(&query, &opts(10), 0) else {
            panic!("not cancelled");
        };
        assert!(results.is_empty());
    }

    #[test]
    fn tag_only_filter_matches_against_all_docs() {
        let provider = provider_with_corpus();
        let query = parse("tag:work", &Settings::default());
        let QueryOutcome::Completed(results) = provider.query(&query, &opts(10), 0) else {
            panic!("not cancelled");
        };
        // Only note2.md carries the "work" tag; note1.md has "work" in its
        // path, not its tags, so a tag: filter must not match it.
        let ids: HashSet<_> = results.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, HashSet::from(["note2.md".to_string()]));
    }

    #[test]
    fn upsert_then_remove_restores_initial_state() {
        let mut provider = Provider::new(Settings::default());
        let d = doc("a.md", "Alpha", &[], &[], "alpha body", 0);
        provider.upsert(d.clone()).unwrap();
        provider.remove("a.md");
        assert_eq!(provider.total_docs(), 0);
        assert_eq!(provider.term_count(), 0);
    }

    #[test]
    fn double_upsert_is_idempotent() {
        let mut provider = Provider::new(Settings::default());
        let d = doc("a.md", "Alpha", &[], &[], "alpha body", 0);
        provider.upsert(d.clone()).unwrap();
        let after_one = provider.total_docs();
        provider.upsert(d).unwrap();
        assert_eq!(provider.total_docs(), after_one);
        assert_eq!(provider.total_docs(), 1);
    }

    #[test]
    fn clear_resets_all_state() {
        let mut provider = provider_with_corpus();
        provider.clear();
        assert_eq!(provider.total_docs(), 0);
        assert_eq!(provider.term_count(), 0);
    }

    #[test]
    fn upsert_rejects_past_capacity() {
        let mut settings = Settings::default();
        settings.indexer.max_docs = 1;
        let mut provider = Provider::new(settings);
        provider.upsert(doc("a.md", "A", &[], &[], "a", 0)).unwrap();
        let err = provider.upsert(doc("b.md", "B", &[], &[], "b", 0)).unwrap_err();
        assert!(matches!(err, IndexError::CapacityExceeded { max_docs: 1 }));
        assert_eq!(provider.total_docs(), 1);
    }

    #[test]
    fn cancelled_query_returns_cancelled_outcome() {
        let provider = provider_with_corpus();
        let query = parse("project", &Settings::default());
        let token = CancellationToken::new();
        token.cancel();
        let result = provider.query(
            &query,
            &QueryOptions {
                limit: 10,
                cancel: Some(token),
            },
            0,
        );
        assert_eq!(result, QueryOutcome::Cancelled);
    }

    #[test]
    fn streaming_result_set_matches_non_streaming() {
        let mut provider = Provider::new(Settings::default());
        for i in 0..200 {
            provider
                .upsert(doc(
                    &format!("doc{i}.md"),
                    "Document",
                    &[],
                    &[],
                    "this document discusses document retrieval",
                    i as i64,
                ))
                .unwrap();
        }

        let query = parse("document", &Settings::default());
        let QueryOutcome::Completed(non_streaming) = provider.query(&query, &opts(5), 0) else {
            panic!("not cancelled");
        };
        let mut non_streaming_ids: Vec<_> = non_streaming.iter().map(|r| r.id.clone()).collect();
        non_streaming_ids.sort();

        let mut stream = provider.query_stream(&query, opts(5), 0);
        let mut streamed_ids = Vec::new();
        let mut seen = HashSet::new();
        loop {
            match stream.next_event() {
                StreamEvent::Partial(results) => {
                    for r in results {
                        assert!(seen.insert(r.id.clone()), "duplicate id in stream: {}", r.id);
                        streamed_ids.push(r.id);
                    }
                }
                StreamEvent::Done => break,
                StreamEvent::Cancelled => panic!("should not cancel"),
            }
        }
        streamed_ids.sort();
        assert_eq!(streamed_ids, non_streaming_ids);
    }

    #[test]
    fn body_truncated_to_configured_cap() {
        let mut settings = Settings::default();
        settings.indexer.max_body_bytes = 10;
        let mut provider = Provider::new(settings);
        provider
            .upsert(doc("a.md", "A", &[], &[], "this body is far longer than ten bytes", 0))
            .unwrap();
        let query = parse("longer", &Settings::default());
        let QueryOutcome::Completed(results) = provider.query(&query, &opts(10), 0) else {
            panic!("not cancelled");
        };
        assert!(results.is_empty(), "truncated body should not contain 'longer'");
    }
}
