//! Weighted multi-field scoring with recency bias (§4.4).
//!
//! Grounded on `ajw998-blaze/crates/engine/src/eval/rank/scoring.rs`'s
//! additive-terms style (named scoring constants, one function per scoring
//! dimension summed into a total) as the primary enrichment source, since
//! nothing in `ra` does custom hand-rolled scoring (Tantivy owns ranking
//! there). Fuzzy token matching and normalization delegate to `vault-text`.

use vault_config::{ScorerWeights, SearchSettings};
use vault_query::{FieldRestriction, ParsedQuery};
use vault_text::{damerau_levenshtein_within, normalize, tokenize};

use crate::document::{Document, Field};
use crate::result::MatchSpan;

/// Per-occurrence bonus for a literal phrase match in title/body.
const PHRASE_BONUS: f64 = 0.25;
/// Hard ceiling on the recency bonus, before the recency weight is applied.
const RECENCY_CEILING: f64 = 0.5;
const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// The outcome of scoring one document against one query: never negative,
/// always finite.
pub(crate) struct ScoreResult {
    pub score: f64,
    pub spans: Vec<MatchSpan>,
}

/// Scores `doc` against `query`, or returns `None` if the document is
/// rejected (an exclude term matched, or a filter failed). `now_ms` is the
/// caller's notion of "now", in epoch milliseconds, so recency is testable
/// without a wall clock.
pub(crate) fn score_document(
    doc: &Document,
    query: &ParsedQuery,
    settings: &SearchSettings,
    now_ms: i64,
) -> Option<ScoreResult> {
    let preserve = settings.preserve_diacritics;

    if !filters_satisfied(doc, query, preserve) {
        return None;
    }

    let concatenated = normalize(&doc.concatenated_text(), preserve);
    for exclude in &query.excludes {
        let needle = normalize(exclude, preserve);
        if !needle.is_empty() && concatenated.contains(&needle) {
            return None;
        }
    }

    let mut spans = Vec::new();
    let mut total = 0.0;

    let fields_to_score: &[Field] = match query.filters.field {
        Some(FieldRestriction::Headings) => &[Field::Headings],
        Some(FieldRestriction::Symbols) => &[Field::Symbols],
        None => &Document::SEARCHABLE_FIELDS,
    };

    for &field in fields_to_score {
        let weight = weight_for(&settings.weights, field);
        if weight == 0.0 {
            continue;
        }
        let text = doc.field_text(field);
        let tokens = tokenize(&text, preserve);
        let field_score = score_field(&tokens, &query.terms, field, preserve, &mut spans);
        total += weight * field_score;
    }

    total += PHRASE_BONUS * phrase_occurrences(doc, &query.phrases, preserve);
    total += settings.weights.recency * recency_bonus(doc.mtime, now_ms, settings.recency_half_life_days);

    Some(ScoreResult { score: total, spans })
}

fn weight_for(weights: &ScorerWeights, field: Field) -> f64 {
    match field {
        Field::Title => weights.title,
        Field::Headings => weights.headings,
        Field::Path => weights.path,
        Field::Tags => weights.tags,
        Field::Symbols => weights.symbols,
        Field::Body => weights.body,
    }
}

/// Average, across `terms`, of the best per-token score in `tokens`;
/// records a match span at the best-matching token's position when found.
fn score_field(
    tokens: &[vault_text::Token],
    terms: &[String],
    field: Field,
    preserve: bool,
    spans: &mut Vec<MatchSpan>,
) -> f64 {
    if terms.is_empty() {
        return 0.0;
    }

    let mut sum = 0.0;
    for term in terms {
        let normalized_term = normalize(term, preserve);
        if normalized_term.is_empty() {
            continue;
        }
        let mut best_score = 0.0;
        let mut best_span = None;
        for token in tokens {
            let token_score = score_token(&normalized_term, &token.text);
            if token_score > best_score {
                best_score = token_score;
                best_span = Some((token.start, token.end));
            }
        }
        sum += best_score;
        if best_score > 0.0
            && let Some((start, end)) = best_span
        {
            spans.push(MatchSpan { field, start, end });
        }
    }

    sum / terms.len() as f64
}

/// Prefix match scores 1.0; otherwise bounded Damerau-Levenshtein distance
/// (capped at 2) maps to `max(0, 1 - distance / max(len(t), len(f)))`.
fn score_token(term: &str, token: &str) -> f64 {
    if token.starts_with(term) {
        return 1.0;
    }
    let max_len = term.chars().count().max(token.chars().count());
    if max_len == 0 {
        return 0.0;
    }
    match damerau_levenshtein_within(term, token, 2) {
        Some(distance) => (1.0 - distance as f64 / max_len as f64).max(0.0),
        None => 0.0,
    }
}

fn phrase_occurrences(doc: &Document, phrases: &[String], preserve: bool) -> f64 {
    if phrases.is_empty() {
        return 0.0;
    }
    let haystack = format!(
        "{} {}",
        normalize(&doc.title, preserve),
        normalize(&doc.body, preserve)
    );
    phrases
        .iter()
        .map(|phrase| {
            let needle = normalize(phrase, preserve);
            if needle.is_empty() {
                0
            } else {
                haystack.matches(needle.as_str()).count()
            }
        })
        .sum::<usize>() as f64
}

fn recency_bonus(mtime_ms: i64, now_ms: i64, half_life_days: f64) -> f64 {
    let age_days = ((now_ms - mtime_ms) as f64 / MILLIS_PER_DAY).max(0.0);
    let half_life = if half_life_days > 0.0 {
        half_life_days
    } else {
        f64::MIN_POSITIVE
    };
    (RECENCY_CEILING * 2f64.powf(-age_days / half_life)).clamp(0.0, RECENCY_CEILING)
}

/// Tests `filters.tag` / `filters.path` / `filters.in` against `doc`.
/// `path:` and `in:` both test membership against the full ordered `path`
/// sequence, not just the leaf segment.
fn filters_satisfied(doc: &Document, query: &ParsedQuery, preserve: bool) -> bool {
    let filters = &query.filters;

    for tag in &filters.tag {
        let needle = normalize(tag, preserve);
        if !doc.tags.iter().any(|t| normalize(t, preserve) == needle) {
            return false;
        }
    }

    for path_value in filters.path.iter().chain(filters.in_.iter()) {
        let needle = normalize(path_value, preserve);
        if !doc.path.iter().any(|segment| normalize(segment, preserve) == needle) {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use vault_config::Settings;
    use vault_query::parse;

    use super::*;

    fn doc(title: &str, body: &str, mtime: i64) -> Document {
        Document {
            id: "d".into(),
            title: title.into(),
            path: vec!["projects".into()],
            tags: vec!["work".into()],
            headings: vec!["Overview".into()],
            symbols: vec!["[[link]]".into()],
            body: body.into(),
            mtime,
            size: body.len() as u64,
        }
    }

    #[test]
    fn exclude_term_rejects_document() {
        let settings = Settings::default();
        let query = parse("content -spam", &settings);
        let d = doc("Notes", "spam content here", 0);
        assert!(score_document(&d, &query, &settings.search, 0).is_none());
    }

    #[test]
    fn title_match_outscores_body_only_match() {
        let settings = Settings::default();
        let query = parse("project", &settings);
        let title_hit = doc("project planning", "nothing relevant", 0);
        let body_hit = doc("Unrelated", "a project mentioned in passing", 0);
        let title_score = score_document(&title_hit, &query, &settings.search, 0).unwrap();
        let body_score = score_document(&body_hit, &query, &settings.search, 0).unwrap();
        assert!(title_score.score >= body_score.score);
    }

    #[test]
    fn more_recent_document_scores_at_least_as_high() {
        let settings = Settings::default();
        let query = parse("project", &settings);
        let old = doc("project", "project", -30 * 86_400_000);
        let new = doc("project", "project", 0);
        let old_score = score_document(&old, &query, &settings.search, 0).unwrap();
        let new_score = score_document(&new, &query, &settings.search, 0).unwrap();
        assert!(new_score.score >= old_score.score);
    }

    #[test]
    fn tag_filter_rejects_non_matching_document() {
        let settings = Settings::default();
        let query = parse("tag:urgent project", &settings);
        let d = doc("project", "project", 0);
        assert!(score_document(&d, &query, &settings.search, 0).is_none());
    }

    #[test]
    fn field_restriction_narrows_scoring_to_one_field() {
        let settings = Settings::default();
        let query = parse("@ link", &settings);
        assert_eq!(query.filters.field, Some(FieldRestriction::Symbols));
        let d = doc("link", "link mentioned here too", 0);
        let result = score_document(&d, &query, &settings.search, 0).unwrap();
        assert!(result.spans.iter().all(|s| s.field == Field::Symbols));
    }

    #[test]
    fn score_is_never_negative() {
        let settings = Settings::default();
        let query = parse("zzzzz", &settings);
        let d = doc("unrelated", "nothing here", -10_000 * 86_400_000);
        if let Some(result) = score_document(&d, &query, &settings.search, 0) {
            assert!(result.score >= 0.0);
        }
    }
}
