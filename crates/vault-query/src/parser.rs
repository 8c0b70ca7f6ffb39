//! Single-pass, total query parsing (see [`crate::parse`]).
//!
//! Grounded on `ra-query`'s old `parser.rs` for its helper-method
//! decomposition (small focused private functions) but implements a
//! different grammar entirely: a flat classification pass over whitespace
//! tokens rather than recursive-descent precedence climbing, since this
//! query language has no parentheses or boost operators.

use vault_config::Settings;

use crate::token::{extract_phrases, extract_regex};
use crate::types::{FieldRestriction, ParsedQuery, QueryMode, RegexClause};

/// Parses `raw` into a structured query. Never fails: malformed input
/// degrades gracefully and any regex-compile failure is recorded in the
/// returned query's `errors` rather than returned as an `Err`.
pub fn parse(raw: &str, settings: &Settings) -> ParsedQuery {
    let mut query = ParsedQuery {
        raw: raw.to_string(),
        ..ParsedQuery::default()
    };

    let trimmed = raw.trim();
    if settings.commands.enable_prefix {
        if let Some(rest) = trimmed.strip_prefix(settings.commands.prefix_char) {
            let rest = rest.trim();
            if !rest.is_empty() {
                query.mode = QueryMode::Commands;
                query.terms.push(rest.to_string());
                return query;
            }
        }
    }

    let (residual, phrases) = extract_phrases(raw);
    query.phrases = phrases;

    let (residual, regex_clause, regex_error) = extract_regex(&residual);
    if let Some((source, flags)) = regex_clause {
        query.regex = Some(RegexClause { source, flags });
    }
    query.errors.extend(regex_error);

    let mut ordinary_items = Vec::new();
    for token in residual.split_whitespace() {
        classify_token(token, &mut query, &mut ordinary_items);
    }

    let (terms, or_groups) = resolve_disjunction(ordinary_items);
    query.terms = terms;
    query.or_groups = or_groups;

    query
}

/// Same as [`parse`]: the spec names both, but errors are already carried
/// inline on the returned query so there is nothing extra to surface here.
pub fn parse_with_errors(raw: &str, settings: &Settings) -> ParsedQuery {
    parse(raw, settings)
}

/// An ordinary term or an `OR` marker, in residual-token order. Filters,
/// tags, excludes and field restrictions are classified directly into the
/// query and do not participate in this sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
enum OrdinaryItem {
    Term(String),
    Or,
}

/// Classifies one whitespace-delimited token, mutating `query` directly for
/// filters/tags/excludes/field-restrictions, or appending to `items` for
/// ordinary terms and `OR` markers.
fn classify_token(token: &str, query: &mut ParsedQuery, items: &mut Vec<OrdinaryItem>) {
    if token == "#" {
        query.filters.field = Some(FieldRestriction::Headings);
        return;
    }
    if token == "@" {
        query.filters.field = Some(FieldRestriction::Symbols);
        return;
    }
    if let Some(tag) = token.strip_prefix('#') {
        if !tag.is_empty() {
            query.filters.tag.push(tag.to_string());
            return;
        }
    }
    if let Some(value) = token.strip_prefix("tag:") {
        if !value.is_empty() {
            query.filters.tag.push(value.to_string());
            return;
        }
    }
    if let Some(value) = token.strip_prefix("path:") {
        if !value.is_empty() {
            query.filters.path.push(value.to_string());
            return;
        }
    }
    if let Some(value) = token.strip_prefix("in:") {
        if !value.is_empty() {
            query.filters.in_.push(value.to_string());
            return;
        }
    }
    if let Some(term) = token.strip_prefix('-') {
        if !term.is_empty() {
            query.excludes.push(term.to_string());
            return;
        }
    }
    if token.eq_ignore_ascii_case("or") {
        items.push(OrdinaryItem::Or);
        return;
    }
    items.push(OrdinaryItem::Term(token.to_string()));
}

/// Resolves `OR` markers against the surrounding ordinary terms: an `OR`
/// pops the preceding term into a new group, absorbs subsequent
/// `OR`-joined terms, and collapses back to a plain term if the resulting
/// group never reaches size 2. Leading, trailing and consecutive `OR`s are
/// otherwise ignored.
fn resolve_disjunction(items: Vec<OrdinaryItem>) -> (Vec<String>, Vec<Vec<String>>) {
    let mut terms = Vec::new();
    let mut or_groups = Vec::new();
    let mut i = 0;

    while i < items.len() {
        match &items[i] {
            OrdinaryItem::Or => i += 1,
            OrdinaryItem::Term(first) => {
                if matches!(items.get(i + 1), Some(OrdinaryItem::Or)) {
                    let mut group = vec![first.clone()];
                    let mut j = i + 1;
                    while matches!(items.get(j), Some(OrdinaryItem::Or)) {
                        j += 1;
                        if let Some(OrdinaryItem::Term(next)) = items.get(j) {
                            group.push(next.clone());
                            j += 1;
                        }
                    }
                    if group.len() >= 2 {
                        or_groups.push(group);
                    } else {
                        terms.extend(group);
                    }
                    i = j;
                } else {
                    terms.push(first.clone());
                    i += 1;
                }
            }
        }
    }

    (terms, or_groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings::default()
    }

    #[test]
    fn worked_scenario_one() {
        let q = parse(r#"tag:work "exact phrase" -exclude /pat/i @ test"#, &settings());
        assert_eq!(q.terms, vec!["test"]);
        assert_eq!(q.phrases, vec!["exact phrase"]);
        assert_eq!(q.excludes, vec!["exclude"]);
        assert_eq!(q.filters.tag, vec!["work"]);
        assert_eq!(q.filters.field, Some(FieldRestriction::Symbols));
        assert_eq!(
            q.regex,
            Some(RegexClause {
                source: "pat".into(),
                flags: "i".into(),
            })
        );
        assert!(q.or_groups.is_empty());
        assert!(q.errors.is_empty());
    }

    #[test]
    fn commands_mode_short_circuits_all_other_syntax() {
        let q = parse(">reindex vault -x tag:work", &settings());
        assert_eq!(q.mode, QueryMode::Commands);
        assert_eq!(q.terms, vec!["reindex vault -x tag:work"]);
        assert!(q.phrases.is_empty());
        assert!(q.filters.tag.is_empty());
    }

    #[test]
    fn empty_commands_prefix_falls_back_to_files_mode() {
        let q = parse(">", &settings());
        assert_eq!(q.mode, QueryMode::Files);
    }

    #[test]
    fn or_group_collects_adjacent_terms() {
        let q = parse("meeting OR research", &settings());
        assert_eq!(
            q.or_groups,
            vec![vec!["meeting".to_string(), "research".to_string()]]
        );
        assert!(q.terms.is_empty());
    }

    #[test]
    fn three_way_or_group() {
        let q = parse("a OR b OR c", &settings());
        assert_eq!(
            q.or_groups,
            vec![vec!["a".to_string(), "b".to_string(), "c".to_string()]]
        );
    }

    #[test]
    fn leading_and_trailing_or_are_ignored() {
        let q = parse("OR solo OR", &settings());
        assert_eq!(q.terms, vec!["solo"]);
        assert!(q.or_groups.is_empty());
    }

    #[test]
    fn consecutive_or_tokens_are_collapsed() {
        let q = parse("a OR OR b", &settings());
        assert_eq!(q.or_groups, vec![vec!["a".to_string(), "b".to_string()]]);
    }

    #[test]
    fn determinism() {
        let raw = r#"tag:work "x" -y /z/ OR a OR b"#;
        let first = parse(raw, &settings());
        let second = parse(raw, &settings());
        assert_eq!(first, second);
    }

    #[test]
    fn invalid_regex_leaves_query_usable() {
        let q = parse("term /[/i", &settings());
        assert_eq!(q.terms, vec!["term"]);
        assert!(q.regex.is_none());
        assert_eq!(q.errors.len(), 1);
    }

    #[test]
    fn empty_query_has_no_positive_constraints() {
        let q = parse("", &settings());
        assert!(q.is_empty_query());
    }

    #[test]
    fn only_excludes_has_no_positive_constraints() {
        let q = parse("-spam -junk", &settings());
        assert_eq!(q.excludes, vec!["spam", "junk"]);
        assert!(q.is_empty_query());
    }
}
