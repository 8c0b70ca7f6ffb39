//! Phrase and regex clause extraction over the raw query string.
//!
//! Grounded on `ra-query`'s `Lexer` (char-by-char scanning with explicit
//! position tracking) but shaped around this grammar's two extraction
//! passes rather than a generic token stream, since the query language here
//! has no parentheses, field-prefix colons or boost operators to tokenize.

use regex::RegexBuilder;

use crate::error::QueryError;

const REGEX_FLAG_CHARS: &str = "igmsuy";

/// Extracts all maximal, non-empty `"…"` substrings from `input` as phrases,
/// replacing each extracted phrase (quotes included) with a single space in
/// the returned residual. An unclosed quote, or a quote pair with an empty
/// interior, is left untouched in the residual.
pub fn extract_phrases(input: &str) -> (String, Vec<String>) {
    let chars: Vec<char> = input.chars().collect();
    let mut residual = String::new();
    let mut phrases = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '"' {
            residual.push(chars[i]);
            i += 1;
            continue;
        }

        match chars[i + 1..].iter().position(|&c| c == '"') {
            Some(rel_close) if rel_close > 0 => {
                let close = i + 1 + rel_close;
                let interior: String = chars[i + 1..close].iter().collect();
                phrases.push(interior);
                residual.push(' ');
                i = close + 1;
            }
            _ => {
                // Unclosed, or `""` with an empty interior: not a phrase.
                residual.push(chars[i]);
                i += 1;
            }
        }
    }

    (residual, phrases)
}

/// Extracts the first syntactic `/PATTERN/FLAGS?` clause from `input`, where
/// `PATTERN` is any non-empty run not containing an unescaped `/` and
/// `FLAGS` is zero or more characters from `{i,g,m,s,u,y}`. Compiles the
/// pattern (honoring `i`/`m`/`s` as inline flags) to validate it; an invalid
/// pattern is still removed from the residual but yields a [`QueryError`]
/// instead of a clause. Returns the residual with the clause (if any)
/// replaced by a single space, the validated clause, and an optional error.
pub fn extract_regex(
    input: &str,
) -> (
    String,
    Option<(String, String)>,
    Option<QueryError>,
) {
    let chars: Vec<char> = input.chars().collect();
    let Some(start) = chars.iter().position(|&c| c == '/') else {
        return (input.to_string(), None, None);
    };

    let mut i = start + 1;
    let mut pattern = String::new();
    let mut closed_at = None;
    while i < chars.len() {
        match chars[i] {
            '\\' if i + 1 < chars.len() => {
                pattern.push(chars[i]);
                pattern.push(chars[i + 1]);
                i += 2;
            }
            '/' => {
                closed_at = Some(i);
                break;
            }
            c => {
                pattern.push(c);
                i += 1;
            }
        }
    }

    let Some(close) = closed_at else {
        return (input.to_string(), None, None);
    };
    if pattern.is_empty() {
        return (input.to_string(), None, None);
    }

    let mut flags_end = close + 1;
    let mut flags = String::new();
    while flags_end < chars.len() && REGEX_FLAG_CHARS.contains(chars[flags_end]) {
        flags.push(chars[flags_end]);
        flags_end += 1;
    }

    let byte_start: usize = chars[..start].iter().map(|c| c.len_utf8()).sum();

    let mut builder = RegexBuilder::new(&pattern);
    builder
        .case_insensitive(flags.contains('i'))
        .multi_line(flags.contains('m'))
        .dot_matches_new_line(flags.contains('s'));

    let mut residual: String = chars[..start].iter().collect();
    residual.push(' ');
    residual.extend(chars[flags_end..].iter());

    match builder.build() {
        Ok(_) => (residual, Some((pattern, flags)), None),
        Err(e) => (residual, None, Some(QueryError::regex(e.to_string(), byte_start))),
    }
}
