//! Case folding, diacritic stripping and word tokenization.
//!
//! Decomposition and combining-mark classification are delegated to
//! `unicode-normalization`; Letter/Number run detection for tokenization is
//! delegated to `unicode-segmentation`, so both hold for non-Latin scripts,
//! not just ASCII.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;
use unicode_segmentation::UnicodeSegmentation;

/// Lowercases `s` and, if `preserve_diacritics` is false, strips combining
/// marks after decomposing to canonical decomposed (NFD) form.
///
/// Idempotent: `normalize(normalize(x), p) == normalize(x, p)`. Preserves
/// string length when `preserve_diacritics` is true. Never panics.
pub fn normalize(s: &str, preserve_diacritics: bool) -> String {
    let lowered = s.to_lowercase();
    if preserve_diacritics {
        return lowered;
    }
    lowered.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// A token produced by [`tokenize`]: its normalized text plus the half-open
/// character range it occupies within the normalized string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Normalized token text.
    pub text: String,
    /// Start char offset (inclusive) within the normalized string.
    pub start: usize,
    /// End char offset (exclusive) within the normalized string.
    pub end: usize,
}

/// Normalizes `s` then splits it into maximal runs of Unicode Letter or
/// Number characters, in document order. May return an empty sequence.
pub fn tokenize(s: &str, preserve_diacritics: bool) -> Vec<Token> {
    let normalized = normalize(s, preserve_diacritics);
    let mut tokens = Vec::new();
    let mut char_pos = 0usize;
    let mut run_start: Option<usize> = None;
    let mut run = String::new();

    for grapheme in normalized.graphemes(true) {
        let is_word_char = grapheme
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric());
        if is_word_char {
            if run_start.is_none() {
                run_start = Some(char_pos);
            }
            run.push_str(grapheme);
        } else if let Some(start) = run_start.take() {
            tokens.push(Token {
                text: std::mem::take(&mut run),
                start,
                end: char_pos,
            });
        }
        char_pos += 1;
    }
    if let Some(start) = run_start {
        tokens.push(Token {
            text: run,
            start,
            end: char_pos,
        });
    }

    tokens
}
