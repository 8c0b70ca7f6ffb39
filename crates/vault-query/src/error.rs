//! Non-fatal parse errors.
//!
//! Parsing never fails outright (see [`crate::parse`]); the only thing that
//! can go wrong is the regex clause, and that failure is carried alongside
//! the returned query rather than surfaced through `Result::Err`.

use thiserror::Error;

/// The kind of non-fatal error a parse can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QueryErrorKind {
    /// The `/PATTERN/FLAGS` clause failed to compile.
    #[error("regex")]
    Regex,
}

/// A single non-fatal error produced while parsing a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message} (byte offset {position})")]
pub struct QueryError {
    /// The category of error.
    pub kind: QueryErrorKind,
    /// Human-readable detail, typically the underlying compile error.
    pub message: String,
    /// Byte offset within the raw input where the offending clause started.
    pub position: usize,
}

impl QueryError {
    /// Builds a regex-clause error.
    pub fn regex(message: impl Into<String>, position: usize) -> Self {
        Self {
            kind: QueryErrorKind::Regex,
            message: message.into(),
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regex_error_display_includes_position() {
        let err = QueryError::regex("unclosed character class", 12);
        let display = err.to_string();
        assert!(display.contains("regex"));
        assert!(display.contains("12"));
    }
}
