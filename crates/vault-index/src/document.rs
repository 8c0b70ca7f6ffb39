//! The document record (§3) and the set of fields it exposes to search.
//!
//! Grounded on `ra-index/src/document.rs`'s `ChunkDocument` field-list-plus-
//! constructor style, adapted to the flat record this specification
//! defines: no chunk/parent/tree hierarchy, just the eight fields a single
//! note contributes to the index.

/// One of the six fields the scorer and postings store treat as searchable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Display title.
    Title,
    /// Heading strings extracted from the source.
    Headings,
    /// Folder path segments from the corpus root.
    Path,
    /// Tags.
    Tags,
    /// Link targets, block refs, code-fence labels.
    Symbols,
    /// Normalized body content.
    Body,
}

/// A single indexed document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Stable unique identifier (source path). Primary key.
    pub id: String,
    /// Display name.
    pub title: String,
    /// Ordered folder path segments from the corpus root, excluding the id.
    pub path: Vec<String>,
    /// Unordered set of tags.
    pub tags: Vec<String>,
    /// Ordered heading strings.
    pub headings: Vec<String>,
    /// Ordered link targets, block refs, and code-fence labels.
    pub symbols: Vec<String>,
    /// Full body content, possibly truncated to a configured byte cap.
    pub body: String,
    /// Last-modified timestamp, integer epoch milliseconds.
    pub mtime: i64,
    /// Byte length of the source.
    pub size: u64,
}

impl Document {
    /// The six fields scored and indexed, in the order the scorer sums them.
    pub const SEARCHABLE_FIELDS: [Field; 6] = [
        Field::Title,
        Field::Headings,
        Field::Path,
        Field::Tags,
        Field::Symbols,
        Field::Body,
    ];

    /// Returns the flattened text of a single field. Array-valued fields are
    /// joined with single spaces, per §4.4.
    pub fn field_text(&self, field: Field) -> String {
        match field {
            Field::Title => self.title.clone(),
            Field::Headings => self.headings.join(" "),
            Field::Path => self.path.join(" "),
            Field::Tags => self.tags.join(" "),
            Field::Symbols => self.symbols.join(" "),
            Field::Body => self.body.clone(),
        }
    }

    /// Returns all searchable fields concatenated with single spaces, used
    /// by the exclude-term rejection test.
    pub fn concatenated_text(&self) -> String {
        Self::SEARCHABLE_FIELDS
            .iter()
            .map(|&f| self.field_text(f))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Truncates `body` at `max_bytes`, snapping back to the nearest
    /// preceding UTF-8 character boundary so the result stays valid UTF-8.
    pub fn truncate_body(&mut self, max_bytes: usize) {
        if self.body.len() <= max_bytes {
            return;
        }
        let mut end = max_bytes;
        while end > 0 && !self.body.is_char_boundary(end) {
            end -= 1;
        }
        self.body.truncate(end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Document {
        Document {
            id: "note.md".into(),
            title: "Planning".into(),
            path: vec!["projects".into(), "work".into()],
            tags: vec!["todo".into()],
            headings: vec!["Overview".into()],
            symbols: vec!["[[link]]".into()],
            body: "some body text".into(),
            mtime: 0,
            size: 14,
        }
    }

    #[test]
    fn field_text_joins_array_fields_with_spaces() {
        let d = doc();
        assert_eq!(d.field_text(Field::Path), "projects work");
        assert_eq!(d.field_text(Field::Title), "Planning");
    }

    #[test]
    fn concatenated_text_includes_all_searchable_fields() {
        let d = doc();
        let all = d.concatenated_text();
        assert!(all.contains("Planning"));
        assert!(all.contains("projects"));
        assert!(all.contains("todo"));
        assert!(all.contains("some body text"));
    }

    #[test]
    fn truncate_body_snaps_to_char_boundary() {
        let mut d = doc();
        d.body = "a\u{00e9}bcdef".to_string(); // 'é' is 2 bytes
        d.truncate_body(2);
        assert!(d.body.len() <= 2);
        assert!(d.body.is_char_boundary(d.body.len()));
    }

    #[test]
    fn truncate_body_is_noop_under_cap() {
        let mut d = doc();
        let before = d.body.clone();
        d.truncate_body(1_000);
        assert_eq!(d.body, before);
    }
}
