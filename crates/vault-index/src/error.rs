//! Error types for the vault-index crate.
//!
//! Grounded on `ra-index/src/error.rs`'s `thiserror`-derived enum shape,
//! stripped of its Tantivy-specific constructors and given capacity and I/O
//! variants instead (§7).

use std::io;

use thiserror::Error;

/// Errors that can occur while maintaining or querying the index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// `upsert` would have exceeded the configured document cap.
    #[error("index capacity exceeded: {max_docs} documents already indexed")]
    CapacityExceeded {
        /// The configured corpus cap that was hit.
        max_docs: usize,
    },

    /// A source file could not be read during body extraction.
    #[error("failed to read {id}: {source}")]
    Read {
        /// The document id (source path) that failed to read.
        id: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The file-cache blob could not be serialized or deserialized.
    #[error("file cache (de)serialization failed: {0}")]
    Cache(#[from] serde_json::Error),
}

impl IndexError {
    /// Builds a [`IndexError::Read`] from a path id and I/O error.
    pub fn read(id: impl Into<String>, source: io::Error) -> Self {
        Self::Read {
            id: id.into(),
            source,
        }
    }
}
