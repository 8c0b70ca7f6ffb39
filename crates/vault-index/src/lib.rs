//! Inverted index, scorer, two-phase indexer and file-watch coalescer for
//! the vault note search engine.
//!
//! [`Provider`] is the crate's entry point: it owns postings storage and
//! per-document metadata, and answers queries built by `vault-query`
//! against scoring rules configured by `vault-config`. [`VaultIndexer`]
//! drives the cold-start/lazy-body indexing pipeline that feeds it
//! [`Document`]s; [`EventCoalescer`] debounces live file-watch events for
//! callers that keep an index warm between cold starts.

#![warn(missing_docs)]

mod cache;
mod cancel;
mod coalescer;
mod document;
mod error;
mod indexer;
mod postings;
mod provider;
mod result;
mod scorer;

pub use cache::{FileCache, FileCacheEntry};
pub use cancel::CancellationToken;
pub use coalescer::{CoalescedAction, EventCoalescer, FileEvent};
pub use document::{Document, Field};
pub use error::IndexError;
pub use indexer::{IndexStats, ProgressReporter, SilentReporter, SourceFile, VaultIndexer};
pub use postings::{Posting, PostingsStore};
pub use provider::{Provider, QueryOptions, QueryOutcome, QueryStream, StreamEvent};
pub use result::{MatchSpan, SearchResult};
