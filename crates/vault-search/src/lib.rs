//! vault: a local note search engine.
//!
//! Indexes a directory of markdown notes and exposes fuzzy, multi-field
//! search over titles, headings, paths, tags, link/code-fence symbols and
//! body text, with an optional regex post-filter and a recency bonus. The
//! engine itself lives in `vault-index`/`vault-query`/`vault-config`; this
//! crate is the command-line facade (`vault index`, `vault search`) that
//! walks a vault, drives the two-phase indexer, and renders results.

#![warn(missing_docs)]
