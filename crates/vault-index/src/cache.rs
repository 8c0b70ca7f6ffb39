//! File cache persistence blob (§4.6): `{id -> {mtime, size}}`, used to skip
//! unchanged files across cold starts.
//!
//! Grounded on `ra-index/src/diff.rs`'s manifest/mtime comparison idiom,
//! collapsed to a flat map since this engine has no tree/path hierarchy to
//! track, serialized with `serde`/`serde_json` (the teacher's own
//! serialization stack).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::IndexError;

/// The recorded mtime/size for one previously indexed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCacheEntry {
    /// Last-modified timestamp, epoch milliseconds, as of the last index.
    pub mtime: i64,
    /// Byte size as of the last index.
    pub size: u64,
}

/// A persisted `{id -> mtime/size}` map, used by the indexer to decide
/// whether a file needs to be re-read on a cold start.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileCache(HashMap<String, FileCacheEntry>);

impl FileCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the recorded entry for `id`.
    pub fn get(&self, id: &str) -> Option<FileCacheEntry> {
        self.0.get(id).copied()
    }

    /// True if `id` is cached with exactly the given `mtime` and `size`.
    pub fn is_unchanged(&self, id: &str, mtime: i64, size: u64) -> bool {
        matches!(self.get(id), Some(entry) if entry.mtime == mtime && entry.size == size)
    }

    /// Records (or overwrites) the entry for `id`.
    pub fn record(&mut self, id: impl Into<String>, mtime: i64, size: u64) {
        self.0.insert(id.into(), FileCacheEntry { mtime, size });
    }

    /// Drops the entry for `id`, if any.
    pub fn remove(&mut self, id: &str) {
        self.0.remove(id);
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Serializes the cache to a JSON string.
    pub fn to_json(&self) -> Result<String, IndexError> {
        serde_json::to_string(self).map_err(IndexError::from)
    }

    /// Parses a previously serialized cache. An empty string yields an empty
    /// cache, so a missing cache file can be treated as "start fresh".
    pub fn from_json(raw: &str) -> Result<Self, IndexError> {
        if raw.trim().is_empty() {
            return Ok(Self::new());
        }
        serde_json::from_str(raw).map_err(IndexError::from)
    }
}
