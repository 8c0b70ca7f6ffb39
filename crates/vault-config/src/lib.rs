//! Settings for the vault note search engine.
//!
//! Unlike a config file discovery system, this crate holds no notion of a
//! directory tree to walk: the host loads (or defaults) a single [`Settings`]
//! value and hands it to the parser, scorer, provider and indexer. The only
//! filesystem-facing operation this crate offers is parsing a settings blob
//! the host has already read from wherever it keeps one.

#![warn(missing_docs)]

mod error;

use std::fs;
use std::path::Path;

pub use error::ConfigError;
use serde::{Deserialize, Serialize};

// =============================================================================
// Default value constants
//
// Public so callers (e.g. a CLI's `--help` text) can reference them directly,
// keeping documentation in sync with the defaults actually wired below.
// =============================================================================

/// Default: treat a leading prefix character as commands mode.
pub const DEFAULT_ENABLE_PREFIX: bool = true;
/// Default commands-mode prefix character.
pub const DEFAULT_PREFIX_CHAR: char = '>';

/// Default: preserve diacritics rather than folding them away.
pub const DEFAULT_PRESERVE_DIACRITICS: bool = true;
/// Default cap on documents inspected for the regex post-filter.
pub const DEFAULT_REGEX_CANDIDATE_K: usize = 300;
/// Default: exclude fenced code content from the indexed body.
pub const DEFAULT_INCLUDE_CODE_BLOCKS: bool = false;

/// Default scorer weight for the title field.
pub const DEFAULT_WEIGHT_TITLE: f64 = 4.0;
/// Default scorer weight for the headings field.
pub const DEFAULT_WEIGHT_HEADINGS: f64 = 2.0;
/// Default scorer weight for the path field.
pub const DEFAULT_WEIGHT_PATH: f64 = 1.5;
/// Default scorer weight for the tags field.
pub const DEFAULT_WEIGHT_TAGS: f64 = 1.5;
/// Default scorer weight for the symbols field.
pub const DEFAULT_WEIGHT_SYMBOLS: f64 = 1.5;
/// Default scorer weight for the body field.
pub const DEFAULT_WEIGHT_BODY: f64 = 1.0;
/// Default scorer weight for the recency bonus.
pub const DEFAULT_WEIGHT_RECENCY: f64 = 0.5;
/// Default half-life, in days, for the recency bonus to decay by half.
pub const DEFAULT_RECENCY_HALF_LIFE_DAYS: f64 = 30.0;

/// Default per-document body cap, in bytes (2 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;
/// Default corpus cap.
pub const DEFAULT_MAX_DOCS: usize = 50_000;
/// Default phase-2 lazy body batch size.
pub const DEFAULT_BATCH_SIZE: usize = 10;
/// Default phase-2 batch size on mobile hosts.
pub const DEFAULT_BATCH_SIZE_MOBILE: usize = 5;
/// Default delay between phase-2 batches, in milliseconds.
pub const DEFAULT_BATCH_DELAY_MS: u64 = 50;
/// Default delay between phase-2 batches on mobile hosts, in milliseconds.
pub const DEFAULT_BATCH_DELAY_MS_MOBILE: u64 = 100;

/// Default event-coalescer re-arm delay, in milliseconds.
pub const DEFAULT_COALESCER_DEBOUNCE_MS: u64 = 500;

/// Top-level settings for the vault note search engine.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Commands-mode settings.
    pub commands: CommandsSettings,
    /// Search (parser + scorer + provider) settings.
    pub search: SearchSettings,
    /// Indexer settings.
    pub indexer: IndexerSettings,
    /// Event-coalescer settings.
    pub coalescer: CoalescerSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            commands: CommandsSettings::default(),
            search: SearchSettings::default(),
            indexer: IndexerSettings::default(),
            coalescer: CoalescerSettings::default(),
        }
    }
}

impl Settings {
    /// Parses settings from a TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serializes settings to a TOML string.
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).expect("settings serialization should not fail")
    }

    /// Reads and parses a settings file, wrapping I/O and parse failures
    /// into [`ConfigError`] with the path attached for the caller to report.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Commands-mode settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CommandsSettings {
    /// Whether a leading prefix character switches the query to commands mode.
    pub enable_prefix: bool,
    /// The prefix character.
    pub prefix_char: char,
}

impl Default for CommandsSettings {
    fn default() -> Self {
        Self {
            enable_prefix: DEFAULT_ENABLE_PREFIX,
            prefix_char: DEFAULT_PREFIX_CHAR,
        }
    }
}

/// Per-field scorer weights, see [`SearchSettings::weights`].
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct ScorerWeights {
    /// Weight for the title field.
    pub title: f64,
    /// Weight for the headings field.
    pub headings: f64,
    /// Weight for the path field.
    pub path: f64,
    /// Weight for the tags field.
    pub tags: f64,
    /// Weight for the symbols field.
    pub symbols: f64,
    /// Weight for the body field.
    pub body: f64,
    /// Weight for the recency bonus.
    pub recency: f64,
}

impl Default for ScorerWeights {
    fn default() -> Self {
        Self {
            title: DEFAULT_WEIGHT_TITLE,
            headings: DEFAULT_WEIGHT_HEADINGS,
            path: DEFAULT_WEIGHT_PATH,
            tags: DEFAULT_WEIGHT_TAGS,
            symbols: DEFAULT_WEIGHT_SYMBOLS,
            body: DEFAULT_WEIGHT_BODY,
            recency: DEFAULT_WEIGHT_RECENCY,
        }
    }
}

/// Search-related settings: normalization, scoring and the regex post-filter.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchSettings {
    /// If false, diacritics are folded away in normalization and matching.
    pub preserve_diacritics: bool,
    /// Cap on documents inspected for the regex post-filter.
    pub regex_candidate_k: usize,
    /// Whether fenced code content is included in the indexed body.
    pub include_code_blocks: bool,
    /// Folder path prefixes to skip during indexing.
    pub exclude_folders: Vec<String>,
    /// Scorer field weights.
    pub weights: ScorerWeights,
    /// Days for the recency bonus to decay by half.
    pub recency_half_life_days: f64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            preserve_diacritics: DEFAULT_PRESERVE_DIACRITICS,
            regex_candidate_k: DEFAULT_REGEX_CANDIDATE_K,
            include_code_blocks: DEFAULT_INCLUDE_CODE_BLOCKS,
            exclude_folders: Vec::new(),
            weights: ScorerWeights::default(),
            recency_half_life_days: DEFAULT_RECENCY_HALF_LIFE_DAYS,
        }
    }
}

/// Indexer settings: document caps and lazy body-pass batching.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IndexerSettings {
    /// Per-document body cap, in bytes.
    pub max_body_bytes: usize,
    /// Corpus cap.
    pub max_docs: usize,
    /// Phase-2 lazy body batch size.
    pub batch_size: usize,
    /// Phase-2 batch size on mobile hosts.
    pub batch_size_mobile: usize,
    /// Delay between phase-2 batches, in milliseconds.
    pub batch_delay_ms: u64,
    /// Delay between phase-2 batches on mobile hosts, in milliseconds.
    pub batch_delay_ms_mobile: u64,
}

impl IndexerSettings {
    /// Returns the batch size to use, given whether the host is mobile.
    pub fn batch_size(&self, mobile: bool) -> usize {
        if mobile {
            self.batch_size_mobile
        } else {
            self.batch_size
        }
    }

    /// Returns the inter-batch delay to use, given whether the host is mobile.
    pub fn batch_delay_ms(&self, mobile: bool) -> u64 {
        if mobile {
            self.batch_delay_ms_mobile
        } else {
            self.batch_delay_ms
        }
    }
}

impl Default for IndexerSettings {
    fn default() -> Self {
        Self {
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            max_docs: DEFAULT_MAX_DOCS,
            batch_size: DEFAULT_BATCH_SIZE,
            batch_size_mobile: DEFAULT_BATCH_SIZE_MOBILE,
            batch_delay_ms: DEFAULT_BATCH_DELAY_MS,
            batch_delay_ms_mobile: DEFAULT_BATCH_DELAY_MS_MOBILE,
        }
    }
}

/// Event-coalescer settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CoalescerSettings {
    /// Re-arm delay for the pending-change timer, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for CoalescerSettings {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_COALESCER_DEBOUNCE_MS,
        }
    }
}
