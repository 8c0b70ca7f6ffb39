//! Two-phase, mobile-aware indexing pipeline (§4.6).
//!
//! Grounded on `ra-index/src/indexer.rs`'s `Indexer`/`IndexStats`/
//! `ProgressReporter`/`SilentReporter` shape, adapted from a single-pass,
//! manifest-diffed reindex into a two-phase pipeline: phase 1 does a
//! metadata-only cold scan and queues bodies for lazy loading, phase 2 is
//! pull-driven (`process_next_batch`) rather than run to completion, since
//! this engine has no background thread of its own to drive it.

use std::collections::VecDeque;

use vault_config::IndexerSettings;

use crate::cache::FileCache;
use crate::document::Document;
use crate::error::IndexError;

/// A producer of one indexable file's metadata and content, supplied by the
/// caller (the embedding application owns filesystem/vault access).
pub trait SourceFile {
    /// Stable unique identifier (source path).
    fn id(&self) -> &str;
    /// Display title.
    fn title(&self) -> &str;
    /// Ordered folder path segments from the corpus root.
    fn path_segments(&self) -> Vec<String>;
    /// Tags.
    fn tags(&self) -> Vec<String>;
    /// Heading strings.
    fn headings(&self) -> Vec<String>;
    /// Link targets, block refs, and code-fence labels.
    fn symbols(&self) -> Vec<String>;
    /// Last-modified timestamp, epoch milliseconds.
    fn mtime(&self) -> i64;
    /// Byte size.
    fn size(&self) -> u64;
    /// Reads the full body content. Only called in phase 2.
    fn read_body(&self) -> Result<String, IndexError>;

    /// Whether this file should be indexed at all, given the configured
    /// exclude-folder prefixes. A default based on [`SourceFile::path_segments`].
    fn should_index(&self, exclude_folders: &[String]) -> bool {
        let segments = self.path_segments();
        !exclude_folders
            .iter()
            .any(|excluded| segments.iter().any(|segment| segment == excluded))
    }
}

/// Statistics from one indexing pass.
#[derive(Debug, Clone, Default)]
pub struct IndexStats {
    /// Files newly queued in phase 1.
    pub files_queued: usize,
    /// Files skipped because an exclude-folder prefix matched.
    pub files_excluded: usize,
    /// Files whose cached mtime/size were unchanged, so they were skipped.
    pub files_unchanged: usize,
    /// Bodies successfully loaded across all phase-2 batches so far.
    pub bodies_loaded: usize,
    /// Files whose body failed to load (path, error message).
    pub read_errors: Vec<(String, String)>,
}

/// Reports indexing progress as the caller drives phase 1 and phase 2.
pub trait ProgressReporter {
    /// Called when a file is queued for phase 2.
    fn on_file_queued(&mut self, id: &str);
    /// Called when a file is skipped (excluded or unchanged).
    fn on_file_skipped(&mut self, id: &str, reason: &str);
    /// Called when a file's body is loaded successfully.
    fn on_body_loaded(&mut self, id: &str);
    /// Called when a file's body failed to load.
    fn on_body_error(&mut self, id: &str, error: &str);
    /// Called when a phase-2 batch completes.
    fn on_batch_done(&mut self, stats: &IndexStats);
}

/// A silent [`ProgressReporter`] for callers that don't need progress
/// feedback.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn on_file_queued(&mut self, _id: &str) {}
    fn on_file_skipped(&mut self, _id: &str, _reason: &str) {}
    fn on_body_loaded(&mut self, _id: &str) {}
    fn on_body_error(&mut self, _id: &str, _error: &str) {}
    fn on_batch_done(&mut self, _stats: &IndexStats) {}
}

/// Drives the two-phase indexing pipeline: a metadata-only cold scan
/// followed by pull-driven, lazy body loading.
pub struct VaultIndexer {
    settings: IndexerSettings,
    mobile: bool,
    cache: FileCache,
    queue: VecDeque<Box<dyn SourceFile>>,
    stats: IndexStats,
}

impl VaultIndexer {
    /// Creates an indexer for the given settings and host class.
    pub fn new(settings: IndexerSettings, mobile: bool, cache: FileCache) -> Self {
        Self {
            settings,
            mobile,
            cache,
            queue: VecDeque::new(),
            stats: IndexStats::default(),
        }
    }

    /// Phase 1: scans `files`, builds metadata-only [`Document`]s for every
    /// file that passes the exclude-folder filter and whose cached
    /// mtime/size changed, and queues them for phase-2 body loading.
    /// Returns the queued documents so the caller can upsert them into the
    /// index immediately (metadata is searchable before bodies load).
    pub fn begin_cold_index<R: ProgressReporter>(
        &mut self,
        files: Vec<Box<dyn SourceFile>>,
        exclude_folders: &[String],
        reporter: &mut R,
    ) -> Vec<Document> {
        let mut queued_docs = Vec::new();

        for file in files {
            if !file.should_index(exclude_folders) {
                self.stats.files_excluded += 1;
                reporter.on_file_skipped(file.id(), "excluded folder");
                continue;
            }
            if self.cache.is_unchanged(file.id(), file.mtime(), file.size()) {
                self.stats.files_unchanged += 1;
                reporter.on_file_skipped(file.id(), "unchanged");
                continue;
            }

            queued_docs.push(Document {
                id: file.id().to_string(),
                title: file.title().to_string(),
                path: file.path_segments(),
                tags: file.tags(),
                headings: file.headings(),
                symbols: file.symbols(),
                body: String::new(),
                mtime: file.mtime(),
                size: file.size(),
            });
            self.stats.files_queued += 1;
            reporter.on_file_queued(file.id());
            self.queue.push_back(file);
        }

        queued_docs
    }

    /// Phase 2, pull-driven: loads the next batch of bodies off the queue
    /// (sized per [`IndexerSettings::batch_size`] for the indexer's host
    /// class) and returns the updated documents, ready for the caller to
    /// re-upsert with full body content. Returns an empty vec once the
    /// queue is drained.
    pub fn process_next_batch<R: ProgressReporter>(&mut self, reporter: &mut R) -> Vec<Document> {
        let batch_size = self.settings.batch_size(self.mobile);
        let mut loaded = Vec::new();

        for _ in 0..batch_size {
            let Some(file) = self.queue.pop_front() else {
                break;
            };

            match file.read_body() {
                Ok(mut body) => {
                    if body.len() > self.settings.max_body_bytes {
                        let mut end = self.settings.max_body_bytes;
                        while end > 0 && !body.is_char_boundary(end) {
                            end -= 1;
                        }
                        body.truncate(end);
                    }
                    self.cache.record(file.id(), file.mtime(), file.size());
                    self.stats.bodies_loaded += 1;
                    reporter.on_body_loaded(file.id());
                    loaded.push(Document {
                        id: file.id().to_string(),
                        title: file.title().to_string(),
                        path: file.path_segments(),
                        tags: file.tags(),
                        headings: file.headings(),
                        symbols: file.symbols(),
                        body,
                        mtime: file.mtime(),
                        size: file.size(),
                    });
                }
                Err(err) => {
                    self.stats.read_errors.push((file.id().to_string(), err.to_string()));
                    reporter.on_body_error(file.id(), &err.to_string());
                }
            }
        }

        reporter.on_batch_done(&self.stats);
        loaded
    }

    /// Live, single-file update path (§4.7): unlike the cold-start pipeline,
    /// this reads the body immediately rather than queuing it for the lazy
    /// pass, since a live edit should be searchable right away. Returns
    /// `Ok(None)` without touching `file` at all when the cached mtime/size
    /// already match — the change-driven skip the spec names
    /// `upsert_if_changed`.
    pub fn upsert_if_changed(&mut self, file: &dyn SourceFile) -> Result<Option<Document>, IndexError> {
        if self.cache.is_unchanged(file.id(), file.mtime(), file.size()) {
            return Ok(None);
        }
        Ok(Some(self.load_full_document(file)?))
    }

    /// Handles a coalesced rename (§4.7): drops the old id's cache entry and
    /// unconditionally loads the full document under the new id. A rename is
    /// an identity change, not a content change, so the mtime/size
    /// comparison `upsert_if_changed` relies on does not apply here — the
    /// caller is expected to `remove(old_id)` from the provider and upsert
    /// the returned document under `file.id()`.
    pub fn rename(&mut self, old_id: &str, file: &dyn SourceFile) -> Result<Document, IndexError> {
        self.cache.remove(old_id);
        self.load_full_document(file)
    }

    /// Reads `file`'s body, truncates it to the configured cap, records the
    /// file cache entry, and assembles the full [`Document`].
    fn load_full_document(&mut self, file: &dyn SourceFile) -> Result<Document, IndexError> {
        let mut body = file.read_body()?;
        if body.len() > self.settings.max_body_bytes {
            let mut end = self.settings.max_body_bytes;
            while end > 0 && !body.is_char_boundary(end) {
                end -= 1;
            }
            body.truncate(end);
        }
        self.cache.record(file.id(), file.mtime(), file.size());
        Ok(Document {
            id: file.id().to_string(),
            title: file.title().to_string(),
            path: file.path_segments(),
            tags: file.tags(),
            headings: file.headings(),
            symbols: file.symbols(),
            body,
            mtime: file.mtime(),
            size: file.size(),
        })
    }

    /// Inter-batch delay, in milliseconds, for the indexer's host class.
    pub fn batch_delay_ms(&self) -> u64 {
        self.settings.batch_delay_ms(self.mobile)
    }

    /// Number of files still queued for phase-2 body loading.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Cumulative statistics across every phase-1 scan and phase-2 batch.
    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    /// Read access to the file cache, for persisting between runs.
    pub fn cache(&self) -> &FileCache {
        &self.cache
    }
}
