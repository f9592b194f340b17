//! Delta cache for dead-letter queue message counts.
//!
//! # Data Flow
//! ```text
//! DLQ evaluator start
//!     → DlqCacheStore::load (once; missing file = empty mapping)
//!     → per matched queue: update mapping, DlqCacheStore::save (whole file)
//! ```
//!
//! # Design Decisions
//! - The store is injected into the evaluator, so the write-after-each-update
//!   contract is observable in tests
//! - The file is a bare `{"queue": count}` mapping with no version field
//! - Each save replaces the file through a rename, never leaving a torn file
//! - Entries of queues that vanished from the broker are kept
//! - No locking: concurrent runs against one file are last-writer-wins

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Last observed message count per dead-letter queue.
pub type DlqCounts = BTreeMap<String, i64>;

/// Directory below the cache base that holds the cache file.
pub const CACHE_SUBDIR: &str = "activemq-nagios-plugin";

/// Name of the cache file.
pub const CACHE_FILE: &str = "dlq-cache.json";

/// Errors that can occur while reading or writing the cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cache file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Persistent storage of DLQ counts.
pub trait DlqCacheStore: Send + Sync {
    /// Read the whole mapping.
    fn load(&self) -> Result<DlqCounts, CacheError>;

    /// Replace the whole mapping.
    fn save(&self, counts: &DlqCounts) -> Result<(), CacheError>;
}

/// JSON file store, one file per user and host.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
    file: PathBuf,
}

impl JsonFileStore {
    /// Store rooted at `base_dir` (e.g. `~/.cache`).
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        let dir = base_dir.as_ref().join(CACHE_SUBDIR);
        let file = dir.join(CACHE_FILE);
        Self { dir, file }
    }

    /// Store rooted at a user-supplied directory, expanding a leading `~`.
    pub fn from_setting(base_dir: &str) -> Self {
        Self::new(expand_home(base_dir))
    }

    pub fn path(&self) -> &Path {
        &self.file
    }

    fn io_error(&self, path: &Path) -> impl FnOnce(std::io::Error) -> CacheError {
        let path = path.to_path_buf();
        move |source| CacheError::Io { path, source }
    }
}

impl DlqCacheStore for JsonFileStore {
    fn load(&self) -> Result<DlqCounts, CacheError> {
        if !self.file.exists() {
            tracing::debug!(path = %self.file.display(), "No DLQ cache yet, starting empty");
            return Ok(DlqCounts::new());
        }

        let file = File::open(&self.file).map_err(self.io_error(&self.file))?;
        let counts: DlqCounts =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| CacheError::Corrupt {
                path: self.file.clone(),
                source,
            })?;

        tracing::debug!(entries = counts.len(), "Loaded DLQ cache");
        Ok(counts)
    }

    fn save(&self, counts: &DlqCounts) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir).map_err(self.io_error(&self.dir))?;

        let tmp = self.file.with_extension("json.tmp");
        {
            let file = File::create(&tmp).map_err(self.io_error(&tmp))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer(&mut writer, counts).map_err(|source| CacheError::Io {
                path: tmp.clone(),
                source: source.into(),
            })?;
            writer.flush().map_err(self.io_error(&tmp))?;
        }
        fs::rename(&tmp, &self.file).map_err(self.io_error(&self.file))?;

        tracing::trace!(entries = counts.len(), path = %self.file.display(), "Saved DLQ cache");
        Ok(())
    }
}

/// Expand a leading `~` to the current user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    let rest = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/")
    };

    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
