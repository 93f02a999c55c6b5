//! # Store - Concurrent Record Store
//!
//! The orchestrator that ties the [`datafile`], [`lockmgr`] and [`matcher`]
//! crates into the operation set remote clients call.
//!
//! ## Architecture
//!
//! ```text
//! Client tasks (one per request)
//!   |
//!   v
//! ┌───────────────────────────────────────────────┐
//! │                    STORE                      │
//! │                                               │
//! │ read.rs   → open(Read) → seek → decode        │
//! │ write.rs  → validate → open(ReadWrite) → write│
//! │ locking.rs→ range check → LockManager         │
//! │                                               │
//! │ every call: own file handle, closed on exit   │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Module Responsibilities
//!
//! | Module         | Purpose                                             |
//! |----------------|-----------------------------------------------------|
//! | [`lib.rs`]     | `Store` struct, constructors, accessors, `Debug`    |
//! | [`error`]      | `StoreError` taxonomy                               |
//! | [`validate`]   | Per-call file handle, precondition checks           |
//! | [`read`]       | `read()`, `find()`, `find_with()`                   |
//! | [`write`]      | `create()`, `update()`, `delete()`                  |
//! | [`locking`]    | `lock()`, `lock_timeout()`, `unlock()`              |
//!
//! ## Concurrency
//!
//! Writers coordinate only through the in-memory lock table: `update` and
//! `delete` need a cookie from `lock`. Reads (`read`, `find`, the key scan
//! in `create`) take no lock and may observe a record mid-write. A second
//! process opening the same file bypasses all of this.
mod error;
mod locking;
mod read;
mod validate;
mod write;

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::StoreConfig;
use datafile::{DataFile, DataFileError, Header, Mode};
use lockmgr::LockManager;
use parking_lot::Mutex;
use tracing::info;

pub use error::{Result, StoreError};
pub use matcher::{ExactMatcher, PrefixMatcher, RecordMatcher};

/// A record store over one data file.
///
/// `Store` is `Send + Sync`; share it between request handlers with an
/// `Arc`. Every operation opens its own file handle and closes it before
/// returning, on success and on error alike.
pub struct Store {
    pub(crate) path: PathBuf,
    /// Schema positions that together form a record's unique key. They are
    /// never changed by `update`.
    pub(crate) key_fields: Vec<usize>,
    pub(crate) locks: LockManager,
    /// Serializes the "count slots, write at the end" step of `create` so
    /// two creates never claim the same slot.
    pub(crate) append: Mutex<()>,
    /// Applied by `lock` when set. `None` waits forever.
    pub(crate) lock_timeout: Option<Duration>,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("path", &self.path)
            .field("key_fields", &self.key_fields)
            .field("lock_timeout", &self.lock_timeout)
            .field("locks", &self.locks)
            .finish()
    }
}

impl Store {
    /// Opens a store over an existing data file.
    ///
    /// # Validation
    ///
    /// - `path` must exist, be a regular file, and be readable and writable.
    /// - The header must parse.
    /// - Every entry of `key_fields` must be a column of the schema.
    pub fn open<P: AsRef<Path>>(path: P, key_fields: Vec<usize>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let unavailable = |reason: String| StoreError::DataFileUnavailable {
            path: path.clone(),
            reason,
        };

        let meta = std::fs::metadata(&path).map_err(|e| unavailable(e.to_string()))?;
        if meta.is_dir() {
            return Err(unavailable("is a directory".into()));
        }
        if meta.permissions().readonly() {
            return Err(unavailable("cannot be written to".into()));
        }

        let mut df = DataFile::open(&path, Mode::ReadWrite).map_err(|e| match e {
            DataFileError::Io(io) => unavailable(io.to_string()),
            other => StoreError::Storage(other),
        })?;
        let header = df.header()?.clone();
        df.close()?;

        for &index in &key_fields {
            if index >= header.field_count() {
                return Err(StoreError::InvalidKeyField {
                    index,
                    field_count: header.field_count(),
                });
            }
        }

        info!(path = %path.display(), %header, ?key_fields, "opened record store");
        Ok(Self {
            path,
            key_fields,
            locks: LockManager::new(),
            append: Mutex::new(()),
            lock_timeout: None,
        })
    }

    /// Opens the store described by `cfg`, first creating the data file
    /// from `cfg.schema` if it does not exist yet.
    pub fn from_config(cfg: &StoreConfig) -> Result<Self> {
        if !cfg.data_path.exists() {
            if let Some(fields) = &cfg.schema {
                let header = Header::new(cfg.magic, fields.clone());
                DataFile::create(&cfg.data_path, &header)?.close()?;
                info!(path = %cfg.data_path.display(), %header, "created new data file");
            }
        }
        Ok(Self::open(&cfg.data_path, cfg.key_fields.clone())?.with_lock_timeout(cfg.lock_timeout))
    }

    /// Sets the wait limit applied by [`lock`](Store::lock).
    #[must_use]
    pub fn with_lock_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Path of the backing data file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Key column positions.
    #[must_use]
    pub fn key_fields(&self) -> &[usize] {
        &self.key_fields
    }

    /// Wait limit applied by [`lock`](Store::lock), if any.
    #[must_use]
    pub fn lock_timeout_default(&self) -> Option<Duration> {
        self.lock_timeout
    }

    /// The lock table, for inspection.
    #[must_use]
    pub fn lock_manager(&self) -> &LockManager {
        &self.locks
    }

    /// Reads the header from disk.
    pub fn header(&self) -> Result<Header> {
        self.with_file(Mode::Read, |df| Ok(df.header()?.clone()))
    }

    /// Number of slots, deleted ones included.
    pub fn record_count(&self) -> Result<u64> {
        self.with_file(Mode::Read, |df| Ok(df.length_in_records()?))
    }
}

#[cfg(test)]
mod tests;
