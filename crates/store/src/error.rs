use std::path::PathBuf;
use std::time::Duration;

use datafile::DataFileError;
use lockmgr::LockTimeout;
use thiserror::Error;

/// Errors returned by [`Store`](crate::Store) operations.
///
/// Every failure goes back to the caller as-is. Nothing is retried.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The slot is out of range, or a write targeted a deleted record.
    #[error("record not found: {0}")]
    NotFound(String),

    /// `create` found a live record with the same key. Also raised when a
    /// key field is null.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    /// The cookie was not issued for this slot.
    #[error("cookie {cookie:#018x} does not grant access to record {slot}")]
    Unauthorized { slot: u32, cookie: u64 },

    /// The caller supplied the wrong number of fields.
    #[error("schema has {expected} fields but {actual} were supplied")]
    SchemaMismatch { expected: usize, actual: usize },

    /// Opening, reading, writing or closing the data file failed. When this
    /// comes from closing the file, the operation itself may already have
    /// been applied.
    #[error("storage failure: {0}")]
    Storage(#[from] DataFileError),

    /// A bounded `lock` ran out of time.
    #[error("timed out after {waited:?} waiting for lock on record {slot}")]
    LockTimeout { slot: u32, waited: Duration },

    /// The data file cannot back a store (missing, a directory, read-only).
    #[error("data file {} is unusable: {reason}", .path.display())]
    DataFileUnavailable { path: PathBuf, reason: String },

    /// A configured key position does not exist in the schema.
    #[error("key field {index} is outside the {field_count}-field schema")]
    InvalidKeyField { index: usize, field_count: usize },
}

impl From<LockTimeout> for StoreError {
    fn from(e: LockTimeout) -> Self {
        StoreError::LockTimeout {
            slot: e.slot,
            waited: e.waited,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
