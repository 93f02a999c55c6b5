//! # Datafile - Fixed-Schema Record File
//!
//! The on-disk layer of the record store: a single file holding a binary
//! header followed by fixed-size record slots.
//!
//! ## File layout
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │ HEADER (written once, immutable)                              │
//! │                                                               │
//! │ magic (i32) | data_offset (i32) | field_count (u16)           │
//! │ field_count × [ name_len (u16) | name | field_len (u16) ]     │
//! ├───────────────────────────────────────────────────────────────┤  ← data_offset
//! │ SLOT 0                                                        │
//! │                                                               │
//! │ flag (u16: 0x0000 valid, 0x8000 deleted)                      │
//! │ field 0 (field_len bytes, space padded) ... field n-1         │
//! ├───────────────────────────────────────────────────────────────┤
//! │ SLOT 1 ...                                                    │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! All integers are big-endian. Slot `n` lives at
//! `data_offset + n * record_len` where `record_len = 2 + Σ field_len`.
//! Slots are never reused or compacted: deleting a record only flips its
//! flag.
//!
//! ## Example
//!
//! ```rust,no_run
//! use datafile::{DataFile, FieldSchema, Header, Mode, Record, DEFAULT_MAGIC};
//!
//! let header = Header::new(
//!     DEFAULT_MAGIC,
//!     vec![FieldSchema::new("name", 8), FieldSchema::new("city", 8)],
//! );
//! let mut df = DataFile::create("people.db", &header).unwrap();
//! df.write_record(&Record::live(&[Some("ann"), Some("nyc")])).unwrap();
//! df.close().unwrap();
//!
//! let mut df = DataFile::open("people.db", Mode::Read).unwrap();
//! df.seek_record(0).unwrap();
//! println!("{:?}", df.next_record().unwrap().to_strings());
//! ```

mod file;
mod format;
mod record;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub use file::{copy_data_file, DataFile, Mode, Records};
pub use format::{
    read_header, write_header, FieldSchema, Header, DEFAULT_MAGIC, DELETED_RECORD, FLAG_BYTES,
    HEADER_PREFIX_BYTES, RECORD_PADDING, VALID_RECORD,
};
pub use record::{read_record, write_record, Record};

/// Errors that can occur while reading or writing a data file.
#[derive(Debug, Error)]
pub enum DataFileError {
    /// An underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The file content does not follow the format (bad record flag,
    /// negative offset, oversized header field).
    #[error("corrupt data file: {0}")]
    Corrupt(String),

    /// The data file does not exist.
    #[error("data file not found: {}", .0.display())]
    NoSuchFile(PathBuf),

    /// A copy was asked to overwrite its own source.
    #[error("cannot copy data file onto itself: {}", .0.display())]
    SameFile(PathBuf),
}

#[cfg(test)]
mod tests;
