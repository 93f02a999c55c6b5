//! Fixed-width record codec.
//!
//! ```text
//! [flag: u16 BE (0x0000 valid | 0x8000 deleted)][field 0 bytes]...[field n-1 bytes]
//! ```
//!
//! Every field occupies exactly its schema length. Values are stored
//! untrimmed and right-padded with spaces; longer values are cut to the
//! schema length without error.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

use crate::format::{Header, DELETED_RECORD, RECORD_PADDING, VALID_RECORD};
use crate::DataFileError;

/// One slot's contents.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    /// Tombstone flag. A deleted record keeps its slot and its bytes.
    pub deleted: bool,
    /// Raw field values in schema order, exactly as stored on disk.
    pub fields: Vec<Vec<u8>>,
}

impl Record {
    /// Builds a live record from caller-supplied values. `None` becomes an
    /// all-padding field when written.
    pub fn live<S: AsRef<str>>(values: &[Option<S>]) -> Self {
        Self {
            deleted: false,
            fields: values
                .iter()
                .map(|v| v.as_ref().map(|s| s.as_ref().as_bytes().to_vec()).unwrap_or_default())
                .collect(),
        }
    }

    /// Field `i` decoded as (lossy) UTF-8, padding included.
    #[must_use]
    pub fn field_str(&self, i: usize) -> Option<String> {
        self.fields
            .get(i)
            .map(|f| String::from_utf8_lossy(f).into_owned())
    }

    /// Field `i` with surrounding whitespace removed.
    #[must_use]
    pub fn trimmed(&self, i: usize) -> Option<String> {
        self.field_str(i).map(|s| s.trim().to_string())
    }

    /// The record as [`write_record`] would store it: each field cut to its
    /// schema width. Fields beyond the schema are dropped.
    #[must_use]
    pub fn fitted(&self, header: &Header) -> Self {
        Self {
            deleted: self.deleted,
            fields: self
                .fields
                .iter()
                .zip(&header.fields)
                .map(|(value, schema)| {
                    value[..value.len().min(usize::from(schema.length))].to_vec()
                })
                .collect(),
        }
    }

    /// Every field decoded as (lossy) UTF-8, padding included.
    #[must_use]
    pub fn to_strings(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|f| String::from_utf8_lossy(f).into_owned())
            .collect()
    }
}

/// Decodes one record from `r` using the field widths in `header`.
///
/// Fails with [`DataFileError::Corrupt`] when the flag is neither
/// [`VALID_RECORD`] nor [`DELETED_RECORD`].
pub fn read_record<R: Read>(r: &mut R, header: &Header) -> Result<Record, DataFileError> {
    let flag = r.read_u16::<BigEndian>()?;
    let deleted = match flag {
        VALID_RECORD => false,
        DELETED_RECORD => true,
        other => {
            return Err(DataFileError::Corrupt(format!(
                "invalid record flag {:#06x} (expected {:#06x} or {:#06x})",
                other, VALID_RECORD, DELETED_RECORD
            )))
        }
    };

    let mut fields = Vec::with_capacity(header.fields.len());
    for schema in &header.fields {
        let mut value = vec![0u8; usize::from(schema.length)];
        r.read_exact(&mut value)?;
        fields.push(value);
    }

    Ok(Record { deleted, fields })
}

/// Encodes `record` into `w`. Always writes exactly `header.record_len()`
/// bytes: missing trailing fields are written as padding and fields beyond
/// the schema are ignored.
pub fn write_record<W: Write>(w: &mut W, header: &Header, record: &Record) -> Result<(), DataFileError> {
    // Build the whole slot first so it reaches the file in a single write.
    let mut buf = Vec::with_capacity(header.record_len() as usize);
    buf.write_u16::<BigEndian>(if record.deleted {
        DELETED_RECORD
    } else {
        VALID_RECORD
    })?;

    for (i, schema) in header.fields.iter().enumerate() {
        let width = usize::from(schema.length);
        let value = record.fields.get(i).map(Vec::as_slice).unwrap_or(&[]);
        let take = value.len().min(width);
        buf.extend_from_slice(&value[..take]);
        buf.resize(buf.len() + (width - take), RECORD_PADDING);
    }

    w.write_all(&buf)?;
    Ok(())
}
