//! Data file binary format constants and header read/write helpers.
//!
//! ## Header
//!
//! ```text
//! [magic: i32 BE][data_offset: i32 BE][field_count: u16 BE]
//! repeat field_count times:
//!     [name_len: u16 BE][name bytes][field_len: u16 BE]
//! ```
//!
//! Records start at `data_offset`. The header is written once when the file
//! is created and never changes afterwards.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::io::{Read, Seek, SeekFrom, Write};

use crate::DataFileError;

/// Tombstone flag value for a live record.
pub const VALID_RECORD: u16 = 0x0000;

/// Tombstone flag value for a deleted record.
pub const DELETED_RECORD: u16 = 0x8000;

/// Byte used to right-pad field values to their schema length.
pub const RECORD_PADDING: u8 = b' ';

/// Size of the per-record tombstone flag in bytes.
pub const FLAG_BYTES: u64 = 2;

/// Magic number written by default into newly created data files.
pub const DEFAULT_MAGIC: i32 = 0x0000_2020;

/// Fixed part of the header: 4 (`magic`) + 4 (`data_offset`) + 2 (`field_count`).
pub const HEADER_PREFIX_BYTES: u64 = 4 + 4 + 2;

/// Name and fixed byte width of one schema column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldSchema {
    pub name: String,
    pub length: u16,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, length: u16) -> Self {
        Self {
            name: name.into(),
            length,
        }
    }
}

impl fmt::Display for FieldSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.length)
    }
}

/// Parsed data file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Opaque file identifier. Not interpreted by the engine.
    pub magic: i32,
    /// Byte offset of slot 0.
    pub data_offset: i32,
    /// Schema columns, in on-disk order.
    pub fields: Vec<FieldSchema>,
}

impl Header {
    /// Builds a header whose records start immediately after the encoded
    /// header itself.
    pub fn new(magic: i32, fields: Vec<FieldSchema>) -> Self {
        let mut header = Self {
            magic,
            data_offset: 0,
            fields,
        };
        header.data_offset = header.encoded_len() as i32;
        header
    }

    /// Number of schema columns.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Bytes occupied by one slot: the 2-byte flag plus every field width.
    #[must_use]
    pub fn record_len(&self) -> u64 {
        FLAG_BYTES + self.fields.iter().map(|f| u64::from(f.length)).sum::<u64>()
    }

    /// Number of bytes [`write_header`] produces for this header.
    #[must_use]
    pub fn encoded_len(&self) -> u64 {
        HEADER_PREFIX_BYTES
            + self
                .fields
                .iter()
                .map(|f| 2 + f.name.len() as u64 + 2)
                .sum::<u64>()
    }

    /// Position of the column called `name`, if any.
    #[must_use]
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// `data_offset` as an unsigned byte position.
    pub(crate) fn data_start(&self) -> Result<u64, DataFileError> {
        u64::try_from(self.data_offset)
            .map_err(|_| DataFileError::Corrupt(format!("negative data offset {}", self.data_offset)))
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "magic={:#010x} data_offset={} record_len={} fields=[",
            self.magic,
            self.data_offset,
            self.record_len()
        )?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", field)?;
        }
        f.write_str("]")
    }
}

/// Reads the header from byte 0 of `r`.
///
/// A field count that claims more columns than the stream holds surfaces
/// as an I/O `UnexpectedEof`.
pub fn read_header<R: Read + Seek>(r: &mut R) -> Result<Header, DataFileError> {
    r.seek(SeekFrom::Start(0))?;
    let magic = r.read_i32::<BigEndian>()?;
    let data_offset = r.read_i32::<BigEndian>()?;
    let field_count = r.read_u16::<BigEndian>()?;

    if data_offset < 0 {
        return Err(DataFileError::Corrupt(format!(
            "negative data offset {}",
            data_offset
        )));
    }

    let mut fields = Vec::with_capacity(usize::from(field_count));
    for _ in 0..field_count {
        let name_len = r.read_u16::<BigEndian>()?;
        let mut name = vec![0u8; usize::from(name_len)];
        r.read_exact(&mut name)?;
        let length = r.read_u16::<BigEndian>()?;
        fields.push(FieldSchema {
            name: String::from_utf8_lossy(&name).into_owned(),
            length,
        });
    }

    Ok(Header {
        magic,
        data_offset,
        fields,
    })
}

/// Writes `header` at byte 0 of `w`.
pub fn write_header<W: Write + Seek>(w: &mut W, header: &Header) -> Result<(), DataFileError> {
    let field_count = u16::try_from(header.fields.len()).map_err(|_| {
        DataFileError::Corrupt(format!("too many fields: {}", header.fields.len()))
    })?;

    w.seek(SeekFrom::Start(0))?;
    w.write_i32::<BigEndian>(header.magic)?;
    w.write_i32::<BigEndian>(header.data_offset)?;
    w.write_u16::<BigEndian>(field_count)?;
    for field in &header.fields {
        let name = field.name.as_bytes();
        let name_len = u16::try_from(name.len()).map_err(|_| {
            DataFileError::Corrupt(format!("field name too long: {} bytes", name.len()))
        })?;
        w.write_u16::<BigEndian>(name_len)?;
        w.write_all(name)?;
        w.write_u16::<BigEndian>(field.length)?;
    }
    Ok(())
}
