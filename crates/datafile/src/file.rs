use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::format::{read_header, write_header, Header};
use crate::record::{read_record, write_record, Record};
use crate::DataFileError;

/// How a [`DataFile`] handle is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Read,
    ReadWrite,
}

/// Random-access handle over a data file.
///
/// A handle is meant to live for a single logical operation: open, seek,
/// read or write a few records, [`close`](DataFile::close). Nothing here
/// coordinates concurrent writers; that is the lock manager's job.
///
/// The parsed header is cached on first use. [`clear_cached_header`]
/// forces the next access to re-read it from disk.
///
/// [`clear_cached_header`]: DataFile::clear_cached_header
pub struct DataFile {
    path: PathBuf,
    file: File,
    mode: Mode,
    header: Option<Header>,
}

impl std::fmt::Debug for DataFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataFile")
            .field("path", &self.path)
            .field("mode", &self.mode)
            .field("header_cached", &self.header.is_some())
            .finish()
    }
}

impl DataFile {
    /// Opens an existing data file.
    ///
    /// Returns [`DataFileError::NoSuchFile`] if `path` does not exist.
    pub fn open<P: AsRef<Path>>(path: P, mode: Mode) -> Result<Self, DataFileError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(mode == Mode::ReadWrite)
            .open(&path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => DataFileError::NoSuchFile(path.clone()),
                _ => DataFileError::Io(e),
            })?;
        trace!(path = %path.display(), ?mode, "opened data file");
        Ok(Self {
            path,
            file,
            mode,
            header: None,
        })
    }

    /// Creates (or truncates) a data file and writes `header` to it.
    ///
    /// The returned handle is open for writing and positioned at slot 0.
    pub fn create<P: AsRef<Path>>(path: P, header: &Header) -> Result<Self, DataFileError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        let mut df = Self {
            path,
            file,
            mode: Mode::ReadWrite,
            header: None,
        };
        df.write_header(header)?;
        df.set_record_length(0)?;
        df.seek_record(0)?;
        debug!(path = %df.path.display(), %header, "created data file");
        Ok(df)
    }

    /// Path this handle was opened from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Mode this handle was opened with.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the header, reading and caching it on first use.
    pub fn header(&mut self) -> Result<&Header, DataFileError> {
        let (_, header) = self.parts()?;
        Ok(header)
    }

    /// Replaces the cached header without touching the file.
    pub fn set_header(&mut self, header: Header) {
        self.header = Some(header);
    }

    /// Drops the cached header; the next access re-reads it from disk.
    pub fn clear_cached_header(&mut self) {
        self.header = None;
    }

    /// Reads the header from byte 0, bypassing (and not updating) the cache.
    pub fn read_header(&mut self) -> Result<Header, DataFileError> {
        read_header(&mut self.file)
    }

    /// Writes `header` at byte 0 and caches it.
    pub fn write_header(&mut self, header: &Header) -> Result<(), DataFileError> {
        write_header(&mut self.file, header)?;
        self.header = Some(header.clone());
        Ok(())
    }

    /// Positions the handle at the start of slot `slot`.
    pub fn seek_record(&mut self, slot: u32) -> Result<(), DataFileError> {
        let (file, header) = self.parts()?;
        let pos = header.data_start()? + u64::from(slot) * header.record_len();
        file.seek(SeekFrom::Start(pos))?;
        Ok(())
    }

    /// Reads the record at the current position and advances past it.
    pub fn next_record(&mut self) -> Result<Record, DataFileError> {
        let (file, header) = self.parts()?;
        let mut buf = vec![0u8; header.record_len() as usize];
        file.read_exact(&mut buf)?;
        read_record(&mut buf.as_slice(), header)
    }

    /// Writes `record` at the current position and advances past it.
    pub fn write_record(&mut self, record: &Record) -> Result<(), DataFileError> {
        let (file, header) = self.parts()?;
        write_record(file, header, record)
    }

    /// Current byte position.
    pub fn position(&mut self) -> Result<u64, DataFileError> {
        Ok(self.file.stream_position()?)
    }

    /// File size in bytes.
    pub fn len(&self) -> Result<u64, DataFileError> {
        Ok(self.file.metadata()?.len())
    }

    /// `true` if the file holds no bytes at all.
    pub fn is_empty(&self) -> Result<bool, DataFileError> {
        Ok(self.len()? == 0)
    }

    /// `true` while any byte remains after the current position.
    pub fn has_more_data(&mut self) -> Result<bool, DataFileError> {
        Ok(self.position()? < self.len()?)
    }

    /// `true` while a complete record remains after the current position.
    pub fn has_more_records(&mut self) -> Result<bool, DataFileError> {
        let record_len = self.header()?.record_len();
        Ok(self.position()? + record_len <= self.len()?)
    }

    /// Number of complete slots in the file. A trailing partial slot is not
    /// counted.
    pub fn length_in_records(&mut self) -> Result<u64, DataFileError> {
        let len = self.len()?;
        let header = self.header()?;
        let start = header.data_start()?;
        Ok(len.saturating_sub(start) / header.record_len())
    }

    /// Grows or truncates the file to hold exactly `total` slots. The bytes
    /// of a grown region are unspecified.
    pub fn set_record_length(&mut self, total: u64) -> Result<(), DataFileError> {
        let (file, header) = self.parts()?;
        file.set_len(header.data_start()? + total * header.record_len())?;
        Ok(())
    }

    /// Iterates over records from the current position, yielding each one
    /// with its slot number.
    pub fn records(&mut self) -> Result<Records<'_>, DataFileError> {
        let pos = self.position()?;
        let header = self.header()?;
        let start = header.data_start()?;
        let next_slot = pos.saturating_sub(start) / header.record_len();
        Ok(Records {
            file: self,
            next_slot,
            failed: false,
        })
    }

    /// Releases the handle. Write handles are flushed and synced first so
    /// that a failure surfaces here rather than being lost on drop.
    pub fn close(mut self) -> Result<(), DataFileError> {
        if self.mode == Mode::ReadWrite {
            self.file.flush()?;
            self.file.sync_all()?;
        }
        trace!(path = %self.path.display(), "closed data file");
        Ok(())
    }

    /// Borrows the file and the (cached) header at the same time.
    fn parts(&mut self) -> Result<(&mut File, &Header), DataFileError> {
        let header = match self.header.take() {
            Some(h) => h,
            None => read_header(&mut self.file)?,
        };
        let header = self.header.insert(header);
        Ok((&mut self.file, header))
    }
}

/// Iterator returned by [`DataFile::records`].
///
/// Stops at the first error after yielding it.
pub struct Records<'a> {
    file: &'a mut DataFile,
    next_slot: u64,
    failed: bool,
}

impl Iterator for Records<'_> {
    type Item = Result<(u64, Record), DataFileError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let step = match self.file.has_more_records() {
            Ok(false) => return None,
            Ok(true) => self.file.next_record(),
            Err(e) => Err(e),
        };
        match step {
            Ok(record) => {
                let slot = self.next_slot;
                self.next_slot += 1;
                Some(Ok((slot, record)))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Copies `src` to `dst`: the header followed by every slot, tombstones
/// included, in slot order. `dst` is created or truncated.
///
/// Returns the number of records copied. Fails with
/// [`DataFileError::SameFile`] if `dst` resolves to `src`.
pub fn copy_data_file<P1: AsRef<Path>, P2: AsRef<Path>>(
    src: P1,
    dst: P2,
) -> Result<u64, DataFileError> {
    let mut input = DataFile::open(&src, Mode::Read)?;
    let src_real = std::fs::canonicalize(&src)?;
    // `dst` may not exist yet; only an existing file can alias `src`.
    if let Ok(dst_real) = std::fs::canonicalize(&dst) {
        if dst_real == src_real {
            return Err(DataFileError::SameFile(dst_real));
        }
    }

    let header = input.read_header()?;
    input.set_header(header.clone());
    input.seek_record(0)?;

    let mut output = DataFile::create(dst, &header)?;
    let mut copied = 0u64;
    for entry in input.records()? {
        let (_, record) = entry?;
        output.write_record(&record)?;
        copied += 1;
    }

    output.close()?;
    input.close()?;
    debug!(copied, "copied data file");
    Ok(copied)
}
