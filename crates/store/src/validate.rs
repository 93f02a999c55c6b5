/// Per-call file handling and the precondition checks shared by the
/// operations.
///
/// Each check fails fast with the error kind the operation surface
/// promises; callers run them in the documented order.
use datafile::{DataFile, Mode, Record};
use tracing::warn;

use crate::{Result, Store, StoreError};

impl Store {
    /// Opens a fresh handle, runs `op` on it, and closes it.
    ///
    /// The handle is closed on every path. If `op` succeeded but closing
    /// failed, the close error is returned: the caller cannot assume the
    /// operation took effect. If both failed, `op`'s error wins and the
    /// close error is logged.
    pub(crate) fn with_file<T, F>(&self, mode: Mode, op: F) -> Result<T>
    where
        F: FnOnce(&mut DataFile) -> Result<T>,
    {
        let mut df = DataFile::open(&self.path, mode)?;
        let result = op(&mut df);
        match (result, df.close()) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => {
                warn!(path = %self.path.display(), error = %e, "failed to close data file after a completed operation");
                Err(StoreError::Storage(e))
            }
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(close_err)) => {
                warn!(path = %self.path.display(), error = %close_err, "failed to close data file after an error");
                Err(e)
            }
        }
    }

    /// Fails with `Unauthorized` unless `cookie` was issued for `slot`.
    pub(crate) fn check_cookie(&self, slot: u32, cookie: u64) -> Result<()> {
        if self.locks.is_valid_cookie(slot, cookie) {
            Ok(())
        } else {
            Err(StoreError::Unauthorized { slot, cookie })
        }
    }

    /// Fails with `DuplicateKey` if any key position of `data` is null or
    /// missing.
    pub(crate) fn check_keys_present<S: AsRef<str>>(&self, data: &[Option<S>]) -> Result<()> {
        for &k in &self.key_fields {
            if data.get(k).map_or(true, Option::is_none) {
                return Err(StoreError::DuplicateKey(format!(
                    "cannot create record with null key field {}",
                    k
                )));
            }
        }
        Ok(())
    }

    /// Fails with `DuplicateKey` if a live record has the same trimmed value
    /// as `data` at every key position. Scans without taking any lock.
    pub(crate) fn check_unique_key<S: AsRef<str>>(
        &self,
        df: &mut DataFile,
        data: &[Option<S>],
    ) -> Result<()> {
        if self.key_fields.is_empty() {
            return Ok(());
        }
        // Compare against what would actually land on disk.
        let header = df.header()?.clone();
        let candidate = Record::live(data).fitted(&header);
        let wanted: Vec<Option<String>> = self
            .key_fields
            .iter()
            .map(|&k| candidate.trimmed(k))
            .collect();

        df.seek_record(0)?;
        for entry in df.records()? {
            let (slot, record) = entry?;
            if record.deleted {
                continue;
            }
            let duplicate = self
                .key_fields
                .iter()
                .zip(&wanted)
                .all(|(&k, want)| record.trimmed(k) == *want);
            if duplicate {
                return Err(StoreError::DuplicateKey(format!(
                    "key already used by record {}",
                    slot
                )));
            }
        }
        Ok(())
    }
}

/// Fails with `NotFound` unless `0 <= slot < length_in_records`.
pub(crate) fn check_range(df: &mut DataFile, slot: u32) -> Result<()> {
    let len = df.length_in_records()?;
    if u64::from(slot) >= len {
        return Err(StoreError::NotFound(format!(
            "record {} out of range [0, {})",
            slot, len
        )));
    }
    Ok(())
}

/// Reads `slot`, failing with `NotFound` if it is a tombstone.
pub(crate) fn load_live(df: &mut DataFile, slot: u32) -> Result<Record> {
    df.seek_record(slot)?;
    let record = df.next_record()?;
    if record.deleted {
        return Err(StoreError::NotFound(format!("record {} has been deleted", slot)));
    }
    Ok(record)
}

/// Fails with `SchemaMismatch` unless `actual` equals the schema width.
pub(crate) fn check_field_count(df: &mut DataFile, actual: usize) -> Result<()> {
    let expected = df.header()?.field_count();
    if expected != actual {
        return Err(StoreError::SchemaMismatch { expected, actual });
    }
    Ok(())
}

/// Narrows a slot number coming off the file to the API's `u32`.
pub(crate) fn to_slot(n: u64) -> Result<u32> {
    u32::try_from(n).map_err(|_| {
        StoreError::Storage(datafile::DataFileError::Corrupt(format!(
            "slot {} exceeds the addressable range",
            n
        )))
    })
}
