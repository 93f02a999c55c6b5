/// Write path: `create()`, `update()` and `delete()`.
///
/// `update` and `delete` require a cookie from `lock` for the target slot.
/// `create` needs none; its duplicate-key scan runs without a lock, so two
/// concurrent creates with the same key can both succeed.
use datafile::{Mode, Record};
use tracing::debug;

use crate::validate::{check_field_count, check_range, load_live, to_slot};
use crate::{Result, Store};

impl Store {
    /// Appends a new record and returns its slot.
    ///
    /// # Validation order
    ///
    /// 1. Every key position is non-null, else `DuplicateKey`.
    /// 2. No live record has the same trimmed values at all key positions,
    ///    else `DuplicateKey`. Deleted records are ignored.
    /// 3. `data.len()` equals the schema width, else `SchemaMismatch`.
    ///
    /// Values longer than their column are truncated; `None` is stored as
    /// padding.
    pub fn create<S: AsRef<str>>(&self, data: &[Option<S>]) -> Result<u32> {
        self.check_keys_present(data)?;

        let slot = self.with_file(Mode::ReadWrite, |df| {
            self.check_unique_key(df, data)?;
            check_field_count(df, data.len())?;

            let _append = self.append.lock();
            let slot = to_slot(df.length_in_records()?)?;
            df.seek_record(slot)?;
            df.write_record(&Record::live(data))?;
            Ok(slot)
        })?;

        debug!(slot, "created record");
        Ok(slot)
    }

    /// Overwrites the non-key fields of `slot` with `data`.
    ///
    /// Key positions keep their stored values whatever `data` holds there.
    ///
    /// # Validation order
    ///
    /// 1. `slot` in range, else `NotFound`.
    /// 2. `slot` not deleted, else `NotFound`.
    /// 3. `cookie` issued for `slot`, else `Unauthorized`.
    /// 4. `data.len()` equals the schema width, else `SchemaMismatch`.
    pub fn update<S: AsRef<str>>(&self, slot: u32, data: &[Option<S>], cookie: u64) -> Result<()> {
        self.with_file(Mode::ReadWrite, |df| {
            check_range(df, slot)?;
            let stored = load_live(df, slot)?;
            self.check_cookie(slot, cookie)?;
            check_field_count(df, data.len())?;

            let mut record = Record::live(data);
            for &k in &self.key_fields {
                if let (Some(dst), Some(src)) = (record.fields.get_mut(k), stored.fields.get(k)) {
                    dst.clone_from(src);
                }
            }

            df.seek_record(slot)?;
            df.write_record(&record)?;
            Ok(())
        })?;

        debug!(slot, "updated record");
        Ok(())
    }

    /// Marks `slot` deleted. Its bytes stay on disk and the slot number is
    /// never reused.
    ///
    /// # Validation order
    ///
    /// 1. `slot` in range, else `NotFound`.
    /// 2. `slot` not already deleted, else `NotFound`.
    /// 3. `cookie` issued for `slot`, else `Unauthorized`.
    pub fn delete(&self, slot: u32, cookie: u64) -> Result<()> {
        self.with_file(Mode::ReadWrite, |df| {
            check_range(df, slot)?;
            let mut record = load_live(df, slot)?;
            self.check_cookie(slot, cookie)?;

            record.deleted = true;
            df.seek_record(slot)?;
            df.write_record(&record)?;
            Ok(())
        })?;

        debug!(slot, "deleted record");
        Ok(())
    }
}
