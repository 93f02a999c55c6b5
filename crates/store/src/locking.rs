/// Lock path: `lock()`, `lock_timeout()` and `unlock()`.
///
/// The data file is only touched for the range check and is closed before
/// any waiting starts.
use std::time::Duration;

use datafile::Mode;

use crate::validate::check_range;
use crate::{Result, Store};

impl Store {
    /// Locks `slot` for writing and returns the cookie that `update`,
    /// `delete` and `unlock` expect.
    ///
    /// Blocks while another caller holds the slot. Without a configured
    /// timeout this wait is unbounded and cannot be cancelled.
    ///
    /// Only the range is checked: a deleted record can still be locked.
    pub fn lock(&self, slot: u32) -> Result<u64> {
        self.with_file(Mode::Read, |df| check_range(df, slot))?;
        match self.lock_timeout {
            Some(timeout) => Ok(self.locks.lock_timeout(slot, timeout)?),
            None => Ok(self.locks.lock(slot)),
        }
    }

    /// Like [`lock`](Store::lock) but fails with `LockTimeout` after
    /// `timeout`.
    pub fn lock_timeout(&self, slot: u32, timeout: Duration) -> Result<u64> {
        self.with_file(Mode::Read, |df| check_range(df, slot))?;
        Ok(self.locks.lock_timeout(slot, timeout)?)
    }

    /// Releases `slot`, handing it to one waiting caller if there is one.
    ///
    /// # Errors
    ///
    /// `NotFound` if `slot` is out of range; `Unauthorized` if `cookie` was
    /// not issued for `slot`.
    pub fn unlock(&self, slot: u32, cookie: u64) -> Result<()> {
        self.with_file(Mode::Read, |df| check_range(df, slot))?;
        self.check_cookie(slot, cookie)?;
        self.locks.unlock(slot);
        Ok(())
    }
}
