use parking_lot::Mutex;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::cookie;
use crate::lock::Lock;
use crate::LockTimeout;

/// Table of per-slot locks.
///
/// A slot with no entry is unlocked. The first `lock` call creates the
/// entry and returns at once; later callers park on that entry's [`Lock`]
/// until an `unlock` hands it over. An `unlock` with nobody waiting removes
/// the entry.
///
/// The table mutex only guards entry creation, removal and waiter
/// registration. Waiting happens on each slot's own `Lock`, so a blocked
/// slot never stalls callers working on another slot.
#[derive(Default)]
pub struct LockManager {
    locks: Mutex<HashMap<u32, Arc<Lock>>>,
}

impl std::fmt::Debug for LockManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let table = self.locks.lock();
        f.debug_struct("LockManager")
            .field("locked_slots", &table.len())
            .field(
                "waiting",
                &table.values().map(|l| l.waiting()).sum::<usize>(),
            )
            .finish()
    }
}

impl LockManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the lock on `slot`, blocking for as long as it takes.
    ///
    /// There is no timeout and no way to cancel: if the holder never calls
    /// [`unlock`](LockManager::unlock), this never returns. See
    /// [`lock_timeout`](LockManager::lock_timeout) for a bounded wait.
    pub fn lock(&self, slot: u32) -> u64 {
        if let Some(lock) = self.enqueue_or_take(slot) {
            debug!(slot, "waiting for record lock");
            lock.wait();
            debug!(slot, "record lock handed over");
        }
        cookie::encode(slot)
    }

    /// Takes the lock on `slot`, giving up after `timeout`.
    pub fn lock_timeout(&self, slot: u32, timeout: Duration) -> Result<u64, LockTimeout> {
        if let Some(lock) = self.enqueue_or_take(slot) {
            debug!(slot, ?timeout, "waiting for record lock");
            if !lock.wait_until(Instant::now() + timeout) {
                warn!(slot, ?timeout, "gave up waiting for record lock");
                return Err(LockTimeout {
                    slot,
                    waited: timeout,
                });
            }
            debug!(slot, "record lock handed over");
        }
        Ok(cookie::encode(slot))
    }

    /// Releases `slot`: hands it to one waiter if any, otherwise forgets
    /// the entry. Unlocking a slot that is not locked does nothing.
    pub fn unlock(&self, slot: u32) {
        let mut table = self.locks.lock();
        if let Some(lock) = table.get(&slot) {
            if lock.release() {
                trace!(slot, "record lock passed to a waiter");
            } else {
                table.remove(&slot);
                trace!(slot, "record lock released");
            }
        }
    }

    /// `true` iff `cookie` was issued for `slot`.
    #[must_use]
    pub fn is_valid_cookie(&self, slot: u32, cookie: u64) -> bool {
        cookie::decode(cookie) == slot
    }

    /// `true` if `slot` currently has a holder.
    #[must_use]
    pub fn is_locked(&self, slot: u32) -> bool {
        self.locks.lock().contains_key(&slot)
    }

    /// Number of callers blocked on `slot`.
    #[must_use]
    pub fn waiting(&self, slot: u32) -> usize {
        self.locks
            .lock()
            .get(&slot)
            .map(|l| l.waiting())
            .unwrap_or(0)
    }

    /// Number of slots currently locked.
    #[must_use]
    pub fn locked_count(&self) -> usize {
        self.locks.lock().len()
    }

    /// Fast path: creates the entry and returns `None` when the slot is
    /// free. Otherwise registers the caller as a waiter (while still holding
    /// the table mutex, so an `unlock` cannot slip in between) and returns
    /// the lock to wait on.
    fn enqueue_or_take(&self, slot: u32) -> Option<Arc<Lock>> {
        let mut table = self.locks.lock();
        match table.entry(slot) {
            Entry::Vacant(e) => {
                e.insert(Arc::new(Lock::new()));
                trace!(slot, "record lock taken");
                None
            }
            Entry::Occupied(e) => {
                let lock = Arc::clone(e.get());
                lock.enqueue();
                Some(lock)
            }
        }
    }
}
