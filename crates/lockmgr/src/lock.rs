use parking_lot::{Condvar, Mutex};
use std::time::Instant;

#[derive(Debug, Default)]
struct LockState {
    /// Callers parked in `wait` / `wait_until`.
    waiting: usize,
    /// Hand-offs issued by `release` that no waiter has claimed yet.
    grants: usize,
}

/// Mutual-exclusion primitive for one slot.
///
/// A `Lock` does not track its holder. Whoever created it (or was last
/// handed it by [`release`](Lock::release)) is the holder by convention.
/// `release` wakes one arbitrary waiter; there is no FIFO ordering.
#[derive(Debug, Default)]
pub struct Lock {
    state: Mutex<LockState>,
    granted: Condvar,
}

impl Lock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until a [`release`](Lock::release) hands the lock to this
    /// caller.
    pub fn acquire(&self) {
        self.enqueue();
        self.wait();
    }

    /// Hands the lock to one waiting caller.
    ///
    /// Returns `false` (and does nothing) if nobody is waiting.
    pub fn release(&self) -> bool {
        let mut state = self.state.lock();
        if state.waiting == 0 {
            return false;
        }
        state.waiting -= 1;
        state.grants += 1;
        self.granted.notify_one();
        true
    }

    /// Number of callers currently blocked on this lock.
    #[must_use]
    pub fn waiting(&self) -> usize {
        self.state.lock().waiting
    }

    #[must_use]
    pub fn has_waiters(&self) -> bool {
        self.waiting() > 0
    }

    /// Counts the caller as a waiter. Split from `wait` so the lock table
    /// can register a waiter before letting go of its own mutex.
    pub(crate) fn enqueue(&self) {
        self.state.lock().waiting += 1;
    }

    /// Parks until a grant is available, then claims it. Must follow
    /// `enqueue`.
    pub(crate) fn wait(&self) {
        let mut state = self.state.lock();
        while state.grants == 0 {
            self.granted.wait(&mut state);
        }
        state.grants -= 1;
    }

    /// Like `wait`, but gives up at `deadline`. Returns `false` on timeout,
    /// in which case the caller is no longer counted as a waiter.
    pub(crate) fn wait_until(&self, deadline: Instant) -> bool {
        let mut state = self.state.lock();
        while state.grants == 0 {
            if self.granted.wait_until(&mut state, deadline).timed_out() && state.grants == 0 {
                state.waiting -= 1;
                return false;
            }
        }
        state.grants -= 1;
        true
    }
}
