//! # Lockmgr - Per-Record Lock Manager
//!
//! Write coordination for the record store. Before mutating a slot a caller
//! must `lock` it and present the returned cookie to the write call; it then
//! `unlock`s the slot to let the next caller in.
//!
//! ## State per slot
//!
//! ```text
//!            lock()                    unlock(), waiters > 0
//! UNLOCKED ─────────▶ LOCKED ─────────────────────────────▶ LOCKED (new holder)
//!    ▲                  │
//!    └──────────────────┘
//!      unlock(), no waiters
//! ```
//!
//! Locks live only in memory and only for the life of the process. Waiters
//! are woken in no particular order.
//!
//! ## Example
//!
//! ```rust
//! use lockmgr::LockManager;
//!
//! let locks = LockManager::new();
//! let cookie = locks.lock(3);
//! assert!(locks.is_valid_cookie(3, cookie));
//! assert!(!locks.is_valid_cookie(4, cookie));
//! locks.unlock(3);
//! assert!(!locks.is_locked(3));
//! ```

pub mod cookie;
mod lock;
mod manager;

use std::time::Duration;

use thiserror::Error;

pub use lock::Lock;
pub use manager::LockManager;

/// Returned by [`LockManager::lock_timeout`] when the wait runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("timed out after {waited:?} waiting for lock on slot {slot}")]
pub struct LockTimeout {
    pub slot: u32,
    pub waited: Duration,
}
