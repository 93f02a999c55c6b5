//! Lock cookie codec.
//!
//! ```text
//! [slot: u32 (high bits)][nonce: u32 (low bits)]
//! ```
//!
//! The nonce only makes cookies for the same slot differ from call to call.
//! It is not checked on decode: a cookie proves that `lock()` was called for
//! a slot, nothing more, and anyone who knows a slot number can build a
//! cookie that decodes to it.

/// Builds a cookie for `slot`.
#[must_use]
pub fn encode(slot: u32) -> u64 {
    (u64::from(slot) << 32) | u64::from(rand::random::<u32>())
}

/// Recovers the slot a cookie was issued for.
#[must_use]
pub fn decode(cookie: u64) -> u32 {
    (cookie >> 32) as u32
}
