//! Lock records.
//!
//! A [`Lock`] asserts exclusive write intent on one file path within one
//! repository. Locks are immutable once created: the only lifecycle
//! transitions are *created* and *deleted*.
//!
//! Paths are normalized with [`normalize_path`] before they are stored or
//! compared, so `art\hero.psd`, `/art/hero.psd` and `art/./hero.psd` all name
//! the same lock.

mod path;
mod types;

#[cfg(test)]
mod tests;

// Re-export public API
pub use path::normalize_path;
pub use types::{Lock, LockId};
