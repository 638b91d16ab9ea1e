//! Lock persistence.
//!
//! [`LockStore`] is the only shared mutable state in assetlock. Every
//! implementation must make `create` atomic with its uniqueness check and
//! `delete_by_id` a single atomic removal, so callers never need in-process
//! coordination of their own.
//!
//! Two implementations are provided:
//! - [`MemoryLockStore`]: process-local, guarded by a mutex
//! - [`FileLockStore`]: directory-backed, shared between processes
//!
//! # Pagination
//!
//! Locks of a repository are ordered by id ascending. `list` takes a page
//! index (`cursor`) and a page size (`limit`); the page starts at
//! `cursor * limit`. A `limit <= 0` means "no limit": every lock is returned
//! and the cursor is ignored. `has_more` is set whenever a page comes back exactly
//! `limit` long, without checking for a further record, so the last page a
//! caller fetches may be empty.

mod file;
mod memory;


use crate::error::StoreError;
use crate::locks::{Lock, LockId};

pub use file::FileLockStore;
pub use memory::MemoryLockStore;

/// One page of a repository's locks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    /// Locks in id order.
    pub locks: Vec<Lock>,

    /// Whether the page was full, so another page may follow.
    pub has_more: bool,
}

/// Persistence contract for lock records.
pub trait LockStore: Send + Sync {
    /// Insert a lock for `(repository_id, path)`.
    ///
    /// Fails with [`StoreError::AlreadyLocked`] carrying the current holder if
    /// the pair is already locked.
    fn create(&self, repository_id: &str, path: &str, owner_id: &str) -> Result<Lock, StoreError>;

    /// Return one page of the repository's locks.
    fn list(&self, repository_id: &str, cursor: usize, limit: i64) -> Result<Page, StoreError>;

    /// Look up a lock by id.
    fn get_by_id(&self, id: LockId) -> Result<Lock, StoreError>;

    /// Look up the lock held on `(repository_id, path)`, if any.
    fn get_by_path(&self, repository_id: &str, path: &str) -> Result<Option<Lock>, StoreError>;

    /// Remove a lock. A second delete of the same id fails with [`StoreError::NotFound`].
    fn delete_by_id(&self, id: LockId) -> Result<(), StoreError>;
}

/// Slice one page out of a repository's id-ordered locks.
pub(crate) fn paginate(mut ordered: Vec<Lock>, cursor: usize, limit: i64) -> Page {
    let (offset, take) = match usize::try_from(limit) {
        Ok(size) if size > 0 => (cursor.saturating_mul(size), Some(size)),
        _ => (0, None),
    };

    if offset >= ordered.len() {
        return Page::default();
    }

    let mut locks = ordered.split_off(offset);
    if let Some(size) = take {
        locks.truncate(size);
    }

    let has_more = take.is_some_and(|size| locks.len() == size);
    Page { locks, has_more }
}
