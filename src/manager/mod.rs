//! Lock business rules.
//!
//! [`LockManager`] borrows a [`LockStore`] and an [`AccessPolicy`] and keeps no
//! state of its own between calls, so one manager (or many) can serve
//! concurrent requests. Requester and repository are always explicit
//! arguments.
//!
//! # Release authorization
//!
//! A lock may be released by its owner. Anyone else needs both `force` and
//! elevated privilege on the repository.
//!
//! # Pagination
//!
//! `cursor` is a page index, not an offset or continuation token. The next
//! cursor is `cursor + 1` and is only emitted after a full page. A caller must
//! send the same `limit` on every request of one walk; changing it midway
//! skips or repeats locks. An exact multiple of `limit` ends on an empty page.

mod release;


use crate::access::AccessPolicy;
use crate::error::{LockError, StoreError};
use crate::locks::{Lock, LockId, normalize_path};
use crate::store::LockStore;

pub use release::{BatchRelease, ReleaseOutcome, ReleaseReport};

/// One page of locks with the cursor of the following page, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LockPage {
    pub locks: Vec<Lock>,
    pub next_cursor: Option<usize>,
}

/// One page of locks split by ownership relative to the requester.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VerifyPage {
    /// Locks held by the requester.
    pub ours: Vec<Lock>,
    /// Locks held by anyone else.
    pub theirs: Vec<Lock>,
    pub next_cursor: Option<usize>,
}

/// Stateless lock service over a store and an access policy.
pub struct LockManager<'a, S: ?Sized, A: ?Sized> {
    store: &'a S,
    access: &'a A,
}

impl<'a, S, A> LockManager<'a, S, A>
where
    S: LockStore + ?Sized,
    A: AccessPolicy + ?Sized,
{
    pub fn new(store: &'a S, access: &'a A) -> Self {
        LockManager { store, access }
    }

    /// Lock `path` in `repository_id` for `requester`.
    ///
    /// Never waits: if the path is held the call fails immediately with
    /// [`LockError::AlreadyLocked`] carrying the holder.
    pub fn acquire(&self, repository_id: &str, path: &str, requester: &str) -> Result<Lock, LockError> {
        if !self.access.can_write(repository_id, requester) {
            return Err(LockError::Unauthorized(format!(
                "user '{}' does not have write access to repository '{}'",
                requester, repository_id
            )));
        }

        let normalized =
            normalize_path(path).ok_or_else(|| LockError::InvalidPath(path.to_string()))?;

        Ok(self.store.create(repository_id, &normalized, requester)?)
    }

    /// List one page of the repository's locks in id order.
    pub fn list(
        &self,
        repository_id: &str,
        requester: &str,
        cursor: usize,
        limit: i64,
    ) -> Result<LockPage, LockError> {
        self.require_read(repository_id, requester)?;

        let page = self.store.list(repository_id, cursor, limit)?;
        Ok(LockPage {
            locks: page.locks,
            next_cursor: next_cursor(page.has_more, cursor),
        })
    }

    /// List one page of locks split into the requester's and everyone else's.
    ///
    /// Requires write access, since only writers push and need to verify.
    pub fn verify(
        &self,
        repository_id: &str,
        requester: &str,
        cursor: usize,
        limit: i64,
    ) -> Result<VerifyPage, LockError> {
        if !self.access.can_write(repository_id, requester) {
            return Err(LockError::Unauthorized(format!(
                "user '{}' does not have write access to repository '{}'",
                requester, repository_id
            )));
        }

        let page = self.store.list(repository_id, cursor, limit)?;
        let (ours, theirs): (Vec<Lock>, Vec<Lock>) = page
            .locks
            .into_iter()
            .partition(|lock| lock.is_owned_by(requester));

        Ok(VerifyPage {
            ours,
            theirs,
            next_cursor: next_cursor(page.has_more, cursor),
        })
    }

    /// Look up a single lock of the repository.
    pub fn get(&self, repository_id: &str, requester: &str, id: LockId) -> Result<Lock, LockError> {
        self.require_read(repository_id, requester)?;
        self.find(repository_id, id)?.ok_or(LockError::NotFound(id))
    }

    /// Release a single lock, surfacing every failure.
    pub fn release(
        &self,
        repository_id: &str,
        id: LockId,
        requester: &str,
        force: bool,
    ) -> Result<Lock, LockError> {
        let lock = self.find(repository_id, id)?.ok_or(LockError::NotFound(id))?;
        self.authorize_release(&lock, requester, force)?;
        self.store.delete_by_id(id)?;
        Ok(lock)
    }

    /// Fetch a lock by id, treating locks of other repositories as absent.
    fn find(&self, repository_id: &str, id: LockId) -> Result<Option<Lock>, LockError> {
        match self.store.get_by_id(id) {
            Ok(lock) if lock.repository_id == repository_id => Ok(Some(lock)),
            Ok(_) => Ok(None),
            Err(StoreError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn require_read(&self, repository_id: &str, requester: &str) -> Result<(), LockError> {
        if self.access.can_read(repository_id, requester) {
            Ok(())
        } else {
            Err(LockError::Unauthorized(format!(
                "user '{}' does not have read access to repository '{}'",
                requester, repository_id
            )))
        }
    }

    fn authorize_release(&self, lock: &Lock, requester: &str, force: bool) -> Result<(), LockError> {
        if lock.is_owned_by(requester) {
            return Ok(());
        }

        if !force {
            return Err(LockError::Unauthorized(format!(
                "user '{}' doesn't own lock {} and force flag is not set",
                requester, lock.id
            )));
        }

        if !self.access.is_elevated(&lock.repository_id, requester) {
            return Err(LockError::Unauthorized(format!(
                "user '{}' needs maintainer access to force-release lock {}",
                requester, lock.id
            )));
        }

        Ok(())
    }
}

fn next_cursor(has_more: bool, cursor: usize) -> Option<usize> {
    has_more.then(|| cursor.saturating_add(1))
}
