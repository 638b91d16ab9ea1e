//! Bulk release.
//!
//! Each id is its own atomic unit, processed in input order. Missing locks
//! and authorization failures are recorded per id and never stop the batch;
//! only a store failure aborts it.

use super::LockManager;
use crate::access::AccessPolicy;
use crate::error::{LockError, StoreError};
use crate::locks::{Lock, LockId};
use crate::store::LockStore;

/// What happened to one id of a bulk release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The lock was deleted.
    Released,
    /// No such lock (never existed, or someone else released it first).
    AlreadyReleased,
    /// The requester may not release this lock.
    Unauthorized(String),
}

/// Per-id record of a bulk release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseReport {
    pub id: LockId,
    pub outcome: ReleaseOutcome,
}

/// Result of a bulk release.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BatchRelease {
    /// Snapshots of the released locks, in input order.
    pub released: Vec<Lock>,
    /// One report per input id, in input order.
    pub reports: Vec<ReleaseReport>,
}

impl BatchRelease {
    fn record(&mut self, id: LockId, outcome: ReleaseOutcome) {
        self.reports.push(ReleaseReport { id, outcome });
    }

    /// Ids skipped because the requester was not allowed to release them.
    pub fn refused(&self) -> impl Iterator<Item = &ReleaseReport> {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, ReleaseOutcome::Unauthorized(_)))
    }
}

impl<S, A> LockManager<'_, S, A>
where
    S: LockStore + ?Sized,
    A: AccessPolicy + ?Sized,
{
    /// Release every lock in `ids` that `requester` may release.
    ///
    /// Unknown ids, ids of other repositories and ids released concurrently
    /// count as already released. Returns an error only when the store fails,
    /// in which case ids after the failing one are not processed.
    pub fn release_many(
        &self,
        repository_id: &str,
        ids: &[LockId],
        requester: &str,
        force: bool,
    ) -> Result<BatchRelease, LockError> {
        let mut batch = BatchRelease::default();

        for &id in ids {
            let Some(lock) = self.find(repository_id, id)? else {
                batch.record(id, ReleaseOutcome::AlreadyReleased);
                continue;
            };

            if let Err(err) = self.authorize_release(&lock, requester, force) {
                batch.record(id, ReleaseOutcome::Unauthorized(err.to_string()));
                continue;
            }

            match self.store.delete_by_id(id) {
                Ok(()) => {
                    batch.released.push(lock);
                    batch.record(id, ReleaseOutcome::Released);
                }
                Err(StoreError::NotFound(_)) => batch.record(id, ReleaseOutcome::AlreadyReleased),
                Err(err) => return Err(err.into()),
            }
        }

        Ok(batch)
    }
}
