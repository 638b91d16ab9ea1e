use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use super::{LockStore, Page, paginate};
use crate::error::StoreError;
use crate::locks::{Lock, LockId};

#[derive(Default)]
struct Tables {
    next_id: u64,
    locks: BTreeMap<LockId, Lock>,
    by_path: HashMap<(String, String), LockId>,
}

/// In-memory lock store backed by a `Mutex`-guarded id table and path index.
///
/// The uniqueness check and the insert happen under the same guard, as do
/// lookup and removal on delete. Ids start at 1 and are never reused.
pub struct MemoryLockStore {
    tables: Mutex<Tables>,
}

impl MemoryLockStore {
    pub fn new() -> Self {
        MemoryLockStore {
            tables: Mutex::new(Tables::default()),
        }
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Backend("memory lock store poisoned".into()))
    }
}

impl Default for MemoryLockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LockStore for MemoryLockStore {
    fn create(&self, repository_id: &str, path: &str, owner_id: &str) -> Result<Lock, StoreError> {
        let mut tables = self.tables()?;
        let key = (repository_id.to_string(), path.to_string());

        if let Some(existing) = tables.by_path.get(&key).and_then(|id| tables.locks.get(id)) {
            return Err(StoreError::AlreadyLocked(Box::new(existing.clone())));
        }

        tables.next_id += 1;
        let lock = Lock {
            id: LockId(tables.next_id),
            repository_id: key.0.clone(),
            path: key.1.clone(),
            owner_id: owner_id.to_string(),
            locked_at: Utc::now(),
        };

        tables.by_path.insert(key, lock.id);
        tables.locks.insert(lock.id, lock.clone());
        Ok(lock)
    }

    fn list(&self, repository_id: &str, cursor: usize, limit: i64) -> Result<Page, StoreError> {
        let tables = self.tables()?;
        let ordered = tables
            .locks
            .values()
            .filter(|lock| lock.repository_id == repository_id)
            .cloned()
            .collect();
        Ok(paginate(ordered, cursor, limit))
    }

    fn get_by_id(&self, id: LockId) -> Result<Lock, StoreError> {
        self.tables()?
            .locks
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    fn get_by_path(&self, repository_id: &str, path: &str) -> Result<Option<Lock>, StoreError> {
        let tables = self.tables()?;
        let key = (repository_id.to_string(), path.to_string());
        Ok(tables
            .by_path
            .get(&key)
            .and_then(|id| tables.locks.get(id))
            .cloned())
    }

    fn delete_by_id(&self, id: LockId) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        let lock = tables.locks.remove(&id).ok_or(StoreError::NotFound(id))?;
        tables.by_path.remove(&(lock.repository_id, lock.path));
        Ok(())
    }
}
