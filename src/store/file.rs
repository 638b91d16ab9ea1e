//! Directory-backed lock store.
//!
//! # Layout
//!
//! ```text
//! <root>/
//!   locks/<id>.json                 one record per live lock
//!   ids/<id>                        allocation markers; only the highest is kept
//!   paths/<repo>/<seg>.d/<leaf>.lock  uniqueness claim holding the lock id
//! ```
//!
//! Repository ids and path segments are escaped with [`encode_component`]
//! so any string maps to a distinct, portable file name. Intermediate path
//! segments become `.d` directories and the final segment a `.lock` file, so
//! a claim on `a` never collides with a claim on `a/b`. Directories a delete
//! leaves empty are removed again.
//!
//! # Atomicity
//!
//! - Ids are allocated by exclusively creating `ids/<n>` above the highest
//!   marker. A marker is only accepted if no higher one exists afterwards;
//!   the winner then prunes the markers below it. The highest marker is never
//!   removed, so a pruned id can never be handed out again.
//! - A create wins the path by exclusively creating the claim file with the
//!   id already inside (see [`create_exclusive`]). Losers read the claim to
//!   report the holder.
//! - The record is written after the claim is won, so a lock becomes visible
//!   to `list` only once it is committed.
//! - Delete removes the record first; exactly one caller can succeed at that.
//!   Only the winner then removes the claim.
//! - A create that finds the path claimed either reads the live holder or
//!   sees the claim vanish and tries again. Contention alone never fails.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};

use chrono::Utc;

use super::{LockStore, Page, paginate};
use crate::error::StoreError;
use crate::fs::{atomic_write_file, create_exclusive};
use crate::locks::{Lock, LockId};

/// How long a losing create waits for a claim's record to be written.
const HOLDER_WAIT: Duration = Duration::from_secs(2);

const HOLDER_READ_BACKOFF: Duration = Duration::from_millis(2);

/// Lock store persisted as files under a root directory.
///
/// Safe to share between threads and between processes using the same root.
#[derive(Debug, Clone)]
pub struct FileLockStore {
    root: PathBuf,
}

impl FileLockStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        let store = FileLockStore {
            root: root.as_ref().to_path_buf(),
        };

        for dir in [store.locks_dir(), store.ids_dir(), store.paths_dir()] {
            fs::create_dir_all(&dir).map_err(|e| {
                StoreError::Backend(format!(
                    "failed to create store directory '{}': {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        Ok(store)
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn locks_dir(&self) -> PathBuf {
        self.root.join("locks")
    }

    fn ids_dir(&self) -> PathBuf {
        self.root.join("ids")
    }

    fn paths_dir(&self) -> PathBuf {
        self.root.join("paths")
    }

    fn record_path(&self, id: LockId) -> PathBuf {
        self.locks_dir().join(format!("{}.json", id))
    }

    fn claim_path(&self, repository_id: &str, path: &str) -> PathBuf {
        let mut claim = self.paths_dir().join(encode_component(repository_id));
        let mut segments = path.split('/').peekable();

        while let Some(segment) = segments.next() {
            if segments.peek().is_some() {
                claim.push(format!("{}.d", encode_component(segment)));
            } else {
                claim.push(format!("{}.lock", encode_component(segment)));
            }
        }

        claim
    }

    /// Reserve the next unused id.
    fn allocate_id(&self) -> Result<LockId, StoreError> {
        let ids_dir = self.ids_dir();

        loop {
            let mut candidate = self.allocated_ids()?.into_iter().max().unwrap_or(0) + 1;

            loop {
                let marker = ids_dir.join(candidate.to_string());
                match OpenOptions::new().write(true).create_new(true).open(&marker) {
                    Ok(_) => break,
                    Err(e) if e.kind() == io::ErrorKind::AlreadyExists => candidate += 1,
                    Err(e) => {
                        return Err(StoreError::Backend(format!(
                            "failed to allocate lock id '{}': {}",
                            marker.display(),
                            e
                        )));
                    }
                }
            }

            let allocated = self.allocated_ids()?;
            if allocated.iter().any(|&id| id > candidate) {
                // Someone allocated past us; our id could be a pruned one
                let _ = fs::remove_file(ids_dir.join(candidate.to_string()));
                continue;
            }

            for id in allocated.into_iter().filter(|&id| id < candidate) {
                let _ = fs::remove_file(ids_dir.join(id.to_string()));
            }

            return Ok(LockId(candidate));
        }
    }

    fn allocated_ids(&self) -> Result<Vec<u64>, StoreError> {
        let entries = fs::read_dir(self.ids_dir()).map_err(|e| {
            StoreError::Backend(format!("failed to read id allocation markers: {}", e))
        })?;

        Ok(entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().to_str()?.parse::<u64>().ok())
            .collect())
    }

    /// Read the lock id stored in a claim file. `None` if the claim is gone.
    fn read_claim(&self, claim: &Path) -> Result<Option<LockId>, StoreError> {
        match fs::read_to_string(claim) {
            Ok(content) => content.parse::<LockId>().map(Some).map_err(|e| {
                StoreError::Backend(format!("corrupt path claim '{}': {}", claim.display(), e))
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Backend(format!(
                "failed to read path claim '{}': {}",
                claim.display(),
                e
            ))),
        }
    }

    /// Read a lock record. `None` if no record exists for the id.
    fn read_record(&self, id: LockId) -> Result<Option<Lock>, StoreError> {
        let path = self.record_path(id);
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).map(Some).map_err(|e| {
                StoreError::Backend(format!("corrupt lock record '{}': {}", path.display(), e))
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Backend(format!(
                "failed to read lock record '{}': {}",
                path.display(),
                e
            ))),
        }
    }

    /// Resolve the lock currently holding `claim`.
    ///
    /// Returns `None` if the claim was released while we looked. A claim
    /// whose record does not show up within [`HOLDER_WAIT`] is reported as a
    /// backend failure.
    fn holder(&self, claim: &Path) -> Result<Option<Lock>, StoreError> {
        let deadline = Instant::now() + HOLDER_WAIT;

        loop {
            let Some(id) = self.read_claim(claim)? else {
                return Ok(None);
            };
            if let Some(lock) = self.read_record(id)? {
                return Ok(Some(lock));
            }
            if Instant::now() >= deadline {
                break;
            }
            thread::sleep(HOLDER_READ_BACKOFF);
        }

        Err(StoreError::Backend(format!(
            "path claim '{}' references a lock record that does not exist",
            claim.display()
        )))
    }

    /// Remove the claim's parent directories up to `paths/` while they are empty.
    fn prune_empty_dirs(&self, claim: &Path) {
        let paths_dir = self.paths_dir();
        let mut dir = claim.parent();

        while let Some(current) = dir {
            if current == paths_dir || !current.starts_with(&paths_dir) {
                break;
            }
            // Fails on the first directory still in use
            if fs::remove_dir(current).is_err() {
                break;
            }
            dir = current.parent();
        }
    }

    fn commit(&self, claim: &Path, lock: &Lock) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(lock)
            .map_err(|e| StoreError::Backend(format!("failed to serialize lock: {}", e)))?;

        atomic_write_file(self.record_path(lock.id), &json).map_err(|e| {
            let _ = fs::remove_file(claim);
            StoreError::Backend(format!("failed to write lock record {}: {}", lock.id, e))
        })
    }
}

impl LockStore for FileLockStore {
    fn create(&self, repository_id: &str, path: &str, owner_id: &str) -> Result<Lock, StoreError> {
        let claim = self.claim_path(repository_id, path);
        let id = self.allocate_id()?;

        loop {
            match create_exclusive(&claim, id.to_string().as_bytes()) {
                Ok(()) => {
                    let lock = Lock {
                        id,
                        repository_id: repository_id.to_string(),
                        path: path.to_string(),
                        owner_id: owner_id.to_string(),
                        locked_at: Utc::now(),
                    };
                    self.commit(&claim, &lock)?;
                    return Ok(lock);
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    // Released while we looked: claim again
                    if let Some(holder) = self.holder(&claim)? {
                        return Err(StoreError::AlreadyLocked(Box::new(holder)));
                    }
                }
                // A delete pruned the claim directory under us
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    return Err(StoreError::Backend(format!(
                        "failed to claim path '{}': {}",
                        claim.display(),
                        e
                    )));
                }
            }
        }
    }

    fn list(&self, repository_id: &str, cursor: usize, limit: i64) -> Result<Page, StoreError> {
        let locks_dir = self.locks_dir();
        let entries = fs::read_dir(&locks_dir).map_err(|e| {
            StoreError::Backend(format!(
                "failed to read locks directory '{}': {}",
                locks_dir.display(),
                e
            ))
        })?;

        let mut ordered = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                StoreError::Backend(format!("failed to read locks directory entry: {}", e))
            })?;
            let path = entry.path();

            // Skip temp files and anything else that is not a record
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let lock: Lock = match fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|content| serde_json::from_str::<Lock>(&content).map_err(|e| e.to_string()))
            {
                Ok(lock) => lock,
                Err(e) => {
                    // Deleted between read_dir and read, or corrupt
                    tracing::warn!(record = %path.display(), error = %e, "skipping unreadable lock record");
                    continue;
                }
            };

            if lock.repository_id == repository_id {
                ordered.push(lock);
            }
        }

        ordered.sort_by_key(|lock| lock.id);
        Ok(paginate(ordered, cursor, limit))
    }

    fn get_by_id(&self, id: LockId) -> Result<Lock, StoreError> {
        self.read_record(id)?.ok_or(StoreError::NotFound(id))
    }

    fn get_by_path(&self, repository_id: &str, path: &str) -> Result<Option<Lock>, StoreError> {
        let claim = self.claim_path(repository_id, path);
        match self.read_claim(&claim)? {
            Some(id) => self.read_record(id),
            None => Ok(None),
        }
    }

    fn delete_by_id(&self, id: LockId) -> Result<(), StoreError> {
        let lock = self.read_record(id)?.ok_or(StoreError::NotFound(id))?;

        match fs::remove_file(self.record_path(id)) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(StoreError::NotFound(id)),
            Err(e) => {
                return Err(StoreError::Backend(format!(
                    "failed to remove lock record {}: {}",
                    id, e
                )));
            }
        }

        let claim = self.claim_path(&lock.repository_id, &lock.path);
        match fs::remove_file(&claim) {
            Ok(()) => {
                self.prune_empty_dirs(&claim);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                tracing::warn!(lock = %id, claim = %claim.display(), error = %e, "lock record removed but path claim remains");
                Err(StoreError::Backend(format!(
                    "failed to release path claim '{}': {}",
                    claim.display(),
                    e
                )))
            }
        }
    }
}

/// Escape a string into a portable file name component.
///
/// Lowercase ASCII letters, digits, `-` and `_` pass through; `.` passes
/// through except in leading position. Every other byte becomes `%XX`, so
/// names stay distinct on case-insensitive filesystems too.
pub(crate) fn encode_component(raw: &str) -> String {
    let mut encoded = String::with_capacity(raw.len());

    for (i, byte) in raw.bytes().enumerate() {
        match byte {
            b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' => encoded.push(byte as char),
            b'.' if i > 0 => encoded.push('.'),
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }

    encoded
}
