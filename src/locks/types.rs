//! Lock type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Store-assigned lock identifier.
///
/// Ids are allocated in increasing order and never reused, which gives the
/// store a stable total order for pagination.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LockId(pub u64);

impl fmt::Display for LockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for LockId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(LockId)
            .map_err(|_| format!("invalid lock id '{}': expected a positive integer", s))
    }
}

/// A persisted lock record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lock {
    /// Identifier assigned by the store on creation.
    pub id: LockId,

    /// Repository the lock belongs to.
    pub repository_id: String,

    /// Normalized path the lock protects.
    pub path: String,

    /// Principal who created the lock.
    pub owner_id: String,

    /// Creation timestamp.
    pub locked_at: DateTime<Utc>,
}

impl Lock {
    /// Whether `user_id` created this lock.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }
}

impl fmt::Display for Lock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}:{} (owner: {}, locked at {})",
            self.id,
            self.repository_id,
            self.path,
            self.owner_id,
            self.locked_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
    }
}
