//! Error types for assetlock.
//!
//! Three layers, each a thiserror enum:
//! - [`StoreError`]: the lock store contract (uniqueness, missing rows, backend faults)
//! - [`LockError`]: lock manager outcomes surfaced to callers
//! - [`AppError`]: everything the CLI front end can fail with, mapped to exit codes

use crate::exit_codes;
use crate::locks::{Lock, LockId};
use thiserror::Error;

/// Failures of the lock store contract.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A lock already exists for the `(repository, path)` pair. Carries the holder.
    #[error("path '{}' is already locked (lock {})", .0.path, .0.id)]
    AlreadyLocked(Box<Lock>),

    /// No lock with this id exists.
    #[error("lock {0} does not exist")]
    NotFound(LockId),

    /// The persistence backend failed.
    #[error("lock store failure: {0}")]
    Backend(String),
}

/// Outcomes of lock manager operations.
#[derive(Error, Debug)]
pub enum LockError {
    /// The path is held by another lock. Carries the conflicting lock.
    #[error("already created lock")]
    AlreadyLocked(Box<Lock>),

    /// The referenced lock does not exist in the addressed repository.
    #[error("lock {0} does not exist")]
    NotFound(LockId),

    /// The requester may not perform the operation.
    #[error("{0}")]
    Unauthorized(String),

    /// The requested path is empty after normalization.
    #[error("invalid lock path '{0}'")]
    InvalidPath(String),

    /// The lock store failed; the in-flight operation was aborted.
    #[error("{0}")]
    Store(String),
}

impl From<StoreError> for LockError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::AlreadyLocked(lock) => LockError::AlreadyLocked(lock),
            StoreError::NotFound(id) => LockError::NotFound(id),
            StoreError::Backend(msg) => LockError::Store(msg),
        }
    }
}

impl LockError {
    /// Returns the CLI exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            LockError::AlreadyLocked(_) => exit_codes::CONFLICT,
            LockError::NotFound(_) => exit_codes::NOT_FOUND,
            LockError::Unauthorized(_) => exit_codes::UNAUTHORIZED,
            LockError::InvalidPath(_) => exit_codes::USER_ERROR,
            LockError::Store(_) => exit_codes::INTERNAL_ERROR,
        }
    }
}

/// Main error type for the assetlock front end.
#[derive(Error, Debug)]
pub enum AppError {
    /// User provided invalid arguments or the state root is invalid.
    #[error("{0}")]
    UserError(String),

    /// The state root has not been initialized with `assetlock init`.
    #[error("assetlock is not initialized at '{0}'. Run `assetlock init` first.")]
    NotInitialized(String),

    /// A lock operation failed.
    #[error(transparent)]
    Lock(#[from] LockError),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Lock(err.into())
    }
}

impl AppError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::UserError(_) => exit_codes::USER_ERROR,
            AppError::NotInitialized(_) => exit_codes::USER_ERROR,
            AppError::Lock(err) => err.exit_code(),
        }
    }
}

/// Result type alias for assetlock front-end operations.
pub type Result<T> = std::result::Result<T, AppError>;
