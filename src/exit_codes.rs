//! Exit code constants for the assetlock CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, bad config, uninitialized state root)
//! - 2: Conflict (path already locked)
//! - 3: Unauthorized (missing access or not the lock owner)
//! - 4: Not found (lock id does not exist)
//! - 5: Internal error (lock store failure)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid configuration, or invalid lock path.
pub const USER_ERROR: i32 = 1;

/// The requested path is already locked.
pub const CONFLICT: i32 = 2;

/// The requester lacks permission for the operation.
pub const UNAUTHORIZED: i32 = 3;

/// The referenced lock does not exist.
pub const NOT_FOUND: i32 = 4;

/// The lock store failed.
pub const INTERNAL_ERROR: i32 = 5;
