//! Filesystem utilities for assetlock.
//!
//! The file-backed lock store and the state root scaffolding rely on these
//! for atomic record writes and exclusive creation of path claims.

pub mod atomic;

pub use atomic::atomic_write;
pub use atomic::atomic_write_file;
pub use atomic::create_exclusive;
