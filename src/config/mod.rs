//! Configuration model for assetlock.
//!
//! This module defines the Config struct that represents `.assetlock/config.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! sensible defaults for optional fields, and validation of config values.
//!
//! The config doubles as the access policy and owner directory of the CLI:
//! see [`crate::access`].

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::Config;
pub use types::{AccessLevel, DEFAULT_CONFIG_TEMPLATE, RepositoryAccess, UserEntry};
