//! State root resolution for assetlock.
//!
//! Every command operates on one state root directory holding the config,
//! the audit log and the file lock store:
//!
//! ```text
//! <root>/
//!   config.yaml
//!   events/events.ndjson
//!   store/...
//! ```
//!
//! The root comes from `--root`, else `ASSETLOCK_ROOT`, else `.assetlock/`
//! in the current working directory.

use crate::error::{AppError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Default state root relative to the working directory.
pub const DEFAULT_ROOT_DIR: &str = ".assetlock";

/// Environment variable overriding the state root.
pub const ROOT_ENV: &str = "ASSETLOCK_ROOT";

/// Resolved paths for one assetlock state root. All paths are absolute.
#[derive(Debug, Clone)]
pub struct StoreContext {
    /// Absolute path to the state root.
    pub root: PathBuf,
}

impl StoreContext {
    /// Resolve the state root from an explicit flag, the environment, or the
    /// working directory, in that order.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            AppError::UserError(format!("failed to get current working directory: {}", e))
        })?;

        if let Some(root) = explicit {
            return Ok(Self::at(cwd.join(root)));
        }

        match env::var_os(ROOT_ENV) {
            Some(root) if !root.is_empty() => Ok(Self::at(cwd.join(root))),
            _ => Ok(Self::at(cwd.join(DEFAULT_ROOT_DIR))),
        }
    }

    /// Use `root` as the state root as-is.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Whether `assetlock init` has run for this root.
    pub fn is_initialized(&self) -> bool {
        self.config_path().is_file() && self.store_dir().is_dir()
    }

    /// Ensure the root is initialized, returning an error if not.
    ///
    /// Called by every command except `init`.
    pub fn ensure_initialized(&self) -> Result<()> {
        if !self.is_initialized() {
            return Err(AppError::NotInitialized(self.root.display().to_string()));
        }
        Ok(())
    }

    /// Get the path to the config file.
    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.yaml")
    }

    /// Get the path to the file lock store.
    pub fn store_dir(&self) -> PathBuf {
        self.root.join("store")
    }

    /// Get the path to the events directory.
    pub fn events_dir(&self) -> PathBuf {
        self.root.join("events")
    }

    /// Get the path to the main events log file.
    pub fn events_file(&self) -> PathBuf {
        self.events_dir().join("events.ndjson")
    }
}

/// Resolve the root and ensure it is initialized.
pub fn require_initialized(explicit: Option<&Path>) -> Result<StoreContext> {
    let ctx = StoreContext::resolve(explicit)?;
    ctx.ensure_initialized()?;
    Ok(ctx)
}
