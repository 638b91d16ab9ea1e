//! Implementation of the `assetlock init` command.
//!
//! # What `assetlock init` does
//!
//! 1. Creates the state root and the file lock store under `store/`
//! 2. Creates the `events/` directory
//! 3. Writes a `config.yaml` template (if missing)
//! 4. Appends an `init` event to the audit log
//!
//! Running it again leaves existing locks and config untouched.

use crate::cli::GlobalArgs;
use crate::config::{Config, DEFAULT_CONFIG_TEMPLATE};
use crate::context::StoreContext;
use crate::error::{AppError, Result};
use crate::events::{Event, EventAction, append_event};
use crate::fs::atomic_write_file;
use crate::store::FileLockStore;
use serde_json::json;
use std::fs;

use super::resolve_requester;

/// Execute the `assetlock init` command.
pub fn cmd_init(global: &GlobalArgs) -> Result<()> {
    let ctx = StoreContext::resolve(global.root.as_deref())?;

    fs::create_dir_all(&ctx.root).map_err(|e| {
        AppError::UserError(format!(
            "failed to create state root '{}': {}",
            ctx.root.display(),
            e
        ))
    })?;

    FileLockStore::open(ctx.store_dir())?;

    fs::create_dir_all(ctx.events_dir()).map_err(|e| {
        AppError::UserError(format!(
            "failed to create events directory '{}': {}",
            ctx.events_dir().display(),
            e
        ))
    })?;

    let config_path = ctx.config_path();
    let config_created = !config_path.exists();
    if config_created {
        atomic_write_file(&config_path, DEFAULT_CONFIG_TEMPLATE).map_err(|e| {
            AppError::UserError(format!(
                "failed to write config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;
    } else {
        // Surface a broken config now rather than on the first lock
        Config::load(&config_path)?;
    }

    let actor = resolve_requester(global.user.as_deref()).unwrap_or_else(|_| "unknown".into());
    let event = Event::new(EventAction::Init, actor).with_details(json!({
        "root": ctx.root.display().to_string(),
        "config_created": config_created,
    }));
    append_event(&ctx, &event)?;

    println!("Initialized assetlock.");
    println!();
    println!("State root: {}", ctx.root.display());
    println!("Config:     {}", config_path.display());
    println!();
    println!("Declare users and repositories in config.yaml, then lock with");
    println!("`assetlock lock <repo> <path>`.");

    Ok(())
}
