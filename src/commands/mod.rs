//! Command implementations for assetlock.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the [`Session`] every lock command opens: the
//! resolved state root, its config, the file lock store and the requester.
//!
//! Lock commands print the rendered response on stdout, success or not, then
//! return the failure so `main` can report it on stderr and exit non-zero.

mod init;
mod list;
mod lock;
mod show;
mod unlock;


use crate::cli::{Command, GlobalArgs};
use crate::config::Config;
use crate::context::{StoreContext, require_initialized};
use crate::error::{AppError, LockError, Result};
use crate::manager::LockManager;
use crate::store::FileLockStore;
use crate::view::{Presenter, Reply};
use serde::Serialize;

pub use init::cmd_init;
pub use list::{cmd_locks, cmd_verify};
pub use lock::cmd_lock;
pub use show::cmd_show;
pub use unlock::{cmd_unlock, cmd_unlock_many};

/// Dispatch a command to its implementation.
pub fn dispatch(global: &GlobalArgs, command: Command) -> Result<()> {
    match command {
        Command::Init => cmd_init(global),
        Command::Lock(args) => cmd_lock(global, args),
        Command::Locks(args) => cmd_locks(global, args),
        Command::Verify(args) => cmd_verify(global, args),
        Command::Show(args) => cmd_show(global, args),
        Command::Unlock(args) => cmd_unlock(global, args),
        Command::UnlockMany(args) => cmd_unlock_many(global, args),
    }
}

/// Everything a lock command needs, resolved once per invocation.
pub(crate) struct Session {
    pub ctx: StoreContext,
    pub config: Config,
    pub store: FileLockStore,
    pub requester: String,
}

impl Session {
    /// Resolve the root, load its config and open the store.
    pub fn open(global: &GlobalArgs) -> Result<Self> {
        let ctx = require_initialized(global.root.as_deref())?;
        let config = Config::load(ctx.config_path())?;
        let store = FileLockStore::open(ctx.store_dir())?;
        let requester = resolve_requester(global.user.as_deref())?;

        tracing::debug!(root = %ctx.root.display(), requester = %requester, "session opened");

        Ok(Session {
            ctx,
            config,
            store,
            requester,
        })
    }

    pub fn manager(&self) -> LockManager<'_, FileLockStore, Config> {
        LockManager::new(&self.store, &self.config)
    }

    pub fn presenter(&self) -> Presenter<'_, Config> {
        Presenter::new(&self.config).with_documentation_url(self.config.documentation_url.as_deref())
    }
}

/// Requester from `--user`, falling back to the login name.
pub(crate) fn resolve_requester(explicit: Option<&str>) -> Result<String> {
    let user = match explicit {
        Some(user) => user.trim().to_string(),
        None => std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_default()
            .trim()
            .to_string(),
    };

    if user.is_empty() {
        return Err(AppError::UserError(
            "could not determine the requesting user. Pass --user <ID>.".to_string(),
        ));
    }

    Ok(user)
}

/// Print a rendered reply on stdout.
pub(crate) fn emit<T: Serialize>(reply: &Reply<T>) -> Result<()> {
    let json = reply
        .to_json()
        .map_err(|e| AppError::UserError(format!("failed to serialize response: {}", e)))?;
    println!("{}", json);
    Ok(())
}

/// Convert a manager outcome into the front-end result, logging store faults.
pub(crate) fn finish<T>(action: &str, result: std::result::Result<T, LockError>) -> Result<T> {
    result.map_err(|err| {
        if let LockError::Store(detail) = &err {
            tracing::error!(action, error = %detail, "lock store failure");
        }
        AppError::Lock(err)
    })
}
