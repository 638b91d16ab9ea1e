//! CLI argument parsing for assetlock.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use crate::locks::LockId;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Assetlock: exclusive path locks for repositories of unmergeable files.
///
/// A lock reserves one path in one repository for one user. Others can see
/// who holds it and are refused until the holder (or a maintainer, with
/// --force) releases it. Every command prints its JSON response on stdout.
#[derive(Parser, Debug)]
#[command(name = "assetlock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// State root directory (default: $ASSETLOCK_ROOT, else ./.assetlock).
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Requesting user id (default: $USER).
    #[arg(short, long, global = true, value_name = "ID")]
    pub user: Option<String>,
}

/// Available commands for assetlock.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize the state root.
    ///
    /// Creates the lock store, the events log directory and a config.yaml
    /// template. Safe to run again.
    Init,

    /// Lock a path.
    ///
    /// Fails immediately with the holder if the path is already locked.
    Lock(LockArgs),

    /// List locks of a repository, one page at a time.
    Locks(ListArgs),

    /// List locks split into yours and everyone else's.
    Verify(ListArgs),

    /// Show one lock.
    Show(ShowArgs),

    /// Release one lock.
    Unlock(UnlockArgs),

    /// Release several locks, skipping those you may not release.
    UnlockMany(UnlockManyArgs),
}

/// Arguments for the `lock` command.
#[derive(Args, Debug)]
pub struct LockArgs {
    /// Repository id.
    pub repo: String,

    /// Path to lock, relative to the repository root.
    pub path: String,
}

/// Arguments for the `locks` and `verify` commands.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Repository id.
    pub repo: String,

    /// Page index returned as `next_cursor` by the previous page.
    #[arg(long, default_value_t = 0)]
    pub cursor: usize,

    /// Page size; 0 or less lists everything (default: from config).
    #[arg(long, allow_negative_numbers = true)]
    pub limit: Option<i64>,
}

/// Arguments for the `show` command.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Repository id.
    pub repo: String,

    /// Lock id.
    pub id: LockId,
}

/// Arguments for the `unlock` command.
#[derive(Args, Debug)]
pub struct UnlockArgs {
    /// Repository id.
    pub repo: String,

    /// Lock id.
    pub id: LockId,

    /// Release a lock held by someone else (maintainers only).
    #[arg(short, long)]
    pub force: bool,
}

/// Arguments for the `unlock-many` command.
#[derive(Args, Debug)]
pub struct UnlockManyArgs {
    /// Repository id.
    pub repo: String,

    /// Lock ids.
    #[arg(required = true, num_args = 1..)]
    pub ids: Vec<LockId>,

    /// Release locks held by others (maintainers only).
    #[arg(short, long)]
    pub force: bool,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
