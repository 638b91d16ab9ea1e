//! Implementation of the `assetlock locks` and `assetlock verify` commands.
//!
//! Both print one page. Pass the returned `next_cursor` back as `--cursor`,
//! with the same `--limit`, to fetch the following page.

use crate::cli::{GlobalArgs, ListArgs};
use crate::error::Result;

use super::{Session, emit, finish};

/// Execute the `assetlock locks` command.
pub fn cmd_locks(global: &GlobalArgs, args: ListArgs) -> Result<()> {
    let session = Session::open(global)?;
    let limit = session.config.page_limit(args.limit);

    let result = session
        .manager()
        .list(&args.repo, &session.requester, args.cursor, limit);
    emit(&session.presenter().listed(&result))?;
    finish("list locks", result)?;

    Ok(())
}

/// Execute the `assetlock verify` command.
pub fn cmd_verify(global: &GlobalArgs, args: ListArgs) -> Result<()> {
    let session = Session::open(global)?;
    let limit = session.config.page_limit(args.limit);

    let result = session
        .manager()
        .verify(&args.repo, &session.requester, args.cursor, limit);
    emit(&session.presenter().verified(&result))?;
    finish("verify locks", result)?;

    Ok(())
}
