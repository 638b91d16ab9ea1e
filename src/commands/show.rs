//! Implementation of the `assetlock show` command.

use crate::cli::{GlobalArgs, ShowArgs};
use crate::error::Result;

use super::{Session, emit, finish};

/// Execute the `assetlock show` command.
///
/// Prints `{"lock": ...}` for a lock of the repository. Locks of other
/// repositories are reported as not found.
pub fn cmd_show(global: &GlobalArgs, args: ShowArgs) -> Result<()> {
    let session = Session::open(global)?;

    let result = session
        .manager()
        .get(&args.repo, &session.requester, args.id);
    emit(&session.presenter().found(&result))?;
    finish("get lock", result)?;

    Ok(())
}
