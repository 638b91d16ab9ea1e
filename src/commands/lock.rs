//! Implementation of the `assetlock lock` command.

use crate::cli::{GlobalArgs, LockArgs};
use crate::error::Result;
use crate::events::{self, Event, EventAction};
use serde_json::json;

use super::{Session, emit, finish};

/// Execute the `assetlock lock` command.
///
/// Never waits for the holder. On conflict the error envelope carries the
/// lock that is in the way.
pub fn cmd_lock(global: &GlobalArgs, args: LockArgs) -> Result<()> {
    let session = Session::open(global)?;

    let result = session
        .manager()
        .acquire(&args.repo, &args.path, &session.requester);
    emit(&session.presenter().created(&result))?;
    let lock = finish("create lock", result)?;

    tracing::info!(id = %lock.id, repository = %lock.repository_id, path = %lock.path, "lock created");

    let event = Event::new(EventAction::Lock, session.requester.as_str())
        .with_repository(lock.repository_id.as_str())
        .with_details(json!({
            "id": lock.id.to_string(),
            "path": lock.path,
        }));
    events::record(&session.ctx, &event);

    Ok(())
}
