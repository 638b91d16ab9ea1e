//! Implementation of the `assetlock unlock` and `assetlock unlock-many` commands.

use crate::cli::{GlobalArgs, UnlockArgs, UnlockManyArgs};
use crate::error::Result;
use crate::events::{self, Event, EventAction};
use crate::manager::ReleaseOutcome;
use serde_json::json;

use super::{Session, emit, finish};

/// Execute the `assetlock unlock` command.
///
/// Unlike `unlock-many`, a missing lock or a refusal is an error here.
pub fn cmd_unlock(global: &GlobalArgs, args: UnlockArgs) -> Result<()> {
    let session = Session::open(global)?;

    let result = session
        .manager()
        .release(&args.repo, args.id, &session.requester, args.force);
    emit(&session.presenter().deleted(&result))?;
    let lock = finish("delete lock", result)?;

    tracing::info!(id = %lock.id, repository = %lock.repository_id, force = args.force, "lock released");

    let event = Event::new(EventAction::Unlock, session.requester.as_str())
        .with_repository(lock.repository_id.as_str())
        .with_details(json!({
            "id": lock.id.to_string(),
            "path": lock.path,
            "owner": lock.owner_id,
            "force": args.force,
        }));
    events::record(&session.ctx, &event);

    Ok(())
}

/// Execute the `assetlock unlock-many` command.
///
/// Prints the released locks. Ids that were already gone are ignored; ids
/// the requester may not release are skipped and reported on stderr.
pub fn cmd_unlock_many(global: &GlobalArgs, args: UnlockManyArgs) -> Result<()> {
    let session = Session::open(global)?;

    let result = session
        .manager()
        .release_many(&args.repo, &args.ids, &session.requester, args.force);
    emit(&session.presenter().unlocked(&result))?;
    let batch = finish("unlock", result)?;

    for report in &batch.reports {
        if let ReleaseOutcome::Unauthorized(reason) = &report.outcome {
            eprintln!("Skipped lock {}: {}", report.id, reason);
        }
    }

    if batch.released.is_empty() {
        return Ok(());
    }

    let released: Vec<String> = batch.released.iter().map(|l| l.id.to_string()).collect();
    let skipped: Vec<String> = batch.refused().map(|r| r.id.to_string()).collect();
    tracing::info!(repository = %args.repo, released = released.len(), skipped = skipped.len(), "locks released");

    let event = Event::new(EventAction::UnlockMany, session.requester.as_str())
        .with_repository(args.repo.as_str())
        .with_details(json!({
            "released": released,
            "skipped": skipped,
            "force": args.force,
        }));
    events::record(&session.ctx, &event);

    Ok(())
}
