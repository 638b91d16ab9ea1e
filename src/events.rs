//! Audit log for assetlock.
//!
//! Every successful mutation appends one event to an append-only NDJSON file
//! at `<root>/events/events.ndjson`. Each line is a JSON object with:
//! - `ts`: RFC3339 timestamp
//! - `action`: `init`, `lock`, `unlock` or `unlock_many`
//! - `actor`: the requester
//! - `repository`: the repository, for lock events
//! - `details`: action-specific object
//!
//! Appends happen after the mutation has committed. A failed append does not
//! undo the mutation; callers log it and carry on.
//!
//! ```no_run
//! use assetlock::context::StoreContext;
//! use assetlock::events::{Event, EventAction, append_event};
//! use serde_json::json;
//!
//! let ctx = StoreContext::resolve(None)?;
//! let event = Event::new(EventAction::Lock, "alice")
//!     .with_repository("games/tower")
//!     .with_details(json!({"id": "1", "path": "art/hero.psd"}));
//! append_event(&ctx, &event)?;
//! # Ok::<(), assetlock::error::AppError>(())
//! ```

use crate::context::StoreContext;
use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// State root initialized
    Init,
    /// Lock acquired
    Lock,
    /// Single lock released
    Unlock,
    /// Bulk release
    UnlockMany,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::Init => write!(f, "init"),
            EventAction::Lock => write!(f, "lock"),
            EventAction::Unlock => write!(f, "unlock"),
            EventAction::UnlockMany => write!(f, "unlock_many"),
        }
    }
}

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// When the event occurred.
    pub ts: DateTime<Utc>,

    pub action: EventAction,

    /// The requester who performed the action.
    pub actor: String,

    /// Repository the action touched, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event stamped with the current time.
    pub fn new(action: EventAction, actor: impl Into<String>) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: actor.into(),
            repository: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_repository(mut self, repository_id: impl Into<String>) -> Self {
        self.repository = Some(repository_id.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| AppError::UserError(format!("failed to serialize event to JSON: {}", e)))
    }
}

/// Append an event to the events log, creating the file if needed.
pub fn append_event(ctx: &StoreContext, event: &Event) -> Result<()> {
    let events_file = ctx.events_file();
    let json_line = event.to_ndjson_line()?;

    let events_dir = ctx.events_dir();
    fs::create_dir_all(&events_dir).map_err(|e| {
        AppError::UserError(format!(
            "failed to create events directory '{}': {}",
            events_dir.display(),
            e
        ))
    })?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&events_file)
        .map_err(|e| {
            AppError::UserError(format!(
                "failed to open events file '{}': {}",
                events_file.display(),
                e
            ))
        })?;

    writeln!(file, "{}", json_line).map_err(|e| {
        AppError::UserError(format!(
            "failed to write event to '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    file.sync_all().map_err(|e| {
        AppError::UserError(format!(
            "failed to sync events file '{}': {}",
            events_file.display(),
            e
        ))
    })?;

    Ok(())
}

/// Append an event, logging instead of failing.
///
/// Used after a mutation has already committed.
pub fn record(ctx: &StoreContext, event: &Event) {
    if let Err(e) = append_event(ctx, event) {
        tracing::warn!(action = %event.action, error = %e, "failed to append audit event");
    }
}

/// Read every event in the log, oldest first. Malformed lines are skipped.
pub fn read_events(ctx: &StoreContext) -> Result<Vec<Event>> {
    let events_file = ctx.events_file();
    let file = match fs::File::open(&events_file) {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(AppError::UserError(format!(
                "failed to open events file '{}': {}",
                events_file.display(),
                e
            )));
        }
    };

    let mut events = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| {
            AppError::UserError(format!(
                "failed to read events file '{}': {}",
                events_file.display(),
                e
            ))
        })?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Event>(&line) {
            Ok(event) => events.push(event),
            Err(e) => tracing::warn!(error = %e, "skipping malformed audit event"),
        }
    }

    Ok(events)
}
