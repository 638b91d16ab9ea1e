//! Presentation of locks and lock outcomes.
//!
//! [`Presenter`] turns manager results into the externally visible shapes:
//!
//! ```json
//! {"id": "12", "path": "art/hero.psd", "locked_at": "2024-03-01T09:30:00Z", "owner": {"name": "Alice"}}
//! ```
//!
//! and failures into the uniform error envelope
//! `{message, lock?, documentation_url?, request_id?}` with a transport
//! [`Status`]. Owner names are looked up at render time; an owner the
//! directory does not know renders as [`GHOST_NAME`].
//!
//! Store failures render with a generic message only. Their detail is for
//! the caller's logs, never for the response.

mod status;

#[cfg(test)]
mod tests;

use chrono::{SecondsFormat, SubsecRound};
use serde::{Deserialize, Serialize};

use crate::access::OwnerDirectory;
use crate::error::LockError;
use crate::locks::Lock;
use crate::manager::{BatchRelease, LockPage, VerifyPage};

pub use status::Status;

/// Owner name rendered when the directory cannot resolve a lock's owner.
pub const GHOST_NAME: &str = "Ghost";

/// Lock owner as shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockOwnerView {
    pub name: String,
}

/// Lock as shown to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockView {
    pub id: String,
    pub path: String,
    /// RFC 3339, UTC, whole seconds.
    pub locked_at: String,
    pub owner: LockOwnerView,
}

/// Response to creating or deleting a single lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockResponse {
    pub lock: LockView,
}

/// Response to listing locks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockList {
    pub locks: Vec<LockView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Response to listing locks for verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockListVerify {
    pub ours: Vec<LockView>,
    pub theirs: Vec<LockView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Response to a bulk unlock: the locks actually released.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockedList {
    pub locks: Vec<LockView>,
}

/// Uniform error envelope for all lock operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock: Option<LockView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            lock: None,
            documentation_url: None,
            request_id: None,
        }
    }

    pub fn with_lock(mut self, lock: LockView) -> Self {
        self.lock = Some(lock);
        self
    }

    pub fn with_documentation_url(mut self, url: impl Into<String>) -> Self {
        self.documentation_url = Some(url.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

/// Response body: the success shape or the error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Body<T> {
    Success(T),
    Failure(ErrorBody),
}

/// A rendered outcome ready for the transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply<T> {
    pub status: Status,
    pub body: Body<T>,
}

impl<T> Reply<T> {
    fn success(status: Status, body: T) -> Self {
        Reply {
            status,
            body: Body::Success(body),
        }
    }

    fn failure(status: Status, body: ErrorBody) -> Self {
        Reply {
            status,
            body: Body::Failure(body),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.body, Body::Success(_))
    }
}

impl<T: Serialize> Reply<T> {
    /// Pretty JSON of the body, as a transport would send it.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.body)
    }
}

/// Renders locks and manager outcomes.
pub struct Presenter<'a, D: ?Sized> {
    owners: &'a D,
    documentation_url: Option<&'a str>,
    request_id: Option<&'a str>,
}

impl<'a, D: OwnerDirectory + ?Sized> Presenter<'a, D> {
    pub fn new(owners: &'a D) -> Self {
        Presenter {
            owners,
            documentation_url: None,
            request_id: None,
        }
    }

    /// Attach a documentation link to every error envelope.
    pub fn with_documentation_url(mut self, url: Option<&'a str>) -> Self {
        self.documentation_url = url;
        self
    }

    /// Attach a request id to every error envelope.
    pub fn with_request_id(mut self, request_id: Option<&'a str>) -> Self {
        self.request_id = request_id;
        self
    }

    /// Render a single lock. Never fails.
    pub fn lock(&self, lock: &Lock) -> LockView {
        let name = self
            .owners
            .display_name(&lock.owner_id)
            .unwrap_or_else(|| GHOST_NAME.to_string());

        LockView {
            id: lock.id.to_string(),
            path: lock.path.clone(),
            locked_at: lock
                .locked_at
                .round_subsecs(0)
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            owner: LockOwnerView { name },
        }
    }

    fn locks(&self, locks: &[Lock]) -> Vec<LockView> {
        locks.iter().map(|lock| self.lock(lock)).collect()
    }

    /// Render a failed operation. `action` names it in the internal-error message.
    pub fn error(&self, action: &str, err: &LockError) -> (Status, ErrorBody) {
        let (status, mut body) = match err {
            LockError::AlreadyLocked(holder) => (
                Status::Conflict,
                ErrorBody::new(err.to_string()).with_lock(self.lock(holder)),
            ),
            LockError::NotFound(_) => (Status::NotFound, ErrorBody::new(err.to_string())),
            LockError::Unauthorized(_) => (Status::Forbidden, ErrorBody::new(err.to_string())),
            LockError::InvalidPath(_) => {
                (Status::UnprocessableEntity, ErrorBody::new(err.to_string()))
            }
            LockError::Store(_) => (
                Status::InternalError,
                ErrorBody::new(format!("unable to {} : Internal Server Error", action)),
            ),
        };

        if let Some(url) = self.documentation_url {
            body = body.with_documentation_url(url);
        }
        if let Some(request_id) = self.request_id {
            body = body.with_request_id(request_id);
        }

        (status, body)
    }

    fn render<T, R>(
        &self,
        action: &str,
        status: Status,
        result: &Result<T, LockError>,
        shape: impl FnOnce(&T) -> R,
    ) -> Reply<R> {
        match result {
            Ok(value) => Reply::success(status, shape(value)),
            Err(err) => {
                let (status, body) = self.error(action, err);
                Reply::failure(status, body)
            }
        }
    }

    /// Render the outcome of acquiring a lock.
    pub fn created(&self, result: &Result<Lock, LockError>) -> Reply<LockResponse> {
        self.render("create lock", Status::Created, result, |lock| LockResponse {
            lock: self.lock(lock),
        })
    }

    /// Render the outcome of looking up a single lock.
    pub fn found(&self, result: &Result<Lock, LockError>) -> Reply<LockResponse> {
        self.render("get lock", Status::Ok, result, |lock| LockResponse {
            lock: self.lock(lock),
        })
    }

    /// Render the outcome of releasing a single lock.
    pub fn deleted(&self, result: &Result<Lock, LockError>) -> Reply<LockResponse> {
        self.render("delete lock", Status::Ok, result, |lock| LockResponse {
            lock: self.lock(lock),
        })
    }

    /// Render a page of locks.
    pub fn listed(&self, result: &Result<LockPage, LockError>) -> Reply<LockList> {
        self.render("list locks", Status::Ok, result, |page| LockList {
            locks: self.locks(&page.locks),
            next_cursor: page.next_cursor.map(|c| c.to_string()),
        })
    }

    /// Render a verification page.
    pub fn verified(&self, result: &Result<VerifyPage, LockError>) -> Reply<LockListVerify> {
        self.render("verify locks", Status::Ok, result, |page| LockListVerify {
            ours: self.locks(&page.ours),
            theirs: self.locks(&page.theirs),
            next_cursor: page.next_cursor.map(|c| c.to_string()),
        })
    }

    /// Render a bulk unlock: only the released locks are listed.
    pub fn unlocked(&self, result: &Result<BatchRelease, LockError>) -> Reply<UnlockedList> {
        self.render("unlock", Status::Ok, result, |batch| UnlockedList {
            locks: self.locks(&batch.released),
        })
    }
}
