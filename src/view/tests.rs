//! Tests for lock presentation.

use super::*;
use crate::locks::LockId;
use crate::manager::{ReleaseOutcome, ReleaseReport};
use chrono::{TimeZone, Utc};
use std::collections::HashMap;

struct Names(HashMap<&'static str, &'static str>);

impl OwnerDirectory for Names {
    fn display_name(&self, user_id: &str) -> Option<String> {
        self.0.get(user_id).map(|name| name.to_string())
    }
}

fn names() -> Names {
    Names(HashMap::from([("alice", "Alice Liddell"), ("bob", "Bob")]))
}

fn lock(id: u64, path: &str, owner: &str) -> Lock {
    Lock {
        id: LockId(id),
        repository_id: "games/tower".to_string(),
        path: path.to_string(),
        owner_id: owner.to_string(),
        locked_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
            + chrono::Duration::milliseconds(400),
    }
}

#[test]
fn lock_view_shape() {
    let names = names();
    let presenter = Presenter::new(&names);

    let view = presenter.lock(&lock(12, "art/hero.psd", "alice"));

    assert_eq!(view.id, "12");
    assert_eq!(view.path, "art/hero.psd");
    assert_eq!(view.locked_at, "2024-03-01T09:30:00Z");
    assert_eq!(view.owner.name, "Alice Liddell");

    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "id": "12",
            "path": "art/hero.psd",
            "locked_at": "2024-03-01T09:30:00Z",
            "owner": {"name": "Alice Liddell"}
        })
    );
}

#[test]
fn locked_at_rounds_to_nearest_second() {
    let names = names();
    let presenter = Presenter::new(&names);

    let mut late = lock(1, "a.psd", "alice");
    late.locked_at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
        + chrono::Duration::milliseconds(700);

    assert_eq!(presenter.lock(&late).locked_at, "2024-03-01T09:30:01Z");
}

#[test]
fn unknown_owner_renders_as_ghost() {
    let names = names();
    let presenter = Presenter::new(&names);

    let view = presenter.lock(&lock(3, "a.psd", "deleted-user"));
    assert_eq!(view.owner.name, GHOST_NAME);
}

#[test]
fn created_reply() {
    let names = names();
    let presenter = Presenter::new(&names);

    let reply = presenter.created(&Ok(lock(1, "a.psd", "alice")));
    assert_eq!(reply.status, Status::Created);
    assert!(reply.is_success());

    let json: serde_json::Value = serde_json::from_str(&reply.to_json().unwrap()).unwrap();
    assert_eq!(json["lock"]["id"], "1");
}

#[test]
fn conflict_carries_holder() {
    let names = names();
    let presenter = Presenter::new(&names)
        .with_documentation_url(Some("https://example.test/locks"))
        .with_request_id(Some("req-7"));

    let holder = lock(5, "art.psd", "alice");
    let reply = presenter.created(&Err(LockError::AlreadyLocked(Box::new(holder.clone()))));

    assert_eq!(reply.status, Status::Conflict);
    match &reply.body {
        Body::Failure(body) => {
            assert_eq!(body.message, "already created lock");
            assert_eq!(body.lock.as_ref(), Some(&presenter.lock(&holder)));
            assert_eq!(body.documentation_url.as_deref(), Some("https://example.test/locks"));
            assert_eq!(body.request_id.as_deref(), Some("req-7"));
        }
        Body::Success(_) => panic!("expected failure"),
    }
}

#[test]
fn error_statuses() {
    let names = names();
    let presenter = Presenter::new(&names);

    let cases = [
        (LockError::NotFound(LockId(4)), Status::NotFound),
        (LockError::Unauthorized("no".into()), Status::Forbidden),
        (LockError::InvalidPath("".into()), Status::UnprocessableEntity),
        (LockError::Store("disk".into()), Status::InternalError),
    ];

    for (err, expected) in cases {
        let (status, body) = presenter.error("list locks", &err);
        assert_eq!(status, expected);
        assert!(body.lock.is_none());
        assert!(body.documentation_url.is_none());
    }
}

#[test]
fn internal_error_hides_detail() {
    let names = names();
    let presenter = Presenter::new(&names);

    let reply = presenter.listed(&Err(LockError::Store("/var/lib/secret: EIO".into())));
    let json = reply.to_json().unwrap();

    assert_eq!(reply.status, Status::InternalError);
    assert!(json.contains("unable to list locks : Internal Server Error"));
    assert!(!json.contains("secret"));
}

#[test]
fn optional_error_fields_are_omitted() {
    let json = serde_json::to_value(ErrorBody::new("nope")).unwrap();
    assert_eq!(json, serde_json::json!({"message": "nope"}));
}

#[test]
fn list_next_cursor_is_string_and_optional() {
    let names = names();
    let presenter = Presenter::new(&names);

    let full = presenter.listed(&Ok(LockPage {
        locks: vec![lock(1, "a.psd", "alice")],
        next_cursor: Some(3),
    }));
    let json: serde_json::Value = serde_json::from_str(&full.to_json().unwrap()).unwrap();
    assert_eq!(json["next_cursor"], "3");

    let last = presenter.listed(&Ok(LockPage::default()));
    let json: serde_json::Value = serde_json::from_str(&last.to_json().unwrap()).unwrap();
    assert_eq!(json, serde_json::json!({"locks": []}));
}

#[test]
fn verify_reply_splits_lists() {
    let names = names();
    let presenter = Presenter::new(&names);

    let reply = presenter.verified(&Ok(VerifyPage {
        ours: vec![lock(1, "a.psd", "alice")],
        theirs: vec![lock(2, "b.psd", "bob")],
        next_cursor: None,
    }));

    match reply.body {
        Body::Success(list) => {
            assert_eq!(list.ours.len(), 1);
            assert_eq!(list.theirs[0].owner.name, "Bob");
            assert_eq!(list.next_cursor, None);
        }
        Body::Failure(body) => panic!("unexpected failure: {}", body.message),
    }
}

#[test]
fn unlocked_lists_only_released() {
    let names = names();
    let presenter = Presenter::new(&names);

    let batch = BatchRelease {
        released: vec![lock(1, "a.psd", "alice")],
        reports: vec![
            ReleaseReport {
                id: LockId(1),
                outcome: ReleaseOutcome::Released,
            },
            ReleaseReport {
                id: LockId(2),
                outcome: ReleaseOutcome::Unauthorized("not yours".into()),
            },
        ],
    };

    let reply = presenter.unlocked(&Ok(batch));
    assert_eq!(reply.status, Status::Ok);
    let json: serde_json::Value = serde_json::from_str(&reply.to_json().unwrap()).unwrap();
    assert_eq!(json["locks"].as_array().unwrap().len(), 1);
    assert_eq!(json["locks"][0]["id"], "1");
}

#[test]
fn status_codes() {
    assert_eq!(Status::Created.code(), 201);
    assert_eq!(Status::Conflict.code(), 409);
    assert_eq!(Status::Conflict.to_string(), "409 Conflict");
    assert!(Status::Ok.is_success());
    assert!(!Status::NotFound.is_success());
    assert_eq!(Status::Forbidden.exit_code(), crate::exit_codes::UNAUTHORIZED);
}
