//! Tests for lock records and path normalization.

use super::*;
use chrono::{TimeZone, Utc};

fn sample_lock() -> Lock {
    Lock {
        id: LockId(42),
        repository_id: "games/tower".to_string(),
        path: "art/hero.psd".to_string(),
        owner_id: "alice".to_string(),
        locked_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
    }
}

#[test]
fn test_normalize_plain_path_unchanged() {
    assert_eq!(normalize_path("art/hero.psd").as_deref(), Some("art/hero.psd"));
}

#[test]
fn test_normalize_strips_leading_and_trailing_slashes() {
    assert_eq!(normalize_path("/art/hero.psd/").as_deref(), Some("art/hero.psd"));
    assert_eq!(normalize_path("//art//hero.psd").as_deref(), Some("art/hero.psd"));
}

#[test]
fn test_normalize_converts_backslashes() {
    assert_eq!(normalize_path(r"art\sprites\hero.png").as_deref(), Some("art/sprites/hero.png"));
}

#[test]
fn test_normalize_resolves_dot_segments() {
    assert_eq!(normalize_path("art/./hero.psd").as_deref(), Some("art/hero.psd"));
    assert_eq!(normalize_path("art/old/../hero.psd").as_deref(), Some("art/hero.psd"));
}

#[test]
fn test_normalize_never_climbs_above_root() {
    assert_eq!(normalize_path("../../etc/passwd").as_deref(), Some("etc/passwd"));
    assert_eq!(normalize_path("a/../../b").as_deref(), Some("b"));
}

#[test]
fn test_normalize_rejects_empty_results() {
    assert_eq!(normalize_path(""), None);
    assert_eq!(normalize_path("/"), None);
    assert_eq!(normalize_path("."), None);
    assert_eq!(normalize_path("a/.."), None);
}

#[test]
fn test_normalize_is_case_sensitive() {
    assert_eq!(normalize_path("Art/Hero.PSD").as_deref(), Some("Art/Hero.PSD"));
}

#[test]
fn test_lock_id_parse() {
    assert_eq!("17".parse::<LockId>().unwrap(), LockId(17));
    assert_eq!(" 3 ".parse::<LockId>().unwrap(), LockId(3));
    assert!("abc".parse::<LockId>().is_err());
    assert!("-1".parse::<LockId>().is_err());
}

#[test]
fn test_lock_id_orders_numerically() {
    let mut ids = vec![LockId(10), LockId(2), LockId(33)];
    ids.sort();
    assert_eq!(ids, vec![LockId(2), LockId(10), LockId(33)]);
}

#[test]
fn test_lock_serialization_roundtrip() {
    let lock = sample_lock();
    let json = serde_json::to_string(&lock).unwrap();

    assert!(json.contains("\"id\":42"));
    assert!(json.contains("art/hero.psd"));

    let parsed: Lock = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, lock);
}

#[test]
fn test_lock_ownership() {
    let lock = sample_lock();
    assert!(lock.is_owned_by("alice"));
    assert!(!lock.is_owned_by("bob"));
}

#[test]
fn test_lock_display() {
    let display = sample_lock().to_string();
    assert!(display.contains("games/tower:art/hero.psd"));
    assert!(display.contains("owner: alice"));
    assert!(display.contains("2024-03-01 09:30:00 UTC"));
}
