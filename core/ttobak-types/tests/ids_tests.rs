use std::collections::HashSet;
use std::str::FromStr;
use ttobak_types::{DeviceId, Error, UserId};

// ── DeviceId ─────────────────────────────────────────────────────

#[test]
fn device_id_new_is_unique() {
    let a = DeviceId::new();
    let b = DeviceId::new();
    assert_ne!(a, b);
}

#[test]
fn device_id_display_and_parse() {
    let id = DeviceId::new();
    let parsed = DeviceId::parse(&id.to_string()).unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn device_id_parse_trims_whitespace() {
    let id = DeviceId::new();
    let parsed = DeviceId::parse(&format!("  {id}\n")).unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn device_id_parse_invalid() {
    assert!(matches!(
        DeviceId::parse("not-a-uuid"),
        Err(Error::InvalidUuid(_))
    ));
    assert!(matches!(DeviceId::from_str(""), Err(Error::InvalidUuid(_))));
}

#[test]
fn device_id_hash_and_eq() {
    let id = DeviceId::new();
    let mut set = HashSet::new();
    set.insert(id);
    set.insert(id);
    assert_eq!(set.len(), 1);
}

#[test]
fn device_id_serde_is_transparent() {
    let id = DeviceId::new();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, format!("\"{id}\""));
}

// ── UserId ───────────────────────────────────────────────────────

#[test]
fn user_id_serde_is_transparent() {
    let id = UserId::parse("7f0c2a44-5d55-4c62-9d7b-0d5b7cc7d2a1").unwrap();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"7f0c2a44-5d55-4c62-9d7b-0d5b7cc7d2a1\"");
    let back: UserId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}

#[test]
fn user_id_from_str() {
    let parsed: UserId = "7f0c2a44-5d55-4c62-9d7b-0d5b7cc7d2a1".parse().unwrap();
    assert_eq!(parsed.to_string(), "7f0c2a44-5d55-4c62-9d7b-0d5b7cc7d2a1");
}

#[test]
fn user_id_parse_invalid() {
    let err = UserId::parse("user-1").unwrap_err();
    assert!(matches!(err, Error::InvalidUuid(_)));
    assert!(err.to_string().starts_with("invalid UUID"));
}
