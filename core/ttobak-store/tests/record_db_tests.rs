mod common;

use chrono::Duration;
use common::{t0, user};
use ttobak_entitlement::{
    AnonymousMode, AuthenticatedMode, EntitlementError, EntitlementEvaluator, LocalEntitlementStore,
    ProChange,
    RecordStore, StateKey, Tier, FREE_LIMIT,
};
use ttobak_store::{RecordDb, StoreError};
use ttobak_types::{DeviceId, PeriodKey};

// ── Profiles ─────────────────────────────────────────────────────

#[test]
fn missing_profile_is_not_pro() {
    let db = RecordDb::open_in_memory().unwrap();
    assert!(!db.is_pro(&user(1)).unwrap());
}

#[test]
fn ensure_profile_keeps_pro_flag() {
    let db = RecordDb::open_in_memory().unwrap();
    db.set_pro(&user(1), true).unwrap();
    db.ensure_profile(&user(1), Some("a@example.com")).unwrap();

    assert!(db.is_pro(&user(1)).unwrap());
    assert_eq!(db.profile_email(&user(1)).unwrap().as_deref(), Some("a@example.com"));
}

#[test]
fn ensure_profile_without_email_keeps_existing_email() {
    let db = RecordDb::open_in_memory().unwrap();
    db.ensure_profile(&user(1), Some("a@example.com")).unwrap();
    db.ensure_profile(&user(1), None).unwrap();
    assert_eq!(db.profile_email(&user(1)).unwrap().as_deref(), Some("a@example.com"));
}

#[test]
fn set_pro_toggles() {
    let db = RecordDb::open_in_memory().unwrap();
    db.set_pro(&user(2), true).unwrap();
    assert!(db.is_pro(&user(2)).unwrap());
    db.set_pro(&user(2), false).unwrap();
    assert!(!db.is_pro(&user(2)).unwrap());
}

// ── Usage ────────────────────────────────────────────────────────

#[test]
fn usage_increments_per_user_and_period() {
    let db = RecordDb::open_in_memory().unwrap();
    let today = PeriodKey::day_of(t0());
    let tomorrow = PeriodKey::day_of(t0() + Duration::days(1));

    assert_eq!(db.usage(&user(1), &today).unwrap(), 0);
    assert_eq!(db.increment_usage(&user(1), &today).unwrap(), 1);
    assert_eq!(db.increment_usage(&user(1), &today).unwrap(), 2);
    assert_eq!(db.increment_usage(&user(1), &tomorrow).unwrap(), 1);
    assert_eq!(db.increment_usage(&user(2), &today).unwrap(), 1);

    assert_eq!(db.usage(&user(1), &today).unwrap(), 2);
    assert_eq!(db.usage(&user(2), &tomorrow).unwrap(), 0);
}

#[test]
fn concurrent_increments_are_not_lost() {
    let db = RecordDb::open_in_memory().unwrap();
    let period = PeriodKey::day_of(t0());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let db = db.clone();
            std::thread::spawn(move || {
                for _ in 0..10 {
                    db.increment_usage(&user(1), &period).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(db.usage(&user(1), &period).unwrap(), 80);
}

// ── Device state ─────────────────────────────────────────────────

#[test]
fn device_state_is_scoped_per_device() {
    let db = RecordDb::open_in_memory().unwrap();
    let a = DeviceId::new();
    let b = DeviceId::new();

    db.device(a).set(StateKey::UsageCount, "3").unwrap();
    assert_eq!(db.device(a).get(StateKey::UsageCount).unwrap().as_deref(), Some("3"));
    assert_eq!(db.device(b).get(StateKey::UsageCount).unwrap(), None);
}

#[test]
fn device_state_overwrites_and_removes() {
    let db = RecordDb::open_in_memory().unwrap();
    let device = db.device(DeviceId::new());

    device.set(StateKey::TrialActive, "true").unwrap();
    device.set(StateKey::TrialActive, "false").unwrap();
    assert_eq!(device.get(StateKey::TrialActive).unwrap().as_deref(), Some("false"));

    device.remove(StateKey::TrialActive).unwrap();
    device.remove(StateKey::TrialEmail).unwrap();
    assert_eq!(device.get(StateKey::TrialActive).unwrap(), None);
    assert!(device.keys().unwrap().is_empty());
}

#[test]
fn device_keys_lists_known_keys() {
    let db = RecordDb::open_in_memory().unwrap();
    let device = db.device(DeviceId::new());
    device.set(StateKey::TrialEmail, "a@example.com").unwrap();
    device.set(StateKey::UsageCount, "1").unwrap();

    let mut keys = device.keys().unwrap();
    keys.sort_by_key(|k| k.as_str());
    assert_eq!(keys, vec![StateKey::TrialEmail, StateKey::UsageCount]);
}

// ── Through the evaluator ────────────────────────────────────────

#[test]
fn anonymous_quota_over_sqlite() {
    let db = RecordDb::open_in_memory().unwrap();
    let mode = AnonymousMode::new(db.device(DeviceId::new()));
    let evaluator = EntitlementEvaluator::default();

    for _ in 0..FREE_LIMIT {
        assert!(evaluator.evaluate_at(&mode, t0()).is_allowed());
        evaluator.commit_at(&mode, t0()).unwrap();
    }
    assert!(!evaluator.evaluate_at(&mode, t0()).is_allowed());

    mode.start_trial_at("user@example.com", t0()).unwrap();
    assert_eq!(evaluator.tier_at(&mode, t0()), Tier::Pro);
    assert_eq!(evaluator.tier_at(&mode, t0() + Duration::days(8)), Tier::Free);
    assert_eq!(
        mode.store().get(StateKey::TrialActive).unwrap().as_deref(),
        Some("false")
    );
}

#[test]
fn authenticated_upgrade_over_sqlite() {
    let db = RecordDb::open_in_memory().unwrap();
    let mode = AuthenticatedMode::new(db.clone(), user(5));
    let evaluator = EntitlementEvaluator::default();

    evaluator.commit_at(&mode, t0()).unwrap();
    mode.apply_pro_change(&ProChange::Checkout { checkout_id: "chk_1".into() })
        .unwrap();
    evaluator.commit_at(&mode, t0()).unwrap();

    assert_eq!(db.usage(&user(5), &PeriodKey::day_of(t0())).unwrap(), 1);
    assert_eq!(evaluator.tier_at(&mode, t0()), Tier::Pro);
}

#[test]
fn checkout_claim_is_bound_to_first_user() {
    let db = RecordDb::open_in_memory().unwrap();
    assert!(db.claim_checkout("chk_1", &user(1)).unwrap());
    assert!(db.claim_checkout("chk_1", &user(1)).unwrap());
    assert!(!db.claim_checkout("chk_1", &user(2)).unwrap());
    assert!(db.claim_checkout("chk_2", &user(2)).unwrap());
}

#[test]
fn redeemed_checkout_cannot_upgrade_another_user() {
    let db = RecordDb::open_in_memory().unwrap();
    let checkout = ProChange::Checkout { checkout_id: "chk_1".into() };
    AuthenticatedMode::new(db.clone(), user(1)).apply_pro_change(&checkout).unwrap();

    let err = AuthenticatedMode::new(db.clone(), user(2))
        .apply_pro_change(&checkout)
        .unwrap_err();
    assert!(matches!(err, EntitlementError::CheckoutAlreadyRedeemed(ref id) if id == "chk_1"));
    assert!(!db.is_pro(&user(2)).unwrap());
}

// ── Files ────────────────────────────────────────────────────────

#[test]
fn state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ttobak.db");
    let device_id = DeviceId::new();

    {
        let db = RecordDb::open(&path).unwrap();
        db.set_pro(&user(1), true).unwrap();
        db.device(device_id).set(StateKey::UsageCount, "4").unwrap();
        db.claim_checkout("chk_1", &user(1)).unwrap();
    }

    let db = RecordDb::open(&path).unwrap();
    assert!(db.is_pro(&user(1)).unwrap());
    assert_eq!(db.device(device_id).get(StateKey::UsageCount).unwrap().as_deref(), Some("4"));
    assert!(!db.claim_checkout("chk_1", &user(2)).unwrap());
}

#[test]
fn open_in_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = RecordDb::open(dir.path().join("missing").join("ttobak.db")).unwrap_err();
    assert!(matches!(err, StoreError::Database(_)));
}
