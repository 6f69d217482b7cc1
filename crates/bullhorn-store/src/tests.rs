use crate::error::StoreError;
use crate::{Directory, MemStore};
use bullhorn_common::types::{
    Alert, ChannelKind, NotificationDelivery, Severity, Team, User, Visibility,
};
use chrono::{Duration, TimeZone, Utc};

fn make_alert(id: &str) -> Alert {
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    Alert {
        id: id.to_string(),
        title: "Maintenance".to_string(),
        message: "Scheduled maintenance tonight".to_string(),
        severity: Severity::Warning,
        channel: ChannelKind::InApp,
        visibility: Visibility::Organization,
        visibility_ids: None,
        start_time: now,
        expiry_time: None,
        reminder_enabled: true,
        reminder_frequency_minutes: 120,
        archived: false,
        created_at: now,
    }
}

fn make_delivery(id: &str, alert_id: &str, user_id: &str, minutes: i64) -> NotificationDelivery {
    NotificationDelivery {
        id: id.to_string(),
        alert_id: alert_id.to_string(),
        user_id: user_id.to_string(),
        delivered_at: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
            + Duration::minutes(minutes),
        channel: ChannelKind::InApp,
    }
}

#[test]
fn update_alert_unknown_id_is_not_found() {
    let store = MemStore::new();
    let err = store
        .update_alert("missing", |a| a.archived = true)
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::NotFound { entity: "alert", .. }
    ));
}

#[test]
fn update_alert_applies_in_place() {
    let store = MemStore::new();
    store.insert_alert(make_alert("a1"));
    let updated = store
        .update_alert("a1", |a| a.severity = Severity::Critical)
        .unwrap();
    assert_eq!(updated.severity, Severity::Critical);
    assert_eq!(store.get_alert("a1").unwrap().severity, Severity::Critical);
}

#[test]
fn ensure_preference_is_create_if_absent() {
    let store = MemStore::new();
    let pref = store.ensure_preference("u1", "a1");
    assert_eq!(pref.state_name(), "unread");

    // Mutate, then ensure again: the existing record must win
    let mut read = pref.clone();
    read.mark_read(Utc::now());
    store.put_preference(read);

    let again = store.ensure_preference("u1", "a1");
    assert_eq!(again.state_name(), "read");
    assert_eq!(store.list_preferences().len(), 1);
}

#[test]
fn last_delivery_picks_most_recent_timestamp() {
    let store = MemStore::new();
    store.append_delivery(make_delivery("d1", "a1", "u1", 0));
    store.append_delivery(make_delivery("d2", "a1", "u1", 30));
    store.append_delivery(make_delivery("d3", "a1", "u2", 60));

    let last = store.last_delivery("a1", "u1").unwrap();
    assert_eq!(last.id, "d2");
    assert!(store.last_delivery("a2", "u1").is_none());
}

#[test]
fn last_delivery_ties_break_toward_later_append() {
    let store = MemStore::new();
    store.append_delivery(make_delivery("d1", "a1", "u1", 10));
    store.append_delivery(make_delivery("d2", "a1", "u1", 10));

    assert_eq!(store.last_delivery("a1", "u1").unwrap().id, "d2");
}

#[test]
fn directory_lookups() {
    let store = MemStore::new();
    store.insert_team(Team {
        id: "t1".to_string(),
        name: "Engineering".to_string(),
    });
    store.insert_user(User {
        id: "u1".to_string(),
        name: "Alice".to_string(),
        team_id: Some("t1".to_string()),
    });

    assert_eq!(store.list_users().len(), 1);
    assert_eq!(store.list_teams().len(), 1);
    assert_eq!(store.get_user("u1").unwrap().name, "Alice");
    assert!(store.get_user("u2").is_none());
}

#[test]
fn pair_lock_is_stable_per_pair() {
    let store = MemStore::new();
    let a = store.pair_lock("u1", "a1");
    let b = store.pair_lock("u1", "a1");
    let other = store.pair_lock("u2", "a1");
    assert!(std::sync::Arc::ptr_eq(&a, &b));
    assert!(!std::sync::Arc::ptr_eq(&a, &other));
}

#[test]
fn refresh_preference_collapses_expired_snooze_only() {
    let store = MemStore::new();
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();

    let mut pref = store.ensure_preference("u1", "a1");
    pref.snooze(now - Duration::minutes(5));
    store.put_preference(pref);

    let refreshed = store.refresh_preference("u1", "a1", now);
    assert_eq!(refreshed.state_name(), "unread");
    assert!(refreshed.snoozed_until().is_none());

    // A committed read is left untouched by a later refresh
    let mut pref = store.get_preference("u1", "a1").unwrap();
    pref.mark_read(now);
    store.put_preference(pref);
    let refreshed = store.refresh_preference("u1", "a1", now);
    assert_eq!(refreshed.last_read_at(), Some(now));

    // An unexpired snooze survives
    let mut pref = store.get_preference("u1", "a1").unwrap();
    pref.snooze(now + Duration::hours(1));
    store.put_preference(pref);
    let refreshed = store.refresh_preference("u1", "a1", now);
    assert!(refreshed.is_snoozed(now));

    // Unknown pair is created unread
    let created = store.refresh_preference("u2", "a1", now);
    assert_eq!(created.state_name(), "unread");
}

#[test]
fn clear_drops_everything() {
    let store = MemStore::new();
    store.insert_alert(make_alert("a1"));
    store.ensure_preference("u1", "a1");
    store.append_delivery(make_delivery("d1", "a1", "u1", 0));

    store.clear();

    assert_eq!(store.alert_count(), 0);
    assert_eq!(store.delivery_count(), 0);
    assert!(store.list_preferences().is_empty());
}
