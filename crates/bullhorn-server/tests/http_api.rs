mod common;

use axum::http::StatusCode;
use bullhorn_common::clock::Clock;
use bullhorn_common::types::{Alert, MetricsSnapshot, ReminderRunSummary};
use chrono::Duration;
use common::{
    assert_err_envelope, assert_ok_envelope, build_test_context, decode_data, request_json,
    request_no_body, seed_via_api,
};
use serde_json::json;

#[tokio::test]
async fn health_should_return_ok_envelope() {
    let ctx = build_test_context();
    let (status, body, trace) = request_no_body(&ctx.app, "GET", "/v1/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_ok_envelope(&body);
    assert!(body["data"]["version"].is_string());
    assert_eq!(body["data"]["alert_count"], 0);
    assert!(trace.is_some());
}

#[tokio::test]
async fn create_alert_validates_fields() {
    let ctx = build_test_context();

    let (status, body, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/admin/alerts",
        Some(json!({"title": "  ", "message": "body"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_err_envelope(&body, 1001);

    let (status, body, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/admin/alerts",
        Some(json!({
            "title": "Bad frequency",
            "message": "body",
            "reminder_frequency_minutes": 0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_err_envelope(&body, 1001);
}

#[tokio::test]
async fn create_alert_applies_defaults() {
    let ctx = build_test_context();

    let (status, body, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/admin/alerts",
        Some(json!({"title": "Minimal", "message": "defaults everywhere"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_ok_envelope(&body);

    let alert: Alert = decode_data(&body);
    assert_eq!(alert.severity.to_string(), "info");
    assert_eq!(alert.visibility.to_string(), "organization");
    assert!(alert.reminder_enabled);
    assert_eq!(alert.reminder_frequency_minutes, 120);
    assert!(!alert.archived);
    assert_eq!(alert.start_time, ctx.clock.now());
}

#[tokio::test]
async fn admin_list_filters_by_severity_and_activity() {
    let ctx = build_test_context();
    seed_via_api(&ctx.app).await;

    let (status, body, _) =
        request_no_body(&ctx.app, "GET", "/v1/admin/alerts?severity__eq=critical").await;
    assert_eq!(status, StatusCode::OK);
    let alerts: Vec<Alert> = decode_data(&body);
    assert_eq!(alerts.len(), 1);

    let (status, body, _) =
        request_no_body(&ctx.app, "GET", "/v1/admin/alerts?active__eq=false").await;
    assert_eq!(status, StatusCode::OK);
    let alerts: Vec<Alert> = decode_data(&body);
    assert!(alerts.is_empty());

    let (status, body, _) =
        request_no_body(&ctx.app, "GET", "/v1/admin/alerts?severity__eq=nonsense").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_err_envelope(&body, 1001);
}

#[tokio::test]
async fn update_unknown_alert_is_not_found() {
    let ctx = build_test_context();
    let (status, body, _) = request_json(
        &ctx.app,
        "PUT",
        "/v1/admin/alerts/does-not-exist",
        Some(json!({"title": "new title"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_err_envelope(&body, 1004);
}

#[tokio::test]
async fn archiving_removes_alert_from_public_list() {
    let ctx = build_test_context();

    let (_, body, _) = request_json(
        &ctx.app,
        "POST",
        "/v1/admin/alerts",
        Some(json!({"title": "Ephemeral", "message": "soon gone"})),
    )
    .await;
    let alert: Alert = decode_data(&body);

    let (status, body, _) = request_no_body(&ctx.app, "GET", "/v1/alerts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let (status, _, _) = request_json(
        &ctx.app,
        "PUT",
        &format!("/v1/admin/alerts/{}", alert.id),
        Some(json!({"archived": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body, _) = request_no_body(&ctx.app, "GET", "/v1/alerts").await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));

    // Still visible through the admin surface
    let (_, body, _) = request_no_body(&ctx.app, "GET", "/v1/admin/alerts").await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn seed_populates_directory_and_alerts() {
    let ctx = build_test_context();
    seed_via_api(&ctx.app).await;

    let (status, body, _) = request_no_body(&ctx.app, "GET", "/v1/teams").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));

    let (status, body, _) = request_no_body(&ctx.app, "GET", "/v1/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(3));

    let (status, body, _) = request_no_body(&ctx.app, "GET", "/v1/alerts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn user_feed_respects_visibility() {
    let ctx = build_test_context();
    seed_via_api(&ctx.app).await;

    // Alice: org alert + engineering team alert + her personal alert
    let (status, body, _) =
        request_no_body(&ctx.app, "GET", "/v1/users/user-alice/alerts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(3));

    // Bob is in marketing: only the org-wide alert
    let (_, body, _) = request_no_body(&ctx.app, "GET", "/v1/users/user-bob/alerts").await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    let (status, body, _) = request_no_body(&ctx.app, "GET", "/v1/users/ghost/alerts").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_err_envelope(&body, 1004);
}

#[tokio::test]
async fn snooze_hides_alert_until_included_explicitly() {
    let ctx = build_test_context();
    seed_via_api(&ctx.app).await;

    let (_, body, _) = request_no_body(&ctx.app, "GET", "/v1/users/user-bob/alerts").await;
    let alert_id = body["data"][0]["alert"]["id"]
        .as_str()
        .expect("feed entry should carry the alert id")
        .to_string();

    let (status, body, _) = request_no_body(
        &ctx.app,
        "POST",
        &format!("/v1/users/user-bob/alerts/{alert_id}/snooze"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["state"], "snoozed");
    assert!(body["data"]["snoozed_until"].is_string());

    let (_, body, _) = request_no_body(&ctx.app, "GET", "/v1/users/user-bob/alerts").await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));

    let (_, body, _) = request_no_body(
        &ctx.app,
        "GET",
        "/v1/users/user-bob/alerts?include_snoozed=true",
    )
    .await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));

    // Past midnight the snooze has lapsed and the alert is back
    // (16h from the 09:00 start, still inside the alert's expiry)
    ctx.clock.advance(Duration::hours(16));
    let (_, body, _) = request_no_body(&ctx.app, "GET", "/v1/users/user-bob/alerts").await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"][0]["preference"]["state"], "unread");
}

#[tokio::test]
async fn read_and_unread_round_trip_through_api() {
    let ctx = build_test_context();
    seed_via_api(&ctx.app).await;

    let (_, body, _) = request_no_body(&ctx.app, "GET", "/v1/users/user-bob/alerts").await;
    let alert_id = body["data"][0]["alert"]["id"]
        .as_str()
        .expect("feed entry should carry the alert id")
        .to_string();

    let (status, body, _) = request_no_body(
        &ctx.app,
        "POST",
        &format!("/v1/users/user-bob/alerts/{alert_id}/read"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["state"], "read");
    assert!(body["data"]["last_read_at"].is_string());

    let (status, body, _) = request_no_body(
        &ctx.app,
        "POST",
        &format!("/v1/users/user-bob/alerts/{alert_id}/unread"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["state"], "unread");
    assert!(body["data"]["last_read_at"].is_null());

    // Marking a record that was never created is a 404
    let (status, body, _) = request_no_body(
        &ctx.app,
        "POST",
        "/v1/users/user-bob/alerts/unknown-alert/read",
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_err_envelope(&body, 1004);
}

#[tokio::test]
async fn trigger_reminders_delivers_per_cadence() {
    let ctx = build_test_context();
    seed_via_api(&ctx.app).await;

    // Org alert reaches 3 users, engineering alert 2, Alice's alert 1.
    let (status, body, _) =
        request_no_body(&ctx.app, "POST", "/v1/system/trigger-reminders").await;
    assert_eq!(status, StatusCode::OK);
    let summary: ReminderRunSummary = decode_data(&body);
    assert_eq!(summary.deliveries_sent, 6);

    // Same instant: nothing is due yet.
    let (_, body, _) = request_no_body(&ctx.app, "POST", "/v1/system/trigger-reminders").await;
    let summary: ReminderRunSummary = decode_data(&body);
    assert_eq!(summary.deliveries_sent, 0);

    // One hour later only Alice's 60-minute alert is due again.
    ctx.clock.advance(Duration::minutes(60));
    let (_, body, _) = request_no_body(&ctx.app, "POST", "/v1/system/trigger-reminders").await;
    let summary: ReminderRunSummary = decode_data(&body);
    assert_eq!(summary.deliveries_sent, 1);

    let (_, body, _) = request_no_body(&ctx.app, "GET", "/v1/admin/deliveries").await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(7));
}

#[tokio::test]
async fn analytics_reflects_deliveries_reads_and_snoozes() {
    let ctx = build_test_context();
    seed_via_api(&ctx.app).await;

    request_no_body(&ctx.app, "POST", "/v1/system/trigger-reminders").await;

    let (_, body, _) = request_no_body(&ctx.app, "GET", "/v1/users/user-alice/alerts").await;
    let first_alert_id = body["data"][0]["alert"]["id"]
        .as_str()
        .expect("feed entry should carry the alert id")
        .to_string();
    request_no_body(
        &ctx.app,
        "POST",
        &format!("/v1/users/user-alice/alerts/{first_alert_id}/read"),
    )
    .await;

    let (status, body, _) = request_no_body(&ctx.app, "GET", "/v1/analytics").await;
    assert_eq!(status, StatusCode::OK);
    let snapshot: MetricsSnapshot = decode_data(&body);
    assert_eq!(snapshot.total_alerts, 3);
    assert_eq!(snapshot.delivered_vs_read.delivered, 6);
    assert_eq!(snapshot.delivered_vs_read.read, 1);
    assert_eq!(snapshot.severity_breakdown.get("info"), Some(&1));
    assert_eq!(snapshot.severity_breakdown.get("warning"), Some(&1));
    assert_eq!(snapshot.severity_breakdown.get("critical"), Some(&1));
}

#[tokio::test]
async fn openapi_spec_is_served() {
    let ctx = build_test_context();
    let (status, body, _) = request_no_body(&ctx.app, "GET", "/v1/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/v1/health"].is_object());
    assert!(body["paths"]["/v1/admin/alerts"].is_object());
    assert!(body["paths"]["/v1/users/{id}/alerts"].is_object());
}
