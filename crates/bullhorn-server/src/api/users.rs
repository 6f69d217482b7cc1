use crate::api::{store_error_response, success_response};
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use bullhorn_common::preference::PreferenceView;
use bullhorn_common::types::UserAlertEntry;
use serde::Serialize;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Personal feed query parameters.
#[derive(Debug, serde::Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
struct UserAlertsParams {
    /// Include alerts the user has snoozed (default false)
    #[param(required = false)]
    #[serde(default)]
    include_snoozed: bool,
}

/// The user's alert feed: every active alert targeting them, with
/// their read/snooze state. Snoozed entries are hidden by default.
#[utoipa::path(
    get,
    path = "/v1/users/{id}/alerts",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID"),
        UserAlertsParams
    ),
    responses(
        (status = 200, description = "Alert feed", body = Vec<UserAlertEntry>),
        (status = 404, description = "User not found", body = crate::api::ApiError)
    )
)]
async fn user_alerts(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<UserAlertsParams>,
) -> impl IntoResponse {
    match state.preferences.user_alerts(&id, params.include_snoozed) {
        Ok(entries) => success_response(StatusCode::OK, &trace_id, entries),
        Err(err) => store_error_response(&trace_id, &err),
    }
}

/// One preference record in a user's preference listing.
#[derive(Serialize, ToSchema)]
struct PreferenceEntry {
    /// Alert the record belongs to
    alert_id: String,
    /// Current read/snooze state
    #[serde(flatten)]
    view: PreferenceView,
}

/// All of the user's per-alert preference records.
#[utoipa::path(
    get,
    path = "/v1/users/{id}/preferences",
    tag = "Users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Preference records", body = Vec<PreferenceEntry>),
        (status = 404, description = "User not found", body = crate::api::ApiError)
    )
)]
async fn user_preferences(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.preferences.user_preferences(&id) {
        Ok(prefs) => {
            let entries: Vec<PreferenceEntry> = prefs
                .iter()
                .map(|p| PreferenceEntry {
                    alert_id: p.alert_id.clone(),
                    view: PreferenceView::from(p),
                })
                .collect();
            success_response(StatusCode::OK, &trace_id, entries)
        }
        Err(err) => store_error_response(&trace_id, &err),
    }
}

/// Snooze the alert for the rest of the current UTC day.
#[utoipa::path(
    post,
    path = "/v1/users/{id}/alerts/{alert_id}/snooze",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID"),
        ("alert_id" = String, Path, description = "Alert ID")
    ),
    responses(
        (status = 200, description = "Updated preference", body = PreferenceView),
        (status = 404, description = "User or alert not found", body = crate::api::ApiError)
    )
)]
async fn snooze_alert(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path((id, alert_id)): Path<(String, String)>,
) -> impl IntoResponse {
    match state.preferences.snooze_for_today(&id, &alert_id).await {
        Ok(pref) => success_response(StatusCode::OK, &trace_id, PreferenceView::from(&pref)),
        Err(err) => store_error_response(&trace_id, &err),
    }
}

/// Mark the alert read. Reading again later keeps the first read
/// timestamp.
#[utoipa::path(
    post,
    path = "/v1/users/{id}/alerts/{alert_id}/read",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID"),
        ("alert_id" = String, Path, description = "Alert ID")
    ),
    responses(
        (status = 200, description = "Updated preference", body = PreferenceView),
        (status = 404, description = "User or preference not found", body = crate::api::ApiError)
    )
)]
async fn mark_read(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path((id, alert_id)): Path<(String, String)>,
) -> impl IntoResponse {
    match state.preferences.mark_read(&id, &alert_id).await {
        Ok(pref) => success_response(StatusCode::OK, &trace_id, PreferenceView::from(&pref)),
        Err(err) => store_error_response(&trace_id, &err),
    }
}

/// Mark the alert unread, clearing any read timestamp or snooze.
#[utoipa::path(
    post,
    path = "/v1/users/{id}/alerts/{alert_id}/unread",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID"),
        ("alert_id" = String, Path, description = "Alert ID")
    ),
    responses(
        (status = 200, description = "Updated preference", body = PreferenceView),
        (status = 404, description = "User or preference not found", body = crate::api::ApiError)
    )
)]
async fn mark_unread(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path((id, alert_id)): Path<(String, String)>,
) -> impl IntoResponse {
    match state.preferences.mark_unread(&id, &alert_id).await {
        Ok(pref) => success_response(StatusCode::OK, &trace_id, PreferenceView::from(&pref)),
        Err(err) => store_error_response(&trace_id, &err),
    }
}

pub fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(user_alerts))
        .routes(routes!(user_preferences))
        .routes(routes!(snooze_alert))
        .routes(routes!(mark_read))
        .routes(routes!(mark_unread))
}
