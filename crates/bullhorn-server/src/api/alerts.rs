use crate::api::{error_response, store_error_response, success_response};
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use bullhorn_common::types::{
    Alert, CreateAlertRequest, NotificationDelivery, Severity, UpdateAlertRequest, Visibility,
};
use bullhorn_engine::AlertFilter;
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Validation shared by create and update: reminder frequency must be
/// a positive number of minutes, and expiry (when both are known)
/// must fall after start.
fn validate_alert_fields(
    title: Option<&str>,
    message: Option<&str>,
    frequency: Option<i64>,
    start: Option<DateTime<Utc>>,
    expiry: Option<DateTime<Utc>>,
) -> Result<(), String> {
    if let Some(title) = title {
        if title.trim().is_empty() {
            return Err("title must not be empty".to_string());
        }
    }
    if let Some(message) = message {
        if message.trim().is_empty() {
            return Err("message must not be empty".to_string());
        }
    }
    if let Some(freq) = frequency {
        if freq <= 0 {
            return Err("reminder_frequency_minutes must be positive".to_string());
        }
    }
    if let (Some(start), Some(expiry)) = (start, expiry) {
        if expiry <= start {
            return Err("expiry_time must be after start_time".to_string());
        }
    }
    Ok(())
}

/// Create an alert. Registers unread preference records for every
/// user the visibility currently targets.
#[utoipa::path(
    post,
    path = "/v1/admin/alerts",
    tag = "Alerts",
    request_body = CreateAlertRequest,
    responses(
        (status = 201, description = "Alert created", body = Alert),
        (status = 400, description = "Invalid alert fields", body = crate::api::ApiError)
    )
)]
async fn create_alert(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Json(req): Json<CreateAlertRequest>,
) -> impl IntoResponse {
    if let Err(msg) = validate_alert_fields(
        Some(&req.title),
        Some(&req.message),
        Some(req.reminder_frequency_minutes),
        req.start_time,
        req.expiry_time,
    ) {
        return error_response(StatusCode::BAD_REQUEST, &trace_id, "bad_request", &msg);
    }
    let alert = state.catalog.create(req);
    success_response(StatusCode::CREATED, &trace_id, alert)
}

/// Update an alert. Only the provided fields change; visibility
/// changes re-register the audience.
#[utoipa::path(
    put,
    path = "/v1/admin/alerts/{id}",
    tag = "Alerts",
    params(("id" = String, Path, description = "Alert ID")),
    request_body = UpdateAlertRequest,
    responses(
        (status = 200, description = "Updated alert", body = Alert),
        (status = 400, description = "Invalid alert fields", body = crate::api::ApiError),
        (status = 404, description = "Alert not found", body = crate::api::ApiError)
    )
)]
async fn update_alert(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateAlertRequest>,
) -> impl IntoResponse {
    if let Err(msg) = validate_alert_fields(
        req.title.as_deref(),
        req.message.as_deref(),
        req.reminder_frequency_minutes,
        req.start_time,
        req.expiry_time,
    ) {
        return error_response(StatusCode::BAD_REQUEST, &trace_id, "bad_request", &msg);
    }
    match state.catalog.update(&id, req) {
        Ok(alert) => success_response(StatusCode::OK, &trace_id, alert),
        Err(err) => store_error_response(&trace_id, &err),
    }
}

/// Admin alert list query parameters.
#[derive(Debug, serde::Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
struct ListAlertsParams {
    /// Severity exact match (info / warning / critical)
    #[param(required = false, rename = "severity__eq")]
    #[serde(rename = "severity__eq")]
    severity_eq: Option<String>,
    /// Activity exact match: true for currently active alerts,
    /// false for archived, expired or not-yet-started ones
    #[param(required = false, rename = "active__eq")]
    #[serde(rename = "active__eq")]
    active_eq: Option<bool>,
    /// Visibility exact match (organization / team / user)
    #[param(required = false, rename = "visibility__eq")]
    #[serde(rename = "visibility__eq")]
    visibility_eq: Option<String>,
}

/// List alerts with optional filters. Default sort: `created_at`
/// descending.
#[utoipa::path(
    get,
    path = "/v1/admin/alerts",
    tag = "Alerts",
    params(ListAlertsParams),
    responses(
        (status = 200, description = "Alert list", body = Vec<Alert>),
        (status = 400, description = "Invalid filter value", body = crate::api::ApiError)
    )
)]
async fn list_alerts(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Query(params): Query<ListAlertsParams>,
) -> impl IntoResponse {
    let severity = match params.severity_eq.as_deref().map(str::parse::<Severity>) {
        None => None,
        Some(Ok(s)) => Some(s),
        Some(Err(msg)) => {
            return error_response(StatusCode::BAD_REQUEST, &trace_id, "bad_request", &msg)
        }
    };
    let visibility = match params.visibility_eq.as_deref().map(str::parse::<Visibility>) {
        None => None,
        Some(Ok(v)) => Some(v),
        Some(Err(msg)) => {
            return error_response(StatusCode::BAD_REQUEST, &trace_id, "bad_request", &msg)
        }
    };
    let alerts = state.catalog.list(&AlertFilter {
        severity,
        active: params.active_eq,
        visibility,
    });
    success_response(StatusCode::OK, &trace_id, alerts)
}

/// Public alert view: id, content and severity, without the admin
/// scheduling fields.
#[derive(Serialize, ToSchema)]
struct AlertView {
    /// Alert ID
    id: String,
    /// Short headline
    title: String,
    /// Full message body
    message: String,
    /// Severity (info / warning / critical)
    severity: Severity,
    /// Creation time
    created_at: DateTime<Utc>,
}

impl From<Alert> for AlertView {
    fn from(alert: Alert) -> Self {
        Self {
            id: alert.id,
            title: alert.title,
            message: alert.message,
            severity: alert.severity,
            created_at: alert.created_at,
        }
    }
}

/// List currently active alerts, newest first.
#[utoipa::path(
    get,
    path = "/v1/alerts",
    tag = "Alerts",
    responses(
        (status = 200, description = "Active alerts", body = Vec<AlertView>)
    )
)]
async fn list_active_alerts(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let alerts: Vec<AlertView> = state
        .catalog
        .list_active()
        .into_iter()
        .map(AlertView::from)
        .collect();
    success_response(StatusCode::OK, &trace_id, alerts)
}

/// Fetch one alert by ID.
#[utoipa::path(
    get,
    path = "/v1/alerts/{id}",
    tag = "Alerts",
    params(("id" = String, Path, description = "Alert ID")),
    responses(
        (status = 200, description = "Alert", body = AlertView),
        (status = 404, description = "Alert not found", body = crate::api::ApiError)
    )
)]
async fn get_alert(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.catalog.get(&id) {
        Ok(alert) => success_response(StatusCode::OK, &trace_id, AlertView::from(alert)),
        Err(err) => store_error_response(&trace_id, &err),
    }
}

/// Full delivery log, oldest first.
#[utoipa::path(
    get,
    path = "/v1/admin/deliveries",
    tag = "Alerts",
    responses(
        (status = 200, description = "Delivery log", body = Vec<NotificationDelivery>)
    )
)]
async fn list_deliveries(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    success_response(StatusCode::OK, &trace_id, state.store.list_deliveries())
}

pub fn alert_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(create_alert))
        .routes(routes!(update_alert))
        .routes(routes!(list_alerts))
        .routes(routes!(list_active_alerts))
        .routes(routes!(get_alert))
        .routes(routes!(list_deliveries))
}
