use crate::api::{success_empty_response, success_response};
use crate::logging::TraceId;
use crate::seed;
use crate::state::AppState;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use bullhorn_common::types::ReminderRunSummary;
use utoipa_axum::{router::OpenApiRouter, routes};

/// Run one reminder pass immediately, outside the background loop.
#[utoipa::path(
    post,
    path = "/v1/system/trigger-reminders",
    tag = "System",
    responses(
        (status = 200, description = "Pass summary", body = ReminderRunSummary)
    )
)]
async fn trigger_reminders(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let summary = state.scheduler.run_once().await;
    success_response(StatusCode::OK, &trace_id, summary)
}

/// Reset the store and load the demo organization and alerts.
#[utoipa::path(
    post,
    path = "/v1/system/seed",
    tag = "System",
    responses(
        (status = 200, description = "Demo data loaded")
    )
)]
async fn seed_demo(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    seed::seed_demo_data(&state);
    success_empty_response(StatusCode::OK, &trace_id, "demo data seeded")
}

pub fn system_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(trigger_reminders))
        .routes(routes!(seed_demo))
}
