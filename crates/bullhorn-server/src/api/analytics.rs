use crate::api::success_response;
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use bullhorn_common::types::MetricsSnapshot;
use utoipa_axum::{router::OpenApiRouter, routes};

/// System-wide analytics: alert totals, delivered vs read, snooze
/// counts per alert, and the severity breakdown. Computed from live
/// store state on every call.
#[utoipa::path(
    get,
    path = "/v1/analytics",
    tag = "Analytics",
    responses(
        (status = 200, description = "Analytics snapshot", body = MetricsSnapshot)
    )
)]
async fn analytics(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    success_response(StatusCode::OK, &trace_id, state.metrics.snapshot())
}

pub fn analytics_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(analytics))
}
