use crate::api::success_response;
use crate::logging::TraceId;
use crate::state::AppState;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use bullhorn_common::types::{Team, User};
use utoipa_axum::{router::OpenApiRouter, routes};

/// List all teams in the directory.
#[utoipa::path(
    get,
    path = "/v1/teams",
    tag = "Directory",
    responses(
        (status = 200, description = "Team list", body = Vec<Team>)
    )
)]
async fn list_teams(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let mut teams = state.directory.list_teams();
    teams.sort_by(|a, b| a.name.cmp(&b.name));
    success_response(StatusCode::OK, &trace_id, teams)
}

/// List all users in the directory.
#[utoipa::path(
    get,
    path = "/v1/users",
    tag = "Directory",
    responses(
        (status = 200, description = "User list", body = Vec<User>)
    )
)]
async fn list_users(
    Extension(trace_id): Extension<TraceId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let mut users = state.directory.list_users();
    users.sort_by(|a, b| a.name.cmp(&b.name));
    success_response(StatusCode::OK, &trace_id, users)
}

pub fn directory_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_teams))
        .routes(routes!(list_users))
}
