use crate::state::AppState;
use crate::{api, logging};
use axum::http::HeaderValue;
use axum::middleware;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "bullhorn API",
        description = "Broadcast alert and notification platform REST API",
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Alerts", description = "Alert administration and public views"),
        (name = "Users", description = "Per-user alert feeds and read/snooze state"),
        (name = "System", description = "Manual reminder trigger and demo seeding"),
        (name = "Analytics", description = "Delivery and engagement metrics"),
        (name = "Directory", description = "Teams and users")
    )
)]
struct ApiDoc;

pub fn build_http_app(state: AppState) -> Router {
    let (public_router, public_spec) = api::public_routes().split_for_parts();
    let (v1_router, v1_spec) = api::v1_routes().split_for_parts();

    let mut merged_spec = ApiDoc::openapi();
    merged_spec.merge(public_spec);
    merged_spec.merge(v1_spec);

    let cors = if state.config.cors_allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .cors_allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    public_router
        .merge(v1_router)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/v1/openapi.json", merged_spec))
        .layer(cors)
        .layer(middleware::from_fn(logging::request_logging))
}
