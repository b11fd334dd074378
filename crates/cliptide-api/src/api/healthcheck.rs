// Healthcheck route

use crate::api::common::ok;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

/// Create the healthcheck route
pub fn routes() -> Router {
    Router::new().route("/v1/healthcheck", get(healthcheck))
}

/// GET /v1/healthcheck - Liveness probe in the standard envelope
#[utoipa::path(
    get,
    path = "/v1/healthcheck",
    responses(
        (status = 200, description = "Service is up", body = String)
    ),
    tag = "healthcheck"
)]
pub async fn healthcheck() -> impl IntoResponse {
    ok("OK", "Health check passed")
}
