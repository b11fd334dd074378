// Channel dashboard routes

use crate::api::common::{ok, ApiResult};
use crate::api::validation;
use crate::auth::{AuthState, AuthUser, FromRef};
use crate::services::DashboardService;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use cliptide_core::{ChannelStats, Page, VideoSummary};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

/// Pagination for the dashboard video list
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DashboardVideosQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// App state for dashboard routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DashboardService>,
    pub auth: AuthState,
}

impl AppState {
    pub fn new(service: Arc<DashboardService>, auth: AuthState) -> Self {
        Self { service, auth }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> AuthState {
        state.auth.clone()
    }
}

/// Create dashboard routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/dashboard/stats", get(channel_stats))
        .route("/v1/dashboard/videos", get(channel_videos))
        .with_state(state)
}

/// GET /v1/dashboard/stats - Aggregates for the requester's channel
#[utoipa::path(
    get,
    path = "/v1/dashboard/stats",
    responses(
        (status = 200, description = "Channel aggregates", body = ChannelStats)
    ),
    tag = "dashboard"
)]
pub async fn channel_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let stats = state.service.channel_stats(auth.id).await?;
    Ok(ok(stats, "Channel stats fetched successfully"))
}

/// GET /v1/dashboard/videos - The requester's uploads, published or not
#[utoipa::path(
    get,
    path = "/v1/dashboard/videos",
    params(DashboardVideosQuery),
    responses(
        (status = 200, description = "One page of the requester's videos", body = Page<VideoSummary>),
        (status = 400, description = "Bad pagination parameters")
    ),
    tag = "dashboard"
)]
pub async fn channel_videos(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<DashboardVideosQuery>,
) -> ApiResult<impl IntoResponse> {
    let (page, limit) = validation::validate_pagination(
        query.page,
        query.limit,
        Some(validation::MAX_DASHBOARD_LIMIT),
    )?;
    let videos = state.service.channel_videos(auth.id, page, limit).await?;
    Ok(ok(videos, "Channel videos fetched successfully"))
}
