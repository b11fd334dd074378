// Like toggle routes

use crate::api::common::{ok, ApiResult};
use crate::auth::{AuthState, AuthUser, FromRef};
use crate::services::LikeService;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use cliptide_core::LikedVideoIds;
use std::sync::Arc;
use uuid::Uuid;

/// App state for like routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<LikeService>,
    pub auth: AuthState,
}

impl AppState {
    pub fn new(service: Arc<LikeService>, auth: AuthState) -> Self {
        Self { service, auth }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> AuthState {
        state.auth.clone()
    }
}

/// Create like routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/likes/toggle/v/:video_id", post(toggle_video_like))
        .route("/v1/likes/toggle/c/:comment_id", post(toggle_comment_like))
        .route("/v1/likes/toggle/t/:tweet_id", post(toggle_tweet_like))
        .route("/v1/likes/videos", get(liked_videos))
        .with_state(state)
}

/// POST /v1/likes/toggle/v/{video_id} - Toggle a like on a video
#[utoipa::path(
    post,
    path = "/v1/likes/toggle/v/{video_id}",
    params(("video_id" = Uuid, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Like toggled"),
        (status = 404, description = "Video not found")
    ),
    tag = "likes"
)]
pub async fn toggle_video_like(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(video_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let liked = state.service.toggle_video_like(auth.id, video_id).await?;
    let message = if liked {
        "Video liked successfully"
    } else {
        "Video like removed"
    };
    Ok(ok((), message))
}

/// POST /v1/likes/toggle/c/{comment_id} - Toggle a like on a comment
#[utoipa::path(
    post,
    path = "/v1/likes/toggle/c/{comment_id}",
    params(("comment_id" = Uuid, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Like toggled"),
        (status = 404, description = "Comment not found")
    ),
    tag = "likes"
)]
pub async fn toggle_comment_like(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(comment_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let liked = state
        .service
        .toggle_comment_like(auth.id, comment_id)
        .await?;
    let message = if liked {
        "Comment liked successfully"
    } else {
        "Comment like removed"
    };
    Ok(ok((), message))
}

/// POST /v1/likes/toggle/t/{tweet_id} - Toggle a like on a tweet
#[utoipa::path(
    post,
    path = "/v1/likes/toggle/t/{tweet_id}",
    params(("tweet_id" = Uuid, Path, description = "Tweet ID")),
    responses(
        (status = 200, description = "Like toggled"),
        (status = 404, description = "Tweet not found")
    ),
    tag = "likes"
)]
pub async fn toggle_tweet_like(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(tweet_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let liked = state.service.toggle_tweet_like(auth.id, tweet_id).await?;
    let message = if liked {
        "Tweet liked successfully"
    } else {
        "Tweet like removed"
    };
    Ok(ok((), message))
}

/// GET /v1/likes/videos - Ids of the videos the requester has liked
#[utoipa::path(
    get,
    path = "/v1/likes/videos",
    responses(
        (status = 200, description = "Liked video ids", body = LikedVideoIds)
    ),
    tag = "likes"
)]
pub async fn liked_videos(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let liked = state.service.liked_videos(auth.id).await?;
    Ok(ok(liked, "Liked videos fetched successfully"))
}
