// Comment routes

use crate::api::common::{created, ok, ApiResult};
use crate::api::validation;
use crate::auth::{AuthState, AuthUser, FromRef};
use crate::services::CommentService;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, patch};
use axum::{Json, Router};
use cliptide_core::{Comment, CommentWithOwner, Page};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Body for adding or editing a comment
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CommentRequest {
    #[schema(example = "Great video!")]
    pub content: String,
}

/// Pagination for the comment list
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListCommentsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// App state for comment routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CommentService>,
    pub auth: AuthState,
}

impl AppState {
    pub fn new(service: Arc<CommentService>, auth: AuthState) -> Self {
        Self { service, auth }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> AuthState {
        state.auth.clone()
    }
}

/// Create comment routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/comments/:video_id",
            get(list_comments).post(add_comment),
        )
        .route(
            "/v1/comments/c/:comment_id",
            patch(update_comment).delete(delete_comment),
        )
        .with_state(state)
}

/// GET /v1/comments/{video_id} - Comments on a video, newest first
#[utoipa::path(
    get,
    path = "/v1/comments/{video_id}",
    params(
        ("video_id" = Uuid, Path, description = "Video ID"),
        ListCommentsQuery
    ),
    responses(
        (status = 200, description = "One page of comments", body = Page<CommentWithOwner>),
        (status = 404, description = "Video not found")
    ),
    tag = "comments"
)]
pub async fn list_comments(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(video_id): Path<Uuid>,
    Query(query): Query<ListCommentsQuery>,
) -> ApiResult<impl IntoResponse> {
    let (page, limit) = validation::validate_pagination(query.page, query.limit, None)?;
    let comments = state.service.list_for_video(video_id, page, limit).await?;
    Ok(ok(comments, "Comments fetched successfully"))
}

/// POST /v1/comments/{video_id} - Add a comment to a video
#[utoipa::path(
    post,
    path = "/v1/comments/{video_id}",
    params(("video_id" = Uuid, Path, description = "Video ID")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment added", body = Comment),
        (status = 400, description = "Empty content"),
        (status = 404, description = "Video not found")
    ),
    tag = "comments"
)]
pub async fn add_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(video_id): Path<Uuid>,
    Json(body): Json<CommentRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_comment_content(&body.content)?;
    let comment = state.service.add(video_id, auth.id, &body.content).await?;
    Ok(created(comment, "Comment added successfully"))
}

/// PATCH /v1/comments/c/{comment_id} - Edit a comment
#[utoipa::path(
    patch,
    path = "/v1/comments/c/{comment_id}",
    params(("comment_id" = Uuid, Path, description = "Comment ID")),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment updated", body = Comment),
        (status = 403, description = "Requester does not own the comment"),
        (status = 404, description = "Comment not found")
    ),
    tag = "comments"
)]
pub async fn update_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(comment_id): Path<Uuid>,
    Json(body): Json<CommentRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_comment_content(&body.content)?;
    let comment = state
        .service
        .update(comment_id, auth.id, &body.content)
        .await?;
    Ok(ok(comment, "Comment updated successfully"))
}

/// DELETE /v1/comments/c/{comment_id} - Delete a comment
#[utoipa::path(
    delete,
    path = "/v1/comments/c/{comment_id}",
    params(("comment_id" = Uuid, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Comment deleted"),
        (status = 403, description = "Requester does not own the comment"),
        (status = 404, description = "Comment not found")
    ),
    tag = "comments"
)]
pub async fn delete_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(comment_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.service.delete(comment_id, auth.id).await?;
    Ok(ok((), "Comment deleted successfully"))
}
