// Video feed and lifecycle routes

use crate::api::common::{created, ok, ApiError, ApiResult};
use crate::api::validation;
use crate::auth::{AuthState, AuthUser, FromRef};
use crate::media::{field_text, multipart_error, spool_field, MediaStore, TempUpload};
use crate::services::VideoService;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, patch};
use axum::Router;
use cliptide_core::{Page, Video, VideoWithOwner};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Query parameters for the video feed
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListVideosQuery {
    /// Case-insensitive substring match on title and description
    pub query: Option<String>,
    /// Restrict to one owner's videos, including unpublished ones
    pub user_id: Option<Uuid>,
    /// createdAt, views or duration
    pub sort_by: Option<String>,
    /// asc or desc
    pub sort_type: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Published flag after a toggle
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublishStatusData {
    pub is_published: bool,
}

/// Upload form for publishing a video (multipart)
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct PublishVideoForm {
    pub title: String,
    pub description: Option<String>,
    /// The video file
    #[schema(value_type = String, format = Binary)]
    pub video_file: String,
    /// Thumbnail image
    #[schema(value_type = String, format = Binary)]
    pub thumbnail: String,
}

/// App state for video routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<VideoService>,
    pub auth: AuthState,
    pub media: MediaStore,
}

impl AppState {
    pub fn new(service: Arc<VideoService>, auth: AuthState, media: MediaStore) -> Self {
        Self {
            service,
            auth,
            media,
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> AuthState {
        state.auth.clone()
    }
}

/// Create video routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/videos", get(list_videos).post(publish_video))
        .route(
            "/v1/videos/:video_id",
            get(get_video).patch(update_video).delete(delete_video),
        )
        .route("/v1/videos/toggle/publish/:video_id", patch(toggle_publish))
        // Room for one video plus a thumbnail; axum's default 2 MB cap
        // would reject uploads before the per-file limits apply
        .layer(DefaultBodyLimit::max(
            validation::MAX_VIDEO_UPLOAD_BYTES + validation::MAX_IMAGE_UPLOAD_BYTES + 64 * 1024,
        ))
        .with_state(state)
}

/// GET /v1/videos - Paged feed with search, owner filter and sorting
#[utoipa::path(
    get,
    path = "/v1/videos",
    params(ListVideosQuery),
    responses(
        (status = 200, description = "One page of videos", body = Page<VideoWithOwner>),
        (status = 400, description = "Bad pagination or sort parameters")
    ),
    tag = "videos"
)]
pub async fn list_videos(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ListVideosQuery>,
) -> ApiResult<impl IntoResponse> {
    let (page, limit) = validation::validate_pagination(query.page, query.limit, None)?;
    let (sort_key, sort_asc) =
        validation::validate_video_sort(query.sort_by.as_deref(), query.sort_type.as_deref())?;

    let videos = state
        .service
        .list_videos(query.query, query.user_id, sort_key, sort_asc, page, limit)
        .await?;
    Ok(ok(videos, "Videos fetched successfully"))
}

/// POST /v1/videos - Publish a new video
#[utoipa::path(
    post,
    path = "/v1/videos",
    request_body(content = PublishVideoForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Video published", body = Video),
        (status = 400, description = "Missing file or validation failure")
    ),
    tag = "videos"
)]
pub async fn publish_video(
    State(state): State<AppState>,
    auth: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut title = String::new();
    let mut description: Option<String> = None;
    let mut video_file: Option<TempUpload> = None;
    let mut thumbnail: Option<TempUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name().unwrap_or("") {
            "title" => title = field_text(field).await?,
            "description" => description = Some(field_text(field).await?),
            "videoFile" => {
                video_file = Some(
                    spool_field(
                        state.media.temp_dir(),
                        field,
                        validation::VIDEO_CONTENT_TYPES,
                        validation::MAX_VIDEO_UPLOAD_BYTES,
                    )
                    .await?,
                );
            }
            "thumbnail" => {
                thumbnail = Some(
                    spool_field(
                        state.media.temp_dir(),
                        field,
                        validation::IMAGE_CONTENT_TYPES,
                        validation::MAX_IMAGE_UPLOAD_BYTES,
                    )
                    .await?,
                );
            }
            _ => {}
        }
    }

    validation::validate_video_publish(&title, description.as_deref())?;
    let (video_file, thumbnail) = match (video_file, thumbnail) {
        (Some(video), Some(thumb)) => (video, thumb),
        _ => return Err(ApiError::bad_request("Video and thumbnail are required")),
    };

    let video = state
        .service
        .publish(
            auth.id,
            &title,
            description,
            video_file.path(),
            thumbnail.path(),
        )
        .await?;
    Ok(created(video, "Video published successfully"))
}

/// GET /v1/videos/{video_id} - Fetch one video
///
/// Counts a view and appends the video to the requester's watch history.
#[utoipa::path(
    get,
    path = "/v1/videos/{video_id}",
    params(("video_id" = Uuid, Path, description = "Video ID")),
    responses(
        (status = 200, description = "The video", body = VideoWithOwner),
        (status = 403, description = "Unpublished video of another user"),
        (status = 404, description = "Video not found")
    ),
    tag = "videos"
)]
pub async fn get_video(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(video_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let video = state.service.get_video(video_id, auth.id).await?;
    Ok(ok(video, "Video fetched successfully"))
}

/// PATCH /v1/videos/{video_id} - Update title, description or thumbnail
#[utoipa::path(
    patch,
    path = "/v1/videos/{video_id}",
    params(("video_id" = Uuid, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video updated", body = Video),
        (status = 403, description = "Requester does not own the video"),
        (status = 404, description = "Video not found")
    ),
    tag = "videos"
)]
pub async fn update_video(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(video_id): Path<Uuid>,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut title: Option<String> = None;
    let mut description: Option<String> = None;
    let mut thumbnail: Option<TempUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name().unwrap_or("") {
            "title" => title = Some(field_text(field).await?),
            "description" => description = Some(field_text(field).await?),
            "thumbnail" => {
                thumbnail = Some(
                    spool_field(
                        state.media.temp_dir(),
                        field,
                        validation::IMAGE_CONTENT_TYPES,
                        validation::MAX_IMAGE_UPLOAD_BYTES,
                    )
                    .await?,
                );
            }
            _ => {}
        }
    }

    validation::validate_video_update(title.as_deref(), description.as_deref(), thumbnail.is_some())?;

    let video = state
        .service
        .update_video(
            video_id,
            auth.id,
            title,
            description,
            thumbnail.as_ref().map(|t| t.path()),
        )
        .await?;
    Ok(ok(video, "Video updated successfully"))
}

/// DELETE /v1/videos/{video_id} - Delete a video and its dependents
#[utoipa::path(
    delete,
    path = "/v1/videos/{video_id}",
    params(("video_id" = Uuid, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video deleted"),
        (status = 403, description = "Requester does not own the video"),
        (status = 404, description = "Video not found")
    ),
    tag = "videos"
)]
pub async fn delete_video(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(video_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.service.delete_video(video_id, auth.id).await?;
    Ok(ok((), "Video deleted successfully"))
}

/// PATCH /v1/videos/toggle/publish/{video_id} - Flip the published flag
#[utoipa::path(
    patch,
    path = "/v1/videos/toggle/publish/{video_id}",
    params(("video_id" = Uuid, Path, description = "Video ID")),
    responses(
        (status = 200, description = "New publish state", body = PublishStatusData),
        (status = 403, description = "Requester does not own the video"),
        (status = 404, description = "Video not found")
    ),
    tag = "videos"
)]
pub async fn toggle_publish(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(video_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let is_published = state.service.toggle_publish(video_id, auth.id).await?;
    let message = if is_published {
        "Video published"
    } else {
        "Video unpublished"
    };
    Ok(ok(PublishStatusData { is_published }, message))
}
