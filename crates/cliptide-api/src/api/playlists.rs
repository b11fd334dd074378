// Playlist routes

use crate::api::common::{created, ok, ApiResult};
use crate::api::validation;
use crate::auth::{AuthState, AuthUser, FromRef};
use crate::services::PlaylistService;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use cliptide_core::{Playlist, PlaylistWithVideos};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Body for creating a playlist
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreatePlaylistRequest {
    #[schema(example = "Watch later")]
    pub name: String,
    pub description: Option<String>,
}

/// Body for renaming or re-describing a playlist
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdatePlaylistRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// App state for playlist routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PlaylistService>,
    pub auth: AuthState,
}

impl AppState {
    pub fn new(service: Arc<PlaylistService>, auth: AuthState) -> Self {
        Self { service, auth }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> AuthState {
        state.auth.clone()
    }
}

/// Create playlist routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/playlists", post(create_playlist))
        .route(
            "/v1/playlists/:playlist_id",
            get(get_playlist)
                .patch(update_playlist)
                .delete(delete_playlist),
        )
        .route(
            "/v1/playlists/:playlist_id/add/:video_id",
            patch(add_video),
        )
        .route(
            "/v1/playlists/:playlist_id/remove/:video_id",
            patch(remove_video),
        )
        .route("/v1/playlists/user/:user_id", get(list_user_playlists))
        .with_state(state)
}

/// POST /v1/playlists - Create a playlist
#[utoipa::path(
    post,
    path = "/v1/playlists",
    request_body = CreatePlaylistRequest,
    responses(
        (status = 201, description = "Playlist created", body = Playlist),
        (status = 400, description = "Validation failure or duplicate name")
    ),
    tag = "playlists"
)]
pub async fn create_playlist(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreatePlaylistRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_playlist_create(&body.name, body.description.as_deref())?;
    let playlist = state.service.create(auth.id, body).await?;
    Ok(created(playlist, "Playlist created successfully"))
}

/// GET /v1/playlists/{playlist_id} - Fetch a playlist with its videos
#[utoipa::path(
    get,
    path = "/v1/playlists/{playlist_id}",
    params(("playlist_id" = Uuid, Path, description = "Playlist ID")),
    responses(
        (status = 200, description = "The playlist", body = PlaylistWithVideos),
        (status = 404, description = "Playlist not found")
    ),
    tag = "playlists"
)]
pub async fn get_playlist(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(playlist_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let playlist = state.service.get(playlist_id).await?;
    Ok(ok(playlist, "Playlist fetched successfully"))
}

/// PATCH /v1/playlists/{playlist_id} - Rename or re-describe a playlist
#[utoipa::path(
    patch,
    path = "/v1/playlists/{playlist_id}",
    params(("playlist_id" = Uuid, Path, description = "Playlist ID")),
    request_body = UpdatePlaylistRequest,
    responses(
        (status = 200, description = "Playlist updated", body = Playlist),
        (status = 403, description = "Requester does not own the playlist"),
        (status = 404, description = "Playlist not found")
    ),
    tag = "playlists"
)]
pub async fn update_playlist(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(playlist_id): Path<Uuid>,
    Json(body): Json<UpdatePlaylistRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_playlist_update(body.name.as_deref(), body.description.as_deref())?;
    let playlist = state.service.update(playlist_id, auth.id, body).await?;
    Ok(ok(playlist, "Playlist updated successfully"))
}

/// DELETE /v1/playlists/{playlist_id} - Delete a playlist
#[utoipa::path(
    delete,
    path = "/v1/playlists/{playlist_id}",
    params(("playlist_id" = Uuid, Path, description = "Playlist ID")),
    responses(
        (status = 200, description = "Playlist deleted"),
        (status = 403, description = "Requester does not own the playlist"),
        (status = 404, description = "Playlist not found")
    ),
    tag = "playlists"
)]
pub async fn delete_playlist(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(playlist_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.service.delete(playlist_id, auth.id).await?;
    Ok(ok((), "Playlist deleted successfully"))
}

/// PATCH /v1/playlists/{playlist_id}/add/{video_id} - Append a video
#[utoipa::path(
    patch,
    path = "/v1/playlists/{playlist_id}/add/{video_id}",
    params(
        ("playlist_id" = Uuid, Path, description = "Playlist ID"),
        ("video_id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video added", body = Playlist),
        (status = 400, description = "Video already in playlist"),
        (status = 403, description = "Requester does not own the playlist"),
        (status = 404, description = "Playlist or video not found")
    ),
    tag = "playlists"
)]
pub async fn add_video(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((playlist_id, video_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<impl IntoResponse> {
    let playlist = state
        .service
        .add_video(playlist_id, video_id, auth.id)
        .await?;
    Ok(ok(playlist, "Video added to playlist successfully"))
}

/// PATCH /v1/playlists/{playlist_id}/remove/{video_id} - Remove a video
#[utoipa::path(
    patch,
    path = "/v1/playlists/{playlist_id}/remove/{video_id}",
    params(
        ("playlist_id" = Uuid, Path, description = "Playlist ID"),
        ("video_id" = Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video removed", body = Playlist),
        (status = 400, description = "Video not in playlist"),
        (status = 403, description = "Requester does not own the playlist"),
        (status = 404, description = "Playlist not found")
    ),
    tag = "playlists"
)]
pub async fn remove_video(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((playlist_id, video_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<impl IntoResponse> {
    let playlist = state
        .service
        .remove_video(playlist_id, video_id, auth.id)
        .await?;
    Ok(ok(playlist, "Video removed from playlist successfully"))
}

/// GET /v1/playlists/user/{user_id} - Playlists owned by a user
#[utoipa::path(
    get,
    path = "/v1/playlists/user/{user_id}",
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "The user's playlists", body = Vec<PlaylistWithVideos>)
    ),
    tag = "playlists"
)]
pub async fn list_user_playlists(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let playlists = state.service.list_for_user(user_id).await?;
    Ok(ok(playlists, "Playlists fetched successfully"))
}
