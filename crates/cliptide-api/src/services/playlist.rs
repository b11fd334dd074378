// Playlist service
//
// Playlist names are unique across all users, not per owner. Known
// quirk, kept for client compatibility.
// TODO: scope name uniqueness per owner once clients can handle it

use crate::api::common::{ApiError, ApiResult};
use crate::api::playlists::{CreatePlaylistRequest, UpdatePlaylistRequest};
use crate::services::ensure_owner;
use crate::storage::{CreatePlaylistRow, PlaylistRow, StorageBackend, UpdatePlaylistRow, VideoRow};
use cliptide_core::{Playlist, PlaylistWithVideos};
use std::collections::HashMap;
use uuid::Uuid;

pub struct PlaylistService {
    db: StorageBackend,
}

impl PlaylistService {
    pub fn new(db: StorageBackend) -> Self {
        Self { db }
    }

    pub async fn create(&self, owner_id: Uuid, req: CreatePlaylistRequest) -> ApiResult<Playlist> {
        if self.db.get_playlist_by_name(&req.name).await?.is_some() {
            return Err(ApiError::bad_request("Playlist name already exists"));
        }

        let input = CreatePlaylistRow {
            name: req.name,
            description: req.description,
            owner_id,
        };
        let row = self.db.create_playlist(input).await?;
        Ok(row.into())
    }

    pub async fn get(&self, playlist_id: Uuid) -> ApiResult<PlaylistWithVideos> {
        let row = self.require_playlist(playlist_id).await?;
        self.populate(row).await
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> ApiResult<Vec<PlaylistWithVideos>> {
        let rows = self.db.list_user_playlists(user_id).await?;
        let mut playlists = Vec::with_capacity(rows.len());
        for row in rows {
            playlists.push(self.populate(row).await?);
        }
        Ok(playlists)
    }

    pub async fn update(
        &self,
        playlist_id: Uuid,
        requester_id: Uuid,
        req: UpdatePlaylistRequest,
    ) -> ApiResult<Playlist> {
        let current = self.require_playlist(playlist_id).await?;
        ensure_owner(
            current.owner_id,
            requester_id,
            "Not authorized to update this playlist",
        )?;

        if let Some(name) = &req.name {
            if let Some(existing) = self.db.get_playlist_by_name(name).await? {
                if existing.id != playlist_id {
                    return Err(ApiError::bad_request("Playlist name already exists"));
                }
            }
        }

        let input = UpdatePlaylistRow {
            name: req.name,
            description: req.description,
        };
        let row = self
            .db
            .update_playlist(playlist_id, input)
            .await?
            .ok_or_else(|| ApiError::not_found("Playlist not found"))?;
        Ok(row.into())
    }

    pub async fn delete(&self, playlist_id: Uuid, requester_id: Uuid) -> ApiResult<()> {
        let current = self.require_playlist(playlist_id).await?;
        ensure_owner(
            current.owner_id,
            requester_id,
            "Not authorized to delete this playlist",
        )?;

        self.db.delete_playlist(playlist_id).await?;
        Ok(())
    }

    pub async fn add_video(
        &self,
        playlist_id: Uuid,
        video_id: Uuid,
        requester_id: Uuid,
    ) -> ApiResult<Playlist> {
        let current = self.require_playlist(playlist_id).await?;
        ensure_owner(
            current.owner_id,
            requester_id,
            "Not authorized to modify this playlist",
        )?;

        if self.db.get_video(video_id).await?.is_none() {
            return Err(ApiError::not_found("Video not found"));
        }
        if current.video_ids.contains(&video_id) {
            return Err(ApiError::bad_request("Video already in playlist"));
        }

        let row = self
            .db
            .add_video_to_playlist(playlist_id, video_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Playlist not found"))?;
        Ok(row.into())
    }

    pub async fn remove_video(
        &self,
        playlist_id: Uuid,
        video_id: Uuid,
        requester_id: Uuid,
    ) -> ApiResult<Playlist> {
        let current = self.require_playlist(playlist_id).await?;
        ensure_owner(
            current.owner_id,
            requester_id,
            "Not authorized to modify this playlist",
        )?;

        if !current.video_ids.contains(&video_id) {
            return Err(ApiError::bad_request("Video not found in playlist"));
        }

        let row = self
            .db
            .remove_video_from_playlist(playlist_id, video_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Playlist not found"))?;
        Ok(row.into())
    }

    async fn require_playlist(&self, playlist_id: Uuid) -> ApiResult<PlaylistRow> {
        self.db
            .get_playlist(playlist_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Playlist not found"))
    }

    /// Resolve member ids to videos, preserving playlist order
    async fn populate(&self, row: PlaylistRow) -> ApiResult<PlaylistWithVideos> {
        let fetched = self.db.get_videos_by_ids(&row.video_ids).await?;
        let mut by_id: HashMap<Uuid, VideoRow> = fetched.into_iter().map(|v| (v.id, v)).collect();
        let videos = row
            .video_ids
            .iter()
            .filter_map(|id| by_id.remove(id))
            .map(Into::into)
            .collect();

        Ok(PlaylistWithVideos {
            id: row.id,
            name: row.name,
            description: row.description,
            owner: row.owner_id,
            videos,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
