// Video service: feed, publish, owner mutations

use crate::api::common::{ApiError, ApiResult};
use crate::media::MediaStore;
use crate::services::ensure_owner;
use crate::storage::{
    CreateVideoRow, StorageBackend, UpdateVideoRow, VideoListFilter, VideoRow, VideoSortKey,
};
use cliptide_core::{Page, Video, VideoWithOwner};
use std::path::Path;
use uuid::Uuid;

pub struct VideoService {
    db: StorageBackend,
    media: MediaStore,
}

impl VideoService {
    pub fn new(db: StorageBackend, media: MediaStore) -> Self {
        Self { db, media }
    }

    /// Feed listing. Without an owner filter only published videos are
    /// visible; filtering by owner exposes that owner's full catalog.
    pub async fn list_videos(
        &self,
        query: Option<String>,
        owner_id: Option<Uuid>,
        sort_key: VideoSortKey,
        sort_asc: bool,
        page: i64,
        limit: i64,
    ) -> ApiResult<Page<VideoWithOwner>> {
        let filter = VideoListFilter {
            query,
            owner_id,
            only_published: owner_id.is_none(),
            sort_key,
            sort_asc,
            limit,
            offset: Page::<VideoWithOwner>::offset(page, limit),
        };

        let rows = self.db.list_videos(&filter).await?;
        let total = self.db.count_videos(&filter).await?;
        let docs = rows.into_iter().map(Into::into).collect();
        Ok(Page::new(docs, total, page, limit))
    }

    /// Publish a new video from spooled uploads. Duration comes from
    /// the media backend where it can report one.
    pub async fn publish(
        &self,
        owner_id: Uuid,
        title: &str,
        description: Option<String>,
        video_file: &Path,
        thumbnail: &Path,
    ) -> ApiResult<Video> {
        let video_media = self.media.upload(video_file).await?;
        let thumbnail_media = match self.media.upload(thumbnail).await {
            Ok(media) => media,
            Err(err) => {
                self.media.delete_by_url(&video_media.url).await;
                return Err(err.into());
            }
        };

        let input = CreateVideoRow {
            owner_id,
            video_file: video_media.url.clone(),
            thumbnail: thumbnail_media.url.clone(),
            title: title.to_string(),
            description,
            duration: video_media.duration.unwrap_or(0.0),
        };

        match self.db.create_video(input).await {
            Ok(row) => {
                tracing::info!(video_id = %row.id, owner_id = %owner_id, "video published");
                Ok(row.into())
            }
            Err(err) => {
                self.media.delete_by_url(&video_media.url).await;
                self.media.delete_by_url(&thumbnail_media.url).await;
                Err(err.into())
            }
        }
    }

    /// Fetch one video. A successful read counts as a view and lands in
    /// the requester's watch history; the returned count includes it.
    pub async fn get_video(&self, video_id: Uuid, viewer_id: Uuid) -> ApiResult<VideoWithOwner> {
        let mut row = self
            .db
            .get_video_with_owner(video_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Video not found"))?;

        if !row.is_published && row.owner_id != viewer_id {
            return Err(ApiError::forbidden("This video is not public"));
        }

        self.db.increment_video_views(video_id).await?;
        self.db.append_watch_history(viewer_id, video_id).await?;
        row.views += 1;

        Ok(row.into())
    }

    pub async fn update_video(
        &self,
        video_id: Uuid,
        requester_id: Uuid,
        title: Option<String>,
        description: Option<String>,
        thumbnail: Option<&Path>,
    ) -> ApiResult<Video> {
        let current = self.require_video(video_id).await?;
        ensure_owner(
            current.owner_id,
            requester_id,
            "Not authorized to update this video",
        )?;

        let thumbnail_media = match thumbnail {
            Some(path) => Some(self.media.upload(path).await?),
            None => None,
        };

        let input = UpdateVideoRow {
            title,
            description,
            thumbnail: thumbnail_media.as_ref().map(|m| m.url.clone()),
        };

        match self.db.update_video(video_id, input).await {
            Ok(Some(row)) => {
                if thumbnail_media.is_some() {
                    self.media.delete_by_url(&current.thumbnail).await;
                }
                Ok(row.into())
            }
            Ok(None) => {
                if let Some(media) = &thumbnail_media {
                    self.media.delete_by_url(&media.url).await;
                }
                Err(ApiError::not_found("Video not found"))
            }
            Err(err) => {
                if let Some(media) = &thumbnail_media {
                    self.media.delete_by_url(&media.url).await;
                }
                Err(err.into())
            }
        }
    }

    /// Delete a video, its comments, likes, watch-history rows and
    /// playlist memberships, then its media blobs best-effort.
    pub async fn delete_video(&self, video_id: Uuid, requester_id: Uuid) -> ApiResult<()> {
        let current = self.require_video(video_id).await?;
        ensure_owner(
            current.owner_id,
            requester_id,
            "Not authorized to delete this video",
        )?;

        self.db.delete_video(video_id).await?;
        self.media.delete_by_url(&current.video_file).await;
        self.media.delete_by_url(&current.thumbnail).await;
        tracing::info!(%video_id, "video deleted");
        Ok(())
    }

    /// Flip the published flag, returning the new state
    pub async fn toggle_publish(&self, video_id: Uuid, requester_id: Uuid) -> ApiResult<bool> {
        let current = self.require_video(video_id).await?;
        ensure_owner(
            current.owner_id,
            requester_id,
            "Not authorized to update this video",
        )?;

        let row = self
            .db
            .set_video_published(video_id, !current.is_published)
            .await?
            .ok_or_else(|| ApiError::not_found("Video not found"))?;
        Ok(row.is_published)
    }

    async fn require_video(&self, video_id: Uuid) -> ApiResult<VideoRow> {
        self.db
            .get_video(video_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Video not found"))
    }
}
