// Comment service

use crate::api::common::{ApiError, ApiResult};
use crate::services::ensure_owner;
use crate::storage::{CommentRow, CreateCommentRow, StorageBackend};
use cliptide_core::{Comment, CommentWithOwner, Page};
use uuid::Uuid;

pub struct CommentService {
    db: StorageBackend,
}

impl CommentService {
    pub fn new(db: StorageBackend) -> Self {
        Self { db }
    }

    /// Comments on a video, newest first
    pub async fn list_for_video(
        &self,
        video_id: Uuid,
        page: i64,
        limit: i64,
    ) -> ApiResult<Page<CommentWithOwner>> {
        self.require_video(video_id).await?;

        let offset = Page::<CommentWithOwner>::offset(page, limit);
        let rows = self.db.list_video_comments(video_id, limit, offset).await?;
        let total = self.db.count_video_comments(video_id).await?;
        let docs = rows.into_iter().map(Into::into).collect();
        Ok(Page::new(docs, total, page, limit))
    }

    pub async fn add(&self, video_id: Uuid, owner_id: Uuid, content: &str) -> ApiResult<Comment> {
        self.require_video(video_id).await?;

        let input = CreateCommentRow {
            content: content.to_string(),
            video_id,
            owner_id,
        };
        let row = self.db.create_comment(input).await?;
        Ok(row.into())
    }

    pub async fn update(
        &self,
        comment_id: Uuid,
        requester_id: Uuid,
        content: &str,
    ) -> ApiResult<Comment> {
        let current = self.require_comment(comment_id).await?;
        ensure_owner(
            current.owner_id,
            requester_id,
            "Not authorized to update this comment",
        )?;

        let row = self
            .db
            .update_comment(comment_id, content)
            .await?
            .ok_or_else(|| ApiError::not_found("Comment not found"))?;
        Ok(row.into())
    }

    pub async fn delete(&self, comment_id: Uuid, requester_id: Uuid) -> ApiResult<()> {
        let current = self.require_comment(comment_id).await?;
        ensure_owner(
            current.owner_id,
            requester_id,
            "Not authorized to delete this comment",
        )?;

        self.db.delete_comment(comment_id).await?;
        Ok(())
    }

    async fn require_video(&self, video_id: Uuid) -> ApiResult<()> {
        self.db
            .get_video(video_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| ApiError::not_found("Video not found"))
    }

    async fn require_comment(&self, comment_id: Uuid) -> ApiResult<CommentRow> {
        self.db
            .get_comment(comment_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Comment not found"))
    }
}
