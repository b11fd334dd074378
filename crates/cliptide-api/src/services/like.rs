// Like service: involutive toggles keyed by the requester

use crate::api::common::{ApiError, ApiResult};
use crate::storage::StorageBackend;
use cliptide_core::LikedVideoIds;
use uuid::Uuid;

pub struct LikeService {
    db: StorageBackend,
}

impl LikeService {
    pub fn new(db: StorageBackend) -> Self {
        Self { db }
    }

    /// Toggle the requester's like on a video, true when now liked
    pub async fn toggle_video_like(&self, user_id: Uuid, video_id: Uuid) -> ApiResult<bool> {
        if self.db.get_video(video_id).await?.is_none() {
            return Err(ApiError::not_found("Video not found"));
        }
        Ok(self.db.toggle_video_like(user_id, video_id).await?)
    }

    pub async fn toggle_comment_like(&self, user_id: Uuid, comment_id: Uuid) -> ApiResult<bool> {
        if self.db.get_comment(comment_id).await?.is_none() {
            return Err(ApiError::not_found("Comment not found"));
        }
        Ok(self.db.toggle_comment_like(user_id, comment_id).await?)
    }

    pub async fn toggle_tweet_like(&self, user_id: Uuid, tweet_id: Uuid) -> ApiResult<bool> {
        if self.db.get_tweet(tweet_id).await?.is_none() {
            return Err(ApiError::not_found("Tweet not found"));
        }
        Ok(self.db.toggle_tweet_like(user_id, tweet_id).await?)
    }

    /// Ids of the videos the requester has liked
    pub async fn liked_videos(&self, user_id: Uuid) -> ApiResult<LikedVideoIds> {
        let video_ids = self.db.list_liked_video_ids(user_id).await?;
        let total = video_ids.len() as i64;
        Ok(LikedVideoIds { video_ids, total })
    }
}
