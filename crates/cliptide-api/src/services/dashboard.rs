// Dashboard service: aggregates for the requester's own channel

use crate::api::common::ApiResult;
use crate::storage::{StorageBackend, VideoListFilter, VideoSortKey};
use cliptide_core::{ChannelStats, Page, VideoSummary};
use uuid::Uuid;

pub struct DashboardService {
    db: StorageBackend,
}

impl DashboardService {
    pub fn new(db: StorageBackend) -> Self {
        Self { db }
    }

    pub async fn channel_stats(&self, user_id: Uuid) -> ApiResult<ChannelStats> {
        let row = self.db.get_channel_stats(user_id).await?;
        Ok(row.into())
    }

    /// The requester's own uploads, published or not, newest first
    pub async fn channel_videos(
        &self,
        user_id: Uuid,
        page: i64,
        limit: i64,
    ) -> ApiResult<Page<VideoSummary>> {
        let filter = VideoListFilter {
            query: None,
            owner_id: Some(user_id),
            only_published: false,
            sort_key: VideoSortKey::CreatedAt,
            sort_asc: false,
            limit,
            offset: Page::<VideoSummary>::offset(page, limit),
        };

        let rows = self.db.list_videos(&filter).await?;
        let total = self.db.count_videos(&filter).await?;
        let docs = rows.into_iter().map(Into::into).collect();
        Ok(Page::new(docs, total, page, limit))
    }
}
