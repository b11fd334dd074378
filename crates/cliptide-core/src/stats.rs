// Channel statistics domain types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Aggregate counters for a channel dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ChannelStats {
    pub total_videos: i64,
    /// Sum of view counters across the channel's videos
    pub total_views: i64,
    pub total_subscribers: i64,
    /// Likes received across the channel's videos
    pub total_likes: i64,
}

/// Ids of videos the user has liked, with the total count
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct LikedVideoIds {
    pub video_ids: Vec<Uuid>,
    pub total: i64,
}
