// Video domain types
//
// A video row plus the projections the API serves: the owner-joined
// feed entry and the compact summary used by the channel dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::UserSummary;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Video entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: Uuid,
    /// Owning user id
    pub owner: Uuid,
    /// Playable media URL in the media store
    pub video_file: String,
    /// Thumbnail image URL
    pub thumbnail: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Duration in seconds as reported by the media store
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Video with its owner resolved to a public projection.
/// Served by the feed, single-video reads and watch history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct VideoWithOwner {
    pub id: Uuid,
    pub owner: UserSummary,
    pub video_file: String,
    pub thumbnail: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Compact per-video line for the channel dashboard listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct VideoSummary {
    pub id: Uuid,
    pub title: String,
    pub thumbnail: String,
    pub views: i64,
    pub created_at: DateTime<Utc>,
}
