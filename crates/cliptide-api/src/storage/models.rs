// Database row models
//
// Row types mirror table shapes (plus join projections with aliased
// columns) and convert into the public entity types at the storage
// boundary. Secret columns (password_hash, refresh_token_hash) exist
// only on rows and are dropped by the conversions.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use cliptide_core::{
    ChannelProfile, ChannelStats, ChannelSubscriber, Comment, CommentWithOwner, Playlist,
    SubscribedChannel, Tweet, User, UserSummary, Video, VideoSummary, VideoWithOwner,
};

// ============================================
// Users
// ============================================

/// User row in the database
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub fullname: String,
    pub avatar: String,
    pub cover_image: Option<String>,
    pub password_hash: String,
    /// SHA-256 digest of the single live refresh token, None when logged out
    pub refresh_token_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user
#[derive(Debug, Clone)]
pub struct CreateUserRow {
    pub username: String,
    pub email: String,
    pub fullname: String,
    pub avatar: String,
    pub cover_image: Option<String>,
    pub password_hash: String,
}

/// Input for updating account details, None fields keep current values
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRow {
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
    pub cover_image: Option<String>,
}

/// Channel page projection with viewer-relative subscription aggregates
#[derive(Debug, Clone, FromRow)]
pub struct ChannelProfileRow {
    pub id: Uuid,
    pub username: String,
    pub fullname: String,
    pub avatar: String,
    pub cover_image: Option<String>,
    pub subscribers_count: i64,
    pub channels_subscribed_to_count: i64,
    pub is_subscribed: bool,
}

// ============================================
// Videos
// ============================================

/// Video row in the database
#[derive(Debug, Clone, FromRow)]
pub struct VideoRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub video_file: String,
    pub thumbnail: String,
    pub title: String,
    pub description: Option<String>,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a video
#[derive(Debug, Clone)]
pub struct CreateVideoRow {
    pub owner_id: Uuid,
    pub video_file: String,
    pub thumbnail: String,
    pub title: String,
    pub description: Option<String>,
    pub duration: f64,
}

/// Input for updating video details, None fields keep current values
#[derive(Debug, Clone, Default)]
pub struct UpdateVideoRow {
    pub title: Option<String>,
    pub description: Option<String>,
    pub thumbnail: Option<String>,
}

/// Video joined with its owner's public columns
#[derive(Debug, Clone, FromRow)]
pub struct VideoWithOwnerRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub video_file: String,
    pub thumbnail: String,
    pub title: String,
    pub description: Option<String>,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner_username: String,
    pub owner_fullname: String,
    pub owner_avatar: String,
}

/// Sortable columns for the video feed.
/// Keeps ORDER BY assembly restricted to known columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoSortKey {
    CreatedAt,
    Views,
    Duration,
}

impl VideoSortKey {
    /// Parse the wire value, None for anything outside the whitelist
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "createdAt" => Some(Self::CreatedAt),
            "views" => Some(Self::Views),
            "duration" => Some(Self::Duration),
            _ => None,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::Views => "views",
            Self::Duration => "duration",
        }
    }
}

/// Filter and ordering for the video feed
#[derive(Debug, Clone)]
pub struct VideoListFilter {
    /// Case-insensitive substring match on title and description
    pub query: Option<String>,
    /// Restrict to a single owner's videos (includes unpublished)
    pub owner_id: Option<Uuid>,
    /// When no owner filter is given, only published videos are listed
    pub only_published: bool,
    pub sort_key: VideoSortKey,
    pub sort_asc: bool,
    pub limit: i64,
    pub offset: i64,
}

// ============================================
// Comments
// ============================================

/// Comment row in the database
#[derive(Debug, Clone, FromRow)]
pub struct CommentRow {
    pub id: Uuid,
    pub content: String,
    pub video_id: Uuid,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a comment
#[derive(Debug, Clone)]
pub struct CreateCommentRow {
    pub content: String,
    pub video_id: Uuid,
    pub owner_id: Uuid,
}

/// Comment joined with its author's public columns
#[derive(Debug, Clone, FromRow)]
pub struct CommentWithOwnerRow {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub owner_id: Uuid,
    pub owner_username: String,
    pub owner_fullname: String,
    pub owner_avatar: String,
}

// ============================================
// Tweets
// ============================================

/// Tweet row in the database
#[derive(Debug, Clone, FromRow)]
pub struct TweetRow {
    pub id: Uuid,
    pub content: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================
// Likes
// ============================================

/// Like row, exactly one of the three target columns is set
#[derive(Debug, Clone, FromRow)]
pub struct LikeRow {
    pub id: Uuid,
    pub liked_by: Uuid,
    pub video_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
    pub tweet_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

// ============================================
// Playlists
// ============================================

/// Playlist row, member video ids kept in insertion order
#[derive(Debug, Clone, FromRow)]
pub struct PlaylistRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
    pub video_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a playlist
#[derive(Debug, Clone)]
pub struct CreatePlaylistRow {
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
}

/// Input for updating playlist details, None fields keep current values
#[derive(Debug, Clone, Default)]
pub struct UpdatePlaylistRow {
    pub name: Option<String>,
    pub description: Option<String>,
}

// ============================================
// Subscriptions
// ============================================

/// Subscription row, an edge from subscriber to channel
#[derive(Debug, Clone, FromRow)]
pub struct SubscriptionRow {
    pub id: Uuid,
    pub subscriber_id: Uuid,
    pub channel_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Subscription edge joined with the far-end user's public columns
#[derive(Debug, Clone, FromRow)]
pub struct SubscriptionWithUserRow {
    pub user_id: Uuid,
    pub username: String,
    pub fullname: String,
    pub avatar: String,
    pub subscribed_at: DateTime<Utc>,
}

// ============================================
// Watch history
// ============================================

/// Watch history row, one per (user, video) with the latest watch time
#[derive(Debug, Clone, FromRow)]
pub struct WatchHistoryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub video_id: Uuid,
    pub watched_at: DateTime<Utc>,
}

// ============================================
// Dashboard
// ============================================

/// Aggregate counters for a channel dashboard
#[derive(Debug, Clone, FromRow)]
pub struct ChannelStatsRow {
    pub total_videos: i64,
    pub total_views: i64,
    pub total_subscribers: i64,
    pub total_likes: i64,
}

// ============================================
// Conversions into public entity types
// ============================================

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            fullname: row.fullname,
            avatar: row.avatar,
            cover_image: row.cover_image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<ChannelProfileRow> for ChannelProfile {
    fn from(row: ChannelProfileRow) -> Self {
        ChannelProfile {
            id: row.id,
            username: row.username,
            fullname: row.fullname,
            avatar: row.avatar,
            cover_image: row.cover_image,
            subscribers_count: row.subscribers_count,
            channels_subscribed_to_count: row.channels_subscribed_to_count,
            is_subscribed: row.is_subscribed,
        }
    }
}

impl From<VideoRow> for Video {
    fn from(row: VideoRow) -> Self {
        Video {
            id: row.id,
            owner: row.owner_id,
            video_file: row.video_file,
            thumbnail: row.thumbnail,
            title: row.title,
            description: row.description,
            duration: row.duration,
            views: row.views,
            is_published: row.is_published,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<VideoWithOwnerRow> for VideoWithOwner {
    fn from(row: VideoWithOwnerRow) -> Self {
        VideoWithOwner {
            id: row.id,
            owner: UserSummary {
                id: row.owner_id,
                username: row.owner_username,
                fullname: row.owner_fullname,
                avatar: row.owner_avatar,
            },
            video_file: row.video_file,
            thumbnail: row.thumbnail,
            title: row.title,
            description: row.description,
            duration: row.duration,
            views: row.views,
            is_published: row.is_published,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<VideoRow> for VideoSummary {
    fn from(row: VideoRow) -> Self {
        VideoSummary {
            id: row.id,
            title: row.title,
            thumbnail: row.thumbnail,
            views: row.views,
            created_at: row.created_at,
        }
    }
}

impl From<VideoWithOwnerRow> for VideoSummary {
    fn from(row: VideoWithOwnerRow) -> Self {
        VideoSummary {
            id: row.id,
            title: row.title,
            thumbnail: row.thumbnail,
            views: row.views,
            created_at: row.created_at,
        }
    }
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            content: row.content,
            video: row.video_id,
            owner: row.owner_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<CommentWithOwnerRow> for CommentWithOwner {
    fn from(row: CommentWithOwnerRow) -> Self {
        CommentWithOwner {
            id: row.id,
            content: row.content,
            owner: UserSummary {
                id: row.owner_id,
                username: row.owner_username,
                fullname: row.owner_fullname,
                avatar: row.owner_avatar,
            },
            created_at: row.created_at,
        }
    }
}

impl From<TweetRow> for Tweet {
    fn from(row: TweetRow) -> Self {
        Tweet {
            id: row.id,
            content: row.content,
            owner: row.owner_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<PlaylistRow> for Playlist {
    fn from(row: PlaylistRow) -> Self {
        Playlist {
            id: row.id,
            name: row.name,
            description: row.description,
            owner: row.owner_id,
            videos: row.video_ids,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<SubscriptionWithUserRow> for ChannelSubscriber {
    fn from(row: SubscriptionWithUserRow) -> Self {
        ChannelSubscriber {
            subscriber: UserSummary {
                id: row.user_id,
                username: row.username,
                fullname: row.fullname,
                avatar: row.avatar,
            },
            subscribed_at: row.subscribed_at,
        }
    }
}

impl From<SubscriptionWithUserRow> for SubscribedChannel {
    fn from(row: SubscriptionWithUserRow) -> Self {
        SubscribedChannel {
            channel: UserSummary {
                id: row.user_id,
                username: row.username,
                fullname: row.fullname,
                avatar: row.avatar,
            },
            subscribed_at: row.subscribed_at,
        }
    }
}

impl From<ChannelStatsRow> for ChannelStats {
    fn from(row: ChannelStatsRow) -> Self {
        ChannelStats {
            total_videos: row.total_videos,
            total_views: row.total_views,
            total_subscribers: row.total_subscribers,
            total_likes: row.total_likes,
        }
    }
}
