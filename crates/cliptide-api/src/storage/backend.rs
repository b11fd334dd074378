// Storage backend dispatch
// Decision: enum dispatch instead of a trait object, both variants are
// known at compile time
//
// Every service talks to a StorageBackend. Production runs on Postgres,
// dev mode and the integration tests run on the in-memory store.

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use super::memory::InMemoryDatabase;
use super::models::*;
use super::repositories::Database;

#[derive(Clone)]
pub enum StorageBackend {
    Postgres(Database),
    InMemory(std::sync::Arc<InMemoryDatabase>),
}

impl StorageBackend {
    /// Connect to Postgres and apply pending migrations
    pub async fn postgres(database_url: &str) -> Result<Self> {
        let db = Database::from_url(database_url).await?;
        db.migrate().await?;
        Ok(Self::Postgres(db))
    }

    pub fn in_memory() -> Self {
        Self::InMemory(std::sync::Arc::new(InMemoryDatabase::new()))
    }

    /// True when running on the in-memory store
    pub fn is_dev_mode(&self) -> bool {
        matches!(self, Self::InMemory(_))
    }

    /// The underlying pool, None on the in-memory store
    pub fn pool(&self) -> Option<&PgPool> {
        match self {
            Self::Postgres(db) => Some(db.pool()),
            Self::InMemory(_) => None,
        }
    }

    // ============================================
    // Users
    // ============================================

    pub async fn create_user(&self, input: CreateUserRow) -> Result<UserRow> {
        match self {
            Self::Postgres(db) => db.create_user(input).await,
            Self::InMemory(db) => db.create_user(input).await,
        }
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>> {
        match self {
            Self::Postgres(db) => db.get_user(id).await,
            Self::InMemory(db) => db.get_user(id).await,
        }
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        match self {
            Self::Postgres(db) => db.get_user_by_username(username).await,
            Self::InMemory(db) => db.get_user_by_username(username).await,
        }
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        match self {
            Self::Postgres(db) => db.get_user_by_email(email).await,
            Self::InMemory(db) => db.get_user_by_email(email).await,
        }
    }

    pub async fn get_user_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<UserRow>> {
        match self {
            Self::Postgres(db) => db.get_user_by_username_or_email(username, email).await,
            Self::InMemory(db) => db.get_user_by_username_or_email(username, email).await,
        }
    }

    pub async fn update_user(&self, id: Uuid, input: UpdateUserRow) -> Result<Option<UserRow>> {
        match self {
            Self::Postgres(db) => db.update_user(id, input).await,
            Self::InMemory(db) => db.update_user(id, input).await,
        }
    }

    pub async fn update_user_password(&self, id: Uuid, password_hash: &str) -> Result<()> {
        match self {
            Self::Postgres(db) => db.update_user_password(id, password_hash).await,
            Self::InMemory(db) => db.update_user_password(id, password_hash).await,
        }
    }

    pub async fn set_refresh_token_hash(&self, id: Uuid, hash: Option<&str>) -> Result<()> {
        match self {
            Self::Postgres(db) => db.set_refresh_token_hash(id, hash).await,
            Self::InMemory(db) => db.set_refresh_token_hash(id, hash).await,
        }
    }

    pub async fn user_exists(&self, id: Uuid) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.user_exists(id).await,
            Self::InMemory(db) => db.user_exists(id).await,
        }
    }

    pub async fn get_channel_profile(
        &self,
        username: &str,
        viewer_id: Uuid,
    ) -> Result<Option<ChannelProfileRow>> {
        match self {
            Self::Postgres(db) => db.get_channel_profile(username, viewer_id).await,
            Self::InMemory(db) => db.get_channel_profile(username, viewer_id).await,
        }
    }

    // ============================================
    // Watch history
    // ============================================

    pub async fn append_watch_history(&self, user_id: Uuid, video_id: Uuid) -> Result<()> {
        match self {
            Self::Postgres(db) => db.append_watch_history(user_id, video_id).await,
            Self::InMemory(db) => db.append_watch_history(user_id, video_id).await,
        }
    }

    pub async fn list_watch_history(&self, user_id: Uuid) -> Result<Vec<VideoWithOwnerRow>> {
        match self {
            Self::Postgres(db) => db.list_watch_history(user_id).await,
            Self::InMemory(db) => db.list_watch_history(user_id).await,
        }
    }

    // ============================================
    // Videos
    // ============================================

    pub async fn create_video(&self, input: CreateVideoRow) -> Result<VideoRow> {
        match self {
            Self::Postgres(db) => db.create_video(input).await,
            Self::InMemory(db) => db.create_video(input).await,
        }
    }

    pub async fn get_video(&self, id: Uuid) -> Result<Option<VideoRow>> {
        match self {
            Self::Postgres(db) => db.get_video(id).await,
            Self::InMemory(db) => db.get_video(id).await,
        }
    }

    pub async fn get_video_with_owner(&self, id: Uuid) -> Result<Option<VideoWithOwnerRow>> {
        match self {
            Self::Postgres(db) => db.get_video_with_owner(id).await,
            Self::InMemory(db) => db.get_video_with_owner(id).await,
        }
    }

    pub async fn list_videos(&self, filter: &VideoListFilter) -> Result<Vec<VideoWithOwnerRow>> {
        match self {
            Self::Postgres(db) => db.list_videos(filter).await,
            Self::InMemory(db) => db.list_videos(filter).await,
        }
    }

    pub async fn count_videos(&self, filter: &VideoListFilter) -> Result<i64> {
        match self {
            Self::Postgres(db) => db.count_videos(filter).await,
            Self::InMemory(db) => db.count_videos(filter).await,
        }
    }

    pub async fn update_video(&self, id: Uuid, input: UpdateVideoRow) -> Result<Option<VideoRow>> {
        match self {
            Self::Postgres(db) => db.update_video(id, input).await,
            Self::InMemory(db) => db.update_video(id, input).await,
        }
    }

    pub async fn set_video_published(
        &self,
        id: Uuid,
        is_published: bool,
    ) -> Result<Option<VideoRow>> {
        match self {
            Self::Postgres(db) => db.set_video_published(id, is_published).await,
            Self::InMemory(db) => db.set_video_published(id, is_published).await,
        }
    }

    pub async fn increment_video_views(&self, id: Uuid) -> Result<()> {
        match self {
            Self::Postgres(db) => db.increment_video_views(id).await,
            Self::InMemory(db) => db.increment_video_views(id).await,
        }
    }

    pub async fn delete_video(&self, id: Uuid) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.delete_video(id).await,
            Self::InMemory(db) => db.delete_video(id).await,
        }
    }

    pub async fn get_videos_by_ids(&self, ids: &[Uuid]) -> Result<Vec<VideoRow>> {
        match self {
            Self::Postgres(db) => db.get_videos_by_ids(ids).await,
            Self::InMemory(db) => db.get_videos_by_ids(ids).await,
        }
    }

    // ============================================
    // Comments
    // ============================================

    pub async fn create_comment(&self, input: CreateCommentRow) -> Result<CommentRow> {
        match self {
            Self::Postgres(db) => db.create_comment(input).await,
            Self::InMemory(db) => db.create_comment(input).await,
        }
    }

    pub async fn get_comment(&self, id: Uuid) -> Result<Option<CommentRow>> {
        match self {
            Self::Postgres(db) => db.get_comment(id).await,
            Self::InMemory(db) => db.get_comment(id).await,
        }
    }

    pub async fn list_video_comments(
        &self,
        video_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CommentWithOwnerRow>> {
        match self {
            Self::Postgres(db) => db.list_video_comments(video_id, limit, offset).await,
            Self::InMemory(db) => db.list_video_comments(video_id, limit, offset).await,
        }
    }

    pub async fn count_video_comments(&self, video_id: Uuid) -> Result<i64> {
        match self {
            Self::Postgres(db) => db.count_video_comments(video_id).await,
            Self::InMemory(db) => db.count_video_comments(video_id).await,
        }
    }

    pub async fn update_comment(&self, id: Uuid, content: &str) -> Result<Option<CommentRow>> {
        match self {
            Self::Postgres(db) => db.update_comment(id, content).await,
            Self::InMemory(db) => db.update_comment(id, content).await,
        }
    }

    pub async fn delete_comment(&self, id: Uuid) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.delete_comment(id).await,
            Self::InMemory(db) => db.delete_comment(id).await,
        }
    }

    // ============================================
    // Tweets
    // ============================================

    pub async fn create_tweet(&self, owner_id: Uuid, content: &str) -> Result<TweetRow> {
        match self {
            Self::Postgres(db) => db.create_tweet(owner_id, content).await,
            Self::InMemory(db) => db.create_tweet(owner_id, content).await,
        }
    }

    pub async fn get_tweet(&self, id: Uuid) -> Result<Option<TweetRow>> {
        match self {
            Self::Postgres(db) => db.get_tweet(id).await,
            Self::InMemory(db) => db.get_tweet(id).await,
        }
    }

    pub async fn list_user_tweets(&self, owner_id: Uuid) -> Result<Vec<TweetRow>> {
        match self {
            Self::Postgres(db) => db.list_user_tweets(owner_id).await,
            Self::InMemory(db) => db.list_user_tweets(owner_id).await,
        }
    }

    pub async fn update_tweet(&self, id: Uuid, content: &str) -> Result<Option<TweetRow>> {
        match self {
            Self::Postgres(db) => db.update_tweet(id, content).await,
            Self::InMemory(db) => db.update_tweet(id, content).await,
        }
    }

    pub async fn delete_tweet(&self, id: Uuid) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.delete_tweet(id).await,
            Self::InMemory(db) => db.delete_tweet(id).await,
        }
    }

    // ============================================
    // Likes
    // ============================================

    pub async fn toggle_video_like(&self, user_id: Uuid, video_id: Uuid) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.toggle_video_like(user_id, video_id).await,
            Self::InMemory(db) => db.toggle_video_like(user_id, video_id).await,
        }
    }

    pub async fn toggle_comment_like(&self, user_id: Uuid, comment_id: Uuid) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.toggle_comment_like(user_id, comment_id).await,
            Self::InMemory(db) => db.toggle_comment_like(user_id, comment_id).await,
        }
    }

    pub async fn toggle_tweet_like(&self, user_id: Uuid, tweet_id: Uuid) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.toggle_tweet_like(user_id, tweet_id).await,
            Self::InMemory(db) => db.toggle_tweet_like(user_id, tweet_id).await,
        }
    }

    pub async fn list_liked_video_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        match self {
            Self::Postgres(db) => db.list_liked_video_ids(user_id).await,
            Self::InMemory(db) => db.list_liked_video_ids(user_id).await,
        }
    }

    // ============================================
    // Playlists
    // ============================================

    pub async fn create_playlist(&self, input: CreatePlaylistRow) -> Result<PlaylistRow> {
        match self {
            Self::Postgres(db) => db.create_playlist(input).await,
            Self::InMemory(db) => db.create_playlist(input).await,
        }
    }

    pub async fn get_playlist(&self, id: Uuid) -> Result<Option<PlaylistRow>> {
        match self {
            Self::Postgres(db) => db.get_playlist(id).await,
            Self::InMemory(db) => db.get_playlist(id).await,
        }
    }

    pub async fn get_playlist_by_name(&self, name: &str) -> Result<Option<PlaylistRow>> {
        match self {
            Self::Postgres(db) => db.get_playlist_by_name(name).await,
            Self::InMemory(db) => db.get_playlist_by_name(name).await,
        }
    }

    pub async fn list_user_playlists(&self, owner_id: Uuid) -> Result<Vec<PlaylistRow>> {
        match self {
            Self::Postgres(db) => db.list_user_playlists(owner_id).await,
            Self::InMemory(db) => db.list_user_playlists(owner_id).await,
        }
    }

    pub async fn update_playlist(
        &self,
        id: Uuid,
        input: UpdatePlaylistRow,
    ) -> Result<Option<PlaylistRow>> {
        match self {
            Self::Postgres(db) => db.update_playlist(id, input).await,
            Self::InMemory(db) => db.update_playlist(id, input).await,
        }
    }

    pub async fn delete_playlist(&self, id: Uuid) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.delete_playlist(id).await,
            Self::InMemory(db) => db.delete_playlist(id).await,
        }
    }

    pub async fn add_video_to_playlist(
        &self,
        id: Uuid,
        video_id: Uuid,
    ) -> Result<Option<PlaylistRow>> {
        match self {
            Self::Postgres(db) => db.add_video_to_playlist(id, video_id).await,
            Self::InMemory(db) => db.add_video_to_playlist(id, video_id).await,
        }
    }

    pub async fn remove_video_from_playlist(
        &self,
        id: Uuid,
        video_id: Uuid,
    ) -> Result<Option<PlaylistRow>> {
        match self {
            Self::Postgres(db) => db.remove_video_from_playlist(id, video_id).await,
            Self::InMemory(db) => db.remove_video_from_playlist(id, video_id).await,
        }
    }

    // ============================================
    // Subscriptions
    // ============================================

    pub async fn toggle_subscription(&self, subscriber_id: Uuid, channel_id: Uuid) -> Result<bool> {
        match self {
            Self::Postgres(db) => db.toggle_subscription(subscriber_id, channel_id).await,
            Self::InMemory(db) => db.toggle_subscription(subscriber_id, channel_id).await,
        }
    }

    pub async fn list_channel_subscribers(
        &self,
        channel_id: Uuid,
    ) -> Result<Vec<SubscriptionWithUserRow>> {
        match self {
            Self::Postgres(db) => db.list_channel_subscribers(channel_id).await,
            Self::InMemory(db) => db.list_channel_subscribers(channel_id).await,
        }
    }

    pub async fn list_subscribed_channels(
        &self,
        subscriber_id: Uuid,
    ) -> Result<Vec<SubscriptionWithUserRow>> {
        match self {
            Self::Postgres(db) => db.list_subscribed_channels(subscriber_id).await,
            Self::InMemory(db) => db.list_subscribed_channels(subscriber_id).await,
        }
    }

    // ============================================
    // Dashboard
    // ============================================

    pub async fn get_channel_stats(&self, user_id: Uuid) -> Result<ChannelStatsRow> {
        match self {
            Self::Postgres(db) => db.get_channel_stats(user_id).await,
            Self::InMemory(db) => db.get_channel_stats(user_id).await,
        }
    }
}
