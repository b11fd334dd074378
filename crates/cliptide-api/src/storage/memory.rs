// In-memory store for dev mode and tests
// Decision: parking_lot RwLocks around plain HashMaps
// Decision: ids are uuid v7 so insertion order and time order agree
//
// Mirrors the Postgres schema closely enough that services cannot tell
// the backends apart. Unique constraints and cascading deletes are
// emulated by hand here.

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::HashMap;
use uuid::Uuid;

use super::models::*;

/// One RwLock-guarded table per entity, everything gone on restart
#[derive(Default)]
pub struct InMemoryDatabase {
    users: RwLock<HashMap<Uuid, UserRow>>,
    videos: RwLock<HashMap<Uuid, VideoRow>>,
    comments: RwLock<HashMap<Uuid, CommentRow>>,
    tweets: RwLock<HashMap<Uuid, TweetRow>>,
    likes: RwLock<HashMap<Uuid, LikeRow>>,
    playlists: RwLock<HashMap<Uuid, PlaylistRow>>,
    subscriptions: RwLock<HashMap<Uuid, SubscriptionRow>>,
    watch_history: RwLock<HashMap<Uuid, WatchHistoryRow>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    // ============================================
    // Users
    // ============================================

    pub async fn create_user(&self, input: CreateUserRow) -> Result<UserRow> {
        let mut users = self.users.write();
        if users
            .values()
            .any(|u| u.username == input.username || u.email == input.email)
        {
            bail!("username or email already taken");
        }

        let now = Self::now();
        let id = Uuid::now_v7();
        let row = UserRow {
            id,
            username: input.username,
            email: input.email,
            fullname: input.fullname,
            avatar: input.avatar,
            cover_image: input.cover_image,
            password_hash: input.password_hash,
            refresh_token_hash: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(id, row.clone());
        Ok(row)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>> {
        Ok(self.users.read().get(&id).cloned())
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    pub async fn get_user_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<UserRow>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.username == username || u.email == email)
            .cloned())
    }

    pub async fn update_user(&self, id: Uuid, input: UpdateUserRow) -> Result<Option<UserRow>> {
        let mut users = self.users.write();
        let Some(row) = users.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(fullname) = input.fullname {
            row.fullname = fullname;
        }
        if let Some(email) = input.email {
            row.email = email;
        }
        if let Some(avatar) = input.avatar {
            row.avatar = avatar;
        }
        if let Some(cover_image) = input.cover_image {
            row.cover_image = Some(cover_image);
        }
        row.updated_at = Self::now();
        Ok(Some(row.clone()))
    }

    pub async fn update_user_password(&self, id: Uuid, password_hash: &str) -> Result<()> {
        if let Some(row) = self.users.write().get_mut(&id) {
            row.password_hash = password_hash.to_string();
            row.updated_at = Self::now();
        }
        Ok(())
    }

    pub async fn set_refresh_token_hash(&self, id: Uuid, hash: Option<&str>) -> Result<()> {
        if let Some(row) = self.users.write().get_mut(&id) {
            row.refresh_token_hash = hash.map(str::to_string);
        }
        Ok(())
    }

    pub async fn user_exists(&self, id: Uuid) -> Result<bool> {
        Ok(self.users.read().contains_key(&id))
    }

    pub async fn get_channel_profile(
        &self,
        username: &str,
        viewer_id: Uuid,
    ) -> Result<Option<ChannelProfileRow>> {
        let Some(user) = self.get_user_by_username(username).await? else {
            return Ok(None);
        };

        let subscriptions = self.subscriptions.read();
        let subscribers_count = subscriptions
            .values()
            .filter(|s| s.channel_id == user.id)
            .count() as i64;
        let channels_subscribed_to_count = subscriptions
            .values()
            .filter(|s| s.subscriber_id == user.id)
            .count() as i64;
        let is_subscribed = subscriptions
            .values()
            .any(|s| s.channel_id == user.id && s.subscriber_id == viewer_id);

        Ok(Some(ChannelProfileRow {
            id: user.id,
            username: user.username,
            fullname: user.fullname,
            avatar: user.avatar,
            cover_image: user.cover_image,
            subscribers_count,
            channels_subscribed_to_count,
            is_subscribed,
        }))
    }

    // ============================================
    // Watch history
    // ============================================

    pub async fn append_watch_history(&self, user_id: Uuid, video_id: Uuid) -> Result<()> {
        let mut history = self.watch_history.write();
        if let Some(row) = history
            .values_mut()
            .find(|h| h.user_id == user_id && h.video_id == video_id)
        {
            row.watched_at = Self::now();
            return Ok(());
        }

        let id = Uuid::now_v7();
        history.insert(
            id,
            WatchHistoryRow {
                id,
                user_id,
                video_id,
                watched_at: Self::now(),
            },
        );
        Ok(())
    }

    pub async fn list_watch_history(&self, user_id: Uuid) -> Result<Vec<VideoWithOwnerRow>> {
        let mut entries: Vec<WatchHistoryRow> = self
            .watch_history
            .read()
            .values()
            .filter(|h| h.user_id == user_id)
            .cloned()
            .collect();
        entries.sort_by(|a, b| b.watched_at.cmp(&a.watched_at));

        let videos = self.videos.read();
        let users = self.users.read();
        let rows = entries
            .iter()
            .filter_map(|h| {
                let video = videos.get(&h.video_id)?;
                let owner = users.get(&video.owner_id)?;
                Some(join_owner(video.clone(), owner))
            })
            .collect();
        Ok(rows)
    }

    // ============================================
    // Videos
    // ============================================

    pub async fn create_video(&self, input: CreateVideoRow) -> Result<VideoRow> {
        let now = Self::now();
        let id = Uuid::now_v7();
        let row = VideoRow {
            id,
            owner_id: input.owner_id,
            video_file: input.video_file,
            thumbnail: input.thumbnail,
            title: input.title,
            description: input.description,
            duration: input.duration,
            views: 0,
            is_published: true,
            created_at: now,
            updated_at: now,
        };
        self.videos.write().insert(id, row.clone());
        Ok(row)
    }

    pub async fn get_video(&self, id: Uuid) -> Result<Option<VideoRow>> {
        Ok(self.videos.read().get(&id).cloned())
    }

    pub async fn get_video_with_owner(&self, id: Uuid) -> Result<Option<VideoWithOwnerRow>> {
        let videos = self.videos.read();
        let users = self.users.read();
        let Some(video) = videos.get(&id) else {
            return Ok(None);
        };
        let Some(owner) = users.get(&video.owner_id) else {
            return Ok(None);
        };
        Ok(Some(join_owner(video.clone(), owner)))
    }

    fn filtered_videos(&self, filter: &VideoListFilter) -> Vec<VideoRow> {
        let query = filter.query.as_deref().map(str::to_lowercase);
        self.videos
            .read()
            .values()
            .filter(|v| {
                if let Some(q) = &query {
                    let in_title = v.title.to_lowercase().contains(q);
                    let in_description = v
                        .description
                        .as_deref()
                        .map(|d| d.to_lowercase().contains(q))
                        .unwrap_or(false);
                    if !in_title && !in_description {
                        return false;
                    }
                }
                if let Some(owner_id) = filter.owner_id {
                    if v.owner_id != owner_id {
                        return false;
                    }
                }
                if filter.only_published && !v.is_published {
                    return false;
                }
                true
            })
            .cloned()
            .collect()
    }

    pub async fn list_videos(&self, filter: &VideoListFilter) -> Result<Vec<VideoWithOwnerRow>> {
        let mut rows = self.filtered_videos(filter);
        rows.sort_by(|a, b| {
            let ordering = match filter.sort_key {
                VideoSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
                VideoSortKey::Views => a.views.cmp(&b.views),
                VideoSortKey::Duration => {
                    a.duration.partial_cmp(&b.duration).unwrap_or(Ordering::Equal)
                }
            };
            let ordering = if filter.sort_asc {
                ordering
            } else {
                ordering.reverse()
            };
            // Tiebreak on id desc to keep pages stable, matching the SQL path
            ordering.then(b.id.cmp(&a.id))
        });

        let users = self.users.read();
        let rows = rows
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .filter_map(|v| {
                let owner = users.get(&v.owner_id)?;
                Some(join_owner(v, owner))
            })
            .collect();
        Ok(rows)
    }

    pub async fn count_videos(&self, filter: &VideoListFilter) -> Result<i64> {
        Ok(self.filtered_videos(filter).len() as i64)
    }

    pub async fn update_video(&self, id: Uuid, input: UpdateVideoRow) -> Result<Option<VideoRow>> {
        let mut videos = self.videos.write();
        let Some(row) = videos.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(title) = input.title {
            row.title = title;
        }
        if let Some(description) = input.description {
            row.description = Some(description);
        }
        if let Some(thumbnail) = input.thumbnail {
            row.thumbnail = thumbnail;
        }
        row.updated_at = Self::now();
        Ok(Some(row.clone()))
    }

    pub async fn set_video_published(
        &self,
        id: Uuid,
        is_published: bool,
    ) -> Result<Option<VideoRow>> {
        let mut videos = self.videos.write();
        let Some(row) = videos.get_mut(&id) else {
            return Ok(None);
        };
        row.is_published = is_published;
        row.updated_at = Self::now();
        Ok(Some(row.clone()))
    }

    pub async fn increment_video_views(&self, id: Uuid) -> Result<()> {
        if let Some(row) = self.videos.write().get_mut(&id) {
            row.views += 1;
        }
        Ok(())
    }

    pub async fn delete_video(&self, id: Uuid) -> Result<bool> {
        if self.videos.write().remove(&id).is_none() {
            return Ok(false);
        }

        // Emulate the cascades the SQL schema provides
        let comment_ids: Vec<Uuid> = {
            let mut comments = self.comments.write();
            let ids: Vec<Uuid> = comments
                .values()
                .filter(|c| c.video_id == id)
                .map(|c| c.id)
                .collect();
            for comment_id in &ids {
                comments.remove(comment_id);
            }
            ids
        };
        self.likes.write().retain(|_, l| {
            l.video_id != Some(id)
                && !l
                    .comment_id
                    .map(|c| comment_ids.contains(&c))
                    .unwrap_or(false)
        });
        self.watch_history.write().retain(|_, h| h.video_id != id);
        for playlist in self.playlists.write().values_mut() {
            playlist.video_ids.retain(|v| *v != id);
        }
        Ok(true)
    }

    pub async fn get_videos_by_ids(&self, ids: &[Uuid]) -> Result<Vec<VideoRow>> {
        let videos = self.videos.read();
        Ok(ids.iter().filter_map(|id| videos.get(id).cloned()).collect())
    }

    // ============================================
    // Comments
    // ============================================

    pub async fn create_comment(&self, input: CreateCommentRow) -> Result<CommentRow> {
        let now = Self::now();
        let id = Uuid::now_v7();
        let row = CommentRow {
            id,
            content: input.content,
            video_id: input.video_id,
            owner_id: input.owner_id,
            created_at: now,
            updated_at: now,
        };
        self.comments.write().insert(id, row.clone());
        Ok(row)
    }

    pub async fn get_comment(&self, id: Uuid) -> Result<Option<CommentRow>> {
        Ok(self.comments.read().get(&id).cloned())
    }

    pub async fn list_video_comments(
        &self,
        video_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CommentWithOwnerRow>> {
        let mut rows: Vec<CommentRow> = self
            .comments
            .read()
            .values()
            .filter(|c| c.video_id == video_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let users = self.users.read();
        let rows = rows
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .filter_map(|c| {
                let owner = users.get(&c.owner_id)?;
                Some(CommentWithOwnerRow {
                    id: c.id,
                    content: c.content,
                    created_at: c.created_at,
                    owner_id: c.owner_id,
                    owner_username: owner.username.clone(),
                    owner_fullname: owner.fullname.clone(),
                    owner_avatar: owner.avatar.clone(),
                })
            })
            .collect();
        Ok(rows)
    }

    pub async fn count_video_comments(&self, video_id: Uuid) -> Result<i64> {
        Ok(self
            .comments
            .read()
            .values()
            .filter(|c| c.video_id == video_id)
            .count() as i64)
    }

    pub async fn update_comment(&self, id: Uuid, content: &str) -> Result<Option<CommentRow>> {
        let mut comments = self.comments.write();
        let Some(row) = comments.get_mut(&id) else {
            return Ok(None);
        };
        row.content = content.to_string();
        row.updated_at = Self::now();
        Ok(Some(row.clone()))
    }

    pub async fn delete_comment(&self, id: Uuid) -> Result<bool> {
        if self.comments.write().remove(&id).is_none() {
            return Ok(false);
        }
        self.likes.write().retain(|_, l| l.comment_id != Some(id));
        Ok(true)
    }

    // ============================================
    // Tweets
    // ============================================

    pub async fn create_tweet(&self, owner_id: Uuid, content: &str) -> Result<TweetRow> {
        let now = Self::now();
        let id = Uuid::now_v7();
        let row = TweetRow {
            id,
            content: content.to_string(),
            owner_id,
            created_at: now,
            updated_at: now,
        };
        self.tweets.write().insert(id, row.clone());
        Ok(row)
    }

    pub async fn get_tweet(&self, id: Uuid) -> Result<Option<TweetRow>> {
        Ok(self.tweets.read().get(&id).cloned())
    }

    pub async fn list_user_tweets(&self, owner_id: Uuid) -> Result<Vec<TweetRow>> {
        let mut rows: Vec<TweetRow> = self
            .tweets
            .read()
            .values()
            .filter(|t| t.owner_id == owner_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    pub async fn update_tweet(&self, id: Uuid, content: &str) -> Result<Option<TweetRow>> {
        let mut tweets = self.tweets.write();
        let Some(row) = tweets.get_mut(&id) else {
            return Ok(None);
        };
        row.content = content.to_string();
        row.updated_at = Self::now();
        Ok(Some(row.clone()))
    }

    pub async fn delete_tweet(&self, id: Uuid) -> Result<bool> {
        if self.tweets.write().remove(&id).is_none() {
            return Ok(false);
        }
        self.likes.write().retain(|_, l| l.tweet_id != Some(id));
        Ok(true)
    }

    // ============================================
    // Likes
    // ============================================

    fn toggle_like(&self, row: LikeRow, matches: impl Fn(&LikeRow) -> bool) -> bool {
        // Single write lock so concurrent toggles cannot double-insert
        let mut likes = self.likes.write();
        let existing: Option<Uuid> = likes.values().find(|l| matches(l)).map(|l| l.id);
        match existing {
            Some(id) => {
                likes.remove(&id);
                false
            }
            None => {
                likes.insert(row.id, row);
                true
            }
        }
    }

    pub async fn toggle_video_like(&self, user_id: Uuid, video_id: Uuid) -> Result<bool> {
        let row = LikeRow {
            id: Uuid::now_v7(),
            liked_by: user_id,
            video_id: Some(video_id),
            comment_id: None,
            tweet_id: None,
            created_at: Self::now(),
        };
        Ok(self.toggle_like(row, |l| l.liked_by == user_id && l.video_id == Some(video_id)))
    }

    pub async fn toggle_comment_like(&self, user_id: Uuid, comment_id: Uuid) -> Result<bool> {
        let row = LikeRow {
            id: Uuid::now_v7(),
            liked_by: user_id,
            video_id: None,
            comment_id: Some(comment_id),
            tweet_id: None,
            created_at: Self::now(),
        };
        Ok(self.toggle_like(row, |l| l.liked_by == user_id && l.comment_id == Some(comment_id)))
    }

    pub async fn toggle_tweet_like(&self, user_id: Uuid, tweet_id: Uuid) -> Result<bool> {
        let row = LikeRow {
            id: Uuid::now_v7(),
            liked_by: user_id,
            video_id: None,
            comment_id: None,
            tweet_id: Some(tweet_id),
            created_at: Self::now(),
        };
        Ok(self.toggle_like(row, |l| l.liked_by == user_id && l.tweet_id == Some(tweet_id)))
    }

    pub async fn list_liked_video_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let mut rows: Vec<LikeRow> = self
            .likes
            .read()
            .values()
            .filter(|l| l.liked_by == user_id && l.video_id.is_some())
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows.into_iter().filter_map(|l| l.video_id).collect())
    }

    // ============================================
    // Playlists
    // ============================================

    pub async fn create_playlist(&self, input: CreatePlaylistRow) -> Result<PlaylistRow> {
        let mut playlists = self.playlists.write();
        if playlists.values().any(|p| p.name == input.name) {
            bail!("playlist name already taken");
        }

        let now = Self::now();
        let id = Uuid::now_v7();
        let row = PlaylistRow {
            id,
            name: input.name,
            description: input.description,
            owner_id: input.owner_id,
            video_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        playlists.insert(id, row.clone());
        Ok(row)
    }

    pub async fn get_playlist(&self, id: Uuid) -> Result<Option<PlaylistRow>> {
        Ok(self.playlists.read().get(&id).cloned())
    }

    pub async fn get_playlist_by_name(&self, name: &str) -> Result<Option<PlaylistRow>> {
        Ok(self
            .playlists
            .read()
            .values()
            .find(|p| p.name == name)
            .cloned())
    }

    pub async fn list_user_playlists(&self, owner_id: Uuid) -> Result<Vec<PlaylistRow>> {
        let mut rows: Vec<PlaylistRow> = self
            .playlists
            .read()
            .values()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    pub async fn update_playlist(
        &self,
        id: Uuid,
        input: UpdatePlaylistRow,
    ) -> Result<Option<PlaylistRow>> {
        let mut playlists = self.playlists.write();
        let Some(row) = playlists.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = input.name {
            row.name = name;
        }
        if let Some(description) = input.description {
            row.description = Some(description);
        }
        row.updated_at = Self::now();
        Ok(Some(row.clone()))
    }

    pub async fn delete_playlist(&self, id: Uuid) -> Result<bool> {
        Ok(self.playlists.write().remove(&id).is_some())
    }

    pub async fn add_video_to_playlist(
        &self,
        id: Uuid,
        video_id: Uuid,
    ) -> Result<Option<PlaylistRow>> {
        let mut playlists = self.playlists.write();
        let Some(row) = playlists.get_mut(&id) else {
            return Ok(None);
        };
        row.video_ids.push(video_id);
        row.updated_at = Self::now();
        Ok(Some(row.clone()))
    }

    pub async fn remove_video_from_playlist(
        &self,
        id: Uuid,
        video_id: Uuid,
    ) -> Result<Option<PlaylistRow>> {
        let mut playlists = self.playlists.write();
        let Some(row) = playlists.get_mut(&id) else {
            return Ok(None);
        };
        row.video_ids.retain(|v| *v != video_id);
        row.updated_at = Self::now();
        Ok(Some(row.clone()))
    }

    // ============================================
    // Subscriptions
    // ============================================

    pub async fn toggle_subscription(&self, subscriber_id: Uuid, channel_id: Uuid) -> Result<bool> {
        let mut subscriptions = self.subscriptions.write();
        let existing: Option<Uuid> = subscriptions
            .values()
            .find(|s| s.subscriber_id == subscriber_id && s.channel_id == channel_id)
            .map(|s| s.id);
        match existing {
            Some(id) => {
                subscriptions.remove(&id);
                Ok(false)
            }
            None => {
                let id = Uuid::now_v7();
                subscriptions.insert(
                    id,
                    SubscriptionRow {
                        id,
                        subscriber_id,
                        channel_id,
                        created_at: Self::now(),
                    },
                );
                Ok(true)
            }
        }
    }

    fn join_subscription_users(
        &self,
        edges: Vec<SubscriptionRow>,
        far_end: impl Fn(&SubscriptionRow) -> Uuid,
    ) -> Vec<SubscriptionWithUserRow> {
        let users = self.users.read();
        edges
            .into_iter()
            .filter_map(|s| {
                let user = users.get(&far_end(&s))?;
                Some(SubscriptionWithUserRow {
                    user_id: user.id,
                    username: user.username.clone(),
                    fullname: user.fullname.clone(),
                    avatar: user.avatar.clone(),
                    subscribed_at: s.created_at,
                })
            })
            .collect()
    }

    pub async fn list_channel_subscribers(
        &self,
        channel_id: Uuid,
    ) -> Result<Vec<SubscriptionWithUserRow>> {
        let mut edges: Vec<SubscriptionRow> = self
            .subscriptions
            .read()
            .values()
            .filter(|s| s.channel_id == channel_id)
            .cloned()
            .collect();
        edges.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(self.join_subscription_users(edges, |s| s.subscriber_id))
    }

    pub async fn list_subscribed_channels(
        &self,
        subscriber_id: Uuid,
    ) -> Result<Vec<SubscriptionWithUserRow>> {
        let mut edges: Vec<SubscriptionRow> = self
            .subscriptions
            .read()
            .values()
            .filter(|s| s.subscriber_id == subscriber_id)
            .cloned()
            .collect();
        edges.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(self.join_subscription_users(edges, |s| s.channel_id))
    }

    // ============================================
    // Dashboard
    // ============================================

    pub async fn get_channel_stats(&self, user_id: Uuid) -> Result<ChannelStatsRow> {
        let videos = self.videos.read();
        let owned: Vec<&VideoRow> = videos.values().filter(|v| v.owner_id == user_id).collect();
        let total_videos = owned.len() as i64;
        let total_views: i64 = owned.iter().map(|v| v.views).sum();
        let owned_ids: Vec<Uuid> = owned.iter().map(|v| v.id).collect();

        let total_subscribers = self
            .subscriptions
            .read()
            .values()
            .filter(|s| s.channel_id == user_id)
            .count() as i64;
        let total_likes = self
            .likes
            .read()
            .values()
            .filter(|l| l.video_id.map(|v| owned_ids.contains(&v)).unwrap_or(false))
            .count() as i64;

        Ok(ChannelStatsRow {
            total_videos,
            total_views,
            total_subscribers,
            total_likes,
        })
    }
}

fn join_owner(video: VideoRow, owner: &UserRow) -> VideoWithOwnerRow {
    VideoWithOwnerRow {
        id: video.id,
        owner_id: video.owner_id,
        video_file: video.video_file,
        thumbnail: video.thumbnail,
        title: video.title,
        description: video.description,
        duration: video.duration,
        views: video.views,
        is_published: video.is_published,
        created_at: video.created_at,
        updated_at: video.updated_at,
        owner_username: owner.username.clone(),
        owner_fullname: owner.fullname.clone(),
        owner_avatar: owner.avatar.clone(),
    }
}
