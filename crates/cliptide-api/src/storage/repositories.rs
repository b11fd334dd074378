// PostgreSQL repository layer
//
// All SQL lives here. Aggregated reads (channel profile, stats, feeds)
// are expressed as joins and correlated subqueries so the API never
// does N+1 fetches. ORDER BY columns come from the VideoSortKey
// whitelist, never from raw request input.

use anyhow::Result;
use sqlx::PgPool;
use uuid::Uuid;

use super::models::*;

const USER_COLUMNS: &str = "id, username, email, fullname, avatar, cover_image, password_hash, refresh_token_hash, created_at, updated_at";

const VIDEO_COLUMNS: &str =
    "id, owner_id, video_file, thumbnail, title, description, duration, views, is_published, created_at, updated_at";

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    /// Apply embedded migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // ============================================
    // Users
    // ============================================

    pub async fn create_user(&self, input: CreateUserRow) -> Result<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (username, email, fullname, avatar, cover_image, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(&input.username)
        .bind(&input.email)
        .bind(&input.fullname)
        .bind(&input.avatar)
        .bind(&input.cover_image)
        .bind(&input.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Find a user holding either the username or the email.
    /// Used by registration to detect conflicts in one read.
    pub async fn get_user_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = $1 OR email = $2 LIMIT 1"
        ))
        .bind(username)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn update_user(&self, id: Uuid, input: UpdateUserRow) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users
            SET
                fullname = COALESCE($2, fullname),
                email = COALESCE($3, email),
                avatar = COALESCE($4, avatar),
                cover_image = COALESCE($5, cover_image),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(&input.fullname)
        .bind(&input.email)
        .bind(&input.avatar)
        .bind(&input.cover_image)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn update_user_password(&self, id: Uuid, password_hash: &str) -> Result<()> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Store the digest of the user's live refresh token, None revokes it
    pub async fn set_refresh_token_hash(&self, id: Uuid, hash: Option<&str>) -> Result<()> {
        sqlx::query("UPDATE users SET refresh_token_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn user_exists(&self, id: Uuid) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// Channel page with subscription aggregates relative to `viewer_id`
    pub async fn get_channel_profile(
        &self,
        username: &str,
        viewer_id: Uuid,
    ) -> Result<Option<ChannelProfileRow>> {
        let row = sqlx::query_as::<_, ChannelProfileRow>(
            r#"
            SELECT
                u.id, u.username, u.fullname, u.avatar, u.cover_image,
                (SELECT COUNT(*) FROM subscriptions s WHERE s.channel_id = u.id) AS subscribers_count,
                (SELECT COUNT(*) FROM subscriptions s WHERE s.subscriber_id = u.id) AS channels_subscribed_to_count,
                EXISTS(
                    SELECT 1 FROM subscriptions s
                    WHERE s.channel_id = u.id AND s.subscriber_id = $2
                ) AS is_subscribed
            FROM users u
            WHERE u.username = $1
            "#,
        )
        .bind(username)
        .bind(viewer_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    // ============================================
    // Watch history
    // ============================================

    /// Record a watch, updating the timestamp on rewatch
    pub async fn append_watch_history(&self, user_id: Uuid, video_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO watch_history (user_id, video_id, watched_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id, video_id) DO UPDATE SET watched_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(video_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Watched videos with their owners, most recent watch first
    pub async fn list_watch_history(&self, user_id: Uuid) -> Result<Vec<VideoWithOwnerRow>> {
        let rows = sqlx::query_as::<_, VideoWithOwnerRow>(
            r#"
            SELECT
                v.id, v.owner_id, v.video_file, v.thumbnail, v.title, v.description,
                v.duration, v.views, v.is_published, v.created_at, v.updated_at,
                u.username AS owner_username, u.fullname AS owner_fullname, u.avatar AS owner_avatar
            FROM watch_history h
            JOIN videos v ON v.id = h.video_id
            JOIN users u ON u.id = v.owner_id
            WHERE h.user_id = $1
            ORDER BY h.watched_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ============================================
    // Videos
    // ============================================

    pub async fn create_video(&self, input: CreateVideoRow) -> Result<VideoRow> {
        let row = sqlx::query_as::<_, VideoRow>(&format!(
            r#"
            INSERT INTO videos (owner_id, video_file, thumbnail, title, description, duration, views, is_published)
            VALUES ($1, $2, $3, $4, $5, $6, 0, TRUE)
            RETURNING {VIDEO_COLUMNS}
            "#,
        ))
        .bind(input.owner_id)
        .bind(&input.video_file)
        .bind(&input.thumbnail)
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.duration)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_video(&self, id: Uuid) -> Result<Option<VideoRow>> {
        let row = sqlx::query_as::<_, VideoRow>(&format!(
            "SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_video_with_owner(&self, id: Uuid) -> Result<Option<VideoWithOwnerRow>> {
        let row = sqlx::query_as::<_, VideoWithOwnerRow>(
            r#"
            SELECT
                v.id, v.owner_id, v.video_file, v.thumbnail, v.title, v.description,
                v.duration, v.views, v.is_published, v.created_at, v.updated_at,
                u.username AS owner_username, u.fullname AS owner_fullname, u.avatar AS owner_avatar
            FROM videos v
            JOIN users u ON u.id = v.owner_id
            WHERE v.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_videos(&self, filter: &VideoListFilter) -> Result<Vec<VideoWithOwnerRow>> {
        // Sort column comes from the whitelist, direction is fixed text
        let order = format!(
            "v.{} {}, v.id DESC",
            filter.sort_key.column(),
            if filter.sort_asc { "ASC" } else { "DESC" }
        );
        let sql = format!(
            r#"
            SELECT
                v.id, v.owner_id, v.video_file, v.thumbnail, v.title, v.description,
                v.duration, v.views, v.is_published, v.created_at, v.updated_at,
                u.username AS owner_username, u.fullname AS owner_fullname, u.avatar AS owner_avatar
            FROM videos v
            JOIN users u ON u.id = v.owner_id
            WHERE ($1::text IS NULL OR v.title ILIKE '%' || $1 || '%' OR v.description ILIKE '%' || $1 || '%')
              AND ($2::uuid IS NULL OR v.owner_id = $2)
              AND (NOT $3 OR v.is_published)
            ORDER BY {order}
            LIMIT $4 OFFSET $5
            "#,
        );

        let rows = sqlx::query_as::<_, VideoWithOwnerRow>(&sql)
            .bind(&filter.query)
            .bind(filter.owner_id)
            .bind(filter.only_published)
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    pub async fn count_videos(&self, filter: &VideoListFilter) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM videos v
            WHERE ($1::text IS NULL OR v.title ILIKE '%' || $1 || '%' OR v.description ILIKE '%' || $1 || '%')
              AND ($2::uuid IS NULL OR v.owner_id = $2)
              AND (NOT $3 OR v.is_published)
            "#,
        )
        .bind(&filter.query)
        .bind(filter.owner_id)
        .bind(filter.only_published)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    pub async fn update_video(&self, id: Uuid, input: UpdateVideoRow) -> Result<Option<VideoRow>> {
        let row = sqlx::query_as::<_, VideoRow>(&format!(
            r#"
            UPDATE videos
            SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                thumbnail = COALESCE($4, thumbnail),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {VIDEO_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(&input.title)
        .bind(&input.description)
        .bind(&input.thumbnail)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn set_video_published(
        &self,
        id: Uuid,
        is_published: bool,
    ) -> Result<Option<VideoRow>> {
        let row = sqlx::query_as::<_, VideoRow>(&format!(
            r#"
            UPDATE videos
            SET is_published = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {VIDEO_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(is_published)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn increment_video_views(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE videos SET views = views + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete a video. Comments, likes, watch history rows cascade;
    /// playlist membership arrays are scrubbed here.
    pub async fn delete_video(&self, id: Uuid) -> Result<bool> {
        sqlx::query("UPDATE playlists SET video_ids = array_remove(video_ids, $1) WHERE $1 = ANY(video_ids)")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn get_videos_by_ids(&self, ids: &[Uuid]) -> Result<Vec<VideoRow>> {
        let rows = sqlx::query_as::<_, VideoRow>(&format!(
            "SELECT {VIDEO_COLUMNS} FROM videos WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ============================================
    // Comments
    // ============================================

    pub async fn create_comment(&self, input: CreateCommentRow) -> Result<CommentRow> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            INSERT INTO comments (content, video_id, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, content, video_id, owner_id, created_at, updated_at
            "#,
        )
        .bind(&input.content)
        .bind(input.video_id)
        .bind(input.owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_comment(&self, id: Uuid) -> Result<Option<CommentRow>> {
        let row = sqlx::query_as::<_, CommentRow>(
            "SELECT id, content, video_id, owner_id, created_at, updated_at FROM comments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_video_comments(
        &self,
        video_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CommentWithOwnerRow>> {
        let rows = sqlx::query_as::<_, CommentWithOwnerRow>(
            r#"
            SELECT
                c.id, c.content, c.created_at, c.owner_id,
                u.username AS owner_username, u.fullname AS owner_fullname, u.avatar AS owner_avatar
            FROM comments c
            JOIN users u ON u.id = c.owner_id
            WHERE c.video_id = $1
            ORDER BY c.created_at DESC, c.id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(video_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn count_video_comments(&self, video_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments WHERE video_id = $1")
            .bind(video_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn update_comment(&self, id: Uuid, content: &str) -> Result<Option<CommentRow>> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            UPDATE comments
            SET content = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, content, video_id, owner_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete_comment(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // Tweets
    // ============================================

    pub async fn create_tweet(&self, owner_id: Uuid, content: &str) -> Result<TweetRow> {
        let row = sqlx::query_as::<_, TweetRow>(
            r#"
            INSERT INTO tweets (content, owner_id)
            VALUES ($1, $2)
            RETURNING id, content, owner_id, created_at, updated_at
            "#,
        )
        .bind(content)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_tweet(&self, id: Uuid) -> Result<Option<TweetRow>> {
        let row = sqlx::query_as::<_, TweetRow>(
            "SELECT id, content, owner_id, created_at, updated_at FROM tweets WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_user_tweets(&self, owner_id: Uuid) -> Result<Vec<TweetRow>> {
        let rows = sqlx::query_as::<_, TweetRow>(
            r#"
            SELECT id, content, owner_id, created_at, updated_at
            FROM tweets
            WHERE owner_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn update_tweet(&self, id: Uuid, content: &str) -> Result<Option<TweetRow>> {
        let row = sqlx::query_as::<_, TweetRow>(
            r#"
            UPDATE tweets
            SET content = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, content, owner_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(content)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete_tweet(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tweets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // ============================================
    // Likes
    // ============================================

    /// Remove the like if present, create it otherwise.
    /// Returns true when the row now exists.
    pub async fn toggle_video_like(&self, user_id: Uuid, video_id: Uuid) -> Result<bool> {
        let deleted = sqlx::query("DELETE FROM likes WHERE liked_by = $1 AND video_id = $2")
            .bind(user_id)
            .bind(video_id)
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() > 0 {
            return Ok(false);
        }

        sqlx::query(
            "INSERT INTO likes (liked_by, video_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(video_id)
        .execute(&self.pool)
        .await?;

        Ok(true)
    }

    pub async fn toggle_comment_like(&self, user_id: Uuid, comment_id: Uuid) -> Result<bool> {
        let deleted = sqlx::query("DELETE FROM likes WHERE liked_by = $1 AND comment_id = $2")
            .bind(user_id)
            .bind(comment_id)
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() > 0 {
            return Ok(false);
        }

        sqlx::query(
            "INSERT INTO likes (liked_by, comment_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(comment_id)
        .execute(&self.pool)
        .await?;

        Ok(true)
    }

    pub async fn toggle_tweet_like(&self, user_id: Uuid, tweet_id: Uuid) -> Result<bool> {
        let deleted = sqlx::query("DELETE FROM likes WHERE liked_by = $1 AND tweet_id = $2")
            .bind(user_id)
            .bind(tweet_id)
            .execute(&self.pool)
            .await?;

        if deleted.rows_affected() > 0 {
            return Ok(false);
        }

        sqlx::query(
            "INSERT INTO likes (liked_by, tweet_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(tweet_id)
        .execute(&self.pool)
        .await?;

        Ok(true)
    }

    /// Ids of videos the user has liked, most recent like first
    pub async fn list_liked_video_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT video_id FROM likes
            WHERE liked_by = $1 AND video_id IS NOT NULL
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }

    // ============================================
    // Playlists
    // ============================================

    pub async fn create_playlist(&self, input: CreatePlaylistRow) -> Result<PlaylistRow> {
        let row = sqlx::query_as::<_, PlaylistRow>(
            r#"
            INSERT INTO playlists (name, description, owner_id, video_ids)
            VALUES ($1, $2, $3, '{}')
            RETURNING id, name, description, owner_id, video_ids, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_playlist(&self, id: Uuid) -> Result<Option<PlaylistRow>> {
        let row = sqlx::query_as::<_, PlaylistRow>(
            "SELECT id, name, description, owner_id, video_ids, created_at, updated_at FROM playlists WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_playlist_by_name(&self, name: &str) -> Result<Option<PlaylistRow>> {
        let row = sqlx::query_as::<_, PlaylistRow>(
            "SELECT id, name, description, owner_id, video_ids, created_at, updated_at FROM playlists WHERE name = $1 LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_user_playlists(&self, owner_id: Uuid) -> Result<Vec<PlaylistRow>> {
        let rows = sqlx::query_as::<_, PlaylistRow>(
            r#"
            SELECT id, name, description, owner_id, video_ids, created_at, updated_at
            FROM playlists
            WHERE owner_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn update_playlist(
        &self,
        id: Uuid,
        input: UpdatePlaylistRow,
    ) -> Result<Option<PlaylistRow>> {
        let row = sqlx::query_as::<_, PlaylistRow>(
            r#"
            UPDATE playlists
            SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, owner_id, video_ids, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete_playlist(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM playlists WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Append a video id. The service layer rejects duplicates first.
    pub async fn add_video_to_playlist(
        &self,
        id: Uuid,
        video_id: Uuid,
    ) -> Result<Option<PlaylistRow>> {
        let row = sqlx::query_as::<_, PlaylistRow>(
            r#"
            UPDATE playlists
            SET video_ids = array_append(video_ids, $2), updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, owner_id, video_ids, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(video_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn remove_video_from_playlist(
        &self,
        id: Uuid,
        video_id: Uuid,
    ) -> Result<Option<PlaylistRow>> {
        let row = sqlx::query_as::<_, PlaylistRow>(
            r#"
            UPDATE playlists
            SET video_ids = array_remove(video_ids, $2), updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, owner_id, video_ids, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(video_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    // ============================================
    // Subscriptions
    // ============================================

    /// Remove the subscription if present, create it otherwise.
    /// Returns true when the edge now exists.
    pub async fn toggle_subscription(&self, subscriber_id: Uuid, channel_id: Uuid) -> Result<bool> {
        let deleted =
            sqlx::query("DELETE FROM subscriptions WHERE subscriber_id = $1 AND channel_id = $2")
                .bind(subscriber_id)
                .bind(channel_id)
                .execute(&self.pool)
                .await?;

        if deleted.rows_affected() > 0 {
            return Ok(false);
        }

        sqlx::query(
            "INSERT INTO subscriptions (subscriber_id, channel_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(subscriber_id)
        .bind(channel_id)
        .execute(&self.pool)
        .await?;

        Ok(true)
    }

    pub async fn list_channel_subscribers(
        &self,
        channel_id: Uuid,
    ) -> Result<Vec<SubscriptionWithUserRow>> {
        let rows = sqlx::query_as::<_, SubscriptionWithUserRow>(
            r#"
            SELECT
                u.id AS user_id, u.username, u.fullname, u.avatar,
                s.created_at AS subscribed_at
            FROM subscriptions s
            JOIN users u ON u.id = s.subscriber_id
            WHERE s.channel_id = $1
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(channel_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_subscribed_channels(
        &self,
        subscriber_id: Uuid,
    ) -> Result<Vec<SubscriptionWithUserRow>> {
        let rows = sqlx::query_as::<_, SubscriptionWithUserRow>(
            r#"
            SELECT
                u.id AS user_id, u.username, u.fullname, u.avatar,
                s.created_at AS subscribed_at
            FROM subscriptions s
            JOIN users u ON u.id = s.channel_id
            WHERE s.subscriber_id = $1
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(subscriber_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    // ============================================
    // Dashboard
    // ============================================

    pub async fn get_channel_stats(&self, user_id: Uuid) -> Result<ChannelStatsRow> {
        let row = sqlx::query_as::<_, ChannelStatsRow>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM videos v WHERE v.owner_id = $1) AS total_videos,
                (SELECT COALESCE(SUM(v.views), 0) FROM videos v WHERE v.owner_id = $1)::BIGINT AS total_views,
                (SELECT COUNT(*) FROM subscriptions s WHERE s.channel_id = $1) AS total_subscribers,
                (SELECT COUNT(*) FROM likes l JOIN videos v ON v.id = l.video_id WHERE v.owner_id = $1) AS total_likes
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}
