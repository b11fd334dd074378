// Tweet service

use crate::api::common::{ApiError, ApiResult};
use crate::services::ensure_owner;
use crate::storage::{StorageBackend, TweetRow};
use cliptide_core::Tweet;
use uuid::Uuid;

pub struct TweetService {
    db: StorageBackend,
}

impl TweetService {
    pub fn new(db: StorageBackend) -> Self {
        Self { db }
    }

    pub async fn create(&self, owner_id: Uuid, content: &str) -> ApiResult<Tweet> {
        let row = self.db.create_tweet(owner_id, content).await?;
        Ok(row.into())
    }

    /// Tweets by username, newest first
    pub async fn list_for_user(&self, username: &str) -> ApiResult<Vec<Tweet>> {
        let username = username.to_lowercase();
        let user = self
            .db
            .get_user_by_username(&username)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;

        let rows = self.db.list_user_tweets(user.id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn update(
        &self,
        tweet_id: Uuid,
        requester_id: Uuid,
        content: &str,
    ) -> ApiResult<Tweet> {
        let current = self.require_tweet(tweet_id).await?;
        ensure_owner(
            current.owner_id,
            requester_id,
            "Not authorized to update this tweet",
        )?;

        let row = self
            .db
            .update_tweet(tweet_id, content)
            .await?
            .ok_or_else(|| ApiError::not_found("Tweet not found"))?;
        Ok(row.into())
    }

    pub async fn delete(&self, tweet_id: Uuid, requester_id: Uuid) -> ApiResult<()> {
        let current = self.require_tweet(tweet_id).await?;
        ensure_owner(
            current.owner_id,
            requester_id,
            "Not authorized to delete this tweet",
        )?;

        self.db.delete_tweet(tweet_id).await?;
        Ok(())
    }

    async fn require_tweet(&self, tweet_id: Uuid) -> ApiResult<TweetRow> {
        self.db
            .get_tweet(tweet_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Tweet not found"))
    }
}
