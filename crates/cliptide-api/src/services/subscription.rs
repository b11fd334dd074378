// Subscription service

use crate::api::common::{ApiError, ApiResult};
use crate::storage::StorageBackend;
use cliptide_core::{ChannelSubscriber, SubscribedChannel};
use uuid::Uuid;

pub struct SubscriptionService {
    db: StorageBackend,
}

impl SubscriptionService {
    pub fn new(db: StorageBackend) -> Self {
        Self { db }
    }

    /// Toggle the requester's subscription to a channel, true when now
    /// subscribed
    pub async fn toggle(&self, subscriber_id: Uuid, channel_id: Uuid) -> ApiResult<bool> {
        if subscriber_id == channel_id {
            return Err(ApiError::bad_request("You cannot subscribe to yourself"));
        }
        if !self.db.user_exists(channel_id).await? {
            return Err(ApiError::not_found("Channel not found"));
        }
        Ok(self.db.toggle_subscription(subscriber_id, channel_id).await?)
    }

    pub async fn channel_subscribers(&self, channel_id: Uuid) -> ApiResult<Vec<ChannelSubscriber>> {
        let rows = self.db.list_channel_subscribers(channel_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    pub async fn subscribed_channels(
        &self,
        subscriber_id: Uuid,
    ) -> ApiResult<Vec<SubscribedChannel>> {
        let rows = self.db.list_subscribed_channels(subscriber_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
