// Subscription domain types
//
// A subscription is an edge from a subscriber to a channel (both are
// users). The two list projections resolve the far end of the edge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::UserSummary;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Entry in a channel's subscriber list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ChannelSubscriber {
    pub subscriber: UserSummary,
    /// When the subscription was created
    pub subscribed_at: DateTime<Utc>,
}

/// Entry in a user's subscribed-channels list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct SubscribedChannel {
    pub channel: UserSummary,
    /// When the subscription was created
    pub subscribed_at: DateTime<Utc>,
}
