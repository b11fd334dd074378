// Subscription routes

use crate::api::common::{created, ok, ApiResult};
use crate::auth::{AuthState, AuthUser, FromRef};
use crate::services::SubscriptionService;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use cliptide_core::{ChannelSubscriber, SubscribedChannel};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Subscription flag after a toggle
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubscriptionStatusData {
    pub subscribed: bool,
}

/// App state for subscription routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SubscriptionService>,
    pub auth: AuthState,
}

impl AppState {
    pub fn new(service: Arc<SubscriptionService>, auth: AuthState) -> Self {
        Self { service, auth }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> AuthState {
        state.auth.clone()
    }
}

/// Create subscription routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/subscriptions/c/:channel_id",
            post(toggle_subscription).get(channel_subscribers),
        )
        .route(
            "/v1/subscriptions/u/:subscriber_id",
            get(subscribed_channels),
        )
        .with_state(state)
}

/// POST /v1/subscriptions/c/{channel_id} - Toggle a subscription
///
/// Subscribing answers 201, unsubscribing 200.
#[utoipa::path(
    post,
    path = "/v1/subscriptions/c/{channel_id}",
    params(("channel_id" = Uuid, Path, description = "Channel (user) ID")),
    responses(
        (status = 200, description = "Unsubscribed", body = SubscriptionStatusData),
        (status = 201, description = "Subscribed", body = SubscriptionStatusData),
        (status = 400, description = "Requester subscribing to themself"),
        (status = 404, description = "Channel not found")
    ),
    tag = "subscriptions"
)]
pub async fn toggle_subscription(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(channel_id): Path<Uuid>,
) -> ApiResult<Response> {
    let subscribed = state.service.toggle(auth.id, channel_id).await?;
    let data = SubscriptionStatusData { subscribed };
    let response = if subscribed {
        created(data, "Subscribed successfully").into_response()
    } else {
        ok(data, "Unsubscribed successfully").into_response()
    };
    Ok(response)
}

/// GET /v1/subscriptions/c/{channel_id} - Subscribers of a channel
#[utoipa::path(
    get,
    path = "/v1/subscriptions/c/{channel_id}",
    params(("channel_id" = Uuid, Path, description = "Channel (user) ID")),
    responses(
        (status = 200, description = "The channel's subscribers", body = Vec<ChannelSubscriber>)
    ),
    tag = "subscriptions"
)]
pub async fn channel_subscribers(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(channel_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let subscribers = state.service.channel_subscribers(channel_id).await?;
    Ok(ok(subscribers, "Channel subscribers fetched successfully"))
}

/// GET /v1/subscriptions/u/{subscriber_id} - Channels a user subscribes to
#[utoipa::path(
    get,
    path = "/v1/subscriptions/u/{subscriber_id}",
    params(("subscriber_id" = Uuid, Path, description = "Subscriber (user) ID")),
    responses(
        (status = 200, description = "The subscribed channels", body = Vec<SubscribedChannel>)
    ),
    tag = "subscriptions"
)]
pub async fn subscribed_channels(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(subscriber_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let channels = state.service.subscribed_channels(subscriber_id).await?;
    Ok(ok(channels, "Subscribed channels fetched successfully"))
}
