// Tweet routes

use crate::api::common::{created, ok, ApiResult};
use crate::api::validation;
use crate::auth::{AuthState, AuthUser, FromRef};
use crate::services::TweetService;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use cliptide_core::Tweet;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Body for creating or editing a tweet
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TweetRequest {
    #[schema(example = "Shipping a new upload today")]
    pub content: String,
}

/// App state for tweet routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TweetService>,
    pub auth: AuthState,
}

impl AppState {
    pub fn new(service: Arc<TweetService>, auth: AuthState) -> Self {
        Self { service, auth }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> AuthState {
        state.auth.clone()
    }
}

/// Create tweet routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/tweets", post(create_tweet))
        .route("/v1/tweets/user/:username", get(list_user_tweets))
        .route(
            "/v1/tweets/:tweet_id",
            patch(update_tweet).delete(delete_tweet),
        )
        .with_state(state)
}

/// POST /v1/tweets - Post a tweet
#[utoipa::path(
    post,
    path = "/v1/tweets",
    request_body = TweetRequest,
    responses(
        (status = 201, description = "Tweet created", body = Tweet),
        (status = 400, description = "Empty or oversized content")
    ),
    tag = "tweets"
)]
pub async fn create_tweet(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<TweetRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_tweet_content(&body.content)?;
    let tweet = state.service.create(auth.id, &body.content).await?;
    Ok(created(tweet, "Tweet created successfully"))
}

/// GET /v1/tweets/user/{username} - Tweets by a user, newest first
#[utoipa::path(
    get,
    path = "/v1/tweets/user/{username}",
    params(("username" = String, Path, description = "Username")),
    responses(
        (status = 200, description = "The user's tweets", body = Vec<Tweet>),
        (status = 404, description = "User not found")
    ),
    tag = "tweets"
)]
pub async fn list_user_tweets(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(username): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let tweets = state.service.list_for_user(&username).await?;
    Ok(ok(tweets, "Tweets fetched successfully"))
}

/// PATCH /v1/tweets/{tweet_id} - Edit a tweet
#[utoipa::path(
    patch,
    path = "/v1/tweets/{tweet_id}",
    params(("tweet_id" = Uuid, Path, description = "Tweet ID")),
    request_body = TweetRequest,
    responses(
        (status = 200, description = "Tweet updated", body = Tweet),
        (status = 403, description = "Requester does not own the tweet"),
        (status = 404, description = "Tweet not found")
    ),
    tag = "tweets"
)]
pub async fn update_tweet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(tweet_id): Path<Uuid>,
    Json(body): Json<TweetRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_tweet_content(&body.content)?;
    let tweet = state.service.update(tweet_id, auth.id, &body.content).await?;
    Ok(ok(tweet, "Tweet updated successfully"))
}

/// DELETE /v1/tweets/{tweet_id} - Delete a tweet
#[utoipa::path(
    delete,
    path = "/v1/tweets/{tweet_id}",
    params(("tweet_id" = Uuid, Path, description = "Tweet ID")),
    responses(
        (status = 200, description = "Tweet deleted"),
        (status = 403, description = "Requester does not own the tweet"),
        (status = 404, description = "Tweet not found")
    ),
    tag = "tweets"
)]
pub async fn delete_tweet(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(tweet_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    state.service.delete(tweet_id, auth.id).await?;
    Ok(ok((), "Tweet deleted successfully"))
}
