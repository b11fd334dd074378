// Cliptide API server
// Decision: DATABASE_URL selects PostgreSQL; without it the server runs
// in dev mode on the in-memory backend so a bare `cargo run` works

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{header, HeaderValue, Method};
use axum::{routing::get, Json, Router};
use cliptide_api::api;
use cliptide_api::auth;
use cliptide_api::media::MediaStore;
use cliptide_api::openapi::ApiDoc;
use cliptide_api::services::{
    CommentService, DashboardService, LikeService, PlaylistService, SubscriptionService,
    TweetService, UserService, VideoService,
};
use cliptide_api::storage::StorageBackend;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    storage_mode: &'static str,
}

async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        storage_mode: state.storage_mode,
    })
}

#[derive(Clone)]
struct HealthState {
    storage_mode: &'static str,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    // Configure via RUST_LOG (default: "cliptide_api=debug,tower_http=debug")
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|f| EnvFilter::try_new(&f).ok())
        .unwrap_or_else(|| EnvFilter::new("cliptide_api=debug,tower_http=debug"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_filter(filter),
        )
        .init();

    tracing::info!("cliptide-api starting...");

    // Load environment
    if let Ok(path) = dotenvy::dotenv() {
        tracing::info!("Loaded .env from {:?}", path);
    }

    // Initialize storage: PostgreSQL when DATABASE_URL is set, otherwise
    // the in-memory dev backend
    let db = match std::env::var("DATABASE_URL") {
        Ok(url) if !url.is_empty() => {
            let db = StorageBackend::postgres(&url)
                .await
                .context("Failed to connect to database")?;
            tracing::info!("Connected to PostgreSQL database");
            db
        }
        _ => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage (dev mode)");
            StorageBackend::in_memory()
        }
    };
    let storage_mode = if db.is_dev_mode() { "memory" } else { "postgres" };

    // Media store: remote service when configured, local directory otherwise
    let media = MediaStore::from_env().context("Failed to initialize media store")?;

    let auth_config = auth::AuthConfig::from_env();
    let auth_state = auth::AuthState::new(auth_config, db.clone());
    let jwt = auth_state.jwt_service.clone();

    // One AppState per route module, all sharing the same backend
    let user_service = Arc::new(UserService::new(db.clone(), jwt, media.clone()));
    let users_state = api::users::AppState::new(user_service, auth_state.clone(), media.clone());
    let video_service = Arc::new(VideoService::new(db.clone(), media.clone()));
    let videos_state =
        api::videos::AppState::new(video_service, auth_state.clone(), media.clone());
    let comments_state = api::comments::AppState::new(
        Arc::new(CommentService::new(db.clone())),
        auth_state.clone(),
    );
    let likes_state =
        api::likes::AppState::new(Arc::new(LikeService::new(db.clone())), auth_state.clone());
    let playlists_state = api::playlists::AppState::new(
        Arc::new(PlaylistService::new(db.clone())),
        auth_state.clone(),
    );
    let subscriptions_state = api::subscriptions::AppState::new(
        Arc::new(SubscriptionService::new(db.clone())),
        auth_state.clone(),
    );
    let tweets_state =
        api::tweets::AppState::new(Arc::new(TweetService::new(db.clone())), auth_state.clone());
    let dashboard_state = api::dashboard::AppState::new(
        Arc::new(DashboardService::new(db.clone())),
        auth_state.clone(),
    );
    let health_state = HealthState { storage_mode };

    // API_PREFIX="/api" turns /v1/videos into /api/v1/videos
    let api_prefix = std::env::var("API_PREFIX").unwrap_or_default();
    if !api_prefix.is_empty() {
        tracing::info!(prefix = %api_prefix, "API prefix configured");
    }

    // CORS_ALLOWED_ORIGINS is a comma-separated origin list, needed only
    // when the frontend is served from a different origin
    let cors_origins: Vec<HeaderValue> = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .filter(|s| !s.is_empty())
        .map(|s| s.split(',').filter_map(|s| s.trim().parse().ok()).collect())
        .unwrap_or_default();

    if cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?cors_origins, "CORS origins configured");
    }

    let api_routes = Router::new()
        .merge(api::healthcheck::routes())
        .merge(api::users::routes(users_state))
        .merge(api::videos::routes(videos_state))
        .merge(api::comments::routes(comments_state))
        .merge(api::likes::routes(likes_state))
        .merge(api::playlists::routes(playlists_state))
        .merge(api::subscriptions::routes(subscriptions_state))
        .merge(api::tweets::routes(tweets_state))
        .merge(api::dashboard::routes(dashboard_state));

    // /health stays outside the prefix so load balancers can always reach it
    let mut app = Router::new().route("/health", get(health).with_state(health_state));
    app = app.merge(build_router_with_prefix(api_routes, &api_prefix));

    let app =
        app.merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    let app = if !cors_origins.is_empty() {
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::ORIGIN,
                    header::CACHE_CONTROL,
                ])
                .allow_credentials(true),
        )
    } else {
        app
    };

    let app = app.layer(TraceLayer::new_for_http());

    let addr = std::env::var("HTTP_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Nest the API under a prefix, or return it unchanged when none is set
fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(
    api_routes: Router<S>,
    api_prefix: &str,
) -> Router<S> {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}
