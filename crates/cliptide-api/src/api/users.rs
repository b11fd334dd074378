// User account, session, and channel routes

use crate::api::common::{created, ok, ApiError, ApiResult};
use crate::api::validation;
use crate::auth::{AuthState, AuthUser, FromRef, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use crate::media::{field_text, multipart_error, spool_field, MediaStore, TempUpload};
use crate::services::user::INVALID_REFRESH_MESSAGE;
use crate::services::UserService;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use cliptide_core::{ChannelProfile, User, VideoWithOwner};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Login request, at least one identifier is required
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "chai")]
    pub username: Option<String>,
    #[schema(example = "chai@example.com")]
    pub email: Option<String>,
    pub password: String,
}

/// Session payload returned by login
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginData {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// Token pair returned by refresh
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairData {
    pub access_token: String,
    pub refresh_token: String,
}

/// Optional body for the refresh endpoint; the cookie wins when both
/// are present
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Partial account update, only provided fields change
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateAccountRequest {
    #[schema(example = "Chai Aur Code")]
    pub fullname: Option<String>,
    #[schema(example = "chai@example.com")]
    pub email: Option<String>,
}

/// Registration form (multipart)
#[derive(Debug, ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub fullname: String,
    pub password: String,
    /// Avatar image file
    #[schema(value_type = String, format = Binary)]
    pub avatar: String,
    /// Optional cover image file
    #[schema(value_type = Option<String>, format = Binary)]
    pub cover_image: Option<String>,
}

/// App state for user routes
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<UserService>,
    pub auth: AuthState,
    pub media: MediaStore,
}

impl AppState {
    pub fn new(service: Arc<UserService>, auth: AuthState, media: MediaStore) -> Self {
        Self {
            service,
            auth,
            media,
        }
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> AuthState {
        state.auth.clone()
    }
}

/// Create user routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/v1/users/register", post(register))
        .route("/v1/users/login", post(login))
        .route("/v1/users/refresh-token", post(refresh_token))
        .route("/v1/users/logout", post(logout))
        .route("/v1/users/change-password", patch(change_password))
        .route("/v1/users/current-user", get(current_user))
        .route("/v1/users/update-account", patch(update_account))
        .route("/v1/users/update-avatar", patch(update_avatar))
        .route("/v1/users/update-cover-image", patch(update_cover_image))
        .route("/v1/users/c/:username", get(channel_profile))
        .route("/v1/users/watch-history", get(watch_history))
        // Registration carries an avatar and an optional cover image;
        // axum's default 2 MB cap is below the per-file image limit
        .layer(DefaultBodyLimit::max(
            2 * validation::MAX_IMAGE_UPLOAD_BYTES + 64 * 1024,
        ))
        .with_state(state)
}

/// Access cookie rides on every route
fn access_cookie(state: &AppState, token: &str) -> Cookie<'static> {
    Cookie::build((ACCESS_TOKEN_COOKIE, token.to_string()))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(
            state.auth.jwt_service.access_token_lifetime_secs(),
        ))
        .build()
}

/// Refresh cookie is scoped to the session endpoints only
fn refresh_cookie(state: &AppState, token: &str) -> Cookie<'static> {
    Cookie::build((REFRESH_TOKEN_COOKIE, token.to_string()))
        .path("/v1/users")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::seconds(
            state.auth.jwt_service.refresh_token_lifetime_secs(),
        ))
        .build()
}

fn session_cookies(jar: CookieJar, state: &AppState, access: &str, refresh: &str) -> CookieJar {
    jar.add(access_cookie(state, access))
        .add(refresh_cookie(state, refresh))
}

fn removal_cookie(name: &'static str, path: &'static str) -> Cookie<'static> {
    Cookie::build((name, "")).path(path).build()
}

/// POST /v1/users/register - Create an account
#[utoipa::path(
    post,
    path = "/v1/users/register",
    request_body(content = RegisterForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "User registered", body = User),
        (status = 400, description = "Validation failed or avatar missing"),
        (status = 409, description = "Username or email already registered")
    ),
    tag = "users"
)]
pub async fn register(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut username = String::new();
    let mut email = String::new();
    let mut fullname = String::new();
    let mut password = String::new();
    let mut avatar: Option<TempUpload> = None;
    let mut cover_image: Option<TempUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name().unwrap_or("") {
            "username" => username = field_text(field).await?,
            "email" => email = field_text(field).await?,
            "fullname" => fullname = field_text(field).await?,
            "password" => password = field_text(field).await?,
            "avatar" => {
                avatar = Some(spool_image(&state, field).await?);
            }
            "coverImage" => {
                cover_image = Some(spool_image(&state, field).await?);
            }
            _ => {}
        }
    }

    validation::validate_register(&username, &email, &fullname, &password)?;
    let avatar = avatar.ok_or_else(|| ApiError::bad_request("Avatar is required"))?;

    let user = state
        .service
        .register(
            &username,
            &email,
            &fullname,
            &password,
            avatar.path(),
            cover_image.as_ref().map(|c| c.path()),
        )
        .await?;

    Ok(created(user, "User registered successfully"))
}

/// POST /v1/users/login - Open a session
#[utoipa::path(
    post,
    path = "/v1/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session opened", body = LoginData),
        (status = 401, description = "Wrong password"),
        (status = 404, description = "No such user")
    ),
    tag = "users"
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_login(req.username.as_deref(), req.email.as_deref(), &req.password)?;

    let (user, pair) = state.service.login(req).await?;
    let jar = session_cookies(jar, &state, &pair.access_token, &pair.refresh_token);
    let data = LoginData {
        user,
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    };
    Ok((jar, ok(data, "User logged in successfully")))
}

/// POST /v1/users/refresh-token - Rotate the session
///
/// The presented token is taken from the refresh cookie, the JSON body,
/// or a bearer header, in that order.
#[utoipa::path(
    post,
    path = "/v1/users/refresh-token",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "Session rotated", body = TokenPairData),
        (status = 401, description = "Missing, expired or superseded refresh token")
    ),
    tag = "users"
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    body: Option<Json<RefreshTokenRequest>>,
) -> ApiResult<impl IntoResponse> {
    let presented = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .or_else(|| body.and_then(|Json(req)| req.refresh_token))
        .or_else(|| bearer_token(&headers))
        .ok_or_else(|| ApiError::unauthorized(INVALID_REFRESH_MESSAGE))?;

    let pair = state.service.rotate_session(&presented).await?;
    let jar = session_cookies(jar, &state, &pair.access_token, &pair.refresh_token);
    let data = TokenPairData {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    };
    Ok((jar, ok(data, "Access token refreshed")))
}

/// POST /v1/users/logout - Revoke the session
#[utoipa::path(
    post,
    path = "/v1/users/logout",
    responses(
        (status = 200, description = "Session revoked"),
        (status = 401, description = "Not authenticated")
    ),
    tag = "users"
)]
pub async fn logout(
    State(state): State<AppState>,
    auth: AuthUser,
    jar: CookieJar,
) -> ApiResult<impl IntoResponse> {
    state.service.logout(auth.id).await?;
    let jar = jar
        .remove(removal_cookie(ACCESS_TOKEN_COOKIE, "/"))
        .remove(removal_cookie(REFRESH_TOKEN_COOKIE, "/v1/users"));
    Ok((jar, ok((), "User logged out successfully")))
}

/// PATCH /v1/users/change-password - Change the password
#[utoipa::path(
    patch,
    path = "/v1/users/change-password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed, session rotated"),
        (status = 401, description = "Old password rejected")
    ),
    tag = "users"
)]
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    jar: CookieJar,
    Json(req): Json<ChangePasswordRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_change_password(&req.old_password, &req.new_password)?;

    let pair = state.service.change_password(auth.id, req).await?;
    let jar = session_cookies(jar, &state, &pair.access_token, &pair.refresh_token);
    Ok((jar, ok((), "Password changed successfully")))
}

/// GET /v1/users/current-user - The authenticated account
#[utoipa::path(
    get,
    path = "/v1/users/current-user",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not authenticated")
    ),
    tag = "users"
)]
pub async fn current_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let user = state.service.current_user(auth.id).await?;
    Ok(ok(user, "Current user fetched successfully"))
}

/// PATCH /v1/users/update-account - Update fullname and/or email
#[utoipa::path(
    patch,
    path = "/v1/users/update-account",
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated", body = User),
        (status = 409, description = "Email taken by another account")
    ),
    tag = "users"
)]
pub async fn update_account(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateAccountRequest>,
) -> ApiResult<impl IntoResponse> {
    validation::validate_account_update(req.fullname.as_deref(), req.email.as_deref())?;

    let user = state.service.update_account(auth.id, req).await?;
    Ok(ok(user, "Account details updated successfully"))
}

/// PATCH /v1/users/update-avatar - Replace the avatar image
#[utoipa::path(
    patch,
    path = "/v1/users/update-avatar",
    responses(
        (status = 200, description = "Avatar replaced", body = User),
        (status = 400, description = "Missing or invalid image")
    ),
    tag = "users"
)]
pub async fn update_avatar(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let avatar = single_image(&state, multipart, "avatar")
        .await?
        .ok_or_else(|| ApiError::bad_request("Avatar is required"))?;

    let user = state.service.update_avatar(auth.id, avatar.path()).await?;
    Ok(ok(user, "Avatar updated successfully"))
}

/// PATCH /v1/users/update-cover-image - Replace the cover image
#[utoipa::path(
    patch,
    path = "/v1/users/update-cover-image",
    responses(
        (status = 200, description = "Cover image replaced", body = User),
        (status = 400, description = "Missing or invalid image")
    ),
    tag = "users"
)]
pub async fn update_cover_image(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let cover = single_image(&state, multipart, "coverImage")
        .await?
        .ok_or_else(|| ApiError::bad_request("Cover image is required"))?;

    let user = state
        .service
        .update_cover_image(auth.id, cover.path())
        .await?;
    Ok(ok(user, "Cover image updated successfully"))
}

/// GET /v1/users/c/{username} - Channel profile with subscription aggregates
#[utoipa::path(
    get,
    path = "/v1/users/c/{username}",
    params(("username" = String, Path, description = "Channel username")),
    responses(
        (status = 200, description = "Channel profile", body = ChannelProfile),
        (status = 404, description = "No channel with that username")
    ),
    tag = "users"
)]
pub async fn channel_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(username): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let profile = state.service.channel_profile(&username, auth.id).await?;
    Ok(ok(profile, "Channel profile fetched successfully"))
}

/// GET /v1/users/watch-history - Watched videos, most recent first
#[utoipa::path(
    get,
    path = "/v1/users/watch-history",
    responses(
        (status = 200, description = "Watch history", body = Vec<VideoWithOwner>),
        (status = 401, description = "Not authenticated")
    ),
    tag = "users"
)]
pub async fn watch_history(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let history = state.service.watch_history(auth.id).await?;
    Ok(ok(history, "Watch history fetched successfully"))
}

async fn spool_image(
    state: &AppState,
    field: axum::extract::multipart::Field<'_>,
) -> ApiResult<TempUpload> {
    spool_field(
        state.media.temp_dir(),
        field,
        validation::IMAGE_CONTENT_TYPES,
        validation::MAX_IMAGE_UPLOAD_BYTES,
    )
    .await
}

/// Pull one named image out of a multipart body
async fn single_image(
    state: &AppState,
    mut multipart: Multipart,
    field_name: &str,
) -> ApiResult<Option<TempUpload>> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some(field_name) {
            upload = Some(spool_image(state, field).await?);
        }
    }
    Ok(upload)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}
