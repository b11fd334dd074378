// Request authentication
// Decision: Read the access token from the cookie first, then the
//           Authorization header, matching browser and API clients
// Decision: Look the user up on every request so deleted accounts
//           lose access immediately

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use axum_extra::extract::CookieJar;
use std::sync::Arc;
use uuid::Uuid;

use super::{config::AuthConfig, jwt::JwtService};
use crate::api::common::ApiError;
use crate::storage::StorageBackend;

/// Cookie carrying the access token
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
/// Cookie carrying the refresh token
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Message for every failed authentication gate
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized request";

/// The requester, as proven by their access token
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub fullname: String,
}

/// Everything the auth gate needs, shared by all route modules
#[derive(Clone)]
pub struct AuthState {
    pub config: AuthConfig,
    pub jwt_service: Arc<JwtService>,
    pub db: StorageBackend,
}

impl AuthState {
    pub fn new(config: AuthConfig, db: StorageBackend) -> Self {
        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));
        Self {
            config,
            jwt_service,
            db,
        }
    }
}

/// Lets each route module's AppState hand out the AuthState inside it
pub trait FromRef<T> {
    fn from_ref(input: &T) -> Self;
}

impl FromRef<AuthState> for AuthState {
    fn from_ref(input: &AuthState) -> Self {
        input.clone()
    }
}

/// Extractor for the authenticated user.
/// Rejects with 401 in the standard error envelope when the request
/// carries no valid access token.
#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        extract_auth_user(parts, &auth_state).await
    }
}

/// Pull the raw access token out of the request, cookie before header
fn access_token(parts: &Parts) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get(ACCESS_TOKEN_COOKIE) {
        return Some(cookie.value().to_string());
    }

    parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Validate the token and resolve the user it names
async fn extract_auth_user(parts: &mut Parts, auth_state: &AuthState) -> Result<AuthUser, ApiError> {
    let token =
        access_token(parts).ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED_MESSAGE))?;

    let claims = auth_state
        .jwt_service
        .validate_access_token(&token)
        .map_err(|e| {
            tracing::debug!("access token validation failed: {}", e);
            ApiError::unauthorized(UNAUTHORIZED_MESSAGE)
        })?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| ApiError::unauthorized(UNAUTHORIZED_MESSAGE))?;

    let user = auth_state
        .db
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized(UNAUTHORIZED_MESSAGE))?;

    Ok(AuthUser {
        id: user.id,
        username: user.username,
        email: user.email,
        fullname: user.fullname,
    })
}
