// User service: registration, session lifecycle, profile reads

use crate::api::common::{ApiError, ApiResult};
use crate::api::users::{ChangePasswordRequest, LoginRequest, UpdateAccountRequest};
use crate::auth::{hash_token, JwtService, TokenPair};
use crate::media::MediaStore;
use crate::storage::password::{hash_password, verify_password};
use crate::storage::{CreateUserRow, StorageBackend, UpdateUserRow, UserRow};
use cliptide_core::{ChannelProfile, User, VideoWithOwner};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Single message for every rotation failure, callers never learn which
/// check rejected the token
pub const INVALID_REFRESH_MESSAGE: &str = "Invalid refresh token";

pub struct UserService {
    db: StorageBackend,
    jwt: Arc<JwtService>,
    media: MediaStore,
}

impl UserService {
    pub fn new(db: StorageBackend, jwt: Arc<JwtService>, media: MediaStore) -> Self {
        Self { db, jwt, media }
    }

    /// Register a new account. `avatar` and `cover_image` are spooled
    /// upload paths; their blobs are removed again if the user row
    /// cannot be created.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        fullname: &str,
        password: &str,
        avatar: &Path,
        cover_image: Option<&Path>,
    ) -> ApiResult<User> {
        let username = username.to_lowercase();
        let email = email.to_lowercase();

        if self
            .db
            .get_user_by_username_or_email(&username, &email)
            .await?
            .is_some()
        {
            return Err(ApiError::conflict("User already exists"));
        }

        let password_hash = hash_password(password)?;

        let avatar_media = self.media.upload(avatar).await?;
        let cover_media = match cover_image {
            Some(path) => match self.media.upload(path).await {
                Ok(media) => Some(media),
                Err(err) => {
                    self.media.delete_by_url(&avatar_media.url).await;
                    return Err(err.into());
                }
            },
            None => None,
        };

        let input = CreateUserRow {
            username,
            email,
            fullname: fullname.to_string(),
            avatar: avatar_media.url.clone(),
            cover_image: cover_media.as_ref().map(|m| m.url.clone()),
            password_hash,
        };

        match self.db.create_user(input).await {
            Ok(row) => {
                tracing::info!(user_id = %row.id, username = %row.username, "user registered");
                Ok(row.into())
            }
            Err(err) => {
                // Blobs must not outlive a failed registration
                self.media.delete_by_url(&avatar_media.url).await;
                if let Some(cover) = &cover_media {
                    self.media.delete_by_url(&cover.url).await;
                }
                Err(err.into())
            }
        }
    }

    pub async fn login(&self, req: LoginRequest) -> ApiResult<(User, TokenPair)> {
        let username = req.username.as_deref().unwrap_or("").to_lowercase();
        let email = req.email.as_deref().unwrap_or("").to_lowercase();

        let user = self
            .db
            .get_user_by_username_or_email(&username, &email)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;

        if !verify_password(&req.password, &user.password_hash)? {
            return Err(ApiError::unauthorized("Invalid credentials"));
        }

        let pair = self.issue_session(&user).await?;
        tracing::info!(user_id = %user.id, "user logged in");
        Ok((user.into(), pair))
    }

    /// Rotate the session: validate the presented refresh token, require
    /// it to be the one on record, then issue and persist a new pair.
    pub async fn rotate_session(&self, presented: &str) -> ApiResult<TokenPair> {
        let claims = self
            .jwt
            .validate_refresh_token(presented)
            .map_err(|_| ApiError::unauthorized(INVALID_REFRESH_MESSAGE))?;
        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| ApiError::unauthorized(INVALID_REFRESH_MESSAGE))?;

        let user = self
            .db
            .get_user(user_id)
            .await?
            .ok_or_else(|| ApiError::unauthorized(INVALID_REFRESH_MESSAGE))?;

        // A rotated-out or logged-out token hashes to something else
        if user.refresh_token_hash.as_deref() != Some(hash_token(presented).as_str()) {
            return Err(ApiError::unauthorized(INVALID_REFRESH_MESSAGE));
        }

        self.issue_session(&user).await
    }

    pub async fn logout(&self, user_id: Uuid) -> ApiResult<()> {
        self.db.set_refresh_token_hash(user_id, None).await?;
        tracing::info!(%user_id, "user logged out");
        Ok(())
    }

    /// Change the password and rotate the session, which invalidates
    /// any refresh token held elsewhere.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        req: ChangePasswordRequest,
    ) -> ApiResult<TokenPair> {
        let user = self.require_user(user_id).await?;

        if !verify_password(&req.old_password, &user.password_hash)? {
            return Err(ApiError::unauthorized("Old password is incorrect"));
        }

        let password_hash = hash_password(&req.new_password)?;
        self.db.update_user_password(user_id, &password_hash).await?;
        tracing::info!(%user_id, "password changed");

        self.issue_session(&user).await
    }

    pub async fn current_user(&self, user_id: Uuid) -> ApiResult<User> {
        Ok(self.require_user(user_id).await?.into())
    }

    pub async fn update_account(
        &self,
        user_id: Uuid,
        req: UpdateAccountRequest,
    ) -> ApiResult<User> {
        let email = req.email.map(|e| e.to_lowercase());

        if let Some(email) = &email {
            if let Some(existing) = self.db.get_user_by_email(email).await? {
                if existing.id != user_id {
                    return Err(ApiError::conflict(
                        "Email is already in use by another account",
                    ));
                }
            }
        }

        let input = UpdateUserRow {
            fullname: req.fullname,
            email,
            ..Default::default()
        };
        let row = self
            .db
            .update_user(user_id, input)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))?;
        Ok(row.into())
    }

    pub async fn update_avatar(&self, user_id: Uuid, image: &Path) -> ApiResult<User> {
        let current = self.require_user(user_id).await?;
        let uploaded = self.media.upload(image).await?;
        let input = UpdateUserRow {
            avatar: Some(uploaded.url.clone()),
            ..Default::default()
        };
        self.apply_image_update(user_id, input, &uploaded.url, Some(current.avatar.as_str()))
            .await
    }

    pub async fn update_cover_image(&self, user_id: Uuid, image: &Path) -> ApiResult<User> {
        let current = self.require_user(user_id).await?;
        let uploaded = self.media.upload(image).await?;
        let input = UpdateUserRow {
            cover_image: Some(uploaded.url.clone()),
            ..Default::default()
        };
        self.apply_image_update(user_id, input, &uploaded.url, current.cover_image.as_deref())
            .await
    }

    pub async fn channel_profile(
        &self,
        username: &str,
        viewer_id: Uuid,
    ) -> ApiResult<ChannelProfile> {
        let username = username.to_lowercase();
        let row = self
            .db
            .get_channel_profile(&username, viewer_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Channel not found"))?;
        Ok(row.into())
    }

    /// Watched videos with their owners, most recent first
    pub async fn watch_history(&self, user_id: Uuid) -> ApiResult<Vec<VideoWithOwner>> {
        let rows = self.db.list_watch_history(user_id).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn require_user(&self, user_id: Uuid) -> ApiResult<UserRow> {
        self.db
            .get_user(user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("User not found"))
    }

    /// Issue a token pair and persist the refresh digest, displacing any
    /// prior session
    async fn issue_session(&self, user: &UserRow) -> ApiResult<TokenPair> {
        let pair =
            self.jwt
                .generate_token_pair(user.id, &user.username, &user.email, &user.fullname)?;
        self.db
            .set_refresh_token_hash(user.id, Some(&hash_token(&pair.refresh_token)))
            .await?;
        Ok(pair)
    }

    /// Persist an avatar/cover replacement. The freshly uploaded blob is
    /// removed when the row update fails; the displaced blob is removed
    /// when it succeeds.
    async fn apply_image_update(
        &self,
        user_id: Uuid,
        input: UpdateUserRow,
        uploaded_url: &str,
        old_url: Option<&str>,
    ) -> ApiResult<User> {
        match self.db.update_user(user_id, input).await {
            Ok(Some(row)) => {
                if let Some(old) = old_url {
                    self.media.delete_by_url(old).await;
                }
                Ok(row.into())
            }
            Ok(None) => {
                self.media.delete_by_url(uploaded_url).await;
                Err(ApiError::not_found("User not found"))
            }
            Err(err) => {
                self.media.delete_by_url(uploaded_url).await;
                Err(err.into())
            }
        }
    }
}
